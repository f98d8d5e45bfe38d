use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lineage_sql::parse;

const SIMPLE_SELECT: &str = "SELECT a, b, c FROM table1";

const MEDIUM_SELECT: &str = r#"
SELECT
    u.id,
    u.name,
    COUNT(o.id) AS order_count,
    SUM(o.total) AS total_spent
FROM users u
LEFT JOIN orders o ON u.id = o.user_id
WHERE u.created_at > '2024-01-01'
    AND u.status = 'active'
GROUP BY u.id, u.name
HAVING COUNT(o.id) > 5
ORDER BY total_spent DESC
LIMIT 100
"#;

const COMPLEX_SELECT: &str = r#"
WITH
    active_users AS (
        SELECT id, name FROM users WHERE status = 'active'
    ),
    recent_orders AS (
        SELECT
            user_id,
            COUNT(*) AS order_count,
            SUM(total) AS total_spent
        FROM orders
        WHERE created_at > DATE '2024-01-01'
        GROUP BY user_id
    )
SELECT
    u.name,
    o.order_count,
    RANK() OVER (ORDER BY o.total_spent DESC) AS spend_rank
FROM active_users u
JOIN recent_orders o ON u.id = o.user_id
ORDER BY spend_rank
LIMIT 50
"#;

fn bench_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for (name, sql) in [
        ("simple", SIMPLE_SELECT),
        ("medium", MEDIUM_SELECT),
        ("complex", COMPLEX_SELECT),
    ] {
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), sql, |b, sql| {
            b.iter(|| parse(black_box(sql)).unwrap());
        });
    }
    group.finish();
}

fn bench_wide_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_in_list");
    for width in [10usize, 100, 1000] {
        let mut sql = String::from("SELECT * FROM t WHERE x IN (");
        for i in 0..width {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&i.to_string());
        }
        sql.push(')');
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &sql, |b, sql| {
            b.iter(|| parse(black_box(sql)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_statements, bench_wide_in_list);
criterion_main!(benches);
