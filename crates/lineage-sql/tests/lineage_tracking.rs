//! Lineage Tracking Tests
//!
//! Every parse returns the tables and columns the statement touches, as
//! `<op>::<db-or-null>::<table>` and `<op>::<table-context>::<column>`
//! strings. These tests pin down the recorded operations, the alias
//! resolution pass, and the `(.*)` star sentinel.

mod common;
use common::parse_ok;

// ============================================================================
// SELECT lineage
// ============================================================================

mod select_lineage {
    use super::*;

    #[test]
    fn single_table_select() {
        let result = parse_ok("SELECT col FROM t");
        assert_eq!(result.table_list, vec!["select::null::t"]);
        assert_eq!(result.column_list, vec!["select::t::col"]);
    }

    #[test]
    fn explicit_alias_resolves_to_canonical_table() {
        let result = parse_ok("SELECT t.a FROM my_table AS t");
        assert_eq!(result.column_list, vec!["select::my_table::a"]);
    }

    #[test]
    fn implicit_alias_resolves_to_canonical_table() {
        let result = parse_ok("SELECT t.a FROM my_table t");
        assert_eq!(result.table_list, vec!["select::null::my_table"]);
        assert_eq!(result.column_list, vec!["select::my_table::a"]);
    }

    #[test]
    fn star_projection_uses_sentinel() {
        let result = parse_ok("SELECT * FROM t");
        assert_eq!(result.column_list, vec!["select::null::(.*)"]);
    }

    #[test]
    fn qualified_star_resolves_its_qualifier() {
        let result = parse_ok("SELECT t.* FROM my_table t");
        assert_eq!(result.column_list, vec!["select::my_table::(.*)"]);
    }

    #[test]
    fn duplicate_column_references_are_deduplicated() {
        let result = parse_ok("SELECT a, a FROM t");
        assert_eq!(result.column_list, vec!["select::t::a"]);
    }

    #[test]
    fn where_clause_columns_are_recorded() {
        let result = parse_ok("SELECT col FROM t WHERE id = 1");
        assert_eq!(result.column_list, vec!["select::t::col", "select::t::id"]);
    }

    #[test]
    fn join_resolves_each_alias_to_its_table() {
        let result = parse_ok("SELECT a.x, b.y FROM t1 a JOIN t2 b ON a.id = b.id");
        assert_eq!(
            result.table_list,
            vec!["select::null::t1", "select::null::t2"]
        );
        assert_eq!(
            result.column_list,
            vec![
                "select::t1::x",
                "select::t2::y",
                "select::t1::id",
                "select::t2::id",
            ]
        );
    }

    #[test]
    fn unqualified_column_stays_null_across_two_tables() {
        let result = parse_ok("SELECT x FROM t1 a JOIN t2 b ON a.id = b.id");
        assert_eq!(result.column_list[0], "select::null::x");
    }

    #[test]
    fn qualified_table_splits_db_component() {
        let result = parse_ok("SELECT a FROM project.dataset.t");
        assert_eq!(result.table_list, vec!["select::project.dataset::t"]);
    }

    #[test]
    fn union_records_both_sides_and_merges_stars() {
        let result = parse_ok("SELECT * FROM a UNION SELECT * FROM b");
        assert_eq!(
            result.table_list,
            vec!["select::null::a", "select::null::b"]
        );
        assert_eq!(result.column_list, vec!["select::null::(.*)"]);
    }

    #[test]
    fn cte_and_outer_table_are_both_recorded() {
        let result = parse_ok("WITH x AS (SELECT a FROM t) SELECT * FROM x");
        assert!(result.table_list.contains(&"select::null::t".to_string()));
        assert!(result.table_list.contains(&"select::null::x".to_string()));
    }
}

// ============================================================================
// Write-statement lineage
// ============================================================================

mod write_lineage {
    use super::*;

    #[test]
    fn insert_records_declared_columns() {
        let result = parse_ok("INSERT INTO t (a, b) VALUES (1, 2)");
        assert_eq!(result.table_list, vec!["insert::null::t"]);
        assert_eq!(result.column_list, vec!["insert::t::a", "insert::t::b"]);
    }

    #[test]
    fn insert_without_columns_records_star() {
        let result = parse_ok("INSERT INTO t VALUES (1, 2)");
        assert_eq!(result.column_list, vec!["insert::t::(.*)"]);
    }

    #[test]
    fn insert_into_qualified_table() {
        let result = parse_ok("INSERT INTO project.dataset.t VALUES (1)");
        assert_eq!(result.table_list, vec!["insert::project.dataset::t"]);
    }

    #[test]
    fn update_attributes_set_columns_to_the_table() {
        let result = parse_ok("UPDATE t SET a = 1 WHERE id = 2");
        assert_eq!(result.table_list, vec!["update::null::t"]);
        assert_eq!(result.column_list, vec!["update::t::a", "select::t::id"]);
    }

    #[test]
    fn delete_records_implicit_target_star() {
        let result = parse_ok("DELETE FROM t WHERE id = 1");
        assert_eq!(result.table_list, vec!["delete::null::t"]);
        assert_eq!(result.column_list, vec!["delete::t::(.*)", "select::t::id"]);
    }

    #[test]
    fn create_table_columns_have_no_table_context() {
        let result = parse_ok("CREATE TABLE t (a INT64, b STRING)");
        assert_eq!(result.table_list, vec!["create::null::t"]);
        assert_eq!(
            result.column_list,
            vec!["create::null::a", "create::null::b"]
        );
    }
}

// ============================================================================
// Other statement lineage
// ============================================================================

mod other_lineage {
    use super::*;

    #[test]
    fn use_records_the_database_side() {
        let result = parse_ok("USE mydb");
        assert_eq!(result.table_list, vec!["use::mydb::null"]);
        assert!(result.column_list.is_empty());
    }

    #[test]
    fn drop_records_every_named_table() {
        let result = parse_ok("DROP TABLE t1, t2");
        assert_eq!(result.table_list, vec!["drop::null::t1", "drop::null::t2"]);
    }

    #[test]
    fn truncate_records_the_table() {
        let result = parse_ok("TRUNCATE TABLE t");
        assert_eq!(result.table_list, vec!["truncate::null::t"]);
    }

    #[test]
    fn rename_records_both_sides_of_the_pair() {
        let result = parse_ok("RENAME TABLE a TO b");
        assert_eq!(
            result.table_list,
            vec!["rename::null::a", "rename::null::b"]
        );
    }

    #[test]
    fn script_accumulates_across_statements() {
        let result = parse_ok("USE mydb; SELECT a FROM t");
        assert_eq!(
            result.table_list,
            vec!["use::mydb::null", "select::null::t"]
        );
    }
}
