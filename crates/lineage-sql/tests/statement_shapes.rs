//! AST Shape Tests
//!
//! Serialized-AST assertions: the JSON output keeps the tagged shapes
//! downstream consumers pattern-match on, so these tests check the
//! `type` discriminators and the clause fields statement by statement.

mod common;
use common::{ast_json, parse_ok};

use serde_json::json;

// ============================================================================
// SELECT
// ============================================================================

mod select_shapes {
    use super::*;

    #[test]
    fn full_clause_list() {
        let ast = ast_json(
            "SELECT DISTINCT a, b AS c FROM t WHERE a > 1 \
             GROUP BY a HAVING COUNT(*) > 2 ORDER BY a DESC LIMIT 10 OFFSET 5",
        );
        assert_eq!(ast["type"], "select");
        assert_eq!(ast["distinct"], "DISTINCT");
        assert_eq!(ast["columns"][1]["as"], "c");
        assert_eq!(ast["where"]["type"], "binary_expr");
        assert_eq!(ast["where"]["operator"], ">");
        assert_eq!(ast["groupby"].as_array().unwrap().len(), 1);
        assert_eq!(ast["having"]["left"]["type"], "aggr_func");
        assert_eq!(ast["orderby"][0]["type"], "DESC");
        assert_eq!(ast["limit"]["seperator"], "offset");
        assert_eq!(ast["limit"]["value"], json!([
            {"type": "number", "value": 10.0},
            {"type": "number", "value": 5.0}
        ]));
    }

    #[test]
    fn bare_star_is_a_column_ref() {
        let ast = ast_json("SELECT * FROM t");
        assert_eq!(
            ast["columns"][0]["expr"],
            json!({"type": "column_ref", "table": null, "column": "*"})
        );
    }

    #[test]
    fn distinct_on_expression_list() {
        let ast = ast_json("SELECT DISTINCT ON (a, b) a, c FROM t");
        assert_eq!(ast["distinct"], "DISTINCT");
        let on = ast["distinct_on"].as_array().unwrap();
        assert_eq!(on.len(), 2);
        assert_eq!(on[0]["column"], "a");
        assert_eq!(on[1]["column"], "b");
    }

    #[test]
    fn plain_distinct_has_no_on_list() {
        let ast = ast_json("SELECT DISTINCT a FROM t");
        assert_eq!(ast["distinct"], "DISTINCT");
        assert!(ast["distinct_on"].is_null());
    }

    #[test]
    fn limit_comma_form() {
        let ast = ast_json("SELECT a FROM t LIMIT 5, 10");
        assert_eq!(ast["limit"]["seperator"], ",");
        assert_eq!(ast["limit"]["value"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn bare_join_defaults_to_inner() {
        let ast = ast_json("SELECT * FROM t1 JOIN t2 ON t1.id = t2.id");
        assert_eq!(ast["from"][1]["join"], "INNER JOIN");
        assert_eq!(ast["from"][1]["on"]["type"], "binary_expr");
    }

    #[test]
    fn left_outer_join_keyword() {
        let ast = ast_json("SELECT * FROM t1 LEFT OUTER JOIN t2 USING (id)");
        assert_eq!(ast["from"][1]["join"], "LEFT JOIN");
        assert_eq!(ast["from"][1]["using"], json!(["id"]));
    }

    #[test]
    fn union_chains_through_next() {
        let ast = ast_json("SELECT * FROM a UNION SELECT * FROM b");
        assert_eq!(ast["set"], "union");
        assert_eq!(ast["_next"]["from"][0]["table"], "b");
        assert!(ast["_next"]["_next"].is_null());
    }

    #[test]
    fn union_all_keeps_the_modifier() {
        let ast = ast_json("SELECT a FROM t UNION ALL SELECT b FROM u");
        assert_eq!(ast["set"], "union all");
    }

    #[test]
    fn cte_block() {
        let ast = ast_json("WITH x AS (SELECT a FROM t) SELECT * FROM x");
        assert_eq!(ast["with"][0]["name"], "x");
        assert_eq!(ast["with"][0]["stmt"]["from"][0]["table"], "t");
    }

    #[test]
    fn parenthesized_expression_keeps_the_marker() {
        let ast = ast_json("SELECT (a + b) FROM t");
        assert_eq!(ast["columns"][0]["expr"]["parentheses"], true);
    }

    #[test]
    fn unparenthesized_expression_omits_the_marker() {
        let ast = ast_json("SELECT a + b FROM t");
        assert!(ast["columns"][0]["expr"]["parentheses"].is_null());
    }

    #[test]
    fn window_frame_is_normalized_text() {
        let ast = ast_json(
            "SELECT RANK() OVER (PARTITION BY a ORDER BY b \
             ROWS BETWEEN 1 PRECEDING AND CURRENT ROW) FROM t",
        );
        let over = &ast["columns"][0]["expr"]["over"];
        assert_eq!(over["type"], "window");
        let spec = &over["as_window_specification"]["window_specification"];
        assert_eq!(spec["orderby"][0]["expr"]["column"], "b");
        assert_eq!(
            spec["window_frame_clause"],
            "rows between 1 PRECEDING and current row"
        );
    }
}

// ============================================================================
// Literals
// ============================================================================

mod literal_shapes {
    use super::*;

    #[test]
    fn big_integer_keeps_exact_decimal_text() {
        let ast = ast_json("SELECT 99999999999999999999");
        assert_eq!(
            ast["columns"][0]["expr"],
            json!({"type": "bigint", "value": "99999999999999999999"})
        );
    }

    #[test]
    fn small_integer_is_a_number() {
        let ast = ast_json("SELECT 42");
        assert_eq!(
            ast["columns"][0]["expr"],
            json!({"type": "number", "value": 42.0})
        );
    }

    #[test]
    fn negative_literal_folds_the_sign() {
        let ast = ast_json("SELECT -3");
        assert_eq!(
            ast["columns"][0]["expr"],
            json!({"type": "number", "value": -3.0})
        );
    }

    #[test]
    fn fractional_literal_is_a_number() {
        let ast = ast_json("SELECT 1.5");
        assert_eq!(ast["columns"][0]["expr"]["value"], 1.5);
    }

    #[test]
    fn quote_style_distinguishes_string_types() {
        let ast = ast_json("SELECT 'a', \"b\"");
        assert_eq!(ast["columns"][0]["expr"]["type"], "single_quote_string");
        assert_eq!(ast["columns"][1]["expr"]["type"], "string");
    }

    #[test]
    fn raw_string_is_a_regex_string() {
        let ast = ast_json("SELECT R'\\d+'");
        assert_eq!(ast["columns"][0]["expr"]["type"], "regex_string");
    }

    #[test]
    fn date_literal() {
        let ast = ast_json("SELECT DATE '2020-01-01'");
        assert_eq!(
            ast["columns"][0]["expr"],
            json!({"type": "date", "value": "2020-01-01"})
        );
    }

    #[test]
    fn timestamp_keyword_wins_over_time() {
        let ast = ast_json("SELECT TIMESTAMP '2020-01-01 00:00:00'");
        assert_eq!(ast["columns"][0]["expr"]["type"], "timestamp");
    }

    #[test]
    fn boolean_and_null_literals() {
        let ast = ast_json("SELECT TRUE, NULL");
        assert_eq!(ast["columns"][0]["expr"]["type"], "bool");
        assert_eq!(ast["columns"][1]["expr"]["type"], "null");
    }
}

// ============================================================================
// Expressions
// ============================================================================

mod expression_shapes {
    use super::*;

    #[test]
    fn count_star_argument() {
        let ast = ast_json("SELECT COUNT(*) FROM t");
        let expr = &ast["columns"][0]["expr"];
        assert_eq!(expr["type"], "aggr_func");
        assert_eq!(expr["name"], "COUNT");
        assert_eq!(expr["args"]["expr"]["type"], "star");
    }

    #[test]
    fn cast_target_is_a_single_type_string() {
        let ast = ast_json("SELECT CAST(a AS DECIMAL(10, 2)) FROM t");
        let expr = &ast["columns"][0]["expr"];
        assert_eq!(expr["type"], "cast");
        assert_eq!(expr["target"]["dataType"], "DECIMAL(10, 2)");
    }

    #[test]
    fn case_branches() {
        let ast = ast_json("SELECT CASE WHEN a > 1 THEN 'x' ELSE 'y' END FROM t");
        let expr = &ast["columns"][0]["expr"];
        assert_eq!(expr["type"], "case");
        assert_eq!(expr["args"][0]["type"], "when");
        assert_eq!(expr["args"][1]["type"], "else");
    }

    #[test]
    fn bind_parameter_prefixes() {
        let ast = ast_json("SELECT :a, $b FROM t");
        assert_eq!(
            ast["columns"][0]["expr"],
            json!({"type": "param", "value": "a"})
        );
        assert_eq!(
            ast["columns"][1]["expr"],
            json!({"type": "param", "value": "b"})
        );
    }

    #[test]
    fn in_list_right_hand() {
        let ast = ast_json("SELECT a FROM t WHERE b IN (1, 2)");
        assert_eq!(ast["where"]["operator"], "IN");
        assert_eq!(ast["where"]["right"]["type"], "expr_list");
    }

    #[test]
    fn between_builds_an_and_pair() {
        let ast = ast_json("SELECT a FROM t WHERE b BETWEEN 1 AND 2");
        assert_eq!(ast["where"]["operator"], "BETWEEN");
    }
}

// ============================================================================
// Other statements
// ============================================================================

mod statement_variants {
    use super::*;
    use lineage_sql::{Ast, Statement};

    #[test]
    fn insert_multi_row_values() {
        let ast = ast_json("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)");
        assert_eq!(ast["type"], "insert");
        assert_eq!(ast["columns"], json!(["a", "b"]));
        let rows = ast["values"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["type"], "expr_list");
    }

    #[test]
    fn insert_from_select() {
        let ast = ast_json("INSERT INTO t SELECT a FROM u");
        assert_eq!(ast["values"]["from"][0]["table"], "u");
    }

    #[test]
    fn create_table_definitions() {
        let ast = ast_json("CREATE TABLE t (a INT64 NOT NULL, b STRING)");
        assert_eq!(ast["type"], "create");
        assert_eq!(ast["keyword"], "table");
        assert_eq!(ast["create_definitions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn create_table_as_select() {
        let ast = ast_json("CREATE TABLE t AS SELECT a FROM u");
        assert_eq!(ast["as"], "as");
        assert_eq!(ast["query_expr"]["from"][0]["table"], "u");
    }

    #[test]
    fn backtick_alias_keeps_the_quotes() {
        let ast = ast_json("SELECT a AS `select` FROM t");
        assert_eq!(ast["columns"][0]["as"], "`select`");
    }

    #[test]
    fn script_parses_to_a_statement_array() {
        let result = parse_ok("USE mydb; SELECT a FROM t");
        match result.ast {
            Ast::Statements(list) => {
                assert_eq!(list.len(), 2);
                assert!(matches!(list[0], Statement::Use(_)));
                assert!(matches!(list[1], Statement::Select(_)));
            }
            other => panic!("expected a statement array, got {other:?}"),
        }
    }

    #[test]
    fn parse_result_top_level_shape() {
        let result = parse_ok("SELECT a FROM t");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["ast"]["type"], "select");
        assert_eq!(json["tableList"], json!(["select::null::t"]));
        assert_eq!(json["columnList"], json!(["select::t::a"]));
    }

    #[test]
    fn comments_are_whitespace() {
        let result = parse_ok("SELECT a -- trailing\nFROM t /* block */ WHERE b = 1 # hash");
        assert_eq!(result.table_list, vec!["select::null::t"]);
    }
}
