//! Error Handling Tests
//!
//! Both error kinds abort the whole parse: syntax errors carry the
//! furthest-failure expectation set in a fixed `Expected X but Y found.`
//! template, validation errors carry a plain message. No partial AST
//! ever escapes a failed parse.

mod common;
use common::parse_ok;

use lineage_sql::{parse, Error};

// ============================================================================
// Syntax errors
// ============================================================================

mod syntax_errors {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(parse("").is_err());
    }

    #[test]
    fn unbalanced_open_parenthesis() {
        assert!(parse("SELECT (1 + 2").is_err());
    }

    #[test]
    fn missing_select_keyword() {
        assert!(parse("* FROM users").is_err());
    }

    #[test]
    fn incomplete_and_expression() {
        assert!(parse("SELECT a FROM t WHERE a AND").is_err());
    }

    #[test]
    fn digit_run_into_identifier() {
        assert!(parse("SELECT 1abc FROM t").is_err());
    }

    #[test]
    fn message_uses_the_fixed_template() {
        let err = parse("").unwrap_err();
        let message = err.to_string();
        assert!(
            message.starts_with("Expected ") && message.ends_with(" found."),
            "unexpected message: {message}"
        );
    }

    #[test]
    fn trailing_input_after_a_complete_statement() {
        let err = parse("SELECT a FROM t ^").unwrap_err();
        match err {
            Error::Syntax(detail) => {
                assert_eq!(detail.found.as_deref(), Some("^"));
                assert!(detail.location.start.column > 1);
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn location_tracks_lines() {
        let err = parse("SELECT a\nFROM t %").unwrap_err();
        match err {
            Error::Syntax(detail) => assert_eq!(detail.location.start.line, 2),
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }
}

// ============================================================================
// Validation errors
// ============================================================================

mod validation_errors {
    use super::*;

    #[test]
    fn reserved_word_as_explicit_alias() {
        let err = parse("SELECT a AS select FROM t").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: \"select\" is a reserved word, can not as alias clause"
        );
    }

    #[test]
    fn quoting_bypasses_the_reserved_check() {
        assert!(parse("SELECT a AS `select` FROM t").is_ok());
    }

    #[test]
    fn bare_reserved_word_is_not_an_alias() {
        // GROUP must survive as the GROUP BY keyword, not die as an alias
        let result = parse_ok("SELECT a FROM t GROUP BY a");
        assert_eq!(result.table_list, vec!["select::null::t"]);
    }

    #[test]
    fn insert_arity_mismatch_names_the_row() {
        let err = parse("INSERT INTO t (a, b) VALUES (1, 2, 3)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: column count doesn't match value count at row 1"
        );
    }

    #[test]
    fn insert_arity_mismatch_in_a_later_row() {
        let err = parse("INSERT INTO t (a, b) VALUES (1, 2), (3, 4, 5)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: column count doesn't match value count at row 2"
        );
    }

    #[test]
    fn insert_matching_arity_succeeds() {
        let result = parse_ok("INSERT INTO t (a, b) VALUES (1, 2), (3, 4)");
        assert_eq!(result.table_list, vec!["insert::null::t"]);
    }
}

// ============================================================================
// Nesting depth
// ============================================================================

mod nesting_depth {
    use super::*;

    fn nested_parens(depth: usize) -> String {
        let mut sql = String::from("SELECT ");
        for _ in 0..depth {
            sql.push('(');
        }
        sql.push('1');
        for _ in 0..depth {
            sql.push(')');
        }
        sql
    }

    #[test]
    fn moderate_nesting_parses() {
        assert!(parse(&nested_parens(50)).is_ok());
    }

    #[test]
    fn runaway_nesting_is_rejected() {
        // generous stack so the guard fires before the OS limit would
        let handle = std::thread::Builder::new()
            .stack_size(16 * 1024 * 1024)
            .spawn(|| parse(&nested_parens(600)).map(|_| ()))
            .unwrap();
        let err = handle.join().unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: maximum expression nesting depth exceeded"
        );
    }
}
