//! Common helpers for the integration tests.

use lineage_sql::{parse, ParseResult};

/// Parse and panic with the offending input on failure.
#[allow(dead_code)]
pub fn parse_ok(sql: &str) -> ParseResult {
    match parse(sql) {
        Ok(result) => result,
        Err(err) => panic!("failed to parse {sql:?}: {err}"),
    }
}

/// Parse and serialize the AST to JSON for shape assertions.
#[allow(dead_code)]
pub fn ast_json(sql: &str) -> serde_json::Value {
    let result = parse_ok(sql);
    serde_json::to_value(&result.ast).unwrap()
}
