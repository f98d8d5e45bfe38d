//! BigQuery SQL parser with table/column lineage tracking.
//!
//! Parsing an input produces three things at once: the statement AST,
//! the list of tables the statement touches, and the list of columns it
//! reads or writes. The lineage lists use a compact string format,
//! `<operation>::<database-or-null>::<table>` for tables and
//! `<operation>::<table-context>::<column>` for columns, with `(.*)` as
//! the column component for star projections. Column qualifiers written
//! as aliases are resolved to the table they name.
//!
//! ```
//! use lineage_sql::parse;
//!
//! let result = parse("SELECT t.col FROM my_table t WHERE id = 1").unwrap();
//! assert_eq!(result.table_list, vec!["select::null::my_table"]);
//! assert_eq!(
//!     result.column_list,
//!     vec!["select::my_table::col", "select::my_table::id"]
//! );
//! ```
//!
//! The grammar is a backtracking recursive descent over ordered
//! alternatives; when no alternative matches, the error reports the
//! furthest input position any attempt reached, with the set of tokens
//! that were expected there.

pub mod ast;
pub mod error;
mod input;
mod keywords;
mod lineage;
mod parser;

pub use ast::{Ast, ParseResult, Statement};
pub use error::{Error, Result, SyntaxError};
pub use parser::{ParseOptions, StartRule};

use parser::Parser;

/// Parse one statement or a semicolon-separated script.
pub fn parse(sql: &str) -> Result<ParseResult> {
    parse_with_options(sql, ParseOptions::default())
}

/// Parse starting from a chosen grammar rule.
pub fn parse_with_options(sql: &str, options: ParseOptions) -> Result<ParseResult> {
    Parser::new(sql).run(options)
}
