//! Reserved words and name tables for the BigQuery grammar.
//!
//! An unquoted identifier that matches an entry in [`RESERVED_WORDS`]
//! (case-insensitively) cannot be used as a bare identifier or alias;
//! quoting with backticks or double quotes bypasses the restriction.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Words that may not appear as bare identifiers or aliases.
pub static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ARRAY",
        "ALTER",
        "ALL",
        "ADD",
        "AND",
        "AS",
        "ASC",
        "BETWEEN",
        "BY",
        "CALL",
        "CASE",
        "CREATE",
        "CROSS",
        "CONTAINS",
        "CURRENT_DATE",
        "CURRENT_TIME",
        "CURRENT_TIMESTAMP",
        "CURRENT_USER",
        "DELETE",
        "DESC",
        "DISTINCT",
        "DROP",
        "ELSE",
        "END",
        "EXISTS",
        "EXPLAIN",
        "FALSE",
        "FROM",
        "FULL",
        "FOR",
        "GROUP",
        "HAVING",
        "IN",
        "INNER",
        "INSERT",
        "INTO",
        "IS",
        "JOIN",
        "JSON",
        "KEY",
        "LEFT",
        "LIKE",
        "LIMIT",
        "LOW_PRIORITY",
        "NOT",
        "NULL",
        "ON",
        "OR",
        "ORDER",
        "OUTER",
        "PARTITION",
        "PIVOT",
        "RECURSIVE",
        "RENAME",
        "READ",
        "RIGHT",
        "SELECT",
        "SESSION_USER",
        "SET",
        "SHOW",
        "SYSTEM_USER",
        "TABLE",
        "THEN",
        "TRUE",
        "TRUNCATE",
        "TYPE",
        "UNION",
        "UPDATE",
        "USING",
        "VALUES",
        "WINDOW",
        "WITH",
        "WHEN",
        "WHERE",
        "WRITE",
        "GLOBAL",
        "SESSION",
        "LOCAL",
        "PERSIST",
        "PERSIST_ONLY",
        "UNNEST",
    ]
    .into_iter()
    .collect()
});

/// Built-in BigQuery scalar type names usable in casts and column definitions.
pub static DATA_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "BOOL",
        "BYTE",
        "BYTES",
        "DATE",
        "DATETIME",
        "FLOAT64",
        "GEOGRAPHY",
        "INT64",
        "NUMERIC",
        "BIGNUMERIC",
        "STRING",
        "TIME",
        "TIMESTAMP",
        "ARRAY",
        "STRUCT",
    ]
    .into_iter()
    .collect()
});

/// Units accepted by `INTERVAL` and `EXTRACT`.
pub static INTERVAL_UNITS: &[&str] = &[
    "CENTURY",
    "DECADE",
    "DOW",
    "DOY",
    "EPOCH",
    "ISODOW",
    "ISOYEAR",
    "MICROSECONDS",
    "MILLENNIUM",
    "MILLISECONDS",
    "TIMEZONE_HOUR",
    "TIMEZONE_MINUTE",
    "TIMEZONE",
    "QUARTER",
    "SECOND",
    "MINUTE",
    "MONTH",
    "HOUR",
    "WEEK",
    "YEAR",
    "DAY",
];

/// True when `name` is reserved (case-insensitive match).
pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(name.to_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_lookup_is_case_insensitive() {
        assert!(is_reserved("select"));
        assert!(is_reserved("Select"));
        assert!(is_reserved("WHERE"));
        assert!(!is_reserved("my_table"));
    }

    #[test]
    fn longer_units_listed_before_prefixes() {
        // TIMEZONE_HOUR must match before TIMEZONE in ordered-choice scans.
        let tz = INTERVAL_UNITS.iter().position(|u| *u == "TIMEZONE").unwrap();
        let tzh = INTERVAL_UNITS
            .iter()
            .position(|u| *u == "TIMEZONE_HOUR")
            .unwrap();
        assert!(tzh < tz);
    }
}
