//! Table/column lineage accumulation.
//!
//! While the grammar runs, its actions record every table and column a
//! statement touches, tagged with the operation context. Aliases declared
//! in FROM clauses are registered as they are parsed and immediately
//! rewrite whatever column entries have accumulated so far; a final
//! resolution pass runs again when the summary is frozen. Entries whose
//! table context never matches a registered alias keep their literal text
//! (best effort, deliberately order-dependent).
//!
//! Serialized formats:
//! - table: `<operation>::<database-or-null>::<table>`
//! - column: `<operation>::<table-context>::<column>` with the sentinel
//!   `(.*)` as the column component for star projections

use std::collections::{HashMap, HashSet};

/// Per-parse lineage state. One tracker per parse invocation; never
/// shared between parses.
#[derive(Debug, Default)]
pub struct LineageTracker {
    tables: Vec<String>,
    table_seen: HashSet<String>,
    columns: Vec<String>,
    column_seen: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl LineageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a table reference. Duplicate entries are ignored.
    pub fn record_table(&mut self, operation: &str, db: Option<&str>, table: &str) {
        let entry = format!("{}::{}::{}", operation, db.unwrap_or("null"), table);
        if self.table_seen.insert(entry.clone()) {
            self.tables.push(entry);
        }
    }

    /// Record a column reference. `table` is the qualifier as written
    /// (alias or table name), or None for an unqualified reference.
    pub fn record_column(&mut self, operation: &str, table: Option<&str>, column: &str) {
        let entry = format!("{}::{}::{}", operation, table.unwrap_or("null"), column);
        if self.column_seen.insert(entry.clone()) {
            self.columns.push(entry);
        }
    }

    /// Register a FROM-clause table and its optional alias, then rewrite
    /// all currently accumulated column entries through the updated map.
    /// The table self-maps so lookups succeed for unaliased qualifiers.
    pub fn register_alias(&mut self, alias: Option<&str>, table: &str) {
        self.aliases.insert(table.to_string(), table.to_string());
        if let Some(alias) = alias {
            self.aliases.insert(alias.to_string(), table.to_string());
        }
        self.refresh_columns();
    }

    fn resolve(&self, context: &str) -> String {
        match self.aliases.get(context) {
            Some(canonical) => canonical.clone(),
            None => context.to_string(),
        }
    }

    /// The canonical table to attribute unqualified references to: defined
    /// only when every registered alias points at the same table.
    fn sole_table(&self) -> Option<&str> {
        let mut tables = self.aliases.values();
        let first = tables.next()?;
        if tables.all(|t| t == first) {
            Some(first)
        } else {
            None
        }
    }

    /// Rewrite column contexts through the alias map. Unqualified (`null`)
    /// contexts are touched only when `attribute_unqualified` is set, so
    /// that in-flight refreshes never let the first table of a join claim
    /// them before the rest of the FROM clause has parsed.
    fn resolved_columns(&self, attribute_unqualified: bool) -> Vec<String> {
        let mut out = Vec::with_capacity(self.columns.len());
        let mut seen = HashSet::new();
        for entry in &self.columns {
            let rewritten = match entry.splitn(3, "::").collect::<Vec<_>>()[..] {
                [op, "null", col] => {
                    let sole = if attribute_unqualified && col != "(.*)" {
                        self.sole_table()
                    } else {
                        None
                    };
                    match sole {
                        Some(table) => format!("{}::{}::{}", op, table, col),
                        None => entry.clone(),
                    }
                }
                [op, ctx, col] => format!("{}::{}::{}", op, self.resolve(ctx), col),
                _ => entry.clone(),
            };
            // a rewrite that collides with an existing entry merges into it
            if seen.insert(rewritten.clone()) {
                out.push(rewritten);
            }
        }
        out
    }

    fn refresh_columns(&mut self) {
        self.columns = self.resolved_columns(false);
        self.column_seen = self.columns.iter().cloned().collect();
    }

    /// Freeze the summary: tables as recorded, columns resolved once more
    /// through the alias map, with unqualified references attributed to
    /// the statement's single table when only one was referenced.
    pub fn finalize(&self) -> (Vec<String>, Vec<String>) {
        (self.tables.clone(), self.resolved_columns(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_dedupe_preserving_insertion_order() {
        let mut tracker = LineageTracker::new();
        tracker.record_table("select", None, "b");
        tracker.record_table("select", None, "a");
        tracker.record_table("select", None, "b");
        let (tables, _) = tracker.finalize();
        assert_eq!(tables, vec!["select::null::b", "select::null::a"]);
    }

    #[test]
    fn qualified_table_keeps_database_component() {
        let mut tracker = LineageTracker::new();
        tracker.record_table("insert", Some("proj.ds"), "t");
        let (tables, _) = tracker.finalize();
        assert_eq!(tables, vec!["insert::proj.ds::t"]);
    }

    #[test]
    fn alias_registration_rewrites_existing_entries() {
        let mut tracker = LineageTracker::new();
        tracker.record_column("select", Some("t"), "a");
        tracker.register_alias(Some("t"), "my_table");
        let (_, columns) = tracker.finalize();
        assert_eq!(columns, vec!["select::my_table::a"]);
    }

    #[test]
    fn late_entries_resolve_at_finalize() {
        let mut tracker = LineageTracker::new();
        tracker.register_alias(Some("t"), "my_table");
        tracker.record_column("select", Some("t"), "b");
        let (_, columns) = tracker.finalize();
        assert_eq!(columns, vec!["select::my_table::b"]);
    }

    #[test]
    fn rewrite_collision_merges() {
        let mut tracker = LineageTracker::new();
        tracker.record_column("select", Some("my_table"), "a");
        tracker.record_column("select", Some("t"), "a");
        tracker.register_alias(Some("t"), "my_table");
        let (_, columns) = tracker.finalize();
        assert_eq!(columns, vec!["select::my_table::a"]);
    }

    #[test]
    fn unqualified_column_attributes_to_sole_table() {
        let mut tracker = LineageTracker::new();
        tracker.record_column("select", None, "col");
        tracker.record_column("select", None, "(.*)");
        tracker.register_alias(None, "t");
        let (_, columns) = tracker.finalize();
        // the star sentinel keeps its null context
        assert_eq!(columns, vec!["select::t::col", "select::null::(.*)"]);
    }

    #[test]
    fn unqualified_column_stays_null_with_many_tables() {
        let mut tracker = LineageTracker::new();
        tracker.record_column("select", None, "col");
        tracker.register_alias(None, "t1");
        tracker.register_alias(None, "t2");
        let (_, columns) = tracker.finalize();
        assert_eq!(columns, vec!["select::null::col"]);
    }

    #[test]
    fn unresolved_context_keeps_literal_text() {
        let mut tracker = LineageTracker::new();
        tracker.record_column("select", Some("ghost"), "x");
        tracker.record_column("select", None, "(.*)");
        let (_, columns) = tracker.finalize();
        assert_eq!(columns, vec!["select::ghost::x", "select::null::(.*)"]);
    }
}
