//! Statement rules: SELECT pipelines, DML, DDL, and the session
//! statements.
//!
//! Lineage recording happens inside these rules as the grammar commits
//! to a statement form: table references are tagged with the statement's
//! operation, FROM-clause aliases are registered as soon as the full
//! table list has parsed, and star projections record the `(.*)`
//! sentinel.

use super::Parser;
use crate::ast::{
    AlterAction, AlterAddColumn, AlterDropColumn, AlterOption, AlterRenameTable, Alter, Assign,
    CallStmt, Collate, ColumnComment, ColumnDefinition, ColumnItem, ConstraintDefinition, Create,
    CreateDefinition, Cte, DataType, DefaultVal, Delete, DescStmt, DropStmt, Expr, IndexDefinition,
    Insert, InsertValues, LikeTable, Limit, LockStmt, LockTable, Nullable, OnDuplicateUpdate,
    PivotItem, ReferenceDefinition, Rename, Select, SetItem, SetStmt, Show,
    Statement, SysTimeAsOf, TableBase, TableOption, TableRef, TableSample, TableSubquery,
    UnlockStmt, Update, UseStmt, WindowClause,
};
use crate::error::{Error, Result};

impl<'a> Parser<'a> {
    // ----- SELECT ---------------------------------------------------------

    /// A SELECT pipeline: one query block, or several chained with
    /// UNION/INTERSECT/EXCEPT. The chain is a linked list: each block's
    /// `set_op` names the operator joining it to its `next` block.
    pub(super) fn union_stmt(&mut self) -> Result<Option<Select>> {
        let Some(head) = self.select_block()? else {
            return Ok(None);
        };
        let mut head = head;
        {
            let mut cur = &mut head;
            loop {
                let mark = self.input.mark();
                self.input.skip_ws();
                let Some(op) = self.set_operator() else {
                    self.input.reset(mark);
                    break;
                };
                self.input.skip_ws();
                let Some(next) = self.select_block()? else {
                    self.input.reset(mark);
                    break;
                };
                cur.set_op = Some(op);
                cur.next = Some(Box::new(next));
                cur = match cur.next.as_deref_mut() {
                    Some(next) => next,
                    None => break,
                };
            }
        }
        Ok(Some(head))
    }

    fn set_operator(&mut self) -> Option<String> {
        if self.input.keyword("UNION") {
            let mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("ALL") {
                return Some("union all".to_string());
            }
            if self.input.keyword("DISTINCT") {
                return Some("union distinct".to_string());
            }
            self.input.reset(mark);
            return Some("union".to_string());
        }
        if self.input.keyword("INTERSECT") {
            return Some("intersect".to_string());
        }
        if self.input.keyword("EXCEPT") {
            return Some("except".to_string());
        }
        None
    }

    /// A single query block, possibly parenthesized.
    fn select_block(&mut self) -> Result<Option<Select>> {
        if let Some(mut inner) = self.parenthesized(|p| p.union_stmt())? {
            inner.parentheses = true;
            return Ok(Some(inner));
        }
        self.select_stmt()
    }

    pub(super) fn select_stmt(&mut self) -> Result<Option<Select>> {
        self.descend()?;
        let result = self.select_stmt_inner();
        self.ascend();
        result
    }

    fn select_stmt_inner(&mut self) -> Result<Option<Select>> {
        let mark = self.input.mark();
        let with = self.with_clause()?;
        self.input.skip_ws();
        if !self.input.keyword("SELECT") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let as_struct_val = self.as_struct_val_clause()?;
        self.input.skip_ws();
        let mut distinct_on = None;
        let distinct = if self.input.keyword("DISTINCT") {
            distinct_on = self.distinct_on_clause()?;
            self.input.skip_ws();
            Some("DISTINCT".to_string())
        } else if self.input.keyword("ALL") {
            self.input.skip_ws();
            None
        } else {
            None
        };
        let Some(columns) = self.comma_list(Self::column_list_item)? else {
            self.input.reset(mark);
            return Ok(None);
        };
        let mut from = None;
        let mut for_sys_time_as_of = None;
        let from_mark = self.input.mark();
        self.input.skip_ws();
        if self.input.keyword("FROM") {
            self.input.skip_ws();
            match self.table_ref_list()? {
                Some(refs) => {
                    self.register_from_tables("select", &refs);
                    from = Some(refs);
                    for_sys_time_as_of = self.for_sys_time_clause()?;
                }
                None => self.input.reset(from_mark),
            }
        } else {
            self.input.reset(from_mark);
        }
        let where_clause = self.where_clause()?;
        let groupby = self.group_by_clause()?;
        let having = self.having_clause()?;
        let window = self.window_clause()?;
        let orderby = self.order_by_clause()?;
        let limit = self.limit_clause()?;
        Ok(Some(Select {
            with,
            as_struct_val,
            distinct,
            distinct_on,
            columns,
            from,
            for_sys_time_as_of,
            where_clause,
            groupby,
            having,
            orderby,
            limit,
            window,
            parentheses: false,
            set_op: None,
            next: None,
        }))
    }

    /// `ON (expr, ...)` immediately after DISTINCT.
    fn distinct_on_clause(&mut self) -> Result<Option<Vec<Expr>>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("ON") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(list) = self.comma_list(Self::expr)? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(list))
    }

    fn as_struct_val_clause(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        if !self.input.keyword("AS") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if self.input.keyword("STRUCT") {
            return Ok(Some("struct".to_string()));
        }
        if self.input.keyword("VALUE") {
            return Ok(Some("value".to_string()));
        }
        self.input.reset(mark);
        Ok(None)
    }

    fn with_clause(&mut self) -> Result<Option<Vec<Cte>>> {
        let mark = self.input.mark();
        if !self.input.keyword("WITH") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let recursive = if self.input.keyword("RECURSIVE") {
            self.input.skip_ws();
            true
        } else {
            false
        };
        match self.comma_list(|p| p.cte(recursive))? {
            Some(ctes) => Ok(Some(ctes)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn cte(&mut self, recursive: bool) -> Result<Option<Cte>> {
        let mark = self.input.mark();
        let Some(name) = self.ident()? else {
            return Ok(None);
        };
        self.input.skip_ws();
        let columns = self.paren_ident_list()?;
        self.input.skip_ws();
        if !self.input.keyword("AS") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(stmt) = self.parenthesized(|p| p.union_stmt())? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Cte {
            name,
            stmt: Box::new(stmt),
            columns,
            recursive,
        }))
    }

    fn paren_ident_list(&mut self) -> Result<Option<Vec<String>>> {
        let mark = self.input.mark();
        match self.parenthesized(|p| p.comma_list(Self::ident))? {
            Some(list) => Ok(Some(list)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    /// One projection item: `*`, `* EXCEPT (...)`, `tbl.*`, or an
    /// expression with optional subscript and alias.
    fn column_list_item(&mut self) -> Result<Option<ColumnItem>> {
        let mark = self.input.mark();
        if self.input.literal("*") {
            let except_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("EXCEPT") {
                self.input.skip_ws();
                if let Some(excluded) = self.parenthesized(|p| {
                    p.comma_list(|p| {
                        Ok(p.ident()?
                            .map(|c| ColumnItem::new(Expr::column_ref(None, c), None)))
                    })
                })? {
                    self.lineage.record_column("select", None, "(.*)");
                    return Ok(Some(ColumnItem::new(
                        Expr::Except {
                            expr_list: excluded,
                            parentheses: true,
                            star: "*".to_string(),
                        },
                        None,
                    )));
                }
            }
            // EXCEPT here may instead be a set operator; plain star wins
            self.input.reset(except_mark);
            self.lineage.record_column("select", None, "(.*)");
            return Ok(Some(ColumnItem::new(Expr::column_ref(None, "*"), None)));
        }
        // tbl.* projection
        if let Some(table) = self.ident()? {
            let star_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.literal(".") {
                self.input.skip_ws();
                if self.input.literal("*") {
                    self.lineage.record_column("select", Some(&table), "(.*)");
                    return Ok(Some(ColumnItem::new(
                        Expr::column_ref(Some(table), "*"),
                        None,
                    )));
                }
            }
            self.input.reset(star_mark);
            self.input.reset(mark);
        } else {
            self.input.reset(mark);
        }
        let Some(expr) = self.expr()? else {
            return Ok(None);
        };
        let offset = self.column_offset_suffix()?;
        let alias = self.alias_clause()?;
        Ok(Some(ColumnItem {
            expr,
            alias,
            offset,
        }))
    }

    /// `[OFFSET(n)]` / `[ORDINAL(n)]` array subscript after a projection
    /// expression, kept as text.
    fn column_offset_suffix(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.literal("[") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let mut kind = None;
        for kw in ["SAFE_OFFSET", "SAFE_ORDINAL", "OFFSET", "ORDINAL"] {
            if self.input.keyword(kw) {
                kind = Some(kw);
                break;
            }
        }
        let Some(kind) = kind else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(index) = self.unsigned_digits() else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.literal("]") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(format!("{}({})", kind, index)))
    }

    // ----- FROM clause ----------------------------------------------------

    /// `a [JOIN b ON ... | , c]*` flattened into a list; each joined item
    /// carries its join kind and condition.
    fn table_ref_list(&mut self) -> Result<Option<Vec<TableRef>>> {
        let Some(head) = self.table_ref()? else {
            return Ok(None);
        };
        let mut items = vec![head];
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            if self.input.literal(",") {
                self.input.skip_ws();
                match self.table_ref()? {
                    Some(item) => {
                        items.push(item);
                        continue;
                    }
                    None => {
                        self.input.reset(mark);
                        break;
                    }
                }
            }
            let Some(join) = self.join_op() else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(mut item) = self.table_ref()? else {
                self.input.reset(mark);
                break;
            };
            set_join(&mut item, join);
            let cond_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("ON") {
                self.input.skip_ws();
                match self.expr()? {
                    Some(cond) => set_on(&mut item, cond),
                    None => self.input.reset(cond_mark),
                }
            } else if self.input.keyword("USING") {
                self.input.skip_ws();
                match self.paren_ident_list()? {
                    Some(columns) => {
                        if let TableRef::Table(base) = &mut item {
                            base.using = Some(columns);
                        }
                    }
                    None => self.input.reset(cond_mark),
                }
            } else {
                self.input.reset(cond_mark);
            }
            items.push(item);
        }
        Ok(Some(items))
    }

    fn join_op(&mut self) -> Option<String> {
        let mark = self.input.mark();
        for (head, out) in [
            ("CROSS", "CROSS JOIN"),
            ("INNER", "INNER JOIN"),
            ("LEFT", "LEFT JOIN"),
            ("RIGHT", "RIGHT JOIN"),
            ("FULL", "FULL JOIN"),
        ] {
            if self.input.keyword(head) {
                self.input.skip_ws();
                if head != "CROSS" && head != "INNER" && self.input.keyword("OUTER") {
                    self.input.skip_ws();
                }
                if self.input.keyword("JOIN") {
                    return Some(out.to_string());
                }
                self.input.reset(mark);
                return None;
            }
        }
        if self.input.keyword("JOIN") {
            return Some("INNER JOIN".to_string());
        }
        None
    }

    fn table_ref(&mut self) -> Result<Option<TableRef>> {
        // ( sub-select ) [AS] alias
        let mark = self.input.mark();
        if let Some(mut sub) = self.parenthesized(|p| p.union_stmt())? {
            sub.parentheses = true;
            let alias = self.alias_clause()?;
            return Ok(Some(TableRef::Sub(TableSubquery {
                expr: Box::new(sub),
                alias,
                join: None,
                on: None,
            })));
        }
        self.input.reset(mark);
        if let Some(unnest) = self.table_unnest()? {
            return Ok(Some(TableRef::Unnest(Box::new(unnest))));
        }
        let Some(mut base) = self.table_name()? else {
            return Ok(None);
        };
        // PIVOT binds to the table it follows
        let pivot_mark = self.input.mark();
        self.input.skip_ws();
        if self.input.keyword("PIVOT") {
            self.input.skip_ws();
            if let Some(pivot) = self.pivot_body(base.clone())? {
                return Ok(Some(TableRef::Pivot(pivot)));
            }
        }
        self.input.reset(pivot_mark);
        base.alias = self.alias_clause()?;
        base.tablesample = self.tablesample_clause()?;
        Ok(Some(TableRef::Table(base)))
    }

    fn table_unnest(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.lookahead(|i| i.literal_ci("UNNEST")) {
            return Ok(None);
        }
        // the expression rule owns the UNNEST(...) syntax
        match self.expr()? {
            Some(e @ Expr::Unnest { .. }) => Ok(Some(e)),
            _ => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn pivot_body(&mut self, table: TableBase) -> Result<Option<PivotItem>> {
        let mark = self.input.mark();
        if !self.input.literal("(") {
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(aggr) = self.expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("FOR") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(column) = self.ident()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("IN") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(in_expr) = self.parenthesized(|p| p.expr_list())? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        let alias = self.alias_clause()?;
        Ok(Some(PivotItem {
            table,
            expr: aggr,
            column,
            in_expr,
            alias,
        }))
    }

    fn tablesample_clause(&mut self) -> Result<Option<TableSample>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("TABLESAMPLE") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("SYSTEM") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(expr) = self.expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        let unit = if self.input.keyword("PERCENT") {
            self.input.skip_ws();
            Some("percent".to_string())
        } else {
            None
        };
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(TableSample {
            method: "system".to_string(),
            expr,
            unit,
        }))
    }

    /// Dotted table name. Three parts fold the first two into the
    /// database component (`project.dataset.table`).
    fn table_name(&mut self) -> Result<Option<TableBase>> {
        let Some(head) = self.ident()? else {
            return Ok(None);
        };
        let mut parts = vec![head];
        while parts.len() < 3 {
            let mark = self.input.mark();
            self.input.skip_ws();
            if !self.input.literal(".") {
                self.input.reset(mark);
                break;
            }
            self.input.skip_ws();
            match self.ident()? {
                Some(part) => parts.push(part),
                None => {
                    self.input.reset(mark);
                    break;
                }
            }
        }
        let base = match parts.len() {
            1 => TableBase::new(None, parts.remove(0)),
            2 => {
                let db = parts.remove(0);
                TableBase::new(Some(db), parts.remove(0))
            }
            _ => {
                let project = parts.remove(0);
                let dataset = parts.remove(0);
                TableBase::new(Some(format!("{}.{}", project, dataset)), parts.remove(0))
            }
        };
        Ok(Some(base))
    }

    /// Record every base table in a FROM list under `op` and register its
    /// alias for column resolution.
    fn register_from_tables(&mut self, op: &str, refs: &[TableRef]) {
        for item in refs {
            if let TableRef::Table(base) = item {
                self.lineage
                    .record_table(op, base.db.as_deref(), &base.table);
                self.lineage
                    .register_alias(base.alias.as_deref(), &base.table);
            }
        }
    }

    fn for_sys_time_clause(&mut self) -> Result<Option<SysTimeAsOf>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("FOR") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("SYSTEM_TIME") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("AS") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("OF") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.expr()? {
            Some(expr) => Ok(Some(SysTimeAsOf {
                keyword: "for system_time as of".to_string(),
                expr,
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn where_clause(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("WHERE") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.where_expr()? {
            Some(expr) => Ok(Some(expr)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn group_by_clause(&mut self) -> Result<Option<Vec<Expr>>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("GROUP") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("BY") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.expr_list_value()? {
            Some(values) => Ok(Some(values)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn having_clause(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("HAVING") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.expr()? {
            Some(expr) => Ok(Some(expr)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn window_clause(&mut self) -> Result<Option<WindowClause>> {
        match self.named_window_clause()? {
            Some(windows) => Ok(Some(WindowClause {
                keyword: "window".to_string(),
                kind: "window".to_string(),
                expr: windows,
            })),
            None => Ok(None),
        }
    }

    /// `LIMIT n`, `LIMIT n, m`, or `LIMIT n OFFSET m`.
    fn limit_clause(&mut self) -> Result<Option<Limit>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("LIMIT") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(first) = self.expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        let sep_mark = self.input.mark();
        self.input.skip_ws();
        if self.input.literal(",") {
            self.input.skip_ws();
            if let Some(second) = self.expr()? {
                return Ok(Some(Limit {
                    seperator: ",".to_string(),
                    value: vec![first, second],
                }));
            }
            self.input.reset(sep_mark);
        } else if self.input.keyword("OFFSET") {
            self.input.skip_ws();
            if let Some(second) = self.expr()? {
                return Ok(Some(Limit {
                    seperator: "offset".to_string(),
                    value: vec![first, second],
                }));
            }
            self.input.reset(sep_mark);
        } else {
            self.input.reset(sep_mark);
        }
        Ok(Some(Limit {
            seperator: String::new(),
            value: vec![first],
        }))
    }

    // ----- INSERT / REPLACE ----------------------------------------------

    pub(super) fn insert_stmt(&mut self) -> Result<Option<Statement>> {
        let mark = self.input.mark();
        let replace = if self.input.keyword("INSERT") {
            false
        } else if self.input.keyword("REPLACE") {
            true
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        if self.input.keyword("INTO") {
            self.input.skip_ws();
        }
        let Some(table) = self.table_name()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.lineage
            .record_table("insert", table.db.as_deref(), &table.table);
        let partition = self.partition_clause()?;
        self.input.skip_ws();

        // SET form
        if self.input.keyword("SET") {
            self.input.skip_ws();
            let Some(set) = self.comma_list(Self::set_item)? else {
                self.input.reset(mark);
                return Ok(None);
            };
            for item in &set {
                self.lineage
                    .record_column("insert", Some(&table.table), &item.column);
            }
            let on_duplicate_update = self.on_duplicate_clause()?;
            let stmt = Insert {
                table: Some(vec![table]),
                columns: None,
                values: None,
                partition,
                set: Some(set),
                on_duplicate_update,
            };
            return Ok(Some(wrap_insert(stmt, replace)));
        }

        let columns = self.paren_ident_list()?;
        self.input.skip_ws();
        let values = if self.input.keyword("VALUES") {
            self.input.skip_ws();
            let Some(rows) = self.comma_list(Self::value_row)? else {
                self.input.reset(mark);
                return Ok(None);
            };
            if let Some(cols) = &columns {
                for (index, row) in rows.iter().enumerate() {
                    let count = match row {
                        Expr::ExprList { value, .. } => value.len(),
                        _ => 1,
                    };
                    if count != cols.len() {
                        return Err(Error::validation(format!(
                            "Error: column count doesn't match value count at row {}",
                            index + 1
                        )));
                    }
                }
            }
            Some(InsertValues::Rows(rows))
        } else {
            match self.union_stmt()? {
                Some(select) => Some(InsertValues::Select(Box::new(select))),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        };
        match &columns {
            Some(cols) => {
                for col in cols {
                    self.lineage
                        .record_column("insert", Some(&table.table), col);
                }
            }
            None => {
                self.lineage
                    .record_column("insert", Some(&table.table), "(.*)");
            }
        }
        let on_duplicate_update = self.on_duplicate_clause()?;
        let stmt = Insert {
            table: Some(vec![table]),
            columns,
            values,
            partition,
            set: None,
            on_duplicate_update,
        };
        Ok(Some(wrap_insert(stmt, replace)))
    }

    fn value_row(&mut self) -> Result<Option<Expr>> {
        match self.parenthesized(|p| p.expr_list_value())? {
            Some(values) => Ok(Some(Expr::list(values))),
            None => Ok(None),
        }
    }

    fn partition_clause(&mut self) -> Result<Option<Vec<String>>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("PARTITION") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.paren_ident_list()? {
            Some(list) => Ok(Some(list)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn on_duplicate_clause(&mut self) -> Result<Option<OnDuplicateUpdate>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        let matched = self.input.keyword("ON")
            && {
                self.input.skip_ws();
                self.input.keyword("DUPLICATE")
            }
            && {
                self.input.skip_ws();
                self.input.keyword("KEY")
            }
            && {
                self.input.skip_ws();
                self.input.keyword("UPDATE")
            };
        if !matched {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.comma_list(Self::set_item)? {
            Some(set) => Ok(Some(OnDuplicateUpdate {
                keyword: "on duplicate key update".to_string(),
                set,
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    /// `[tbl.]column = expr` assignment in SET lists.
    fn set_item(&mut self) -> Result<Option<SetItem>> {
        let mark = self.input.mark();
        let Some(first) = self.ident()? else {
            return Ok(None);
        };
        let mut table = None;
        let mut column = first;
        let dot_mark = self.input.mark();
        self.input.skip_ws();
        if self.input.literal(".") {
            self.input.skip_ws();
            match self.ident()? {
                Some(second) => {
                    table = Some(column);
                    column = second;
                }
                None => self.input.reset(dot_mark),
            }
        } else {
            self.input.reset(dot_mark);
        }
        self.input.skip_ws();
        if !self.input.literal("=") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(value) = self.expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(SetItem {
            column,
            value,
            table,
            keyword: None,
        }))
    }

    // ----- UPDATE / DELETE ------------------------------------------------

    pub(super) fn update_stmt(&mut self) -> Result<Option<Update>> {
        let mark = self.input.mark();
        if !self.input.keyword("UPDATE") {
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(table) = self.table_ref_list()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.register_from_tables("update", &table);
        self.input.skip_ws();
        if !self.input.keyword("SET") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(set) = self.comma_list(Self::set_item)? else {
            self.input.reset(mark);
            return Ok(None);
        };
        for item in &set {
            self.lineage
                .record_column("update", item.table.as_deref(), &item.column);
        }
        let where_clause = self.where_clause()?;
        let orderby = self.order_by_clause()?;
        let limit = self.limit_clause()?;
        Ok(Some(Update {
            table,
            set,
            where_clause,
            orderby,
            limit,
        }))
    }

    pub(super) fn delete_stmt(&mut self) -> Result<Option<Delete>> {
        let mark = self.input.mark();
        if !self.input.keyword("DELETE") {
            return Ok(None);
        }
        self.input.skip_ws();
        // optional explicit target list before FROM
        let targets = {
            let target_mark = self.input.mark();
            match self.comma_list(Self::table_name)? {
                Some(list) => {
                    let from_follows = self.input.lookahead(|i| {
                        i.skip_ws();
                        i.literal_ci("FROM")
                    });
                    if from_follows {
                        Some(list)
                    } else {
                        self.input.reset(target_mark);
                        None
                    }
                }
                None => None,
            }
        };
        self.input.skip_ws();
        if !self.input.keyword("FROM") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(from) = self.table_ref_list()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.register_from_tables("delete", &from);
        let table = match targets {
            Some(list) => {
                for t in &list {
                    self.lineage.record_column("delete", Some(&t.table), "(.*)");
                }
                Some(list)
            }
            None => {
                // a single-table DELETE implies its own target
                let mut implied = None;
                if from.len() == 1 {
                    if let TableRef::Table(base) = &from[0] {
                        let mut target = base.clone();
                        target.addition = true;
                        self.lineage
                            .record_column("delete", Some(&target.table), "(.*)");
                        implied = Some(vec![target]);
                    }
                }
                implied
            }
        };
        let where_clause = self.where_clause()?;
        let orderby = self.order_by_clause()?;
        let limit = self.limit_clause()?;
        Ok(Some(Delete {
            table,
            from,
            where_clause,
            orderby,
            limit,
        }))
    }

    // ----- CREATE ---------------------------------------------------------

    pub(super) fn create_stmt(&mut self) -> Result<Option<Create>> {
        let mark = self.input.mark();
        if !self.input.keyword("CREATE") {
            return Ok(None);
        }
        self.input.skip_ws();
        let ignore_replace = {
            let or_mark = self.input.mark();
            if self.input.keyword("OR") {
                self.input.skip_ws();
                if self.input.keyword("REPLACE") {
                    self.input.skip_ws();
                    Some("replace".to_string())
                } else {
                    self.input.reset(or_mark);
                    None
                }
            } else {
                None
            }
        };
        let temporary = if self.input.keyword("TEMPORARY") {
            self.input.skip_ws();
            Some("temporary".to_string())
        } else if self.input.keyword("TEMP") {
            self.input.skip_ws();
            Some("temp".to_string())
        } else {
            None
        };
        if self.input.keyword("DATABASE") || self.input.keyword("SCHEMA") {
            self.input.skip_ws();
            let if_not_exists = self.if_not_exists_clause()?;
            self.input.skip_ws();
            let Some(name) = self.ident()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(Create {
                keyword: "database".to_string(),
                temporary,
                if_not_exists,
                database: Some(name),
                ignore_replace,
                ..Default::default()
            }));
        }
        if !self.input.keyword("TABLE") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let if_not_exists = self.if_not_exists_clause()?;
        self.input.skip_ws();
        let Some(table) = self.table_name()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.lineage
            .record_table("create", table.db.as_deref(), &table.table);
        self.input.skip_ws();
        if self.input.keyword("LIKE") {
            self.input.skip_ws();
            let Some(source) = self.table_name()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(Create {
                keyword: "table".to_string(),
                temporary,
                if_not_exists,
                table: Some(vec![table]),
                ignore_replace,
                like: Some(LikeTable {
                    kind: "like".to_string(),
                    table: source,
                }),
                ..Default::default()
            }));
        }
        let create_definitions = {
            let defs_mark = self.input.mark();
            match self.parenthesized(|p| p.comma_list(Self::create_definition))? {
                Some(defs) => Some(defs),
                None => {
                    self.input.reset(defs_mark);
                    None
                }
            }
        };
        let table_options = self.table_options()?;
        let (as_keyword, query_expr) = {
            let as_mark = self.input.mark();
            self.input.skip_ws();
            let explicit_as = self.input.keyword("AS");
            if explicit_as {
                self.input.skip_ws();
            }
            match self.union_stmt()? {
                Some(select) => (
                    explicit_as.then(|| "as".to_string()),
                    Some(Box::new(select)),
                ),
                None => {
                    self.input.reset(as_mark);
                    (None, None)
                }
            }
        };
        Ok(Some(Create {
            keyword: "table".to_string(),
            temporary,
            if_not_exists,
            table: Some(vec![table]),
            ignore_replace,
            as_keyword,
            query_expr,
            create_definitions,
            table_options,
            ..Default::default()
        }))
    }

    fn if_not_exists_clause(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        let matched = self.input.keyword("IF")
            && {
                self.input.skip_ws();
                self.input.keyword("NOT")
            }
            && {
                self.input.skip_ws();
                self.input.keyword("EXISTS")
            };
        if matched {
            Ok(Some("if not exists".to_string()))
        } else {
            self.input.reset(mark);
            Ok(None)
        }
    }

    fn create_definition(&mut self) -> Result<Option<CreateDefinition>> {
        if let Some(c) = self.constraint_definition()? {
            return Ok(Some(CreateDefinition::Constraint(Box::new(c))));
        }
        if let Some(i) = self.index_definition()? {
            return Ok(Some(CreateDefinition::Index(Box::new(i))));
        }
        match self.column_definition()? {
            Some(c) => Ok(Some(CreateDefinition::Column(Box::new(c)))),
            None => Ok(None),
        }
    }

    fn constraint_definition(&mut self) -> Result<Option<ConstraintDefinition>> {
        let mark = self.input.mark();
        let constraint = if self.input.keyword("CONSTRAINT") {
            self.input.skip_ws();
            let name = self.ident()?;
            self.input.skip_ws();
            name
        } else {
            None
        };
        if self.input.keyword("PRIMARY") {
            self.input.skip_ws();
            if !self.input.keyword("KEY") {
                self.input.reset(mark);
                return Ok(None);
            }
            self.input.skip_ws();
            let Some(definition) = self.paren_ident_list()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(ConstraintDefinition {
                constraint,
                definition,
                constraint_type: "primary key".to_string(),
                index: None,
                reference_definition: None,
                resource: "constraint".to_string(),
            }));
        }
        if self.input.keyword("UNIQUE") {
            self.input.skip_ws();
            let index = if self.input.keyword("KEY") || self.input.keyword("INDEX") {
                self.input.skip_ws();
                self.ident()?
            } else {
                None
            };
            self.input.skip_ws();
            let Some(definition) = self.paren_ident_list()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(ConstraintDefinition {
                constraint,
                definition,
                constraint_type: "unique".to_string(),
                index,
                reference_definition: None,
                resource: "constraint".to_string(),
            }));
        }
        if self.input.keyword("FOREIGN") {
            self.input.skip_ws();
            if !self.input.keyword("KEY") {
                self.input.reset(mark);
                return Ok(None);
            }
            self.input.skip_ws();
            let Some(definition) = self.paren_ident_list()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            let reference_definition = self.reference_definition()?;
            return Ok(Some(ConstraintDefinition {
                constraint,
                definition,
                constraint_type: "FOREIGN KEY".to_string(),
                index: None,
                reference_definition,
                resource: "constraint".to_string(),
            }));
        }
        self.input.reset(mark);
        Ok(None)
    }

    fn index_definition(&mut self) -> Result<Option<IndexDefinition>> {
        let mark = self.input.mark();
        let keyword = if self.input.keyword("INDEX") {
            "index"
        } else if self.input.keyword("KEY") {
            "key"
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        let index = self.ident()?;
        self.input.skip_ws();
        let Some(definition) = self.paren_ident_list()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(IndexDefinition {
            index,
            definition,
            keyword: keyword.to_string(),
            resource: "index".to_string(),
        }))
    }

    fn column_definition(&mut self) -> Result<Option<ColumnDefinition>> {
        let mark = self.input.mark();
        let Some(name) = self.ident()? else {
            return Ok(None);
        };
        self.input.skip_ws();
        let Some(definition) = self.column_data_type()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.lineage.record_column("create", None, &name);
        let mut column = ColumnDefinition {
            column: Expr::column_ref(None, name),
            definition,
            nullable: None,
            default_val: None,
            auto_increment: None,
            unique_or_primary: None,
            comment: None,
            collate: None,
            column_format: None,
            storage: None,
            reference_definition: None,
            resource: "column".to_string(),
        };
        loop {
            let opt_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("NOT") {
                self.input.skip_ws();
                if self.input.keyword("NULL") {
                    column.nullable = Some(Nullable {
                        kind: "not null".to_string(),
                        value: "not null".to_string(),
                    });
                    continue;
                }
                self.input.reset(opt_mark);
                break;
            }
            if self.input.keyword("NULL") {
                column.nullable = Some(Nullable {
                    kind: "null".to_string(),
                    value: "null".to_string(),
                });
                continue;
            }
            if self.input.keyword("DEFAULT") {
                self.input.skip_ws();
                match self.expr()? {
                    Some(value) => {
                        column.default_val = Some(DefaultVal {
                            kind: "default".to_string(),
                            value,
                        });
                        continue;
                    }
                    None => {
                        self.input.reset(opt_mark);
                        break;
                    }
                }
            }
            if self.input.keyword("AUTO_INCREMENT") {
                column.auto_increment = Some("auto_increment".to_string());
                continue;
            }
            if self.input.keyword("UNIQUE") {
                let key_mark = self.input.mark();
                self.input.skip_ws();
                if self.input.keyword("KEY") {
                    column.unique_or_primary = Some("unique key".to_string());
                } else {
                    self.input.reset(key_mark);
                    column.unique_or_primary = Some("unique".to_string());
                }
                continue;
            }
            if self.input.keyword("PRIMARY") {
                self.input.skip_ws();
                if self.input.keyword("KEY") {
                    column.unique_or_primary = Some("primary key".to_string());
                    continue;
                }
                self.input.reset(opt_mark);
                break;
            }
            if self.input.keyword("COMMENT") {
                self.input.skip_ws();
                match self.expr()? {
                    Some(value) => {
                        column.comment = Some(ColumnComment {
                            kind: "comment".to_string(),
                            value,
                        });
                        continue;
                    }
                    None => {
                        self.input.reset(opt_mark);
                        break;
                    }
                }
            }
            if self.input.keyword("COLLATE") {
                self.input.skip_ws();
                match self.ident()? {
                    Some(value) => {
                        column.collate = Some(Collate {
                            kind: "collate".to_string(),
                            value,
                        });
                        continue;
                    }
                    None => {
                        self.input.reset(opt_mark);
                        break;
                    }
                }
            }
            if let Some(reference) = self.reference_definition()? {
                column.reference_definition = Some(reference);
                continue;
            }
            self.input.reset(opt_mark);
            break;
        }
        Ok(Some(column))
    }

    fn reference_definition(&mut self) -> Result<Option<ReferenceDefinition>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("REFERENCES") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(table) = self.table_name()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        let columns = self.paren_ident_list()?;
        let mut on_delete = None;
        let mut on_update = None;
        loop {
            let on_mark = self.input.mark();
            self.input.skip_ws();
            if !self.input.keyword("ON") {
                self.input.reset(on_mark);
                break;
            }
            self.input.skip_ws();
            let target = if self.input.keyword("DELETE") {
                &mut on_delete
            } else if self.input.keyword("UPDATE") {
                &mut on_update
            } else {
                self.input.reset(on_mark);
                break;
            };
            self.input.skip_ws();
            let Some(action) = self.reference_action() else {
                self.input.reset(on_mark);
                break;
            };
            *target = Some(action);
        }
        Ok(Some(ReferenceDefinition {
            keyword: "references".to_string(),
            table,
            columns,
            on_delete,
            on_update,
        }))
    }

    fn reference_action(&mut self) -> Option<String> {
        let mark = self.input.mark();
        if self.input.keyword("CASCADE") {
            return Some("cascade".to_string());
        }
        if self.input.keyword("RESTRICT") {
            return Some("restrict".to_string());
        }
        if self.input.keyword("SET") {
            self.input.skip_ws();
            if self.input.keyword("NULL") {
                return Some("set null".to_string());
            }
            self.input.reset(mark);
            return None;
        }
        if self.input.keyword("NO") {
            self.input.skip_ws();
            if self.input.keyword("ACTION") {
                return Some("no action".to_string());
            }
            self.input.reset(mark);
            return None;
        }
        None
    }

    /// Column type with optional `(length[, scale])` and the ARRAY/STRUCT
    /// element annotations folded into the name.
    fn column_data_type(&mut self) -> Result<Option<DataType>> {
        let Some(name) = self.data_type_name()? else {
            return Ok(None);
        };
        if name == "ARRAY" || name == "STRUCT" {
            let mark = self.input.mark();
            self.input.skip_ws();
            if self.input.literal("<") {
                let mut depth = 1usize;
                let mut inner = String::new();
                loop {
                    match self.input.peek() {
                        Some('<') => {
                            depth += 1;
                            inner.push('<');
                            self.input.any_char();
                        }
                        Some('>') => {
                            depth -= 1;
                            self.input.any_char();
                            if depth == 0 {
                                break;
                            }
                            inner.push('>');
                        }
                        Some(c) => {
                            inner.push(c);
                            self.input.any_char();
                        }
                        None => {
                            self.input.reset(mark);
                            return Ok(Some(DataType::named(name)));
                        }
                    }
                }
                return Ok(Some(DataType::named(format!("{}<{}>", name, inner.trim()))));
            }
            self.input.reset(mark);
            return Ok(Some(DataType::named(name)));
        }
        let mark = self.input.mark();
        self.input.skip_ws();
        if self.input.literal("(") {
            self.input.skip_ws();
            let length = self.unsigned_digits().and_then(|d| d.parse::<u64>().ok());
            if let Some(length) = length {
                self.input.skip_ws();
                let scale = if self.input.literal(",") {
                    self.input.skip_ws();
                    self.unsigned_digits().and_then(|d| d.parse::<u64>().ok())
                } else {
                    None
                };
                self.input.skip_ws();
                if self.input.literal(")") {
                    return Ok(Some(DataType {
                        data_type: name,
                        length: Some(length),
                        scale,
                    }));
                }
            }
        }
        self.input.reset(mark);
        Ok(Some(DataType::named(name)))
    }

    fn table_options(&mut self) -> Result<Option<Vec<TableOption>>> {
        let mut options = Vec::new();
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let mut keyword = None;
            for kw in [
                "ENGINE",
                "AUTO_INCREMENT",
                "CHARSET",
                "COLLATE",
                "COMMENT",
            ] {
                if self.input.keyword(kw) {
                    keyword = Some(kw.to_lowercase());
                    break;
                }
            }
            if keyword.is_none() && self.input.keyword("DEFAULT") {
                self.input.skip_ws();
                if self.input.keyword("CHARSET") {
                    keyword = Some("default charset".to_string());
                }
            }
            let Some(keyword) = keyword else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let symbol = if self.input.literal("=") {
                self.input.skip_ws();
                Some("=".to_string())
            } else {
                None
            };
            let value = if let Some(name) = self.ident()? {
                name
            } else if let Some(digits) = self.unsigned_digits() {
                digits
            } else if let Some(Expr::SingleQuoteString { value, .. }) = self.expr()? {
                value
            } else {
                self.input.reset(mark);
                break;
            };
            options.push(TableOption {
                keyword,
                symbol,
                value,
            });
        }
        if options.is_empty() {
            Ok(None)
        } else {
            Ok(Some(options))
        }
    }

    // ----- ALTER ----------------------------------------------------------

    pub(super) fn alter_stmt(&mut self) -> Result<Option<Alter>> {
        let mark = self.input.mark();
        if !self.input.keyword("ALTER") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("TABLE") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(table) = self.table_name()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.lineage
            .record_table("alter", table.db.as_deref(), &table.table);
        self.input.skip_ws();
        let Some(actions) = self.comma_list(Self::alter_action)? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Alter {
            table: vec![table],
            expr: actions,
        }))
    }

    fn alter_action(&mut self) -> Result<Option<AlterAction>> {
        let mark = self.input.mark();
        if self.input.keyword("ADD") {
            self.input.skip_ws();
            if let Some(c) = self.constraint_definition()? {
                return Ok(Some(AlterAction::AddConstraint(Box::new(c))));
            }
            if let Some(i) = self.index_definition()? {
                return Ok(Some(AlterAction::AddIndex(Box::new(i))));
            }
            let keyword = if self.input.keyword("COLUMN") {
                self.input.skip_ws();
                Some("COLUMN".to_string())
            } else {
                None
            };
            let Some(name) = self.ident()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            self.input.skip_ws();
            let Some(definition) = self.column_data_type()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(AlterAction::AddColumn(Box::new(AlterAddColumn {
                action: "add".to_string(),
                keyword,
                column: Expr::column_ref(None, name),
                definition,
                resource: "column".to_string(),
            }))));
        }
        if self.input.keyword("DROP") {
            self.input.skip_ws();
            let keyword = if self.input.keyword("COLUMN") {
                self.input.skip_ws();
                Some("COLUMN".to_string())
            } else {
                None
            };
            let Some(name) = self.ident()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(AlterAction::DropColumn(Box::new(AlterDropColumn {
                action: "drop".to_string(),
                keyword,
                column: Expr::column_ref(None, name),
                resource: "column".to_string(),
            }))));
        }
        if self.input.keyword("RENAME") {
            self.input.skip_ws();
            let keyword = if self.input.keyword("TO") {
                self.input.skip_ws();
                Some("TO".to_string())
            } else if self.input.keyword("AS") {
                self.input.skip_ws();
                Some("AS".to_string())
            } else {
                None
            };
            let Some(name) = self.ident()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            self.lineage.record_table("rename", None, &name);
            return Ok(Some(AlterAction::RenameTable(Box::new(
                AlterRenameTable {
                    action: "rename".to_string(),
                    keyword,
                    table: name,
                    resource: "table".to_string(),
                },
            ))));
        }
        for kw in ["ALGORITHM", "LOCK"] {
            if self.input.keyword(kw) {
                self.input.skip_ws();
                let symbol = if self.input.literal("=") {
                    self.input.skip_ws();
                    Some("=".to_string())
                } else {
                    None
                };
                let Some(value) = self.ident_name()? else {
                    self.input.reset(mark);
                    return Ok(None);
                };
                return Ok(Some(AlterAction::Option(Box::new(AlterOption {
                    keyword: kw.to_string(),
                    resource: kw.to_lowercase(),
                    symbol,
                    value: value.to_uppercase(),
                }))));
            }
        }
        Ok(None)
    }

    // ----- DROP / TRUNCATE / RENAME --------------------------------------

    pub(super) fn drop_or_truncate_stmt(&mut self) -> Result<Option<Statement>> {
        let mark = self.input.mark();
        if self.input.keyword("DROP") {
            self.input.skip_ws();
            if !self.input.keyword("TABLE") {
                self.input.reset(mark);
                return Ok(None);
            }
            self.input.skip_ws();
            let Some(names) = self.comma_list(Self::table_name)? else {
                self.input.reset(mark);
                return Ok(None);
            };
            for t in &names {
                self.lineage.record_table("drop", t.db.as_deref(), &t.table);
            }
            return Ok(Some(Statement::Drop(Box::new(DropStmt {
                keyword: "table".to_string(),
                name: names,
            }))));
        }
        if self.input.keyword("TRUNCATE") {
            self.input.skip_ws();
            if self.input.keyword("TABLE") {
                self.input.skip_ws();
            }
            let Some(names) = self.comma_list(Self::table_name)? else {
                self.input.reset(mark);
                return Ok(None);
            };
            for t in &names {
                self.lineage
                    .record_table("truncate", t.db.as_deref(), &t.table);
            }
            return Ok(Some(Statement::Truncate(Box::new(DropStmt {
                keyword: "table".to_string(),
                name: names,
            }))));
        }
        Ok(None)
    }

    pub(super) fn rename_stmt(&mut self) -> Result<Option<Rename>> {
        let mark = self.input.mark();
        if !self.input.keyword("RENAME") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("TABLE") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(pairs) = self.comma_list(Self::rename_pair)? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Rename { table: pairs }))
    }

    fn rename_pair(&mut self) -> Result<Option<Vec<TableBase>>> {
        let mark = self.input.mark();
        let Some(from) = self.table_name()? else {
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("TO") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(to) = self.table_name()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.lineage
            .record_table("rename", from.db.as_deref(), &from.table);
        self.lineage.record_table("rename", to.db.as_deref(), &to.table);
        Ok(Some(vec![from, to]))
    }

    // ----- session statements ---------------------------------------------

    pub(super) fn call_stmt(&mut self) -> Result<Option<CallStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("CALL") {
            return Ok(None);
        }
        self.input.skip_ws();
        match self.expr()? {
            Some(expr @ Expr::Function { .. }) => Ok(Some(CallStmt { expr })),
            _ => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    pub(super) fn use_stmt(&mut self) -> Result<Option<UseStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("USE") {
            return Ok(None);
        }
        self.input.skip_ws();
        match self.ident()? {
            Some(db) => {
                self.lineage.record_table("use", Some(&db), "null");
                Ok(Some(UseStmt { db }))
            }
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    pub(super) fn set_stmt(&mut self) -> Result<Option<SetStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("SET") {
            return Ok(None);
        }
        self.input.skip_ws();
        match self.comma_list(Self::set_assign)? {
            Some(expr) => Ok(Some(SetStmt { expr })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn set_assign(&mut self) -> Result<Option<Assign>> {
        let mark = self.input.mark();
        let keyword = if self.input.keyword("GLOBAL") {
            self.input.skip_ws();
            Some("GLOBAL".to_string())
        } else if self.input.keyword("SESSION") {
            self.input.skip_ws();
            Some("SESSION".to_string())
        } else {
            None
        };
        let left = if let Some(v) = self.var_ref()? {
            v
        } else {
            match self.ident()? {
                Some(name) => Expr::Var {
                    name,
                    members: Vec::new(),
                    prefix: None,
                    parentheses: false,
                },
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        };
        self.input.skip_ws();
        let symbol = if self.input.literal(":=") {
            ":="
        } else if self.input.literal("=") {
            "="
        } else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        match self.expr()? {
            Some(right) => Ok(Some(Assign {
                left,
                symbol: symbol.to_string(),
                right,
                keyword,
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    pub(super) fn lock_stmt(&mut self) -> Result<Option<LockStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("LOCK") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("TABLES") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.comma_list(Self::lock_table_item)? {
            Some(tables) => Ok(Some(LockStmt {
                keyword: "tables".to_string(),
                tables,
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn lock_table_item(&mut self) -> Result<Option<LockTable>> {
        let mark = self.input.mark();
        let Some(table) = self.table_name()? else {
            return Ok(None);
        };
        self.input.skip_ws();
        let lock_type = if self.input.keyword("READ") {
            let local_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("LOCAL") {
                "read local".to_string()
            } else {
                self.input.reset(local_mark);
                "read".to_string()
            }
        } else if self.input.keyword("LOW_PRIORITY") {
            self.input.skip_ws();
            if !self.input.keyword("WRITE") {
                self.input.reset(mark);
                return Ok(None);
            }
            "low_priority write".to_string()
        } else if self.input.keyword("WRITE") {
            "write".to_string()
        } else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.lineage
            .record_table("lock", table.db.as_deref(), &table.table);
        Ok(Some(LockTable { table, lock_type }))
    }

    pub(super) fn unlock_stmt(&mut self) -> Result<Option<UnlockStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("UNLOCK") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("TABLES") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(UnlockStmt {
            keyword: "tables".to_string(),
        }))
    }

    pub(super) fn show_stmt(&mut self) -> Result<Option<Show>> {
        let mark = self.input.mark();
        if !self.input.keyword("SHOW") {
            return Ok(None);
        }
        self.input.skip_ws();
        let logs_suffix = if self.input.keyword("BINARY") {
            Some("binary")
        } else if self.input.keyword("MASTER") {
            Some("master")
        } else {
            None
        };
        if let Some(suffix) = logs_suffix {
            self.input.skip_ws();
            if !self.input.keyword("LOGS") {
                self.input.reset(mark);
                return Ok(None);
            }
            return Ok(Some(show_of("logs", Some(suffix))));
        }
        if self.input.keyword("BINLOG") {
            self.input.skip_ws();
            if !self.input.keyword("EVENTS") {
                self.input.reset(mark);
                return Ok(None);
            }
            let mut show = show_of("binlog", Some("events"));
            let in_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("IN") {
                self.input.skip_ws();
                match self.table_name()? {
                    Some(t) => show.in_table = Some(t),
                    None => self.input.reset(in_mark),
                }
            } else {
                self.input.reset(in_mark);
            }
            let from_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("FROM") {
                self.input.skip_ws();
                match self.table_name()? {
                    Some(t) => show.from = Some(t),
                    None => self.input.reset(from_mark),
                }
            } else {
                self.input.reset(from_mark);
            }
            show.limit = self.limit_clause()?;
            return Ok(Some(show));
        }
        if self.input.keyword("CHARACTER") {
            self.input.skip_ws();
            if !self.input.keyword("SET") {
                self.input.reset(mark);
                return Ok(None);
            }
            let mut show = show_of("character set", None);
            show.expr = self.show_filter()?;
            return Ok(Some(show));
        }
        if self.input.keyword("COLLATION") {
            let mut show = show_of("collation", None);
            show.expr = self.show_filter()?;
            return Ok(Some(show));
        }
        if self.input.keyword("GRANTS") {
            let mut show = show_of("grants", None);
            let for_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("FOR") {
                self.input.skip_ws();
                match self.ident()? {
                    Some(user) => show.for_user = Some(user),
                    None => self.input.reset(for_mark),
                }
            } else {
                self.input.reset(for_mark);
            }
            return Ok(Some(show));
        }
        for (kw, keyword) in [
            ("TABLES", "tables"),
            ("DATABASES", "databases"),
            ("PROCESSLIST", "processlist"),
        ] {
            if self.input.keyword(kw) {
                return Ok(Some(show_of(keyword, None)));
            }
        }
        self.input.reset(mark);
        Ok(None)
    }

    /// `LIKE 'pattern'` or `WHERE expr` after a SHOW variant.
    fn show_filter(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if self.input.keyword("LIKE") {
            self.input.skip_ws();
            match self.expr()? {
                Some(pattern) => return Ok(Some(pattern)),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        }
        if self.input.keyword("WHERE") {
            self.input.skip_ws();
            match self.expr()? {
                Some(cond) => return Ok(Some(cond)),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        }
        self.input.reset(mark);
        Ok(None)
    }

    pub(super) fn desc_stmt(&mut self) -> Result<Option<DescStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("DESCRIBE") && !self.input.keyword("DESC") {
            return Ok(None);
        }
        self.input.skip_ws();
        match self.ident()? {
            Some(table) => Ok(Some(DescStmt { table })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }
}

fn wrap_insert(stmt: Insert, replace: bool) -> Statement {
    if replace {
        Statement::Replace(Box::new(stmt))
    } else {
        Statement::Insert(Box::new(stmt))
    }
}

fn show_of(keyword: &str, suffix: Option<&str>) -> Show {
    Show {
        keyword: keyword.to_string(),
        suffix: suffix.map(str::to_string),
        expr: None,
        in_table: None,
        from: None,
        limit: None,
        for_user: None,
    }
}

fn set_join(item: &mut TableRef, join: String) {
    match item {
        TableRef::Table(base) => base.join = Some(join),
        TableRef::Sub(sub) => sub.join = Some(join),
        TableRef::Unnest(expr) => {
            if let Expr::Unnest { join: j, .. } = expr.as_mut() {
                *j = Some(join);
            }
        }
        TableRef::Pivot(_) => {}
    }
}

fn set_on(item: &mut TableRef, cond: Expr) {
    match item {
        TableRef::Table(base) => base.on = Some(cond),
        TableRef::Sub(sub) => sub.on = Some(cond),
        TableRef::Unnest(expr) => {
            if let Expr::Unnest { on, .. } = expr.as_mut() {
                *on = Some(Box::new(cond));
            }
        }
        TableRef::Pivot(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Ast, Statement, TableRef};
    use crate::parser::{ParseOptions, Parser};

    fn parse(sql: &str) -> crate::ast::ParseResult {
        Parser::new(sql).run(ParseOptions::default()).unwrap()
    }

    fn single(sql: &str) -> Statement {
        match parse(sql).ast {
            Ast::Statement(s) => *s,
            other => panic!("expected single statement, got {other:?}"),
        }
    }

    #[test]
    fn select_records_table_and_column() {
        let result = parse("SELECT col FROM t");
        assert_eq!(result.table_list, vec!["select::null::t"]);
        assert_eq!(result.column_list, vec!["select::t::col"]);
    }

    #[test]
    fn union_chains_through_next() {
        let stmt = single("SELECT a FROM t UNION ALL SELECT b FROM u");
        match stmt {
            Statement::Select(head) => {
                assert_eq!(head.set_op.as_deref(), Some("union all"));
                assert!(head.next.is_some());
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn qualified_table_splits_project_and_dataset() {
        let result = parse("SELECT x FROM project.dataset.tbl");
        assert_eq!(result.table_list, vec!["select::project.dataset::tbl"]);
    }

    #[test]
    fn join_flattens_into_table_list() {
        let stmt = single("SELECT a.x FROM t1 a LEFT JOIN t2 b ON a.id = b.id");
        match stmt {
            Statement::Select(s) => {
                let from = s.from.unwrap();
                assert_eq!(from.len(), 2);
                match &from[1] {
                    TableRef::Table(base) => {
                        assert_eq!(base.join.as_deref(), Some("LEFT JOIN"));
                        assert!(base.on.is_some());
                    }
                    other => panic!("expected base table, got {other:?}"),
                }
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn insert_mismatched_arity_reports_row_number() {
        let err = Parser::new("INSERT INTO t (a, b) VALUES (1, 2), (3)")
            .run(ParseOptions::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: column count doesn't match value count at row 2"
        );
    }

    #[test]
    fn insert_without_columns_records_star() {
        let result = parse("INSERT INTO db.t VALUES (1, 2)");
        assert_eq!(result.table_list, vec!["insert::db::t"]);
        assert_eq!(result.column_list, vec!["insert::t::(.*)"]);
    }

    #[test]
    fn delete_single_table_implies_target() {
        let stmt = single("DELETE FROM t WHERE id = 1");
        match stmt {
            Statement::Delete(d) => {
                let targets = d.table.unwrap();
                assert!(targets[0].addition);
            }
            other => panic!("expected delete, got {other:?}"),
        }
    }

    #[test]
    fn update_records_set_columns() {
        let result = parse("UPDATE t SET a = 1, b = 2 WHERE id = 3");
        assert_eq!(result.table_list, vec!["update::null::t"]);
        assert!(result.column_list.contains(&"update::t::a".to_string()));
        assert!(result.column_list.contains(&"update::t::b".to_string()));
    }

    #[test]
    fn create_table_records_columns_without_context() {
        let result = parse("CREATE TABLE t (id INT64 NOT NULL, name STRING)");
        assert_eq!(result.table_list, vec!["create::null::t"]);
        assert_eq!(
            result.column_list,
            vec!["create::null::id", "create::null::name"]
        );
    }

    #[test]
    fn use_records_database_side() {
        let result = parse("USE mydb");
        assert_eq!(result.table_list, vec!["use::mydb::null"]);
    }

    #[test]
    fn lock_tables_canonicalizes_lock_type() {
        let stmt = single("LOCK TABLES t READ LOCAL, u WRITE");
        match stmt {
            Statement::Lock(lock) => {
                assert_eq!(lock.tables[0].lock_type, "read local");
                assert_eq!(lock.tables[1].lock_type, "write");
            }
            other => panic!("expected lock, got {other:?}"),
        }
    }
}
