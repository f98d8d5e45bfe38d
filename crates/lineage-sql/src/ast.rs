//! AST node types for parsed statements and expressions.
//!
//! Every node is a variant of one of two tagged enums, [`Statement`] and
//! [`Expr`], serialized with a `type` discriminator so the JSON output
//! keeps the shapes downstream consumers already pattern-match on
//! (`{"type": "column_ref", "table": ..., "column": ...}`).
//!
//! Nodes that can be wrapped in source parentheses carry a
//! `parentheses: bool` marker, needed only for faithful re-serialization.
//! `SELECT` blocks combined with UNION/INTERSECT/EXCEPT form a singly
//! linked pipeline through [`Select::next`] (serialized `_next`) and
//! [`Select::set_op`] (serialized `set`), not a combinator tree.

use serde::Serialize;

fn is_false(v: &bool) -> bool {
    !*v
}

/// The result of one parse invocation: the statement(s) plus the lineage
/// summary accumulated while parsing them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub ast: Ast,
    pub table_list: Vec<String>,
    pub column_list: Vec<String>,
}

/// A single statement for one-statement inputs, an array for
/// semicolon-separated scripts, or a bare expression when parsing with
/// the expression start rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ast {
    Statement(Box<Statement>),
    Statements(Vec<Statement>),
    Expr(Box<Expr>),
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Statement {
    Select(Box<Select>),
    Insert(Box<Insert>),
    Replace(Box<Insert>),
    Update(Box<Update>),
    Delete(Box<Delete>),
    Create(Box<Create>),
    Alter(Box<Alter>),
    Drop(Box<DropStmt>),
    Truncate(Box<DropStmt>),
    Rename(Box<Rename>),
    Use(Box<UseStmt>),
    Set(Box<SetStmt>),
    Lock(Box<LockStmt>),
    Unlock(Box<UnlockStmt>),
    Show(Box<Show>),
    Desc(Box<DescStmt>),
    Call(Box<CallStmt>),
    Assign(Box<Assign>),
    Return(Box<ReturnStmt>),
}

/// One SELECT query block. Set-operation sequences chain through `next`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Select {
    pub with: Option<Vec<Cte>>,
    pub as_struct_val: Option<String>,
    pub distinct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct_on: Option<Vec<Expr>>,
    pub columns: Vec<ColumnItem>,
    pub from: Option<Vec<TableRef>>,
    pub for_sys_time_as_of: Option<SysTimeAsOf>,
    #[serde(rename = "where")]
    pub where_clause: Option<Expr>,
    pub groupby: Option<Vec<Expr>>,
    pub having: Option<Expr>,
    pub orderby: Option<Vec<OrderByItem>>,
    pub limit: Option<Limit>,
    pub window: Option<WindowClause>,
    #[serde(skip_serializing_if = "is_false")]
    pub parentheses: bool,
    #[serde(rename = "set", skip_serializing_if = "Option::is_none")]
    pub set_op: Option<String>,
    #[serde(rename = "_next", skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<Select>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cte {
    pub name: String,
    pub stmt: Box<Select>,
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "is_false")]
    pub recursive: bool,
}

/// One projection list item: an expression, optional alias, optional
/// array subscript suffix such as `[OFFSET(1)]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnItem {
    pub expr: Expr,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

impl ColumnItem {
    pub fn new(expr: Expr, alias: Option<String>) -> Self {
        Self {
            expr,
            alias,
            offset: None,
        }
    }
}

/// One FROM-clause item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TableRef {
    Sub(TableSubquery),
    /// An [`Expr::Unnest`] node used as a FROM item.
    Unnest(Box<Expr>),
    Pivot(PivotItem),
    Table(TableBase),
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct TableBase {
    pub db: Option<String>,
    pub table: String,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub using: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tablesample: Option<TableSample>,
    #[serde(skip_serializing_if = "is_false")]
    pub addition: bool,
}

impl TableBase {
    pub fn new(db: Option<String>, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSubquery {
    pub expr: Box<Select>,
    #[serde(rename = "as")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on: Option<Expr>,
}

/// `FROM t PIVOT(aggr FOR col IN (...)) [AS alias]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotItem {
    pub table: TableBase,
    pub expr: Expr,
    pub column: String,
    pub in_expr: Expr,
    #[serde(rename = "as")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSample {
    pub method: String,
    pub expr: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SysTimeAsOf {
    pub keyword: String,
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderByItem {
    pub expr: Expr,
    #[serde(rename = "type")]
    pub direction: String,
}

/// `LIMIT n [OFFSET m]` / `LIMIT n, m`. The field spelling `seperator`
/// is kept for output compatibility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Limit {
    pub seperator: String,
    pub value: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowClause {
    pub keyword: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub expr: Vec<NamedWindow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedWindow {
    pub name: String,
    pub as_window_specification: AsWindowSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AsWindowSpec {
    Name(String),
    Spec {
        window_specification: WindowSpec,
        parentheses: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct WindowSpec {
    pub name: Option<String>,
    pub partitionby: Option<Vec<Expr>>,
    pub orderby: Option<Vec<OrderByItem>>,
    /// Frame clause normalized to canonical text, e.g.
    /// `rows between 2 PRECEDING and current row`
    pub window_frame_clause: Option<String>,
}

/// `OVER (...)` / `OVER window_name` attached to a function call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Over {
    #[serde(rename = "type")]
    pub kind: String,
    pub as_window_specification: AsWindowSpec,
}

impl Over {
    pub fn new(spec: AsWindowSpec) -> Self {
        Self {
            kind: "window".to_string(),
            as_window_specification: spec,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insert {
    pub table: Option<Vec<TableBase>>,
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<InsertValues>,
    pub partition: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<Vec<SetItem>>,
    pub on_duplicate_update: Option<OnDuplicateUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InsertValues {
    /// `VALUES (..), (..)`: one `expr_list` node per row
    Rows(Vec<Expr>),
    Select(Box<Select>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnDuplicateUpdate {
    pub keyword: String,
    pub set: Vec<SetItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetItem {
    pub column: String,
    pub value: Expr,
    pub table: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Update {
    pub table: Vec<TableRef>,
    pub set: Vec<SetItem>,
    #[serde(rename = "where")]
    pub where_clause: Option<Expr>,
    pub orderby: Option<Vec<OrderByItem>>,
    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delete {
    pub table: Option<Vec<TableBase>>,
    pub from: Vec<TableRef>,
    #[serde(rename = "where")]
    pub where_clause: Option<Expr>,
    pub orderby: Option<Vec<OrderByItem>>,
    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Create {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary: Option<String>,
    pub if_not_exists: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableBase>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_replace: Option<String>,
    #[serde(rename = "as", skip_serializing_if = "Option::is_none")]
    pub as_keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_expr: Option<Box<Select>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_definitions: Option<Vec<CreateDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_options: Option<Vec<TableOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub like: Option<LikeTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateDefinition {
    Column(Box<ColumnDefinition>),
    Constraint(Box<ConstraintDefinition>),
    Index(Box<IndexDefinition>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    pub column: Expr,
    pub definition: DataType,
    pub nullable: Option<Nullable>,
    pub default_val: Option<DefaultVal>,
    pub auto_increment: Option<String>,
    pub unique_or_primary: Option<String>,
    pub comment: Option<ColumnComment>,
    pub collate: Option<Collate>,
    pub column_format: Option<String>,
    pub storage: Option<String>,
    pub reference_definition: Option<ReferenceDefinition>,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataType {
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u64>,
}

impl DataType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            data_type: name.into(),
            length: None,
            scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Nullable {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefaultVal {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnComment {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collate {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceDefinition {
    pub keyword: String,
    pub table: TableBase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintDefinition {
    pub constraint: Option<String>,
    pub definition: Vec<String>,
    pub constraint_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_definition: Option<ReferenceDefinition>,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexDefinition {
    pub index: Option<String>,
    pub definition: Vec<String>,
    pub keyword: String,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableOption {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LikeTable {
    #[serde(rename = "type")]
    pub kind: String,
    pub table: TableBase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alter {
    pub table: Vec<TableBase>,
    pub expr: Vec<AlterAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlterAction {
    AddColumn(Box<AlterAddColumn>),
    DropColumn(Box<AlterDropColumn>),
    RenameTable(Box<AlterRenameTable>),
    Option(Box<AlterOption>),
    AddConstraint(Box<ConstraintDefinition>),
    AddIndex(Box<IndexDefinition>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterAddColumn {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub column: Expr,
    pub definition: DataType,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterDropColumn {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub column: Expr,
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterRenameTable {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub table: String,
    pub resource: String,
}

/// `ALGORITHM [=] ...` / `LOCK [=] ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlterOption {
    pub keyword: String,
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub value: String,
}

/// Shared by DROP and TRUNCATE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropStmt {
    pub keyword: String,
    pub name: Vec<TableBase>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rename {
    pub table: Vec<Vec<TableBase>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UseStmt {
    pub db: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetStmt {
    pub expr: Vec<Assign>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockStmt {
    pub keyword: String,
    pub tables: Vec<LockTable>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockTable {
    pub table: TableBase,
    pub lock_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnlockStmt {
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Show {
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expr: Option<Expr>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub in_table: Option<TableBase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<TableBase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<Limit>,
    #[serde(rename = "for", skip_serializing_if = "Option::is_none")]
    pub for_user: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescStmt {
    pub table: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallStmt {
    pub expr: Expr,
}

/// `name := expr` script assignment (also the payload of SET items).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub left: Expr,
    pub symbol: String,
    pub right: Expr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStmt {
    pub expr: Expr,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expr {
    ColumnRef {
        table: Option<String>,
        column: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    BinaryExpr {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    UnaryExpr {
        operator: String,
        expr: Box<Expr>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    ExprList {
        value: Vec<Expr>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Number {
        value: f64,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    /// Integer literal beyond the exact f64 range; carries the original
    /// decimal text to avoid precision loss.
    Bigint {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    #[serde(rename = "string")]
    Str {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    SingleQuoteString {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    RegexString {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Bool {
        value: bool,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Null {
        value: Option<bool>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Star {
        value: String,
    },
    Param {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Var {
        name: String,
        members: Vec<String>,
        prefix: Option<String>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Function {
        name: String,
        args: Option<Box<Expr>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        over: Option<Box<Over>>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    AggrFunc {
        name: String,
        args: AggrArgs,
        over: Option<Box<Over>>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Case {
        expr: Option<Box<Expr>>,
        args: Vec<CaseBranch>,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Cast {
        expr: Box<Expr>,
        symbol: String,
        target: CastTarget,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Interval {
        expr: Box<Expr>,
        unit: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Extract {
        args: ExtractArgs,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Array {
        #[serde(skip_serializing_if = "Option::is_none")]
        definition: Option<DataType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        array_path: Option<Vec<ColumnItem>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        expr_list: Option<Box<Expr>>,
        keyword: Option<String>,
        parentheses: bool,
    },
    Struct {
        #[serde(skip_serializing_if = "Option::is_none")]
        definition: Option<DataType>,
        expr_list: Box<Expr>,
        keyword: Option<String>,
        parentheses: bool,
    },
    Unnest {
        expr: Option<Box<Expr>>,
        #[serde(rename = "as")]
        alias: Option<String>,
        with_offset: Option<WithOffset>,
        parentheses: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        join: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        on: Option<Box<Expr>>,
    },
    /// `* EXCEPT (a, b)` projection
    Except {
        expr_list: Vec<ColumnItem>,
        parentheses: bool,
        star: String,
    },
    Select(Box<Select>),
    Date {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Time {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Timestamp {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
    Datetime {
        value: String,
        #[serde(skip_serializing_if = "is_false")]
        parentheses: bool,
    },
}

impl Expr {
    pub fn column_ref(table: Option<String>, column: impl Into<String>) -> Self {
        Expr::ColumnRef {
            table,
            column: column.into(),
            parentheses: false,
        }
    }

    pub fn binary(operator: impl Into<String>, left: Expr, right: Expr) -> Self {
        Expr::BinaryExpr {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
            parentheses: false,
        }
    }

    pub fn unary(operator: impl Into<String>, expr: Expr) -> Self {
        Expr::UnaryExpr {
            operator: operator.into(),
            expr: Box::new(expr),
            parentheses: false,
        }
    }

    pub fn list(value: Vec<Expr>) -> Self {
        Expr::ExprList {
            value,
            parentheses: false,
        }
    }

    pub fn number(value: f64) -> Self {
        Expr::Number {
            value,
            parentheses: false,
        }
    }

    pub fn null() -> Self {
        Expr::Null {
            value: None,
            parentheses: false,
        }
    }

    pub fn star() -> Self {
        Expr::Star {
            value: "*".to_string(),
        }
    }

    pub fn single_quote_string(value: impl Into<String>) -> Self {
        Expr::SingleQuoteString {
            value: value.into(),
            parentheses: false,
        }
    }

    /// Mark this node as having been wrapped in parentheses in the source.
    pub fn set_parentheses(&mut self) {
        match self {
            Expr::ColumnRef { parentheses, .. }
            | Expr::BinaryExpr { parentheses, .. }
            | Expr::UnaryExpr { parentheses, .. }
            | Expr::ExprList { parentheses, .. }
            | Expr::Number { parentheses, .. }
            | Expr::Bigint { parentheses, .. }
            | Expr::Str { parentheses, .. }
            | Expr::SingleQuoteString { parentheses, .. }
            | Expr::RegexString { parentheses, .. }
            | Expr::Bool { parentheses, .. }
            | Expr::Null { parentheses, .. }
            | Expr::Param { parentheses, .. }
            | Expr::Var { parentheses, .. }
            | Expr::Function { parentheses, .. }
            | Expr::AggrFunc { parentheses, .. }
            | Expr::Case { parentheses, .. }
            | Expr::Cast { parentheses, .. }
            | Expr::Interval { parentheses, .. }
            | Expr::Extract { parentheses, .. }
            | Expr::Array { parentheses, .. }
            | Expr::Struct { parentheses, .. }
            | Expr::Unnest { parentheses, .. }
            | Expr::Except { parentheses, .. }
            | Expr::Date { parentheses, .. }
            | Expr::Time { parentheses, .. }
            | Expr::Timestamp { parentheses, .. }
            | Expr::Datetime { parentheses, .. } => *parentheses = true,
            Expr::Select(select) => select.parentheses = true,
            Expr::Star { .. } => {}
        }
    }

    pub fn has_parentheses(&self) -> bool {
        match self {
            Expr::ColumnRef { parentheses, .. }
            | Expr::BinaryExpr { parentheses, .. }
            | Expr::UnaryExpr { parentheses, .. }
            | Expr::ExprList { parentheses, .. }
            | Expr::Number { parentheses, .. }
            | Expr::Bigint { parentheses, .. }
            | Expr::Str { parentheses, .. }
            | Expr::SingleQuoteString { parentheses, .. }
            | Expr::RegexString { parentheses, .. }
            | Expr::Bool { parentheses, .. }
            | Expr::Null { parentheses, .. }
            | Expr::Param { parentheses, .. }
            | Expr::Var { parentheses, .. }
            | Expr::Function { parentheses, .. }
            | Expr::AggrFunc { parentheses, .. }
            | Expr::Case { parentheses, .. }
            | Expr::Cast { parentheses, .. }
            | Expr::Interval { parentheses, .. }
            | Expr::Extract { parentheses, .. }
            | Expr::Array { parentheses, .. }
            | Expr::Struct { parentheses, .. }
            | Expr::Unnest { parentheses, .. }
            | Expr::Except { parentheses, .. }
            | Expr::Date { parentheses, .. }
            | Expr::Time { parentheses, .. }
            | Expr::Timestamp { parentheses, .. }
            | Expr::Datetime { parentheses, .. } => *parentheses,
            Expr::Select(select) => select.parentheses,
            Expr::Star { .. } => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggrArgs {
    pub expr: Box<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderByItem>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CaseBranch {
    When { cond: Expr, result: Expr },
    Else { result: Expr },
}

/// Cast target folded to a single type string, e.g. `DECIMAL(10, 2)` or
/// `UNSIGNED INTEGER`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastTarget {
    #[serde(rename = "dataType")]
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractArgs {
    pub field: String,
    pub cast_type: Option<String>,
    pub source: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithOffset {
    pub keyword: String,
    #[serde(rename = "as")]
    pub alias: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_tags_serialize_snake_case() {
        let expr = Expr::column_ref(Some("t".into()), "a");
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "column_ref");
        assert_eq!(json["table"], "t");
        assert_eq!(json["column"], "a");
    }

    #[test]
    fn parentheses_marker_omitted_when_false() {
        let expr = Expr::number(1.0);
        let json = serde_json::to_value(&expr).unwrap();
        assert!(json.get("parentheses").is_none());

        let mut expr = Expr::number(1.0);
        expr.set_parentheses();
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["parentheses"], true);
    }

    #[test]
    fn select_chain_serializes_next_and_set() {
        let mut head = Select::default();
        head.set_op = Some("union".to_string());
        head.next = Some(Box::new(Select::default()));
        let json = serde_json::to_value(Statement::Select(Box::new(head))).unwrap();
        assert_eq!(json["type"], "select");
        assert_eq!(json["set"], "union");
        assert!(json.get("_next").is_some());
    }

    #[test]
    fn string_variant_tag_is_string() {
        let expr = Expr::Str {
            value: "x".into(),
            parentheses: false,
        };
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["type"], "string");
    }
}
