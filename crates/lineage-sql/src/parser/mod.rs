//! Recursive-descent rules over the [`Input`] cursor.
//!
//! Rules follow one convention: `Ok(Some(node))` on a match,
//! `Ok(None)` when the alternative did not apply (the cursor is restored
//! to where the rule started), and `Err` only for fatal conditions that
//! abort the whole parse (validation failures, nesting depth). Choice
//! points try alternatives in declaration order; the first match wins.

mod expr;
mod stmt;

use crate::ast::{Assign, Ast, Expr, ParseResult, ReturnStmt, Statement};
use crate::error::{Error, Expectation, Result};
use crate::input::Input;
use crate::lineage::LineageTracker;

/// Nesting bound for expressions and sub-selects. Input past this depth
/// fails with a validation error instead of exhausting the call stack.
const MAX_DEPTH: usize = 512;

/// Which grammar rule `parse_with_options` starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartRule {
    /// A statement or semicolon-separated statement list (the default).
    #[default]
    Statements,
    /// A single bare expression.
    Expr,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub start_rule: StartRule,
}

pub(crate) struct Parser<'a> {
    input: Input<'a>,
    lineage: LineageTracker,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self {
            input: Input::new(src),
            lineage: LineageTracker::new(),
            depth: 0,
        }
    }

    pub(crate) fn run(mut self, options: ParseOptions) -> Result<ParseResult> {
        let ast = match options.start_rule {
            StartRule::Statements => self.statement_list()?,
            StartRule::Expr => {
                self.input.skip_ws();
                self.expr()?.map(|e| Ast::Expr(Box::new(e)))
            }
        };
        self.input.skip_ws();
        match ast {
            Some(ast) if self.input.at_end() => {
                let (table_list, column_list) = self.lineage.finalize();
                Ok(ParseResult {
                    ast,
                    table_list,
                    column_list,
                })
            }
            Some(_) => {
                // a statement matched but trailing input remains
                self.input.expect_end();
                Err(self.input.syntax_error())
            }
            None => Err(self.input.syntax_error()),
        }
    }

    fn statement_list(&mut self) -> Result<Option<Ast>> {
        self.input.skip_ws();
        let Some(head) = self.statement()? else {
            return Ok(None);
        };
        let mut statements = vec![head];
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            if !self.input.literal(";") {
                self.input.reset(mark);
                break;
            }
            self.input.skip_ws();
            match self.statement()? {
                Some(next) => statements.push(next),
                // trailing semicolons are allowed
                None => {}
            }
        }
        if statements.len() == 1 {
            let only = statements.into_iter().next().ok_or_else(|| {
                Error::validation("Error: internal statement list state")
            })?;
            Ok(Some(Ast::Statement(Box::new(only))))
        } else {
            Ok(Some(Ast::Statements(statements)))
        }
    }

    /// One statement, any form. Keyword-led alternatives are tried in
    /// declaration order; `assign` comes last since it starts with a bare
    /// identifier.
    fn statement(&mut self) -> Result<Option<Statement>> {
        if let Some(s) = self.union_stmt()? {
            return Ok(Some(Statement::Select(Box::new(s))));
        }
        if let Some(s) = self.insert_stmt()? {
            return Ok(Some(s));
        }
        if let Some(s) = self.update_stmt()? {
            return Ok(Some(Statement::Update(Box::new(s))));
        }
        if let Some(s) = self.delete_stmt()? {
            return Ok(Some(Statement::Delete(Box::new(s))));
        }
        if let Some(s) = self.create_stmt()? {
            return Ok(Some(Statement::Create(Box::new(s))));
        }
        if let Some(s) = self.alter_stmt()? {
            return Ok(Some(Statement::Alter(Box::new(s))));
        }
        if let Some(s) = self.drop_or_truncate_stmt()? {
            return Ok(Some(s));
        }
        if let Some(s) = self.rename_stmt()? {
            return Ok(Some(Statement::Rename(Box::new(s))));
        }
        if let Some(s) = self.call_stmt()? {
            return Ok(Some(Statement::Call(Box::new(s))));
        }
        if let Some(s) = self.use_stmt()? {
            return Ok(Some(Statement::Use(Box::new(s))));
        }
        if let Some(s) = self.set_stmt()? {
            return Ok(Some(Statement::Set(Box::new(s))));
        }
        if let Some(s) = self.lock_stmt()? {
            return Ok(Some(Statement::Lock(Box::new(s))));
        }
        if let Some(s) = self.unlock_stmt()? {
            return Ok(Some(Statement::Unlock(Box::new(s))));
        }
        if let Some(s) = self.show_stmt()? {
            return Ok(Some(Statement::Show(Box::new(s))));
        }
        if let Some(s) = self.desc_stmt()? {
            return Ok(Some(Statement::Desc(Box::new(s))));
        }
        if let Some(s) = self.return_stmt()? {
            return Ok(Some(Statement::Return(Box::new(s))));
        }
        if let Some(s) = self.assign_stmt()? {
            return Ok(Some(Statement::Assign(Box::new(s))));
        }
        Ok(None)
    }

    fn return_stmt(&mut self) -> Result<Option<ReturnStmt>> {
        let mark = self.input.mark();
        if !self.input.keyword("RETURN") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.expr()? {
            Some(expr) => Ok(Some(ReturnStmt { expr })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    /// `name := expr` / `@var := expr` script assignment.
    fn assign_stmt(&mut self) -> Result<Option<Assign>> {
        let mark = self.input.mark();
        let Some(left) = self.var_or_ident_target()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(":=") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.expr()? {
            Some(right) => Ok(Some(Assign {
                left,
                symbol: ":=".to_string(),
                right,
                keyword: None,
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn var_or_ident_target(&mut self) -> Result<Option<Expr>> {
        if let Some(v) = self.var_ref()? {
            return Ok(Some(v));
        }
        match self.ident()? {
            Some(name) => Ok(Some(Expr::Var {
                name,
                members: Vec::new(),
                prefix: None,
                parentheses: false,
            })),
            None => Ok(None),
        }
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::validation(
                "Error: maximum expression nesting depth exceeded",
            ));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// `( ... )` wrapper: matches the open paren, runs `f`, requires the
    /// close paren. Restores the cursor and yields None when any part
    /// fails softly.
    fn parenthesized<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        let mark = self.input.mark();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(inner) = f(self)? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(inner))
    }

    /// `head (, tail)*` with separators surrounded by whitespace.
    fn comma_list<T>(
        &mut self,
        mut f: impl FnMut(&mut Self) -> Result<Option<T>>,
    ) -> Result<Option<Vec<T>>> {
        let Some(head) = f(self)? else {
            return Ok(None);
        };
        let mut items = vec![head];
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            if !self.input.literal(",") {
                self.input.reset(mark);
                break;
            }
            self.input.skip_ws();
            match f(self)? {
                Some(item) => items.push(item),
                None => {
                    self.input.reset(mark);
                    break;
                }
            }
        }
        Ok(Some(items))
    }

    /// An unquoted identifier: `[A-Za-z_][A-Za-z0-9_-]*`, excluding
    /// reserved words. BigQuery allows hyphens in project/dataset names.
    fn ident_name(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        let Some(first) = self.input.char_class(
            |c| c.is_ascii_alphabetic() || c == '_',
            expr::ident_start_expectation,
        ) else {
            return Ok(None);
        };
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.input.char_class(
            |c| c.is_ascii_alphanumeric() || c == '_' || c == '-',
            expr::ident_part_expectation,
        ) {
            name.push(c);
        }
        if crate::keywords::is_reserved(&name) {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(name))
    }

    /// An identifier in any form: bare (non-reserved), double-quoted
    /// (quotes stripped), or backtick-quoted (backticks kept in the
    /// value, matching the dialect's output convention).
    fn ident(&mut self) -> Result<Option<String>> {
        if let Some(q) = self.quoted_ident()? {
            return Ok(Some(q));
        }
        self.ident_name()
    }

    fn quoted_ident(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        if self.input.literal("\"") {
            let mut value = String::new();
            loop {
                match self.input.peek() {
                    Some('"') => {
                        self.input.literal("\"");
                        return Ok(Some(value));
                    }
                    Some(c) => {
                        value.push(c);
                        self.input.any_char();
                    }
                    None => {
                        self.input.fail(Expectation::literal("\""));
                        self.input.reset(mark);
                        return Ok(None);
                    }
                }
            }
        }
        if self.input.literal("`") {
            let mut value = String::from("`");
            loop {
                match self.input.peek() {
                    Some('`') => {
                        self.input.literal("`");
                        value.push('`');
                        return Ok(Some(value));
                    }
                    Some(c) => {
                        value.push(c);
                        self.input.any_char();
                    }
                    None => {
                        self.input.fail(Expectation::literal("`"));
                        self.input.reset(mark);
                        return Ok(None);
                    }
                }
            }
        }
        Ok(None)
    }

    /// An alias position identifier. A bare identifier that matches a
    /// reserved word is a hard validation failure; quoting bypasses it.
    fn alias_ident(&mut self) -> Result<Option<String>> {
        if let Some(q) = self.quoted_ident()? {
            return Ok(Some(q));
        }
        let mark = self.input.mark();
        let Some(first) = self.input.char_class(
            |c| c.is_ascii_alphabetic() || c == '_',
            expr::ident_start_expectation,
        ) else {
            return Ok(None);
        };
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.input.char_class(
            |c| c.is_ascii_alphanumeric() || c == '_' || c == '-',
            expr::ident_part_expectation,
        ) {
            name.push(c);
        }
        if crate::keywords::is_reserved(&name) {
            self.input.reset(mark);
            return Err(Error::validation(format!(
                "Error: \"{}\" is a reserved word, can not as alias clause",
                name
            )));
        }
        Ok(Some(name))
    }

    /// `[AS] alias` following a table or column expression. The explicit
    /// `AS` form rejects reserved words with a hard validation error; a
    /// bare identifier that happens to be reserved simply isn't an alias.
    fn alias_clause(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if self.input.keyword("AS") {
            self.input.skip_ws();
            match self.alias_ident()? {
                Some(alias) => return Ok(Some(alias)),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        }
        match self.ident()? {
            Some(alias) => Ok(Some(alias)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_statement_yields_scalar_ast() {
        let result = Parser::new("SELECT a FROM t")
            .run(ParseOptions::default())
            .unwrap();
        assert!(matches!(result.ast, Ast::Statement(_)));
    }

    #[test]
    fn semicolon_script_yields_array_ast() {
        let result = Parser::new("SELECT a FROM t; SELECT b FROM u")
            .run(ParseOptions::default())
            .unwrap();
        match result.ast {
            Ast::Statements(list) => assert_eq!(list.len(), 2),
            other => panic!("expected statement array, got {other:?}"),
        }
    }

    #[test]
    fn trailing_garbage_reports_end_of_input() {
        let err = Parser::new("SELECT a FROM t %%%")
            .run(ParseOptions::default())
            .unwrap_err();
        match err {
            Error::Syntax(detail) => {
                assert!(detail.message.ends_with("found."));
                assert_eq!(detail.found.as_deref(), Some("%"));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn expression_start_rule() {
        let result = Parser::new("1 + 2")
            .run(ParseOptions {
                start_rule: StartRule::Expr,
            })
            .unwrap();
        assert!(matches!(result.ast, Ast::Expr(_)));
    }

    #[test]
    fn assignment_statement() {
        let result = Parser::new("counter := 1")
            .run(ParseOptions::default())
            .unwrap();
        match result.ast {
            Ast::Statement(s) => match *s {
                Statement::Assign(a) => assert_eq!(a.symbol, ":="),
                other => panic!("expected assign, got {other:?}"),
            },
            other => panic!("expected single statement, got {other:?}"),
        }
    }
}
