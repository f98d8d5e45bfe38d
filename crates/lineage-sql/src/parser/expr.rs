//! Expression rules: the precedence ladder, literals, references,
//! function calls, and window specifications.
//!
//! The ladder folds left-associatively over a head expression and a tail
//! of `(operator, operand)` pairs: OR, AND, NOT, comparison (including
//! IS/IN/BETWEEN/LIKE), additive, multiplicative, unary, primary. The
//! WHERE-clause variant additionally folds comma-separated tails into an
//! `expr_list` container.

use super::Parser;
use crate::ast::{
    AggrArgs, AsWindowSpec, CaseBranch, CastTarget, ColumnItem, Expr, ExtractArgs, NamedWindow,
    OrderByItem, Over, WindowSpec, WithOffset,
};
use crate::error::{ClassPart, Expectation, Result};
use crate::keywords::INTERVAL_UNITS;

const AGGR_FUNC_NAMES: &[&str] = &["COUNT", "SUM", "MAX", "MIN", "AVG"];

/// Keyword functions callable without parentheses.
const NO_PAREN_FUNC_NAMES: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_USER",
    "SESSION_USER",
    "SYSTEM_USER",
];

pub(super) fn ident_start_expectation() -> Expectation {
    Expectation::class(
        vec![
            ClassPart::Range('A', 'Z'),
            ClassPart::Range('a', 'z'),
            ClassPart::Single('_'),
        ],
        false,
    )
}

pub(super) fn ident_part_expectation() -> Expectation {
    Expectation::class(
        vec![
            ClassPart::Range('A', 'Z'),
            ClassPart::Range('a', 'z'),
            ClassPart::Range('0', '9'),
            ClassPart::Single('_'),
            ClassPart::Single('-'),
        ],
        false,
    )
}

fn column_part_expectation() -> Expectation {
    Expectation::class(
        vec![
            ClassPart::Range('A', 'Z'),
            ClassPart::Range('a', 'z'),
            ClassPart::Range('0', '9'),
            ClassPart::Single('_'),
            ClassPart::Single(':'),
        ],
        false,
    )
}

fn digit_expectation() -> Expectation {
    Expectation::class(vec![ClassPart::Range('0', '9')], false)
}

fn hex_digit_expectation() -> Expectation {
    Expectation::class(
        vec![
            ClassPart::Range('0', '9'),
            ClassPart::Range('a', 'f'),
            ClassPart::Range('A', 'F'),
        ],
        false,
    )
}

impl<'a> Parser<'a> {
    /// Full expression, top of the ladder.
    pub(super) fn expr(&mut self) -> Result<Option<Expr>> {
        self.descend()?;
        let result = self.or_expr();
        self.ascend();
        result
    }

    /// WHERE-clause expression: the OR/AND chain whose tail separators may
    /// also be commas. A comma anywhere in the tail makes the final result
    /// an `expr_list`; a tail of plain operators folds into an ordinary
    /// binary tree.
    pub(super) fn where_expr(&mut self) -> Result<Option<Expr>> {
        enum Acc {
            Single(Expr),
            List(Vec<Expr>),
        }
        let Some(head) = self.expr()? else {
            return Ok(None);
        };
        let mut acc = Acc::Single(head);
        let mut saw_comma = false;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let op = if self.input.literal(",") {
                None
            } else if self.input.keyword("AND") {
                Some("AND")
            } else if self.input.keyword("OR") {
                Some("OR")
            } else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(right) = self.expr()? else {
                self.input.reset(mark);
                break;
            };
            acc = match (op, acc) {
                (None, Acc::Single(e)) => {
                    saw_comma = true;
                    Acc::List(vec![e, right])
                }
                (None, Acc::List(mut items)) => {
                    saw_comma = true;
                    items.push(right);
                    Acc::List(items)
                }
                (Some(op), Acc::Single(e)) => Acc::Single(Expr::binary(op, e, right)),
                (Some(op), Acc::List(items)) => {
                    Acc::Single(Expr::binary(op, Expr::list(items), right))
                }
            };
        }
        let result = match acc {
            Acc::Single(e) if saw_comma => Expr::list(vec![e]),
            Acc::Single(e) => e,
            Acc::List(items) => Expr::list(items),
        };
        Ok(Some(result))
    }

    fn or_expr(&mut self) -> Result<Option<Expr>> {
        let Some(head) = self.and_expr()? else {
            return Ok(None);
        };
        let mut result = head;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let op = if self.input.keyword("OR") {
                "OR"
            } else if self.input.literal("||") {
                "||"
            } else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(right) = self.and_expr()? else {
                self.input.reset(mark);
                break;
            };
            result = Expr::binary(op, result, right);
        }
        Ok(Some(result))
    }

    fn and_expr(&mut self) -> Result<Option<Expr>> {
        let Some(head) = self.not_expr()? else {
            return Ok(None);
        };
        let mut result = head;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let op = if self.input.keyword("AND") {
                "AND"
            } else if self.input.literal("&&") {
                "&&"
            } else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(right) = self.not_expr()? else {
                self.input.reset(mark);
                break;
            };
            result = Expr::binary(op, result, right);
        }
        Ok(Some(result))
    }

    fn not_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let negated = if self.input.keyword("NOT") {
            true
        } else if self.input.literal("!") {
            // "!=" belongs to the comparison level
            if self.input.peek() == Some('=') {
                self.input.reset(mark);
                false
            } else {
                true
            }
        } else {
            false
        };
        if negated {
            self.input.skip_ws();
            match self.not_expr()? {
                Some(inner) => return Ok(Some(Expr::unary("NOT", inner))),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        }
        self.comparison_expr()
    }

    fn comparison_expr(&mut self) -> Result<Option<Expr>> {
        let Some(left) = self.additive_expr()? else {
            return Ok(None);
        };
        // comparison operator chain
        let mut result = left;
        let mut matched_chain = false;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let Some(op) = self.comparison_operator() else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(right) = self.additive_expr()? else {
                self.input.reset(mark);
                break;
            };
            result = Expr::binary(op, result, right);
            matched_chain = true;
        }
        if matched_chain {
            return Ok(Some(result));
        }

        let mark = self.input.mark();
        self.input.skip_ws();
        if let Some(combined) = self.in_op_right(result.clone())? {
            return Ok(Some(combined));
        }
        self.input.reset(mark);
        self.input.skip_ws();
        if let Some(combined) = self.between_op_right(result.clone())? {
            return Ok(Some(combined));
        }
        self.input.reset(mark);
        self.input.skip_ws();
        if let Some(combined) = self.is_op_right(result.clone())? {
            return Ok(Some(combined));
        }
        self.input.reset(mark);
        self.input.skip_ws();
        if let Some(combined) = self.like_op_right(result.clone())? {
            return Ok(Some(combined));
        }
        self.input.reset(mark);
        Ok(Some(result))
    }

    fn comparison_operator(&mut self) -> Option<&'static str> {
        for op in [">=", ">", "<=", "<>", "<", "!=", "="] {
            if self.input.literal(op) {
                return Some(op);
            }
        }
        None
    }

    fn in_op_right(&mut self, left: Expr) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let op = if self.input.keyword("NOT") {
            self.input.skip_ws();
            if !self.input.keyword("IN") {
                self.input.reset(mark);
                return Ok(None);
            }
            "NOT IN"
        } else if self.input.keyword("IN") {
            "IN"
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        if let Some(list) = self.parenthesized(|p| p.expr_list())? {
            return Ok(Some(Expr::binary(op, left, list)));
        }
        // IN @var / IN func(...)
        if let Some(right) = self.additive_expr()? {
            return Ok(Some(Expr::binary(op, left, right)));
        }
        self.input.reset(mark);
        Ok(None)
    }

    fn between_op_right(&mut self, left: Expr) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let op = if self.input.keyword("NOT") {
            self.input.skip_ws();
            if !self.input.keyword("BETWEEN") {
                self.input.reset(mark);
                return Ok(None);
            }
            "NOT BETWEEN"
        } else if self.input.keyword("BETWEEN") {
            "BETWEEN"
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        let Some(begin) = self.additive_expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("AND") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(end) = self.additive_expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Expr::binary(op, left, Expr::list(vec![begin, end]))))
    }

    fn is_op_right(&mut self, left: Expr) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.keyword("IS") {
            return Ok(None);
        }
        self.input.skip_ws();
        let op = if self.input.keyword("NOT") {
            "IS NOT"
        } else {
            "IS"
        };
        self.input.skip_ws();
        let Some(right) = self.additive_expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Expr::binary(op, left, right)))
    }

    fn like_op_right(&mut self, left: Expr) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let op = if self.input.keyword("NOT") {
            self.input.skip_ws();
            if !self.input.keyword("LIKE") {
                self.input.reset(mark);
                return Ok(None);
            }
            "NOT LIKE"
        } else if self.input.keyword("LIKE") {
            "LIKE"
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        let Some(right) = self.additive_expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Expr::binary(op, left, right)))
    }

    fn additive_expr(&mut self) -> Result<Option<Expr>> {
        let Some(head) = self.multiplicative_expr()? else {
            return Ok(None);
        };
        let mut result = head;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let op = if self.input.literal("+") {
                "+"
            } else if self.input.literal("-") {
                // "--" opens a comment, not a subtraction
                if self.input.peek() == Some('-') {
                    self.input.reset(mark);
                    break;
                }
                "-"
            } else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(right) = self.multiplicative_expr()? else {
                self.input.reset(mark);
                break;
            };
            result = Expr::binary(op, result, right);
        }
        Ok(Some(result))
    }

    fn multiplicative_expr(&mut self) -> Result<Option<Expr>> {
        let Some(head) = self.unary_expr()? else {
            return Ok(None);
        };
        let mut result = head;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            let op = if self.input.literal("*") {
                "*"
            } else if self.input.literal("/") {
                "/"
            } else if self.input.literal("%") {
                "%"
            } else {
                self.input.reset(mark);
                break;
            };
            self.input.skip_ws();
            let Some(right) = self.unary_expr()? else {
                self.input.reset(mark);
                break;
            };
            result = Expr::binary(op, result, right);
        }
        Ok(Some(result))
    }

    fn unary_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if let Some(sign) = self.input.peek() {
            if sign == '-' || sign == '+' {
                // a minus lexically adjacent to digits folds into the
                // literal; otherwise the sign is a unary operator
                let adjacent_digit = self.input.lookahead(|i| {
                    i.any_char();
                    matches!(i.peek(), Some(c) if c.is_ascii_digit() || c == '.')
                });
                if sign == '-' && adjacent_digit {
                    return self.primary_expr();
                }
                self.input.any_char();
                self.input.skip_ws();
                match self.unary_expr()? {
                    Some(inner) => {
                        return Ok(Some(Expr::unary(sign.to_string(), inner)));
                    }
                    None => {
                        self.input.reset(mark);
                        return Ok(None);
                    }
                }
            }
        }
        self.primary_expr()
    }

    fn primary_expr(&mut self) -> Result<Option<Expr>> {
        if let Some(e) = self.array_or_struct_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.cast_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.case_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.interval_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.extract_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.exists_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.unnest_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.literal_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.aggr_func_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.func_call_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.column_ref_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.param_expr()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.var_ref()? {
            return Ok(Some(e));
        }
        self.paren_expr()
    }

    /// `(expr)`, `(a, b, c)`, or a parenthesized sub-select.
    fn paren_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.literal("(") {
            return Ok(None);
        }
        self.input.skip_ws();
        if let Some(select) = self.union_stmt()? {
            self.input.skip_ws();
            if self.input.literal(")") {
                let mut boxed = Box::new(select);
                boxed.parentheses = true;
                return Ok(Some(Expr::Select(boxed)));
            }
            self.input.reset(mark);
            return Ok(None);
        }
        let Some(mut list) = self.expr_list_value()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        if list.len() == 1 {
            let mut only = list.remove(0);
            only.set_parentheses();
            Ok(Some(only))
        } else {
            let mut wrapped = Expr::list(list);
            wrapped.set_parentheses();
            Ok(Some(wrapped))
        }
    }

    /// `expr (, expr)*` packaged as an `expr_list` node.
    pub(super) fn expr_list(&mut self) -> Result<Option<Expr>> {
        Ok(self.expr_list_value()?.map(Expr::list))
    }

    pub(super) fn expr_list_value(&mut self) -> Result<Option<Vec<Expr>>> {
        self.comma_list(Self::expr)
    }

    // ----- literals ------------------------------------------------------

    fn literal_expr(&mut self) -> Result<Option<Expr>> {
        if let Some(e) = self.string_literal()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.number_literal()? {
            return Ok(Some(e));
        }
        if let Some(e) = self.datetime_literal()? {
            return Ok(Some(e));
        }
        let mark = self.input.mark();
        if self.input.keyword("TRUE") {
            return Ok(Some(Expr::Bool {
                value: true,
                parentheses: false,
            }));
        }
        if self.input.keyword("FALSE") {
            return Ok(Some(Expr::Bool {
                value: false,
                parentheses: false,
            }));
        }
        if self.input.keyword("NULL") {
            return Ok(Some(Expr::null()));
        }
        self.input.reset(mark);
        Ok(None)
    }

    /// `DATE '2020-01-01'` and the TIME/TIMESTAMP/DATETIME forms.
    fn datetime_literal(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        // longest keyword first so TIMESTAMP is not read as TIME
        let kind = if self.input.keyword("TIMESTAMP") {
            "timestamp"
        } else if self.input.keyword("DATETIME") {
            "datetime"
        } else if self.input.keyword("DATE") {
            "date"
        } else if self.input.keyword("TIME") {
            "time"
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        let Some(value) = self.single_quoted_text()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(match kind {
            "date" => Expr::Date {
                value,
                parentheses: false,
            },
            "time" => Expr::Time {
                value,
                parentheses: false,
            },
            "timestamp" => Expr::Timestamp {
                value,
                parentheses: false,
            },
            _ => Expr::Datetime {
                value,
                parentheses: false,
            },
        }))
    }

    fn string_literal(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        // raw-string prefix: R'...' keeps the body as a regex literal
        let raw = match self.input.peek() {
            Some('r') | Some('R') => {
                let quoted_follows = self.input.lookahead(|i| {
                    i.any_char();
                    matches!(i.peek(), Some('\'') | Some('"'))
                });
                if quoted_follows {
                    self.input.any_char();
                    true
                } else {
                    false
                }
            }
            _ => false,
        };
        if self.input.literal("'") {
            let Some(value) = self.quoted_body('\'')? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(if raw {
                Expr::RegexString {
                    value,
                    parentheses: false,
                }
            } else {
                Expr::SingleQuoteString {
                    value,
                    parentheses: false,
                }
            }));
        }
        if self.input.literal("\"") {
            let Some(value) = self.quoted_body('"')? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(if raw {
                Expr::RegexString {
                    value,
                    parentheses: false,
                }
            } else {
                Expr::Str {
                    value,
                    parentheses: false,
                }
            }));
        }
        self.input.reset(mark);
        Ok(None)
    }

    fn single_quoted_text(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        if !self.input.literal("'") {
            return Ok(None);
        }
        match self.quoted_body('\'')? {
            Some(value) => Ok(Some(value)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    /// Characters up to the closing quote. Escapes for quotes, backslash
    /// and slash are preserved verbatim; \b \f \n \r \t and \uXXXX decode
    /// to the characters they name.
    fn quoted_body(&mut self, quote: char) -> Result<Option<String>> {
        let mut value = String::new();
        loop {
            match self.input.peek() {
                Some(c) if c == quote => {
                    self.input.any_char();
                    return Ok(Some(value));
                }
                Some('\\') => {
                    self.input.any_char();
                    match self.input.peek() {
                        Some(c @ ('\'' | '"' | '\\' | '/')) => {
                            self.input.any_char();
                            value.push('\\');
                            value.push(c);
                        }
                        Some('b') => {
                            self.input.any_char();
                            value.push('\u{8}');
                        }
                        Some('f') => {
                            self.input.any_char();
                            value.push('\u{c}');
                        }
                        Some('n') => {
                            self.input.any_char();
                            value.push('\n');
                        }
                        Some('r') => {
                            self.input.any_char();
                            value.push('\r');
                        }
                        Some('t') => {
                            self.input.any_char();
                            value.push('\t');
                        }
                        Some('u') => {
                            self.input.any_char();
                            let mut code = 0u32;
                            for _ in 0..4 {
                                let Some(h) = self
                                    .input
                                    .char_class(|c| c.is_ascii_hexdigit(), hex_digit_expectation)
                                else {
                                    return Ok(None);
                                };
                                code = code * 16
                                    + h.to_digit(16).unwrap_or(0);
                            }
                            value.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                        }
                        _ => value.push('\\'),
                    }
                }
                Some(c) => {
                    self.input.any_char();
                    value.push(c);
                }
                None => {
                    self.input.fail(Expectation::literal(quote.to_string()));
                    return Ok(None);
                }
            }
        }
    }

    /// Numeric literal. An adjacent leading minus folds into the text.
    /// Integer-only literals beyond the exact f64 integer range become
    /// `bigint` nodes carrying the decimal text; everything else is an
    /// f64 `number`.
    fn number_literal(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let mut text = String::new();
        if self.input.peek() == Some('-') {
            self.input.any_char();
            text.push('-');
        }
        let mut int_digits = 0usize;
        while let Some(c) = self
            .input
            .char_class(|c| c.is_ascii_digit(), digit_expectation)
        {
            text.push(c);
            int_digits += 1;
        }
        let mut fractional = false;
        let frac_mark = self.input.mark();
        if self.input.literal(".") {
            let mut frac_digits = 0usize;
            let mut frac = String::from(".");
            while let Some(c) = self
                .input
                .char_class(|c| c.is_ascii_digit(), digit_expectation)
            {
                frac.push(c);
                frac_digits += 1;
            }
            if frac_digits == 0 {
                self.input.reset(frac_mark);
            } else {
                text.push_str(&frac);
                fractional = true;
            }
        }
        if int_digits == 0 && !fractional {
            self.input.reset(mark);
            return Ok(None);
        }
        let mut exponent = false;
        let exp_mark = self.input.mark();
        if let Some(e) = self.input.char_class(
            |c| c == 'e' || c == 'E',
            || Expectation::class(vec![ClassPart::Single('e'), ClassPart::Single('E')], false),
        ) {
            let mut exp = String::new();
            exp.push(e);
            if let Some(sign) = self.input.char_class(
                |c| c == '+' || c == '-',
                || Expectation::class(
                    vec![ClassPart::Single('+'), ClassPart::Single('-')],
                    false,
                ),
            ) {
                exp.push(sign);
            }
            let mut exp_digits = 0usize;
            while let Some(c) = self
                .input
                .char_class(|c| c.is_ascii_digit(), digit_expectation)
            {
                exp.push(c);
                exp_digits += 1;
            }
            if exp_digits == 0 {
                self.input.reset(exp_mark);
            } else {
                text.push_str(&exp);
                exponent = true;
            }
        }
        // a literal immediately followed by an identifier character is
        // not a number (e.g. "1abc")
        let ident_follows = self.input.lookahead(|i| {
            matches!(i.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        });
        if ident_follows {
            self.input.reset(mark);
            return Ok(None);
        }
        if fractional || exponent {
            let value = text.parse::<f64>().unwrap_or(f64::NAN);
            return Ok(Some(Expr::number(value)));
        }
        match text.parse::<i128>() {
            Ok(v) if v.unsigned_abs() <= ((1u128 << 53) - 1) => {
                Ok(Some(Expr::number(v as f64)))
            }
            _ => Ok(Some(Expr::Bigint {
                value: text,
                parentheses: false,
            })),
        }
    }

    /// `:name` or `$name` bind parameter.
    fn param_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.literal(":") && !self.input.literal("$") {
            return Ok(None);
        }
        match self.ident_name()? {
            Some(name) => Ok(Some(Expr::Param {
                value: name,
                parentheses: false,
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    /// `@name` / `@@name` session variable, with dotted member access.
    pub(super) fn var_ref(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let prefix = if self.input.literal("@@") {
            "@@"
        } else if self.input.literal("@") {
            "@"
        } else {
            return Ok(None);
        };
        let Some(name) = self.ident_name()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        let mut members = Vec::new();
        loop {
            let dot = self.input.mark();
            if !self.input.literal(".") {
                break;
            }
            match self.ident_name()? {
                Some(member) => members.push(member),
                None => {
                    self.input.reset(dot);
                    break;
                }
            }
        }
        Ok(Some(Expr::Var {
            name,
            members,
            prefix: Some(prefix.to_string()),
            parentheses: false,
        }))
    }

    // ----- references and calls ------------------------------------------

    /// A column name: identifier whose continuation characters also allow
    /// colons, or a quoted identifier.
    fn column_name(&mut self) -> Result<Option<String>> {
        if let Some(q) = self.quoted_ident()? {
            return Ok(Some(q));
        }
        let mark = self.input.mark();
        let Some(first) = self
            .input
            .char_class(|c| c.is_ascii_alphabetic() || c == '_', ident_start_expectation)
        else {
            return Ok(None);
        };
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.input.char_class(
            |c| c.is_ascii_alphanumeric() || c == '_' || c == ':',
            column_part_expectation,
        ) {
            name.push(c);
        }
        if crate::keywords::is_reserved(&name) {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(name))
    }

    /// `table.column` or bare `column`. Records a select-context lineage
    /// entry on every successful match.
    fn column_ref_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if let Some(table) = self.ident()? {
            let dotted = self.input.mark();
            self.input.skip_ws();
            if self.input.literal(".") {
                self.input.skip_ws();
                // not `table.*`, which the projection rules own
                if self.input.peek() != Some('*') {
                    if let Some(column) = self.column_name()? {
                        self.lineage.record_column("select", Some(&table), &column);
                        return Ok(Some(Expr::column_ref(Some(table), column)));
                    }
                }
            }
            self.input.reset(dotted);
            self.lineage.record_column("select", None, &table);
            return Ok(Some(Expr::column_ref(None, table)));
        }
        self.input.reset(mark);
        match self.column_name()? {
            Some(column) => {
                self.lineage.record_column("select", None, &column);
                Ok(Some(Expr::column_ref(None, column)))
            }
            None => Ok(None),
        }
    }

    fn aggr_func_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let mut matched = None;
        for name in AGGR_FUNC_NAMES {
            if self.input.keyword(name) {
                matched = Some(*name);
                break;
            }
        }
        let Some(name) = matched else {
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let args = if self.input.literal("*") {
            AggrArgs {
                expr: Box::new(Expr::star()),
                distinct: None,
                orderby: None,
            }
        } else {
            let distinct = if self.input.keyword("DISTINCT") {
                self.input.skip_ws();
                Some("DISTINCT".to_string())
            } else {
                None
            };
            let Some(arg) = self.expr()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            self.input.skip_ws();
            let orderby = self.order_by_clause()?;
            AggrArgs {
                expr: Box::new(arg),
                distinct,
                orderby,
            }
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        let over = self.over_clause()?;
        Ok(Some(Expr::AggrFunc {
            name: name.to_string(),
            args,
            over: over.map(Box::new),
            parentheses: false,
        }))
    }

    fn func_call_expr(&mut self) -> Result<Option<Expr>> {
        // keyword functions callable without parentheses
        let mark = self.input.mark();
        for name in NO_PAREN_FUNC_NAMES {
            if self.input.keyword(name) {
                let paren = self.input.lookahead(|i| {
                    i.skip_ws();
                    i.literal("(")
                });
                if paren {
                    self.input.skip_ws();
                    self.input.literal("(");
                    self.input.skip_ws();
                    if !self.input.literal(")") {
                        self.input.reset(mark);
                        return Ok(None);
                    }
                }
                let over = self.over_clause()?;
                return Ok(Some(Expr::Function {
                    name: name.to_string(),
                    args: if paren {
                        Some(Box::new(Expr::list(Vec::new())))
                    } else {
                        None
                    },
                    over: over.map(Box::new),
                    parentheses: false,
                }));
            }
        }

        let Some(name) = self.func_name()? else {
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let args = if self.input.lookahead(|i| i.literal(")")) {
            Vec::new()
        } else {
            match self.expr_list_value()? {
                Some(values) => values,
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        let over = self.over_clause()?;
        Ok(Some(Expr::Function {
            name,
            args: Some(Box::new(Expr::list(args))),
            over: over.map(Box::new),
            parentheses: false,
        }))
    }

    /// Dotted function name such as `dataset.my_udf`.
    fn func_name(&mut self) -> Result<Option<String>> {
        let Some(head) = self.ident_name()? else {
            return Ok(None);
        };
        let mut name = head;
        loop {
            let mark = self.input.mark();
            self.input.skip_ws();
            if !self.input.literal(".") {
                self.input.reset(mark);
                break;
            }
            self.input.skip_ws();
            match self.ident_name()? {
                Some(part) => {
                    name.push('.');
                    name.push_str(&part);
                }
                None => {
                    self.input.reset(mark);
                    break;
                }
            }
        }
        Ok(Some(name))
    }

    fn exists_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        let op = if self.input.keyword("NOT") {
            self.input.skip_ws();
            if !self.input.keyword("EXISTS") {
                self.input.reset(mark);
                return Ok(None);
            }
            "NOT EXISTS"
        } else if self.input.keyword("EXISTS") {
            "EXISTS"
        } else {
            return Ok(None);
        };
        self.input.skip_ws();
        let Some(select) = self.parenthesized(|p| p.union_stmt())? else {
            self.input.reset(mark);
            return Ok(None);
        };
        let mut boxed = Box::new(select);
        boxed.parentheses = true;
        Ok(Some(Expr::unary(op, Expr::Select(boxed))))
    }

    fn unnest_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.keyword("UNNEST") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let inner = if self.input.lookahead(|i| i.literal(")")) {
            None
        } else {
            match self.expr()? {
                Some(e) => Some(Box::new(e)),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        let alias = self.alias_clause()?;
        let with_offset = self.with_offset_clause()?;
        Ok(Some(Expr::Unnest {
            expr: inner,
            alias,
            with_offset,
            parentheses: true,
            join: None,
            on: None,
        }))
    }

    fn with_offset_clause(&mut self) -> Result<Option<WithOffset>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("WITH") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("OFFSET") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("AS") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(alias) = self.alias_ident()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(WithOffset {
            keyword: "with offset as".to_string(),
            alias,
        }))
    }

    fn case_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.keyword("CASE") {
            return Ok(None);
        }
        self.input.skip_ws();
        let operand = if self.input.lookahead(|i| i.literal_ci("WHEN")) {
            None
        } else {
            self.expr()?
        };
        let mut args = Vec::new();
        loop {
            let branch_mark = self.input.mark();
            self.input.skip_ws();
            if !self.input.keyword("WHEN") {
                self.input.reset(branch_mark);
                break;
            }
            self.input.skip_ws();
            let Some(cond) = self.expr()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            self.input.skip_ws();
            if !self.input.keyword("THEN") {
                self.input.reset(mark);
                return Ok(None);
            }
            self.input.skip_ws();
            let Some(result) = self.expr()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            args.push(CaseBranch::When { cond, result });
        }
        if args.is_empty() {
            self.input.reset(mark);
            return Ok(None);
        }
        let else_mark = self.input.mark();
        self.input.skip_ws();
        if self.input.keyword("ELSE") {
            self.input.skip_ws();
            match self.expr()? {
                Some(result) => args.push(CaseBranch::Else { result }),
                None => {
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        } else {
            self.input.reset(else_mark);
        }
        self.input.skip_ws();
        if !self.input.keyword("END") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(Expr::Case {
            expr: operand.map(Box::new),
            args,
            parentheses: false,
        }))
    }

    fn interval_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.keyword("INTERVAL") {
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(value) = self.unary_expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        let Some(unit) = self.interval_unit() else {
            self.input.reset(mark);
            return Ok(None);
        };
        Ok(Some(Expr::Interval {
            expr: Box::new(value),
            unit: unit.to_lowercase(),
            parentheses: false,
        }))
    }

    fn interval_unit(&mut self) -> Option<&'static str> {
        INTERVAL_UNITS
            .iter()
            .find(|unit| self.input.keyword(unit))
            .copied()
    }

    fn extract_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.keyword("EXTRACT") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(field) = self.interval_unit() else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("FROM") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(source) = self.expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(Expr::Extract {
            args: ExtractArgs {
                field: field.to_string(),
                cast_type: None,
                source: Box::new(source),
            },
            parentheses: false,
        }))
    }

    fn cast_expr(&mut self) -> Result<Option<Expr>> {
        let mark = self.input.mark();
        if !self.input.keyword("CAST") {
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.literal("(") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(inner) = self.expr()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("AS") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        let Some(target) = self.cast_target()? else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.literal(")") {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(Expr::Cast {
            expr: Box::new(inner),
            symbol: "as".to_string(),
            target,
            parentheses: false,
        }))
    }

    /// Cast target folded to a single type string: `DECIMAL(p[, s])`,
    /// `[UN]SIGNED [INTEGER]`, or a plain named type.
    fn cast_target(&mut self) -> Result<Option<CastTarget>> {
        let mark = self.input.mark();
        if self.input.keyword("DECIMAL") || self.input.keyword("NUMERIC") {
            self.input.skip_ws();
            if self.input.literal("(") {
                self.input.skip_ws();
                let Some(precision) = self.unsigned_digits() else {
                    self.input.reset(mark);
                    return Ok(None);
                };
                self.input.skip_ws();
                let scale = if self.input.literal(",") {
                    self.input.skip_ws();
                    let Some(s) = self.unsigned_digits() else {
                        self.input.reset(mark);
                        return Ok(None);
                    };
                    Some(s)
                } else {
                    None
                };
                self.input.skip_ws();
                if !self.input.literal(")") {
                    self.input.reset(mark);
                    return Ok(None);
                }
                let data_type = match scale {
                    Some(s) => format!("DECIMAL({}, {})", precision, s),
                    None => format!("DECIMAL({})", precision),
                };
                return Ok(Some(CastTarget { data_type }));
            }
            return Ok(Some(CastTarget {
                data_type: "DECIMAL".to_string(),
            }));
        }
        let signed = if self.input.keyword("SIGNED") {
            Some("SIGNED")
        } else if self.input.keyword("UNSIGNED") {
            Some("UNSIGNED")
        } else {
            None
        };
        if let Some(sign) = signed {
            let int_mark = self.input.mark();
            self.input.skip_ws();
            if self.input.keyword("INTEGER") {
                return Ok(Some(CastTarget {
                    data_type: format!("{} INTEGER", sign),
                }));
            }
            self.input.reset(int_mark);
            return Ok(Some(CastTarget {
                data_type: sign.to_string(),
            }));
        }
        match self.data_type_name()? {
            Some(name) => Ok(Some(CastTarget { data_type: name })),
            None => Ok(None),
        }
    }

    pub(super) fn unsigned_digits(&mut self) -> Option<String> {
        let mut digits = String::new();
        while let Some(c) = self
            .input
            .char_class(|c| c.is_ascii_digit(), digit_expectation)
        {
            digits.push(c);
        }
        if digits.is_empty() {
            None
        } else {
            Some(digits)
        }
    }

    /// A named scalar type, uppercased.
    pub(super) fn data_type_name(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        let Some(first) = self
            .input
            .char_class(|c| c.is_ascii_alphabetic() || c == '_', ident_start_expectation)
        else {
            return Ok(None);
        };
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.input.char_class(
            |c| c.is_ascii_alphanumeric() || c == '_',
            ident_part_expectation,
        ) {
            name.push(c);
        }
        let upper = name.to_uppercase();
        if !crate::keywords::DATA_TYPES.contains(upper.as_str()) {
            self.input.reset(mark);
            return Ok(None);
        }
        Ok(Some(upper))
    }

    // ----- array/struct constructors --------------------------------------

    fn array_or_struct_expr(&mut self) -> Result<Option<Expr>> {
        // bare bracketed list: [1, 2, 3]
        let mark = self.input.mark();
        if self.input.literal("[") {
            self.input.skip_ws();
            let Some(values) = self.expr_list_value()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            self.input.skip_ws();
            if !self.input.literal("]") {
                self.input.reset(mark);
                return Ok(None);
            }
            let array_path = values
                .into_iter()
                .map(|e| ColumnItem::new(e, None))
                .collect();
            return Ok(Some(Expr::Array {
                definition: None,
                array_path: Some(array_path),
                expr_list: None,
                keyword: Some(String::new()),
                parentheses: true,
            }));
        }
        if self.input.keyword("ARRAY") {
            let definition = self.angle_bracket_type()?;
            self.input.skip_ws();
            if self.input.literal("[") {
                self.input.skip_ws();
                let Some(values) = self.expr_list_value()? else {
                    self.input.reset(mark);
                    return Ok(None);
                };
                self.input.skip_ws();
                if !self.input.literal("]") {
                    self.input.reset(mark);
                    return Ok(None);
                }
                let array_path = values
                    .into_iter()
                    .map(|e| ColumnItem::new(e, None))
                    .collect();
                return Ok(Some(Expr::Array {
                    definition,
                    array_path: Some(array_path),
                    expr_list: None,
                    keyword: Some("array".to_string()),
                    parentheses: true,
                }));
            }
            if self.input.literal("(") {
                self.input.skip_ws();
                let Some(list) = self.expr_list()? else {
                    self.input.reset(mark);
                    return Ok(None);
                };
                self.input.skip_ws();
                if !self.input.literal(")") {
                    self.input.reset(mark);
                    return Ok(None);
                }
                return Ok(Some(Expr::Array {
                    definition,
                    array_path: None,
                    expr_list: Some(Box::new(list)),
                    keyword: Some("array".to_string()),
                    parentheses: true,
                }));
            }
            self.input.reset(mark);
            return Ok(None);
        }
        if self.input.keyword("STRUCT") {
            let definition = self.angle_bracket_type()?;
            self.input.skip_ws();
            if !self.input.literal("(") {
                self.input.reset(mark);
                return Ok(None);
            }
            self.input.skip_ws();
            let Some(list) = self.expr_list()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            self.input.skip_ws();
            if !self.input.literal(")") {
                self.input.reset(mark);
                return Ok(None);
            }
            return Ok(Some(Expr::Struct {
                definition,
                expr_list: Box::new(list),
                keyword: Some("struct".to_string()),
                parentheses: true,
            }));
        }
        Ok(None)
    }

    /// `<...>` element type annotation; the raw text between the angle
    /// brackets becomes the `dataType` string.
    fn angle_bracket_type(&mut self) -> Result<Option<crate::ast::DataType>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.literal("<") {
            self.input.reset(mark);
            return Ok(None);
        }
        let mut text = String::new();
        let mut depth = 1usize;
        loop {
            match self.input.peek() {
                Some('<') => {
                    depth += 1;
                    text.push('<');
                    self.input.any_char();
                }
                Some('>') => {
                    depth -= 1;
                    self.input.any_char();
                    if depth == 0 {
                        break;
                    }
                    text.push('>');
                }
                Some(c) => {
                    text.push(c);
                    self.input.any_char();
                }
                None => {
                    self.input.fail(Expectation::literal(">"));
                    self.input.reset(mark);
                    return Ok(None);
                }
            }
        }
        Ok(Some(crate::ast::DataType::named(text.trim().to_string())))
    }

    // ----- windows ---------------------------------------------------------

    /// `OVER (...)` or `OVER window_name`.
    pub(super) fn over_clause(&mut self) -> Result<Option<Over>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("OVER") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if let Some(spec) = self.parenthesized(|p| p.window_specification().map(Some))? {
            return Ok(Some(Over::new(AsWindowSpec::Spec {
                window_specification: spec,
                parentheses: true,
            })));
        }
        match self.ident()? {
            Some(name) => Ok(Some(Over::new(AsWindowSpec::Name(name)))),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    pub(super) fn window_specification(&mut self) -> Result<WindowSpec> {
        let name = self.ident()?;
        self.input.skip_ws();
        let partitionby = self.partition_by_clause()?;
        self.input.skip_ws();
        let orderby = self.order_by_clause()?;
        self.input.skip_ws();
        let window_frame_clause = self.window_frame_clause()?;
        Ok(WindowSpec {
            name,
            partitionby,
            orderby,
            window_frame_clause,
        })
    }

    fn partition_by_clause(&mut self) -> Result<Option<Vec<Expr>>> {
        let mark = self.input.mark();
        if !self.input.keyword("PARTITION") {
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

    pub(super) fn order_by_clause(&mut self) -> Result<Option<Vec<OrderByItem>>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("ORDER") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if !self.input.keyword("BY") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.comma_list(Self::order_by_item)? {
            Some(items) => Ok(Some(items)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn order_by_item(&mut self) -> Result<Option<OrderByItem>> {
        let Some(expr) = self.expr()? else {
            return Ok(None);
        };
        let mark = self.input.mark();
        self.input.skip_ws();
        let direction = if self.input.keyword("DESC") {
            "DESC"
        } else if self.input.keyword("ASC") {
            "ASC"
        } else {
            self.input.reset(mark);
            "ASC"
        };
        Ok(Some(OrderByItem {
            expr,
            direction: direction.to_string(),
        }))
    }

    /// Frame clause normalized to its canonical text form.
    fn window_frame_clause(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        if self.input.keyword("RANGE") {
            self.input.skip_ws();
            let matched = self.input.keyword("BETWEEN")
                && {
                    self.input.skip_ws();
                    self.input.keyword("UNBOUNDED")
                }
                && {
                    self.input.skip_ws();
                    self.input.keyword("PRECEDING")
                }
                && {
                    self.input.skip_ws();
                    self.input.keyword("AND")
                }
                && {
                    self.input.skip_ws();
                    self.input.keyword("CURRENT")
                }
                && {
                    self.input.skip_ws();
                    self.input.keyword("ROW")
                };
            if matched {
                return Ok(Some(
                    "range between unbounded preceding and current row".to_string(),
                ));
            }
            self.input.reset(mark);
            return Ok(None);
        }
        if self.input.keyword("ROWS") {
            self.input.skip_ws();
            if self.input.keyword("BETWEEN") {
                self.input.skip_ws();
                let Some(start) = self.frame_bound()? else {
                    self.input.reset(mark);
                    return Ok(None);
                };
                self.input.skip_ws();
                if !self.input.keyword("AND") {
                    self.input.reset(mark);
                    return Ok(None);
                }
                self.input.skip_ws();
                let Some(end) = self.frame_bound()? else {
                    self.input.reset(mark);
                    return Ok(None);
                };
                return Ok(Some(format!("rows between {} and {}", start, end)));
            }
            let Some(bound) = self.frame_bound()? else {
                self.input.reset(mark);
                return Ok(None);
            };
            return Ok(Some(format!("rows {}", bound)));
        }
        self.input.reset(mark);
        Ok(None)
    }

    /// One frame bound as text: `current row`, `UNBOUNDED PRECEDING`,
    /// `<N> FOLLOWING`, ...
    fn frame_bound(&mut self) -> Result<Option<String>> {
        let mark = self.input.mark();
        if self.input.keyword("CURRENT") {
            self.input.skip_ws();
            if self.input.keyword("ROW") {
                return Ok(Some("current row".to_string()));
            }
            self.input.reset(mark);
            return Ok(None);
        }
        let value = if self.input.keyword("UNBOUNDED") {
            "UNBOUNDED".to_string()
        } else if let Some(digits) = self.unsigned_digits() {
            digits
        } else {
            self.input.reset(mark);
            return Ok(None);
        };
        self.input.skip_ws();
        if self.input.keyword("PRECEDING") {
            return Ok(Some(format!("{} PRECEDING", value)));
        }
        if self.input.keyword("FOLLOWING") {
            return Ok(Some(format!("{} FOLLOWING", value)));
        }
        self.input.reset(mark);
        Ok(None)
    }

    pub(super) fn named_window_clause(&mut self) -> Result<Option<Vec<NamedWindow>>> {
        let mark = self.input.mark();
        self.input.skip_ws();
        if !self.input.keyword("WINDOW") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        match self.comma_list(Self::named_window)? {
            Some(windows) => Ok(Some(windows)),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }

    fn named_window(&mut self) -> Result<Option<NamedWindow>> {
        let mark = self.input.mark();
        let Some(name) = self.ident()? else {
            return Ok(None);
        };
        self.input.skip_ws();
        if !self.input.keyword("AS") {
            self.input.reset(mark);
            return Ok(None);
        }
        self.input.skip_ws();
        if let Some(spec) = self.parenthesized(|p| p.window_specification().map(Some))? {
            return Ok(Some(NamedWindow {
                name,
                as_window_specification: AsWindowSpec::Spec {
                    window_specification: spec,
                    parentheses: true,
                },
            }));
        }
        match self.ident()? {
            Some(other) => Ok(Some(NamedWindow {
                name,
                as_window_specification: AsWindowSpec::Name(other),
            })),
            None => {
                self.input.reset(mark);
                Ok(None)
            }
        }
    }
}
