//! The parsing engine: an input cursor with ordered-choice backtracking
//! and furthest-failure diagnostic tracking.
//!
//! Grammar rules (see the `parser` module) drive this cursor top-down.
//! Alternatives are tried in declaration order and roll back to a saved
//! mark on failure; every failed primitive match records what it expected
//! at the position it failed, and the engine keeps the union of
//! expectations recorded at the single furthest position reached by any
//! attempt. That set becomes the diagnostic when the parse as a whole
//! fails. There is no memoization between rule invocations.

use crate::error::{ClassPart, Error, Expectation, Location, Position};

/// Input cursor over the source text.
///
/// Positions are character offsets (not byte offsets), matching the
/// original engine's indexing.
pub struct Input<'a> {
    chars: Vec<char>,
    src: &'a str,
    pos: usize,
    max_fail_pos: usize,
    max_fail_expected: Vec<Expectation>,
    // > 0 inside lookahead predicates, which must not record expectations
    silent: u32,
    cached_pos: usize,
    cached_line: usize,
    cached_column: usize,
}

/// A saved cursor position for backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

impl<'a> Input<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.chars().collect(),
            src,
            pos: 0,
            max_fail_pos: 0,
            max_fail_expected: Vec::new(),
            silent: 0,
            cached_pos: 0,
            cached_line: 1,
            cached_column: 1,
        }
    }

    pub fn source(&self) -> &'a str {
        self.src
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    /// Record a failed expectation at the current position unless we are
    /// inside a lookahead predicate. Failures before the furthest position
    /// are discarded; failures at it accumulate; failures beyond it reset
    /// the set.
    pub fn fail(&mut self, expectation: Expectation) {
        if self.silent > 0 || self.pos < self.max_fail_pos {
            return;
        }
        if self.pos > self.max_fail_pos {
            self.max_fail_pos = self.pos;
            self.max_fail_expected.clear();
        }
        self.max_fail_expected.push(expectation);
    }

    /// Run `f` without recording expectations, restoring the cursor
    /// afterwards. Returns whether `f` matched. This is the `&`/`!`
    /// predicate primitive.
    pub fn lookahead<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Input<'a>) -> bool,
    {
        let mark = self.mark();
        self.silent += 1;
        let matched = f(self);
        self.silent -= 1;
        self.reset(mark);
        matched
    }

    /// Match any single character.
    pub fn any_char(&mut self) -> Option<char> {
        match self.peek() {
            Some(c) => {
                self.pos += 1;
                Some(c)
            }
            None => {
                self.fail(Expectation::Any);
                None
            }
        }
    }

    /// Match an exact, case-sensitive literal.
    pub fn literal(&mut self, text: &str) -> bool {
        let mut offset = 0;
        for expected in text.chars() {
            if self.peek_at(offset) != Some(expected) {
                self.fail(Expectation::literal(text));
                return false;
            }
            offset += 1;
        }
        self.pos += offset;
        true
    }

    /// Match a literal case-insensitively. `text` is the spelling used in
    /// the recorded expectation, exactly as the grammar writes it.
    pub fn literal_ci(&mut self, text: &str) -> bool {
        let mut offset = 0;
        for expected in text.chars() {
            let matches = match self.peek_at(offset) {
                Some(c) => c.eq_ignore_ascii_case(&expected),
                None => false,
            };
            if !matches {
                self.fail(Expectation::literal_ci(text));
                return false;
            }
            offset += 1;
        }
        self.pos += offset;
        true
    }

    /// Match one character satisfying `test`, recording `expectation` on
    /// failure.
    pub fn char_class<F>(&mut self, test: F, expectation: impl Fn() -> Expectation) -> Option<char>
    where
        F: Fn(char) -> bool,
    {
        match self.peek() {
            Some(c) if test(c) => {
                self.pos += 1;
                Some(c)
            }
            _ => {
                self.fail(expectation());
                None
            }
        }
    }

    /// Match a keyword: the literal, case-insensitively, not followed by
    /// an identifier character. The cursor is restored on failure.
    pub fn keyword(&mut self, word: &str) -> bool {
        let mark = self.mark();
        if !self.literal_ci(word) {
            return false;
        }
        let followed_by_ident = self.lookahead(|input| {
            matches!(input.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_')
        });
        if followed_by_ident {
            self.reset(mark);
            return false;
        }
        true
    }

    /// Record an `end of input` expectation at the current position.
    pub fn expect_end(&mut self) {
        self.fail(Expectation::End);
    }

    /// Consume whitespace and comments (`/* */`, `--`, `#`). Never fails;
    /// failed attempts still record expectations, as the original engine's
    /// separator rule does.
    pub fn skip_ws(&mut self) {
        loop {
            if self
                .char_class(
                    |c| matches!(c, ' ' | '\t' | '\n' | '\r'),
                    whitespace_expectation,
                )
                .is_some()
            {
                continue;
            }
            if self.block_comment() || self.line_comment("--") || self.line_comment("#") {
                continue;
            }
            break;
        }
    }

    fn block_comment(&mut self) -> bool {
        let mark = self.mark();
        if !self.literal("/*") {
            return false;
        }
        loop {
            let terminated = self.lookahead(|input| input.literal("*/"));
            if terminated {
                // consume the terminator for real
                self.literal("*/");
                return true;
            }
            if self.any_char().is_none() {
                // unterminated comment: the whole attempt fails
                self.fail(Expectation::literal("*/"));
                self.reset(mark);
                return false;
            }
        }
    }

    fn line_comment(&mut self, open: &str) -> bool {
        if !self.literal(open) {
            return false;
        }
        while let Some(c) = self.peek() {
            if c == '\n' || c == '\r' {
                break;
            }
            self.pos += 1;
        }
        true
    }

    /// Compute the 1-based line/column for a character offset, scanning
    /// newlines forward from the last cached position when possible.
    pub fn position(&mut self, offset: usize) -> Position {
        let offset = offset.min(self.chars.len());
        let (mut line, mut column, start) = if offset >= self.cached_pos {
            (self.cached_line, self.cached_column, self.cached_pos)
        } else {
            (1, 1, 0)
        };
        for &c in &self.chars[start..offset] {
            if c == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        self.cached_pos = offset;
        self.cached_line = line;
        self.cached_column = column;
        Position {
            offset,
            line,
            column,
        }
    }

    pub fn location(&mut self, start: usize, end: usize) -> Location {
        Location {
            start: self.position(start),
            end: self.position(end),
        }
    }

    /// Build the final syntax error from the furthest-failure state.
    pub fn syntax_error(&mut self) -> Error {
        let fail_pos = self.max_fail_pos;
        let found = self.chars.get(fail_pos).map(|c| c.to_string());
        let location = if found.is_some() {
            self.location(fail_pos, fail_pos + 1)
        } else {
            self.location(fail_pos, fail_pos)
        };
        let expected = std::mem::take(&mut self.max_fail_expected);
        Error::syntax(expected, found, location)
    }
}

fn whitespace_expectation() -> Expectation {
    Expectation::class(
        vec![
            ClassPart::Single(' '),
            ClassPart::Single('\t'),
            ClassPart::Single('\n'),
            ClassPart::Single('\r'),
        ],
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_ci_matches_any_case_and_records_grammar_spelling() {
        let mut input = Input::new("select");
        assert!(input.literal_ci("SELECT"));
        assert!(input.at_end());

        let mut input = Input::new("foo");
        assert!(!input.literal_ci("SELECT"));
        assert_eq!(input.pos(), 0);
    }

    #[test]
    fn keyword_rejects_identifier_continuation() {
        let mut input = Input::new("selection");
        assert!(!input.keyword("SELECT"));
        assert_eq!(input.pos(), 0);

        let mut input = Input::new("select *");
        assert!(input.keyword("SELECT"));
        assert_eq!(input.pos(), 6);
    }

    #[test]
    fn furthest_failure_wins() {
        let mut input = Input::new("abc");
        // a failed attempt at position 0
        assert!(!input.literal("x"));
        // advance and fail further in
        assert!(input.literal("ab"));
        assert!(!input.literal("x"));
        let err = input.syntax_error();
        match err {
            Error::Syntax(detail) => {
                assert_eq!(detail.location.start.offset, 2);
                assert_eq!(detail.found.as_deref(), Some("c"));
                assert_eq!(detail.message, "Expected \"x\" but \"c\" found.");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn lookahead_is_silent_and_restores() {
        let mut input = Input::new("abc");
        let matched = input.lookahead(|i| i.literal("x"));
        assert!(!matched);
        assert_eq!(input.pos(), 0);
        // nothing recorded: a later real failure determines the set
        assert!(input.literal("a"));
        assert!(!input.literal("z"));
        let err = input.syntax_error();
        match err {
            Error::Syntax(detail) => {
                assert_eq!(detail.message, "Expected \"z\" but \"b\" found.")
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn skip_ws_consumes_comments() {
        let mut input = Input::new("  -- line\n /* block\n comment */ # tail\nX");
        input.skip_ws();
        assert_eq!(input.peek(), Some('X'));
    }

    #[test]
    fn unterminated_block_comment_is_not_consumed() {
        let mut input = Input::new("/* open");
        input.skip_ws();
        assert_eq!(input.pos(), 0);
    }

    #[test]
    fn line_and_column_track_newlines() {
        let mut input = Input::new("ab\ncd\nef");
        let p = input.position(4);
        assert_eq!((p.line, p.column), (2, 2));
        // cache continues forward
        let p = input.position(7);
        assert_eq!((p.line, p.column), (3, 2));
        // and restarts when scanning backwards
        let p = input.position(1);
        assert_eq!((p.line, p.column), (1, 2));
    }
}
