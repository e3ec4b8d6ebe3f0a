//! Recursive-descent parser from query text to IR.
//!
//! The parser walks a slice of Unicode scalar values with a single cursor.
//! Alternatives are tried with explicit checkpoints: the cursor position is
//! saved before an attempt and restored when the attempt fails, so
//! backtracking is bounded by the alternative depth of the grammar and
//! never relies on unwinding. Grammar productions map one-to-one onto
//! methods and the free functions in the submodules.

mod error;
mod filter;
mod functions;
mod numbers;
mod strings;

pub use error::{ParseError, TypeKind};

use crate::ast::{Query, Segment, Selector};
use crate::grammar;

/// Compile a query string, rejecting any trailing input after the query.
///
/// This is the entry point most callers want; [`Parser`] is the lower-level
/// surface for callers that embed a query in a larger syntax and handle the
/// remainder themselves.
pub fn compile(query: &str) -> Result<Query, ParseError> {
    let mut parser = Parser::new(query);
    let compiled = parser.parse()?;
    if !parser.is_done() {
        return Err(parser.unexpected());
    }
    log::debug!(
        "compiled query {query:?} into {} segment(s)",
        compiled.segments.len()
    );
    Ok(compiled)
}

/// Recursive-descent parser over the Unicode scalar values of a query.
pub struct Parser {
    pub(super) codepoints: Vec<char>,
    pub(super) index: usize,
}

impl Parser {
    /// Set up a parser with its cursor at the first codepoint.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Parser {
            codepoints: query.chars().collect(),
            index: 0,
        }
    }

    /// Parse a complete absolute query: `$` followed by segments.
    ///
    /// On success the cursor rests after the last segment; trailing input is
    /// left unconsumed for the caller to inspect via [`Parser::is_done`].
    ///
    /// # Errors
    /// Any [`ParseError`]; the cursor position is unspecified after a
    /// failure.
    pub fn parse(&mut self) -> Result<Query, ParseError> {
        self.expect(grammar::ROOT)?;
        let segments = self.segments()?;
        Ok(Query { segments })
    }

    /// Whether every codepoint has been consumed.
    #[inline]
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.index == self.codepoints.len()
    }

    /// The cursor's current zero-based codepoint index.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.index
    }

    // --- cursor primitives ---

    /// The current codepoint, or `None` past the end.
    #[inline]
    pub(super) fn peek(&self) -> Option<char> {
        self.codepoints.get(self.index).copied()
    }

    /// Advance one codepoint; saturates at the end of input.
    #[inline]
    pub(super) fn shift(&mut self) {
        self.index = usize::min(self.index + 1, self.codepoints.len());
    }

    /// Whether the current codepoint satisfies `f`. Always false at the end.
    #[inline]
    pub(super) fn match_by(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Whether the current codepoint equals `codepoint`.
    #[inline]
    pub(super) fn match_codepoint(&self, codepoint: char) -> bool {
        self.peek() == Some(codepoint)
    }

    /// Consume a codepoint satisfying `f`, or fail without consuming.
    pub(super) fn expect_by(&mut self, f: impl Fn(char) -> bool) -> Result<(), ParseError> {
        if !self.match_by(f) {
            return Err(self.unexpected());
        }
        self.shift();
        Ok(())
    }

    /// Consume exactly `codepoint`, or fail without consuming.
    pub(super) fn expect(&mut self, codepoint: char) -> Result<(), ParseError> {
        self.expect_by(|c| c == codepoint)
    }

    /// Consume a fixed spelling codepoint by codepoint. Partial matches
    /// consume; callers checkpoint around this.
    pub(super) fn expect_keyword(&mut self, spelling: &[char]) -> Result<(), ParseError> {
        for &codepoint in spelling {
            self.expect(codepoint)?;
        }
        Ok(())
    }

    /// Consume any run of blank characters.
    pub(super) fn skip_blanks(&mut self) {
        while self.expect_by(grammar::is_blank).is_ok() {}
    }

    /// The first non-blank codepoint at or after the cursor, without
    /// consuming anything.
    pub(super) fn peek_past_blanks(&self) -> Option<char> {
        self.codepoints[self.index..]
            .iter()
            .copied()
            .find(|&c| !grammar::is_blank(c))
    }

    /// An [`ParseError::UnexpectedCodepoint`] for the current cursor state.
    pub(super) fn unexpected(&self) -> ParseError {
        ParseError::UnexpectedCodepoint {
            codepoint: self.peek(),
            index: self.index,
        }
    }

    /// The same error, pinned to an earlier cursor position.
    pub(super) fn unexpected_at(&self, index: usize) -> ParseError {
        ParseError::UnexpectedCodepoint {
            codepoint: self.codepoints.get(index).copied(),
            index,
        }
    }

    // --- segments ---

    /// `( blanks segment )*` — stops, restoring the cursor, at the first
    /// position where no further segment parses. Unrecoverable errors from
    /// within a segment surface instead of ending the loop.
    pub(super) fn segments(&mut self) -> Result<Vec<Segment>, ParseError> {
        let mut segments = Vec::new();
        loop {
            let mark = self.index;
            self.skip_blanks();
            match self.segment() {
                Ok(segment) => segments.push(segment),
                Err(error) if !error.is_recoverable() => return Err(error),
                Err(_) => {
                    self.index = mark;
                    break;
                }
            }
        }
        Ok(segments)
    }

    fn segment(&mut self) -> Result<Segment, ParseError> {
        let mark = self.index;
        match self.child_segment() {
            Ok(segment) => return Ok(segment),
            Err(error) if !error.is_recoverable() => return Err(error),
            Err(_) => self.index = mark,
        }
        self.descendant_segment()
    }

    fn child_segment(&mut self) -> Result<Segment, ParseError> {
        let mark = self.index;
        match self.bracketed_selection() {
            Ok(selectors) => return Ok(Segment::Child(selectors)),
            Err(error) if !error.is_recoverable() => return Err(error),
            Err(_) => self.index = mark,
        }
        self.expect(grammar::DOT)?;
        if self.expect(grammar::WILDCARD).is_ok() {
            return Ok(Segment::Child(vec![Selector::Wildcard]));
        }
        let name = self.member_name_shorthand()?;
        Ok(Segment::Child(vec![Selector::Name(name)]))
    }

    fn descendant_segment(&mut self) -> Result<Segment, ParseError> {
        self.expect_keyword(grammar::DESCENDANT_PREFIX)?;
        let mark = self.index;
        match self.bracketed_selection() {
            Ok(selectors) => return Ok(Segment::Descendant(selectors)),
            Err(error) if !error.is_recoverable() => return Err(error),
            Err(_) => self.index = mark,
        }
        if self.expect(grammar::WILDCARD).is_ok() {
            return Ok(Segment::Descendant(vec![Selector::Wildcard]));
        }
        let name = self.member_name_shorthand()?;
        Ok(Segment::Descendant(vec![Selector::Name(name)]))
    }

    /// `'[' blanks selector (blanks ',' blanks selector)* blanks ']'`
    fn bracketed_selection(&mut self) -> Result<Vec<Selector>, ParseError> {
        self.expect(grammar::BRACKET_OPEN)?;
        self.skip_blanks();
        let mut selectors = vec![self.selector()?];
        loop {
            self.skip_blanks();
            if self.expect(grammar::COMMA).is_err() {
                break;
            }
            self.skip_blanks();
            selectors.push(self.selector()?);
        }
        self.skip_blanks();
        self.expect(grammar::BRACKET_CLOSE)?;
        Ok(selectors)
    }

    /// Dispatch on the first codepoint: quotes open a name selector, `*` a
    /// wildcard, `?` a filter; a digit, `-`, or `:` opens a slice, falling
    /// back to a plain index when no `:` follows.
    fn selector(&mut self) -> Result<Selector, ParseError> {
        match self.peek() {
            Some(c) if grammar::is_quote(c) => {
                let name = strings::literal_string(self)?;
                Ok(Selector::Name(name))
            }
            Some(grammar::WILDCARD) => {
                self.shift();
                Ok(Selector::Wildcard)
            }
            Some(grammar::QUESTION) => filter::selector_filter(self),
            Some(c) if grammar::is_digit(c) || c == grammar::MINUS || c == grammar::COLON => {
                let mark = self.index;
                if let Ok(selector) = self.selector_slice() {
                    return Ok(selector);
                }
                self.index = mark;
                let index = numbers::parse_int(self)?;
                Ok(Selector::Index(index))
            }
            _ => Err(self.unexpected()),
        }
    }

    /// `int? blanks ':' blanks int? (blanks ':' blanks int?)?` — the step
    /// defaults to 1 when the second colon or its integer is absent.
    fn selector_slice(&mut self) -> Result<Selector, ParseError> {
        let mut start = None;
        let mark = self.index;
        match numbers::parse_int(self) {
            Ok(n) => {
                start = Some(n);
                self.skip_blanks();
            }
            Err(_) => self.index = mark,
        }
        self.expect(grammar::COLON)?;
        self.skip_blanks();
        let mut end = None;
        let mark = self.index;
        match numbers::parse_int(self) {
            Ok(n) => {
                end = Some(n);
                self.skip_blanks();
            }
            Err(_) => self.index = mark,
        }
        let mut step = 1;
        if self.expect(grammar::COLON).is_ok() {
            self.skip_blanks();
            let mark = self.index;
            match numbers::parse_int(self) {
                Ok(n) => step = n,
                Err(_) => self.index = mark,
            }
        }
        Ok(Selector::Slice { start, end, step })
    }

    /// `name_first name_char*`, the undelimited member-name form.
    pub(super) fn member_name_shorthand(&mut self) -> Result<String, ParseError> {
        let start = self.index;
        self.expect_by(grammar::is_name_first)?;
        while self.expect_by(grammar::is_name_char).is_ok() {}
        Ok(self.codepoints[start..self.index].iter().collect())
    }
}
