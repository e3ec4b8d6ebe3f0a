//! Parse failure reporting.
//!
//! Parse errors are ordinary values; the parser backtracks by restoring its
//! cursor, never by unwinding. Every failure surfaces to the caller — no
//! partial IR is ever returned.

/// Why a query string failed to compile.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseError {
    /// The parser met a codepoint it cannot accept in its current state.
    /// `codepoint` is `None` when the input ended early.
    #[error("unexpected codepoint {codepoint:?} at index {index}")]
    UnexpectedCodepoint {
        codepoint: Option<char>,
        index: usize,
    },

    /// A function expression named something other than the five RFC 9535
    /// built-ins.
    #[error("unsupported function: {name}")]
    UnsupportedFunction { name: String },

    /// A function expression with the wrong number of arguments.
    #[error("function {name} expects {expected} argument(s), found {actual}")]
    WrongArgCount {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A function whose argument (or, for `position` referring to the call
    /// itself, whose return value) has the wrong declared type for where it
    /// appears.
    #[error("function {name}: argument {position} expects {expected}, found {actual}")]
    WrongArgType {
        name: String,
        position: usize,
        expected: TypeKind,
        actual: TypeKind,
    },

    /// The pattern argument of `match`/`search` failed to compile.
    #[error("invalid regular expression: {0}")]
    InvalidRegex(#[from] regex::Error),
}

impl ParseError {
    /// Whether backtracking may try another grammar alternative past this
    /// error. Cursor mismatches are recoverable; the typed function errors
    /// are not — no other reading of the input can make them right, so they
    /// surface to the caller instead of degrading into a trailing-input
    /// mismatch.
    pub(super) fn is_recoverable(&self) -> bool {
        matches!(self, ParseError::UnexpectedCodepoint { .. })
    }
}

/// The declared types of the function-extension type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A single JSON value, or Nothing.
    Value,
    /// A nodelist.
    Nodes,
    /// A logical (boolean) result.
    Logical,
    /// Specifically a string literal, as `match`/`search` patterns require.
    StringLiteral,
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TypeKind::Value => "ValueType",
            TypeKind::Nodes => "NodesType",
            TypeKind::Logical => "LogicalType",
            TypeKind::StringLiteral => "string literal",
        };
        f.write_str(name)
    }
}
