//! Grammar constants and character classes for the RFC 9535 query syntax.
//!
//! Collects the named codepoints, keyword tables, and character-class
//! predicates the parser dispatches on. The ranges follow the ABNF in
//! RFC 9535 Section 2 exactly.

/// Root identifier (`$`).
pub const ROOT: char = '$';
/// Current-node identifier (`@`), valid only inside filter expressions.
pub const CURRENT: char = '@';

pub const SPACE: char = '\u{20}';
pub const HORIZONTAL_TAB: char = '\u{09}';
pub const NEWLINE: char = '\u{0A}';
pub const CARRIAGE_RETURN: char = '\u{0D}';

pub const PAREN_OPEN: char = '(';
pub const PAREN_CLOSE: char = ')';
pub const BRACKET_OPEN: char = '[';
pub const BRACKET_CLOSE: char = ']';

pub const QUOTE_DOUBLE: char = '\u{22}';
pub const QUOTE_SINGLE: char = '\u{27}';

/// Escape introducer (`\`, reverse solidus).
pub const ESC: char = '\u{5C}';
/// Unicode escape letter (`u`), as in `\uXXXX`.
pub const UNICODE_ESCAPE: char = 'u';

pub const WILDCARD: char = '*';
pub const MINUS: char = '-';
pub const PLUS: char = '+';
pub const COLON: char = ':';
pub const QUESTION: char = '?';
pub const BANG: char = '!';
pub const DOT: char = '.';
pub const UNDERSCORE: char = '_';
pub const COMMA: char = ',';

pub const EQ: char = '=';
pub const LT: char = '<';
pub const GT: char = '>';

pub const AMPERSAND: char = '&';
pub const PIPE: char = '|';

/// Keyword spellings matched codepoint by codepoint.
pub const KW_TRUE: &[char] = &['t', 'r', 'u', 'e'];
pub const KW_FALSE: &[char] = &['f', 'a', 'l', 's', 'e'];
pub const KW_NULL: &[char] = &['n', 'u', 'l', 'l'];

pub const OP_AND: &[char] = &[AMPERSAND, AMPERSAND];
pub const OP_OR: &[char] = &[PIPE, PIPE];
pub const DESCENDANT_PREFIX: &[char] = &[DOT, DOT];

/// The five function extensions defined by RFC 9535 Section 2.4.
pub const FUNC_LENGTH: &str = "length";
pub const FUNC_COUNT: &str = "count";
pub const FUNC_MATCH: &str = "match";
pub const FUNC_SEARCH: &str = "search";
pub const FUNC_VALUE: &str = "value";

/// Decode a single-letter escape (the character after `\`) to the character
/// it denotes. Returns `None` for letters that are not escapable; quote
/// escapes and `\u` are handled by the string parser since they depend on
/// the enclosing quote style.
#[inline]
#[must_use]
pub fn decode_escape(c: char) -> Option<char> {
    match c {
        'b' => Some('\u{08}'),
        'f' => Some('\u{0C}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '/' => Some('/'),
        ESC => Some(ESC),
        _ => None,
    }
}

/// Blank characters permitted between grammar tokens.
#[inline]
#[must_use]
pub fn is_blank(c: char) -> bool {
    matches!(c, SPACE | HORIZONTAL_TAB | NEWLINE | CARRIAGE_RETURN)
}

#[inline]
#[must_use]
pub fn is_quote(c: char) -> bool {
    matches!(c, QUOTE_DOUBLE | QUOTE_SINGLE)
}

#[inline]
#[must_use]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Non-zero decimal digit, the first digit of a multi-digit integer.
#[inline]
#[must_use]
pub fn is_digit1(c: char) -> bool {
    ('1'..='9').contains(&c)
}

/// Octal-range digit, the second digit of a non-surrogate `\uDxxx` escape.
#[inline]
#[must_use]
pub fn is_digit0to7(c: char) -> bool {
    ('0'..='7').contains(&c)
}

/// Uppercase hex digit as required by the `\uXXXX` grammar.
#[inline]
#[must_use]
pub fn is_hexdig(c: char) -> bool {
    is_digit(c) || ('A'..='F').contains(&c)
}

#[inline]
#[must_use]
pub fn is_alpha_lower(c: char) -> bool {
    c.is_ascii_lowercase()
}

#[inline]
#[must_use]
pub fn is_alpha_upper(c: char) -> bool {
    c.is_ascii_uppercase()
}

#[inline]
#[must_use]
pub fn is_alpha(c: char) -> bool {
    is_alpha_lower(c) || is_alpha_upper(c)
}

/// First character of a member-name shorthand.
#[inline]
#[must_use]
pub fn is_name_first(c: char) -> bool {
    is_alpha(c)
        || c == UNDERSCORE
        || ('\u{80}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{10FFFF}').contains(&c)
}

#[inline]
#[must_use]
pub fn is_name_char(c: char) -> bool {
    is_name_first(c) || is_digit(c)
}

/// Characters that may appear in a string literal without escaping.
/// Excludes both quotes, the backslash, and control characters.
#[inline]
#[must_use]
pub fn is_unescaped(c: char) -> bool {
    ('\u{20}'..='\u{21}').contains(&c)
        || ('\u{23}'..='\u{26}').contains(&c)
        || ('\u{28}'..='\u{5B}').contains(&c)
        || ('\u{5D}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{10FFFF}').contains(&c)
}
