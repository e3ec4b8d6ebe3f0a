//! Integer and number literal sub-grammar.
//!
//! Integers follow `0 | -? digit1 digit*`: no leading zeros, no `-0`.
//! Number literals extend an integer (or `-0`) with an optional fraction
//! and an optional exponent; the consumed span is converted through `f64`
//! parsing, matching the IEEE-754 double semantics of the value model.

use super::{ParseError, Parser};
use crate::grammar;

/// `'0' | '-'? digit1 digit*` — the integer form used by index selectors,
/// slice bounds, and singular-query index steps.
pub(super) fn parse_int(p: &mut Parser) -> Result<i64, ParseError> {
    if p.expect('0').is_ok() {
        return Ok(0);
    }
    let negative = p.expect(grammar::MINUS).is_ok();
    let start = p.index;
    p.expect_by(grammar::is_digit1)?;
    while p.expect_by(grammar::is_digit).is_ok() {}
    let mut value: i64 = 0;
    for &digit in &p.codepoints[start..p.index] {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(i64::from(digit as u8 - b'0')))
            .ok_or_else(|| p.unexpected_at(start))?;
    }
    Ok(if negative { -value } else { value })
}

/// `int frac? exp?` with `-0` also admitted as the integer part; rejects
/// results outside the finite `f64` range.
pub(super) fn parse_number(p: &mut Parser) -> Result<f64, ParseError> {
    let start = p.index;
    integer_part(p)?;
    fraction(p);
    exponent(p);
    let text: String = p.codepoints[start..p.index].iter().collect();
    let value: f64 = text.parse().map_err(|_| p.unexpected_at(start))?;
    if !value.is_finite() {
        return Err(p.unexpected_at(start));
    }
    Ok(value)
}

/// `'-'? ('0' | digit1 digit*)` — admits `-0`, unlike [`parse_int`].
fn integer_part(p: &mut Parser) -> Result<(), ParseError> {
    let _ = p.expect(grammar::MINUS);
    if p.expect('0').is_ok() {
        return Ok(());
    }
    p.expect_by(grammar::is_digit1)?;
    while p.expect_by(grammar::is_digit).is_ok() {}
    Ok(())
}

/// `'.' digit+`, consumed only when complete.
fn fraction(p: &mut Parser) {
    let mark = p.index;
    if p.expect(grammar::DOT).is_err() {
        return;
    }
    if p.expect_by(grammar::is_digit).is_err() {
        p.index = mark;
        return;
    }
    while p.expect_by(grammar::is_digit).is_ok() {}
}

/// `[eE] [+-]? digit+`, consumed only when complete.
fn exponent(p: &mut Parser) {
    let mark = p.index;
    if p.expect('e').is_err() && p.expect('E').is_err() {
        return;
    }
    let _ = p.expect(grammar::MINUS).is_ok() || p.expect(grammar::PLUS).is_ok();
    if p.expect_by(grammar::is_digit).is_err() {
        p.index = mark;
        return;
    }
    while p.expect_by(grammar::is_digit).is_ok() {}
}
