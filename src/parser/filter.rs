//! The logical sub-language of filter selectors.
//!
//! `?` opens a disjunction of conjunctions of basic expressions. A basic
//! expression is disambiguated by backtracking through the alternatives in
//! grammar order: parenthesized expression, then comparison, then test.

use serde_json::Value;

use super::functions::{self, FunctionExpr};
use super::{numbers, strings, ParseError, Parser, TypeKind};
use crate::ast::{
    Anchor, AndExpr, BasicExpr, Comparable, ComparisonOp, FilterQuery, LogicalExpr, Selector,
    SingularQuery, SingularStep, TestExpr,
};
use crate::grammar;

/// `'?' blanks logical_expr`
pub(super) fn selector_filter(p: &mut Parser) -> Result<Selector, ParseError> {
    p.expect(grammar::QUESTION)?;
    p.skip_blanks();
    let expr = logical_expr(p)?;
    Ok(Selector::Filter(expr))
}

/// `logical_and ( blanks '||' blanks logical_and )*`
pub(super) fn logical_expr(p: &mut Parser) -> Result<LogicalExpr, ParseError> {
    let mut terms = vec![logical_and(p)?];
    loop {
        let mark = p.index;
        p.skip_blanks();
        if p.expect_keyword(grammar::OP_OR).is_err() {
            p.index = mark;
            break;
        }
        p.skip_blanks();
        terms.push(logical_and(p)?);
    }
    Ok(LogicalExpr { terms })
}

/// `basic ( blanks '&&' blanks basic )*`
fn logical_and(p: &mut Parser) -> Result<AndExpr, ParseError> {
    let mut terms = vec![basic_expr(p)?];
    loop {
        let mark = p.index;
        p.skip_blanks();
        if p.expect_keyword(grammar::OP_AND).is_err() {
            p.index = mark;
            break;
        }
        p.skip_blanks();
        terms.push(basic_expr(p)?);
    }
    Ok(AndExpr { terms })
}

fn basic_expr(p: &mut Parser) -> Result<BasicExpr, ParseError> {
    let mark = p.index;
    match paren_expr(p) {
        Ok(expr) => return Ok(expr),
        Err(error) if !error.is_recoverable() => return Err(error),
        Err(_) => p.index = mark,
    }
    match comparison_expr(p) {
        Ok(expr) => return Ok(expr),
        Err(error) if !error.is_recoverable() => return Err(error),
        Err(_) => p.index = mark,
    }
    test_expr(p)
}

/// `'!'? blanks '(' blanks logical_expr blanks ')'`
fn paren_expr(p: &mut Parser) -> Result<BasicExpr, ParseError> {
    let negated = p.expect(grammar::BANG).is_ok();
    p.skip_blanks();
    p.expect(grammar::PAREN_OPEN)?;
    p.skip_blanks();
    let expr = logical_expr(p)?;
    p.skip_blanks();
    p.expect(grammar::PAREN_CLOSE)?;
    Ok(BasicExpr::Paren { negated, expr })
}

/// `comparable blanks cmp_op blanks comparable`
fn comparison_expr(p: &mut Parser) -> Result<BasicExpr, ParseError> {
    let left = comparable(p)?;
    p.skip_blanks();
    let op = comparison_op(p)?;
    p.skip_blanks();
    let right = comparable(p)?;
    Ok(BasicExpr::Comparison { left, op, right })
}

/// `literal | singular_query | function_expr` — a function here must
/// declare a value return type.
fn comparable(p: &mut Parser) -> Result<Comparable, ParseError> {
    let mark = p.index;
    if let Ok(value) = literal(p) {
        return Ok(Comparable::Literal(value));
    }
    p.index = mark;
    if let Ok(query) = singular_query(p) {
        return Ok(Comparable::Singular(query));
    }
    p.index = mark;
    match functions::function_expr(p)? {
        FunctionExpr::Value(function) => Ok(Comparable::Function(function)),
        // A logical function is a well-formed call, just not a comparable;
        // fail recoverably so the test alternative can claim it.
        FunctionExpr::Logical(_) => Err(p.unexpected_at(mark)),
    }
}

fn comparison_op(p: &mut Parser) -> Result<ComparisonOp, ParseError> {
    if p.expect(grammar::EQ).is_ok() {
        p.expect(grammar::EQ)?;
        Ok(ComparisonOp::Eq)
    } else if p.expect(grammar::BANG).is_ok() {
        p.expect(grammar::EQ)?;
        Ok(ComparisonOp::Ne)
    } else if p.expect(grammar::LT).is_ok() {
        if p.expect(grammar::EQ).is_ok() {
            Ok(ComparisonOp::Le)
        } else {
            Ok(ComparisonOp::Lt)
        }
    } else if p.expect(grammar::GT).is_ok() {
        if p.expect(grammar::EQ).is_ok() {
            Ok(ComparisonOp::Ge)
        } else {
            Ok(ComparisonOp::Gt)
        }
    } else {
        Err(p.unexpected())
    }
}

/// `number | string | 'true' | 'false' | 'null'`
pub(super) fn literal(p: &mut Parser) -> Result<Value, ParseError> {
    let mark = p.index;
    if let Ok(number) = numbers::parse_number(p) {
        // The grammar only admits finite doubles, so the conversion holds.
        return serde_json::Number::from_f64(number)
            .map(Value::Number)
            .ok_or_else(|| p.unexpected_at(mark));
    }
    p.index = mark;
    if let Ok(text) = strings::literal_string(p) {
        return Ok(Value::String(text));
    }
    p.index = mark;
    if p.expect_keyword(grammar::KW_TRUE).is_ok() {
        return Ok(Value::Bool(true));
    }
    p.index = mark;
    if p.expect_keyword(grammar::KW_FALSE).is_ok() {
        return Ok(Value::Bool(false));
    }
    p.index = mark;
    if p.expect_keyword(grammar::KW_NULL).is_ok() {
        return Ok(Value::Null);
    }
    p.index = mark;
    Err(p.unexpected())
}

/// `('@'|'$') ( name_step | index_step )*` — the restricted step grammar
/// that guarantees at most one result node.
fn singular_query(p: &mut Parser) -> Result<SingularQuery, ParseError> {
    let anchor = anchor(p)?;
    let mut steps = Vec::new();
    loop {
        let mark = p.index;
        p.skip_blanks();
        if let Ok(step) = name_step(p) {
            steps.push(step);
            continue;
        }
        p.index = mark;
        p.skip_blanks();
        if let Ok(step) = index_step(p) {
            steps.push(step);
            continue;
        }
        p.index = mark;
        break;
    }
    Ok(SingularQuery { anchor, steps })
}

/// `'[' string_literal ']' | '.' name_shorthand`
fn name_step(p: &mut Parser) -> Result<SingularStep, ParseError> {
    if p.expect(grammar::BRACKET_OPEN).is_ok() {
        let name = strings::literal_string(p)?;
        p.expect(grammar::BRACKET_CLOSE)?;
        return Ok(SingularStep::Name(name));
    }
    p.expect(grammar::DOT)?;
    let name = p.member_name_shorthand()?;
    Ok(SingularStep::Name(name))
}

/// `'[' int ']'`
fn index_step(p: &mut Parser) -> Result<SingularStep, ParseError> {
    p.expect(grammar::BRACKET_OPEN)?;
    let index = numbers::parse_int(p)?;
    p.expect(grammar::BRACKET_CLOSE)?;
    Ok(SingularStep::Index(index))
}

/// `'!'? (filter_query | function_expr)` — a function here must declare a
/// logical return type.
fn test_expr(p: &mut Parser) -> Result<BasicExpr, ParseError> {
    let negated = p.expect(grammar::BANG).is_ok();
    if negated {
        p.skip_blanks();
    }
    let mark = p.index;
    match filter_query(p) {
        Ok(query) => {
            return Ok(BasicExpr::Test {
                negated,
                test: TestExpr::Query(query),
            })
        }
        Err(error) if !error.is_recoverable() => return Err(error),
        Err(_) => p.index = mark,
    }
    match functions::function_expr(p)? {
        FunctionExpr::Logical(function) => Ok(BasicExpr::Test {
            negated,
            test: TestExpr::Function(function),
        }),
        FunctionExpr::Value(function) => Err(ParseError::WrongArgType {
            name: function.name().to_string(),
            position: 0,
            expected: TypeKind::Logical,
            actual: TypeKind::Value,
        }),
    }
}

/// A relative (`@`) or absolute (`$`) query with the full segment grammar.
pub(super) fn filter_query(p: &mut Parser) -> Result<FilterQuery, ParseError> {
    let anchor = anchor(p)?;
    let segments = p.segments()?;
    Ok(FilterQuery { anchor, segments })
}

fn anchor(p: &mut Parser) -> Result<Anchor, ParseError> {
    if p.expect(grammar::CURRENT).is_ok() {
        Ok(Anchor::Current)
    } else if p.expect(grammar::ROOT).is_ok() {
        Ok(Anchor::Root)
    } else {
        Err(p.unexpected())
    }
}
