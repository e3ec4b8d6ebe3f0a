//! Function-extension parsing and parse-time type checking.
//!
//! Only the five built-ins of RFC 9535 Section 2.4 are accepted. Arity and
//! argument types are enforced here, so the IR only ever holds well-typed
//! calls: `length`, `count`, and `value` return values and may stand as
//! comparison operands; `match` and `search` return logicals and may stand
//! as tests. The pattern argument of `match`/`search` must be a string
//! literal and is compiled immediately — `match` fully anchored — making a
//! bad pattern a parse error rather than anything later.

use regex::Regex;
use serde_json::Value;

use super::{filter, ParseError, Parser, TypeKind};
use crate::ast::{FilterQuery, LogicalExpr, LogicalFunction, ValueArg, ValueFunction};
use crate::grammar;

/// A parsed function call, tagged by its declared return type.
pub(super) enum FunctionExpr {
    Value(ValueFunction),
    Logical(LogicalFunction),
}

/// An argument as parsed, before type checking.
enum RawArg {
    Literal(Value),
    Query(FilterQuery),
    Function(FunctionExpr),
    Logical(LogicalExpr),
}

impl RawArg {
    fn kind(&self) -> TypeKind {
        match self {
            RawArg::Literal(_) | RawArg::Function(FunctionExpr::Value(_)) => TypeKind::Value,
            RawArg::Query(_) => TypeKind::Nodes,
            RawArg::Function(FunctionExpr::Logical(_)) | RawArg::Logical(_) => TypeKind::Logical,
        }
    }
}

/// `name '(' blanks ( argument (blanks ',' blanks argument)* )? blanks ')'`
pub(super) fn function_expr(p: &mut Parser) -> Result<FunctionExpr, ParseError> {
    let name = function_name(p)?;
    if !p.match_codepoint(grammar::PAREN_OPEN) {
        return Err(p.unexpected());
    }
    if !is_supported(&name) {
        return Err(ParseError::UnsupportedFunction { name });
    }
    p.shift();
    p.skip_blanks();
    let mut args = Vec::new();
    let mark = p.index;
    match function_argument(p) {
        Ok(arg) => {
            args.push(arg);
            loop {
                let mark = p.index;
                p.skip_blanks();
                if p.expect(grammar::COMMA).is_err() {
                    p.index = mark;
                    break;
                }
                p.skip_blanks();
                args.push(function_argument(p)?);
            }
        }
        Err(error) if !error.is_recoverable() => return Err(error),
        Err(_) => p.index = mark,
    }
    p.skip_blanks();
    p.expect(grammar::PAREN_CLOSE)?;
    build(name, args)
}

/// Lowercase alpha, then lowercase alpha, underscore, or digit.
fn function_name(p: &mut Parser) -> Result<String, ParseError> {
    let start = p.index;
    p.expect_by(grammar::is_alpha_lower)?;
    while p
        .expect_by(|c| grammar::is_alpha_lower(c) || c == grammar::UNDERSCORE || grammar::is_digit(c))
        .is_ok()
    {}
    Ok(p.codepoints[start..p.index].iter().collect())
}

fn is_supported(name: &str) -> bool {
    matches!(
        name,
        grammar::FUNC_LENGTH
            | grammar::FUNC_COUNT
            | grammar::FUNC_MATCH
            | grammar::FUNC_SEARCH
            | grammar::FUNC_VALUE
    )
}

/// `literal | filter_query | function_expr | logical_expr`, tried in that
/// order. A prefix that parses but does not reach the next `,` or `)` is
/// handed on to the later alternatives, so `@.a == 1` lands as a logical
/// expression rather than a truncated query.
fn function_argument(p: &mut Parser) -> Result<RawArg, ParseError> {
    let mark = p.index;
    if let Ok(value) = filter::literal(p) {
        if at_argument_end(p) {
            return Ok(RawArg::Literal(value));
        }
    }
    p.index = mark;
    match filter::filter_query(p) {
        Ok(query) => {
            if at_argument_end(p) {
                return Ok(RawArg::Query(query));
            }
        }
        Err(error) if !error.is_recoverable() => return Err(error),
        Err(_) => {}
    }
    p.index = mark;
    match function_expr(p) {
        Ok(function) => {
            if at_argument_end(p) {
                return Ok(RawArg::Function(function));
            }
        }
        Err(error) if !error.is_recoverable() => return Err(error),
        Err(_) => {}
    }
    p.index = mark;
    let expr = filter::logical_expr(p)?;
    Ok(RawArg::Logical(expr))
}

fn at_argument_end(p: &Parser) -> bool {
    matches!(
        p.peek_past_blanks(),
        Some(grammar::COMMA | grammar::PAREN_CLOSE)
    )
}

/// Check arity and argument types, compile patterns, and assemble the call.
fn build(name: String, args: Vec<RawArg>) -> Result<FunctionExpr, ParseError> {
    match name.as_str() {
        grammar::FUNC_LENGTH => {
            let [arg] = arity::<1>(&name, args)?;
            let arg = value_arg(&name, 0, arg)?;
            Ok(FunctionExpr::Value(ValueFunction::Length(arg)))
        }
        grammar::FUNC_COUNT => {
            let [arg] = arity::<1>(&name, args)?;
            let query = nodes_arg(&name, 0, arg)?;
            Ok(FunctionExpr::Value(ValueFunction::Count(query)))
        }
        grammar::FUNC_VALUE => {
            let [arg] = arity::<1>(&name, args)?;
            let query = nodes_arg(&name, 0, arg)?;
            Ok(FunctionExpr::Value(ValueFunction::Value(query)))
        }
        grammar::FUNC_MATCH => {
            let [input, pattern] = arity::<2>(&name, args)?;
            let input = value_arg(&name, 0, input)?;
            let pattern = pattern_arg(&name, pattern)?;
            let regex = Regex::new(&format!("^(?:{pattern})$"))?;
            Ok(FunctionExpr::Logical(LogicalFunction::Match { input, regex }))
        }
        grammar::FUNC_SEARCH => {
            let [input, pattern] = arity::<2>(&name, args)?;
            let input = value_arg(&name, 0, input)?;
            let pattern = pattern_arg(&name, pattern)?;
            let regex = Regex::new(&pattern)?;
            Ok(FunctionExpr::Logical(LogicalFunction::Search {
                input,
                regex,
            }))
        }
        _ => Err(ParseError::UnsupportedFunction { name }),
    }
}

fn arity<const N: usize>(name: &str, args: Vec<RawArg>) -> Result<[RawArg; N], ParseError> {
    let actual = args.len();
    args.try_into().map_err(|_| ParseError::WrongArgCount {
        name: name.to_string(),
        expected: N,
        actual,
    })
}

/// A `ValueType` position accepts a literal, a query that is syntactically
/// singular, or a nested value-returning function.
fn value_arg(name: &str, position: usize, arg: RawArg) -> Result<ValueArg, ParseError> {
    let actual = arg.kind();
    match arg {
        RawArg::Literal(value) => Ok(ValueArg::Literal(value)),
        RawArg::Query(query) => query.to_singular().map(ValueArg::Singular).ok_or_else(|| {
            ParseError::WrongArgType {
                name: name.to_string(),
                position,
                expected: TypeKind::Value,
                actual: TypeKind::Nodes,
            }
        }),
        RawArg::Function(FunctionExpr::Value(function)) => {
            Ok(ValueArg::Function(Box::new(function)))
        }
        RawArg::Function(FunctionExpr::Logical(_)) | RawArg::Logical(_) => {
            Err(ParseError::WrongArgType {
                name: name.to_string(),
                position,
                expected: TypeKind::Value,
                actual,
            })
        }
    }
}

/// A `NodesType` position accepts any embedded query.
fn nodes_arg(name: &str, position: usize, arg: RawArg) -> Result<FilterQuery, ParseError> {
    let actual = arg.kind();
    match arg {
        RawArg::Query(query) => Ok(query),
        _ => Err(ParseError::WrongArgType {
            name: name.to_string(),
            position,
            expected: TypeKind::Nodes,
            actual,
        }),
    }
}

/// The pattern parameter of `match`/`search`: a string literal, nothing else.
fn pattern_arg(name: &str, arg: RawArg) -> Result<String, ParseError> {
    match arg {
        RawArg::Literal(Value::String(pattern)) => Ok(pattern),
        other => Err(ParseError::WrongArgType {
            name: name.to_string(),
            position: 1,
            expected: TypeKind::StringLiteral,
            actual: other.kind(),
        }),
    }
}
