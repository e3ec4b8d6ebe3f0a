//! The five built-in function extensions at evaluation time.

use std::borrow::Cow;

use serde_json::Value;

use super::filter;
use crate::ast::{LogicalFunction, ValueArg, ValueFunction};
use crate::path::Node;

/// `length`, `count`, and `value`: produce a value or Nothing.
pub(super) fn value_function<'q, 'd>(
    function: &'q ValueFunction,
    current: &Node<'d>,
    root: &'d Value,
) -> Option<Cow<'q, Value>>
where
    'd: 'q,
{
    match function {
        ValueFunction::Length(arg) => {
            let value = value_arg(arg, current, root)?;
            let length = match value.as_ref() {
                Value::String(text) => text.chars().count(),
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                _ => return None,
            };
            Some(Cow::Owned(Value::from(length as u64)))
        }
        ValueFunction::Count(query) => {
            let count = filter::filter_query(query, current, root).count();
            Some(Cow::Owned(Value::from(count as u64)))
        }
        ValueFunction::Value(query) => {
            let mut nodes = filter::filter_query(query, current, root);
            let only = nodes.pull()?;
            if nodes.pull().is_some() {
                return None;
            }
            Some(Cow::Borrowed(only.value))
        }
    }
}

/// `match` and `search`: true only for string input that the pattern
/// accepts. The `match` pattern was anchored at compile time, so both
/// reduce to a plain regex test here.
pub(super) fn logical_function<'q, 'd>(
    function: &'q LogicalFunction,
    current: &Node<'d>,
    root: &'d Value,
) -> bool
where
    'd: 'q,
{
    let (LogicalFunction::Match { input, regex } | LogicalFunction::Search { input, regex }) =
        function;
    let Some(value) = value_arg(input, current, root) else {
        return false;
    };
    let Value::String(text) = value.as_ref() else {
        return false;
    };
    regex.is_match(text)
}

fn value_arg<'q, 'd>(
    arg: &'q ValueArg,
    current: &Node<'d>,
    root: &'d Value,
) -> Option<Cow<'q, Value>>
where
    'd: 'q,
{
    match arg {
        ValueArg::Literal(value) => Some(Cow::Borrowed(value)),
        ValueArg::Singular(query) => {
            filter::singular_query(query, current, root).map(Cow::Borrowed)
        }
        ValueArg::Function(function) => value_function(function, current, root),
    }
}
