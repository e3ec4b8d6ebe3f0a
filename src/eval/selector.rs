//! Selector application: one node in, a nodelist out.

use serde_json::Value;

use super::{children, filter, normalize_index};
use crate::ast::Selector;
use crate::iter::Seq;
use crate::path::Node;

pub(super) fn select<'q, 'd>(
    selector: &'q Selector,
    node: Node<'d>,
    root: &'d Value,
) -> Seq<'q, Node<'d>>
where
    'd: 'q,
{
    match selector {
        Selector::Name(name) => select_name(name, &node),
        Selector::Wildcard => children(&node),
        Selector::Index(index) => select_index(*index, &node),
        Selector::Slice { start, end, step } => select_slice(*start, *end, *step, &node),
        Selector::Filter(expr) => {
            children(&node).filter(move |child| filter::logical(expr, child, root))
        }
    }
}

fn select_name<'a>(name: &str, node: &Node<'a>) -> Seq<'a, Node<'a>> {
    let Value::Object(map) = node.value else {
        return Seq::empty();
    };
    match map.get(name) {
        Some(value) => Seq::singleton(Node {
            location: node.location.child_name(name),
            value,
        }),
        None => Seq::empty(),
    }
}

fn select_index<'a>(index: i64, node: &Node<'a>) -> Seq<'a, Node<'a>> {
    let Value::Array(items) = node.value else {
        return Seq::empty();
    };
    match normalize_index(index, items.len()) {
        Some(resolved) => Seq::singleton(Node {
            location: node.location.child_index(resolved),
            value: &items[resolved],
        }),
        None => Seq::empty(),
    }
}

/// RFC 9535 Section 2.3.4: defaults by step sign, negative bounds offset by
/// the length, bounds clamped, then a straight stepped walk. A zero step
/// selects nothing.
fn select_slice<'a>(
    start: Option<i64>,
    end: Option<i64>,
    step: i64,
    node: &Node<'a>,
) -> Seq<'a, Node<'a>> {
    let Value::Array(items) = node.value else {
        return Seq::empty();
    };
    if step == 0 {
        return Seq::empty();
    }
    let len = items.len() as i64;
    let (start, end) = if step > 0 {
        (start.unwrap_or(0), end.unwrap_or(len))
    } else {
        (start.unwrap_or(len - 1), end.unwrap_or(-len - 1))
    };
    let offset = |bound: i64| if bound < 0 { len + bound } else { bound };
    let (lower, upper) = if step > 0 {
        (offset(start).clamp(0, len), offset(end).clamp(0, len))
    } else {
        (offset(end).clamp(-1, len - 1), offset(start).clamp(-1, len - 1))
    };

    let location = node.location.clone();
    let mut cursor = if step > 0 { lower } else { upper };
    Seq::new(move || {
        let in_bounds = if step > 0 { cursor < upper } else { cursor > lower };
        if !in_bounds {
            return None;
        }
        let index = cursor as usize;
        cursor += step;
        Some(Node {
            location: location.child_index(index),
            value: &items[index],
        })
    })
}
