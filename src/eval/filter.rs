//! Filter predicate evaluation: the logical and comparison sub-language.
//!
//! Comparison operands evaluate to a single value or to Nothing, modelled
//! as `Option<Cow<Value>>` — borrowed when the operand names a place in the
//! document or a literal in the IR, owned when a function computes it.

use std::borrow::Cow;

use serde_json::Value;

use super::{eval_segments, functions, normalize_index};
use crate::ast::{
    Anchor, BasicExpr, Comparable, ComparisonOp, FilterQuery, LogicalExpr, SingularQuery,
    SingularStep, TestExpr,
};
use crate::iter::Seq;
use crate::path::Node;

/// OR over AND terms, short-circuiting. An empty disjunction is false and
/// an empty conjunction is true; the grammar never produces either, but the
/// identities keep the fold honest.
pub(super) fn logical<'q, 'd>(expr: &'q LogicalExpr, current: &Node<'d>, root: &'d Value) -> bool
where
    'd: 'q,
{
    expr.terms
        .iter()
        .any(|and| and.terms.iter().all(|basic| basic_expr(basic, current, root)))
}

fn basic_expr<'q, 'd>(expr: &'q BasicExpr, current: &Node<'d>, root: &'d Value) -> bool
where
    'd: 'q,
{
    match expr {
        BasicExpr::Paren { negated, expr } => *negated != logical(expr, current, root),
        BasicExpr::Comparison { left, op, right } => {
            let left = comparable(left, current, root);
            let right = comparable(right, current, root);
            compare(*op, left.as_deref(), right.as_deref())
        }
        BasicExpr::Test { negated, test } => *negated != test_expr(test, current, root),
    }
}

/// A query test is true when it selects at least one node.
fn test_expr<'q, 'd>(test: &'q TestExpr, current: &Node<'d>, root: &'d Value) -> bool
where
    'd: 'q,
{
    match test {
        TestExpr::Query(query) => filter_query(query, current, root).pull().is_some(),
        TestExpr::Function(function) => functions::logical_function(function, current, root),
    }
}

/// Evaluate an embedded query from its anchor: the node under test for `@`,
/// the document root for `$`.
pub(super) fn filter_query<'q, 'd>(
    query: &'q FilterQuery,
    current: &Node<'d>,
    root: &'d Value,
) -> Seq<'q, Node<'d>>
where
    'd: 'q,
{
    let start = match query.anchor {
        Anchor::Current => current.clone(),
        Anchor::Root => Node::root(root),
    };
    eval_segments(&query.segments, start, root)
}

pub(super) fn comparable<'q, 'd>(
    comparable: &'q Comparable,
    current: &Node<'d>,
    root: &'d Value,
) -> Option<Cow<'q, Value>>
where
    'd: 'q,
{
    match comparable {
        Comparable::Literal(value) => Some(Cow::Borrowed(value)),
        Comparable::Singular(query) => singular_query(query, current, root).map(Cow::Borrowed),
        Comparable::Function(function) => functions::value_function(function, current, root),
    }
}

/// Walk a singular query's steps; any mismatch along the way is Nothing.
pub(super) fn singular_query<'q, 'd>(
    query: &'q SingularQuery,
    current: &Node<'d>,
    root: &'d Value,
) -> Option<&'d Value>
where
    'd: 'q,
{
    let mut value = match query.anchor {
        Anchor::Current => current.value,
        Anchor::Root => root,
    };
    for step in &query.steps {
        value = match step {
            SingularStep::Name(name) => value.as_object()?.get(name)?,
            SingularStep::Index(index) => {
                let items = value.as_array()?;
                &items[normalize_index(*index, items.len())?]
            }
        };
    }
    Some(value)
}

/// RFC 9535 Section 2.3.5.2: `<=` is `< ∨ ==`, and the `>` forms swap their
/// operands, so a mixed-kind pair is ordered under none of the operators.
pub(super) fn compare(op: ComparisonOp, left: Option<&Value>, right: Option<&Value>) -> bool {
    match op {
        ComparisonOp::Eq => value_eq(left, right),
        ComparisonOp::Ne => !value_eq(left, right),
        ComparisonOp::Lt => value_lt(left, right),
        ComparisonOp::Le => value_lt(left, right) || value_eq(left, right),
        ComparisonOp::Gt => value_lt(right, left),
        ComparisonOp::Ge => value_lt(right, left) || value_eq(right, left),
    }
}

/// Equal when both are Nothing, or both present, of the same kind, and
/// structurally equal.
fn value_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left), Some(right)) => json_eq(left, right),
        _ => false,
    }
}

/// Defined only for number pairs and string pairs; false otherwise,
/// Nothing included.
fn value_lt(left: Option<&Value>, right: Option<&Value>) -> bool {
    let (Some(left), Some(right)) = (left, right) else {
        return false;
    };
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a < b,
            _ => false,
        },
        // Byte order on UTF-8 is codepoint order.
        (Value::String(a), Value::String(b)) => a < b,
        _ => false,
    }
}

/// Structural equality with numbers compared as IEEE doubles, so `1` and
/// `1.0` are the same value.
fn json_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        },
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(key, x)| b.get(key).is_some_and(|y| json_eq(x, y)))
        }
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eq(left: &Value, right: &Value) -> bool {
        compare(ComparisonOp::Eq, Some(left), Some(right))
    }

    #[test]
    fn numbers_compare_as_doubles() {
        assert!(eq(&json!(1), &json!(1.0)));
        assert!(eq(&json!(0), &json!(-0.0)));
        assert!(!eq(&json!(1), &json!(2)));
        assert!(compare(ComparisonOp::Lt, Some(&json!(1)), Some(&json!(1.5))));
    }

    #[test]
    fn strings_compare_by_codepoint() {
        assert!(compare(ComparisonOp::Lt, Some(&json!("a")), Some(&json!("b"))));
        assert!(compare(ComparisonOp::Le, Some(&json!("a")), Some(&json!("a"))));
        // U+00E9 sorts after every ASCII scalar.
        assert!(compare(ComparisonOp::Gt, Some(&json!("é")), Some(&json!("z"))));
    }

    #[test]
    fn mixed_kinds_are_unordered_and_unequal() {
        let number = json!(13);
        let string = json!("13");
        assert!(!eq(&number, &string));
        assert!(compare(ComparisonOp::Ne, Some(&number), Some(&string)));
        for op in [
            ComparisonOp::Lt,
            ComparisonOp::Le,
            ComparisonOp::Gt,
            ComparisonOp::Ge,
        ] {
            assert!(!compare(op, Some(&number), Some(&string)), "{op:?}");
            assert!(!compare(op, Some(&string), Some(&number)), "{op:?}");
        }
    }

    #[test]
    fn structural_equality_recurses() {
        assert!(eq(&json!([1, [2, 3]]), &json!([1.0, [2, 3]])));
        assert!(!eq(&json!([1, 2]), &json!([2, 1])));
        assert!(eq(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!eq(&json!({"a": 1}), &json!({"a": 1, "b": 2})));
    }

    #[test]
    fn nothing_is_only_equal_to_nothing() {
        let value = json!(1);
        assert!(compare(ComparisonOp::Eq, None, None));
        assert!(compare(ComparisonOp::Le, None, None));
        assert!(compare(ComparisonOp::Ge, None, None));
        assert!(!compare(ComparisonOp::Lt, None, None));
        assert!(!compare(ComparisonOp::Eq, None, Some(&value)));
        assert!(!compare(ComparisonOp::Le, None, Some(&value)));
        assert!(!compare(ComparisonOp::Gt, Some(&value), None));
        assert!(compare(ComparisonOp::Ne, None, Some(&value)));
    }
}
