//! Lazy evaluation of a compiled query over a JSON document.
//!
//! Evaluation is a fold over the query's segments: each segment transforms
//! one lazy node sequence into the next, starting from the singleton
//! `("$", root)`. Nothing is computed until the caller pulls, and the input
//! document is only ever borrowed — nodes alias its subtrees.
//!
//! There are no runtime errors. A selector applied to a value of the wrong
//! kind, a missing member, an out-of-range index, an empty singular query:
//! all of these produce nothing (or Nothing, or false, in the filter
//! sub-language), as RFC 9535 requires.

mod filter;
mod functions;
mod selector;

use serde_json::Value;

use crate::ast::{Query, Segment, Selector};
use crate::iter::Seq;
use crate::path::Node;

/// Apply a compiled query to a document, yielding located nodes lazily.
///
/// The document must outlive the query; the sequence borrows both. Stopping
/// early is free — just stop pulling.
pub fn evaluate<'q, 'd>(query: &'q Query, root: &'d Value) -> Seq<'q, Node<'d>>
where
    'd: 'q,
{
    eval_segments(&query.segments, Node::root(root), root)
}

impl Query {
    /// Method form of [`evaluate`].
    pub fn evaluate<'q, 'd>(&'q self, root: &'d Value) -> Seq<'q, Node<'d>>
    where
        'd: 'q,
    {
        evaluate(self, root)
    }
}

/// Fold `segments` left to right over the stream starting at `start`.
/// `root` is carried for `$`-anchored queries inside filters.
fn eval_segments<'q, 'd>(
    segments: &'q [Segment],
    start: Node<'d>,
    root: &'d Value,
) -> Seq<'q, Node<'d>>
where
    'd: 'q,
{
    let mut nodes = Seq::singleton(start);
    for segment in segments {
        nodes = apply_segment(segment, nodes, root);
    }
    nodes
}

fn apply_segment<'q, 'd>(
    segment: &'q Segment,
    nodes: Seq<'q, Node<'d>>,
    root: &'d Value,
) -> Seq<'q, Node<'d>>
where
    'd: 'q,
{
    match segment {
        Segment::Child(selectors) => {
            nodes.flat_map(move |node| select_all(selectors, node, root))
        }
        Segment::Descendant(selectors) => nodes.flat_map(move |node| {
            descendants(node).flat_map(move |visited| select_all(selectors, visited, root))
        }),
    }
}

/// Concatenate each selector's results for one node, in declaration order.
fn select_all<'q, 'd>(
    selectors: &'q [Selector],
    node: Node<'d>,
    root: &'d Value,
) -> Seq<'q, Node<'d>>
where
    'd: 'q,
{
    Seq::over(selectors.iter())
        .flat_map(move |sel| selector::select(sel, node.clone(), root))
}

/// Lazy pre-order depth-first traversal of a subtree, the node itself
/// first, then its children: arrays in index order, objects in insertion
/// order. Laziness matters here — `$..x` over a large document only walks
/// as far as the caller pulls.
fn descendants(node: Node<'_>) -> Seq<'_, Node<'_>> {
    let mut stack = vec![Seq::singleton(node)];
    Seq::new(move || loop {
        let top = stack.last_mut()?;
        match top.pull() {
            Some(node) => {
                stack.push(children(&node));
                return Some(node);
            }
            None => {
                stack.pop();
            }
        }
    })
}

/// The immediate children of a node, each with its location. Scalars have
/// none.
fn children<'a>(node: &Node<'a>) -> Seq<'a, Node<'a>> {
    match node.value {
        Value::Array(items) => {
            let location = node.location.clone();
            Seq::over(items.iter()).enumerate().map(move |(index, value)| Node {
                location: location.child_index(index),
                value,
            })
        }
        Value::Object(map) => {
            let location = node.location.clone();
            Seq::over(map.iter()).map(move |(key, value)| Node {
                location: location.child_name(key),
                value,
            })
        }
        _ => Seq::empty(),
    }
}

/// Resolve a possibly negative index against a length; `None` when out of
/// range either way.
fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}
