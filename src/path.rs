//! Normalized locations and the nodes the evaluator emits.

use std::fmt;

use serde_json::Value;

/// A normalized path uniquely identifying one position in a JSON document.
///
/// The root is `$`; every step below it is either `[i]` for an array element
/// (with the normalized, non-negative index) or `["k"]` for an object member,
/// the key rendered verbatim between double quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location(String);

impl Location {
    /// The root location, `$`.
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Location(String::from("$"))
    }

    /// The location of the member `name` under `self`.
    #[must_use]
    pub fn child_name(&self, name: &str) -> Self {
        Location(format!("{}[\"{}\"]", self.0, name))
    }

    /// The location of the array element at (already normalized) `index`
    /// under `self`.
    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        Location(format!("{}[{}]", self.0, index))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One evaluation result: a location and the value found there.
///
/// The value borrows the input document; evaluation never copies subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub location: Location,
    pub value: &'a Value,
}

impl<'a> Node<'a> {
    /// The node for a whole document.
    #[inline]
    #[must_use]
    pub fn root(value: &'a Value) -> Self {
        Node {
            location: Location::root(),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_root_member_and_index_steps() {
        let loc = Location::root().child_name("store").child_index(0).child_name("title");
        assert_eq!(loc.as_str(), "$[\"store\"][0][\"title\"]");
        assert_eq!(loc.to_string(), loc.as_str());
    }

    #[test]
    fn keys_render_verbatim() {
        let loc = Location::root().child_name("j j").child_name("k.k");
        assert_eq!(loc.as_str(), "$[\"j j\"][\"k.k\"]");
    }

    #[test]
    fn root_node_borrows_value() {
        let doc = json!({"a": 1});
        let node = Node::root(&doc);
        assert_eq!(node.location, Location::root());
        assert!(std::ptr::eq(node.value, &doc));
    }
}
