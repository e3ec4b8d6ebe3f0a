//! Evaluator semantics: selector behavior, ordering, laziness, and the
//! no-runtime-errors rule.

use jpq::{compile, Node};
use serde_json::{json, Value};

fn run<'a>(query: &str, document: &'a Value) -> Vec<Node<'a>> {
    let compiled = compile(query).unwrap_or_else(|e| panic!("query {query:?}: {e}"));
    compiled.evaluate(document).collect()
}

fn locations(query: &str, document: &Value) -> Vec<String> {
    run(query, document)
        .into_iter()
        .map(|node| node.location.to_string())
        .collect()
}

fn values(query: &str, document: &Value) -> Vec<Value> {
    run(query, document)
        .into_iter()
        .map(|node| node.value.clone())
        .collect()
}

/// Re-find a value by walking a normalized location string. Supports the
/// `$`, `["k"]`, and `[i]` steps the evaluator produces (keys without
/// quotes or brackets, which is all these tests use).
fn resolve<'a>(location: &str, root: &'a Value) -> &'a Value {
    let mut value = root;
    let rest = location.strip_prefix('$').expect("location starts at $");
    let mut chars = rest.chars().peekable();
    while let Some(c) = chars.next() {
        assert_eq!(c, '[', "malformed location {location:?}");
        if chars.peek() == Some(&'"') {
            chars.next();
            let key: String = chars.by_ref().take_while(|&c| c != '"').collect();
            assert_eq!(chars.next(), Some(']'));
            value = &value[key.as_str()];
        } else {
            let digits: String = chars.by_ref().take_while(|&c| c != ']').collect();
            let index: usize = digits.parse().expect("numeric step");
            value = &value[index];
        }
    }
    value
}

mod root_and_children {
    use super::*;

    #[test]
    fn root_query_yields_one_node() {
        let document = json!({"a": 1});
        let nodes = run("$", &document);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].location.as_str(), "$");
        assert_eq!(nodes[0].value, &document);
    }

    #[test]
    fn root_query_is_identity_for_any_value() {
        for document in [json!(null), json!(42), json!("x"), json!([1, 2]), json!({"k": []})] {
            let nodes = run("$", &document);
            assert_eq!(nodes.len(), 1);
            assert_eq!(nodes[0].value, &document);
        }
    }

    #[test]
    fn wildcard_on_array_yields_elements_in_order() {
        let document = json!([10, 20, 30]);
        assert_eq!(values("$[*]", &document), vec![json!(10), json!(20), json!(30)]);
        assert_eq!(locations("$[*]", &document), vec!["$[0]", "$[1]", "$[2]"]);
    }

    #[test]
    fn wildcard_on_object_yields_member_values_in_insertion_order() {
        let document = json!({"z": 1, "a": 2, "m": 3});
        assert_eq!(values("$[*]", &document), vec![json!(1), json!(2), json!(3)]);
        assert_eq!(
            locations("$[*]", &document),
            vec!["$[\"z\"]", "$[\"a\"]", "$[\"m\"]"]
        );
    }

    #[test]
    fn wildcard_on_scalar_yields_nothing() {
        for document in [json!(1), json!("s"), json!(true), json!(null)] {
            assert!(run("$[*]", &document).is_empty());
        }
    }

    #[test]
    fn name_selector_misses_silently() {
        let document = json!({"a": 1});
        assert!(run("$.b", &document).is_empty());
        assert!(run("$.a.b", &document).is_empty());
        // Name selection on an array is not an error either.
        assert!(run("$.a", &json!([1, 2])).is_empty());
    }

    #[test]
    fn multiple_selectors_concatenate_per_node() {
        let document = json!(["a", "b", "c"]);
        assert_eq!(values("$[1, 0, 1]", &document), vec![json!("b"), json!("a"), json!("b")]);

        let document = json!({"a": 1, "b": 2});
        assert_eq!(values("$['b', 'a']", &document), vec![json!(2), json!(1)]);
    }
}

mod indexes_and_slices {
    use super::*;

    #[test]
    fn index_boundaries() {
        let document = json!(["a", "b", "c"]);
        assert_eq!(values("$[0]", &document), vec![json!("a")]);
        assert_eq!(values("$[2]", &document), vec![json!("c")]);
        assert_eq!(values("$[-1]", &document), vec![json!("c")]);
        assert_eq!(values("$[-3]", &document), vec![json!("a")]);
        assert!(run("$[3]", &document).is_empty());
        assert!(run("$[-4]", &document).is_empty());
    }

    #[test]
    fn negative_index_location_is_normalized() {
        let document = json!(["a", "b", "c"]);
        assert_eq!(locations("$[-1]", &document), vec!["$[2]"]);
    }

    #[test]
    fn index_on_non_array_yields_nothing() {
        assert!(run("$[0]", &json!({"0": "x"})).is_empty());
        assert!(run("$[0]", &json!("str")).is_empty());
    }

    #[test]
    fn slice_forward_with_step() {
        let document = json!(["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(values("$[1:3]", &document), vec![json!("b"), json!("c")]);
        assert_eq!(values("$[1:5:2]", &document), vec![json!("b"), json!("d")]);
        assert_eq!(locations("$[1:5:2]", &document), vec!["$[1]", "$[3]"]);
        assert_eq!(values("$[5:]", &document), vec![json!("f"), json!("g")]);
    }

    #[test]
    fn slice_backward_with_negative_step() {
        let document = json!(["a", "b", "c", "d", "e", "f", "g"]);
        assert_eq!(values("$[5:1:-2]", &document), vec![json!("f"), json!("d")]);
        assert_eq!(locations("$[5:1:-2]", &document), vec!["$[5]", "$[3]"]);
    }

    #[test]
    fn slice_reversal_covers_whole_array() {
        let document = json!([0, 1, 2, 3, 4]);
        assert_eq!(
            values("$[::-1]", &document),
            vec![json!(4), json!(3), json!(2), json!(1), json!(0)]
        );
    }

    #[test]
    fn slice_with_zero_step_is_empty() {
        let document = json!([1, 2, 3]);
        assert!(run("$[::0]", &document).is_empty());
        assert!(run("$[1:3:0]", &document).is_empty());
    }

    #[test]
    fn slice_bounds_clamp() {
        let document = json!([1, 2, 3]);
        assert_eq!(values("$[-10:10]", &document), vec![json!(1), json!(2), json!(3)]);
        assert!(run("$[5:9]", &document).is_empty());
        assert!(run("$[2:1]", &document).is_empty());
    }

    #[test]
    fn slice_on_non_array_yields_nothing() {
        assert!(run("$[0:2]", &json!({"a": 1})).is_empty());
        assert!(run("$[0:2]", &json!("abcdef")).is_empty());
    }
}

mod descendants {
    use super::*;

    #[test]
    fn descendant_name_discovers_in_preorder() {
        let document = json!({
            "a": {"x": 1, "b": {"x": 2}},
            "x": 3
        });
        // The root is visited first, then its subtrees depth-first.
        assert_eq!(
            locations("$..x", &document),
            vec!["$[\"x\"]", "$[\"a\"][\"x\"]", "$[\"a\"][\"b\"][\"x\"]"]
        );
        assert_eq!(values("$..x", &document), vec![json!(3), json!(1), json!(2)]);
    }

    #[test]
    fn descendant_traversal_is_depth_first() {
        let document = json!({
            "left": {"deep": {"k": 1}, "k": 2},
            "right": {"k": 3}
        });
        assert_eq!(
            values("$..k", &document),
            vec![json!(2), json!(1), json!(3)]
        );
    }

    #[test]
    fn descendant_wildcard_visits_every_child_of_every_node() {
        let document = json!({"a": [1, {"b": 2}]});
        // Visited: root, a, a[0], a[1], a[1].b — wildcard emits each node's
        // children at the visit.
        assert_eq!(
            values("$..*", &document),
            vec![json!([1, {"b": 2}]), json!(1), json!({"b": 2}), json!(2)]
        );
    }

    #[test]
    fn descendant_index_applies_to_nested_arrays() {
        let document = json!([[1, 2], [3, 4]]);
        // Root first ($[0] = [1,2]), then each inner array's element 0.
        assert_eq!(
            values("$..[0]", &document),
            vec![json!([1, 2]), json!(1), json!(3)]
        );
    }

    #[test]
    fn descendant_on_scalar_root_applies_selectors_to_the_root_only() {
        assert!(run("$..x", &json!(7)).is_empty());
    }
}

mod filters {
    use super::*;

    #[test]
    fn filter_selects_matching_array_elements() {
        let document = json!([{"a": 1}, {"a": 5}, {"b": 1}]);
        assert_eq!(values("$[?@.a]", &document), vec![json!({"a": 1}), json!({"a": 5})]);
        assert_eq!(values("$[?@.a > 2]", &document), vec![json!({"a": 5})]);
        assert_eq!(locations("$[?@.a > 2]", &document), vec!["$[1]"]);
    }

    #[test]
    fn filter_selects_matching_object_members() {
        let document = json!({"small": 1, "big": 9, "other": "x"});
        assert_eq!(values("$[?@ > 2]", &document), vec![json!(9)]);
        assert_eq!(locations("$[?@ > 2]", &document), vec!["$[\"big\"]"]);
    }

    #[test]
    fn filter_on_scalar_yields_nothing() {
        assert!(run("$[?@ == @]", &json!(5)).is_empty());
    }

    #[test]
    fn logical_connectives_short_circuit_per_child() {
        let document = json!([
            {"a": 1, "b": 1},
            {"a": 1, "b": 2},
            {"a": 2, "b": 2}
        ]);
        assert_eq!(values("$[?@.a == 1 && @.b == 2]", &document), vec![json!({"a": 1, "b": 2})]);
        assert_eq!(run("$[?@.a == 9 || @.b == 1]", &document).len(), 1);
        assert_eq!(run("$[?!(@.a == 1)]", &document).len(), 1);
        assert_eq!(run("$[?!@.c]", &document).len(), 3);
    }

    #[test]
    fn existence_test_against_root_anchor() {
        let document = json!({"flag": true, "items": [1, 2]});
        // $.flag exists, so every child passes.
        assert_eq!(run("$.items[?$.flag]", &document).len(), 2);
        assert!(run("$.items[?$.missing]", &document).is_empty());
    }

    #[test]
    fn nested_filters() {
        let document = json!([[{"b": 1}], [{"c": 1}], []]);
        // Keep arrays that contain an element with a `b` member.
        assert_eq!(values("$[?@[?@.b]]", &document), vec![json!([{"b": 1}])]);
    }

    #[test]
    fn comparison_of_two_absent_paths_is_equality_of_nothing() {
        let document = json!([{"u": 1}]);
        assert_eq!(run("$[?@.absent1 == @.absent2]", &document).len(), 1);
        assert_eq!(run("$[?@.absent1 <= @.absent2]", &document).len(), 1);
        assert!(run("$[?@.absent1 < @.absent2]", &document).is_empty());
        assert!(run("$[?@.absent == 'g']", &document).is_empty());
        assert_eq!(run("$[?@.absent != 'g']", &document).len(), 1);
        assert!(run("$[?@.absent > 1]", &document).is_empty());
        assert!(run("$[?@.u > @.absent]", &document).is_empty());
    }

    #[test]
    fn singular_query_steps_walk_names_and_indexes() {
        let document = json!([
            {"a": {"b": [10, 20]}},
            {"a": {"b": [30]}}
        ]);
        assert_eq!(
            values("$[?@.a.b[0] == 30]", &document),
            vec![json!({"a": {"b": [30]}})]
        );
        assert_eq!(
            values("$[?@.a.b[-1] == 20]", &document),
            vec![json!({"a": {"b": [10, 20]}})]
        );
        assert_eq!(values("$[?@['a']['b'][1] == 20]", &document).len(), 1);
    }

    #[test]
    fn type_mismatch_along_a_singular_query_is_nothing() {
        let document = json!([{"a": [1]}, {"a": {"k": 1}}, {"a": 3}]);
        // @.a.k only resolves where a is an object.
        assert_eq!(values("$[?@.a.k == 1]", &document), vec![json!({"a": {"k": 1}})]);
        // @.a[0] only resolves where a is an array.
        assert_eq!(values("$[?@.a[0] == 1]", &document), vec![json!({"a": [1]})]);
    }
}

mod invariants {
    use super::*;

    fn fixture() -> Value {
        json!({
            "store": {
                "book": [
                    {"title": "one", "price": 1.0},
                    {"title": "two", "price": 2.0}
                ],
                "open": true
            },
            "misc": [null, [1, 2], {"deep": {"x": []}}]
        })
    }

    #[test]
    fn every_location_resolves_back_to_its_value() {
        let document = fixture();
        for query in ["$", "$[*]", "$..*", "$.store.book[*].title", "$..x", "$.misc[1:]"] {
            for node in run(query, &document) {
                let resolved = resolve(node.location.as_str(), &document);
                assert_eq!(
                    resolved, node.value,
                    "{query}: location {} does not resolve to its node value",
                    node.location
                );
            }
        }
    }

    #[test]
    fn evaluation_is_deterministic() {
        let document = fixture();
        let compiled = compile("$..*").expect("query should compile");
        let first: Vec<Node> = compiled.evaluate(&document).collect();
        let second: Vec<Node> = compiled.evaluate(&document).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn equality_is_reflexive_over_document_values() {
        let document = fixture();
        // Every child of the root compares equal to itself.
        assert_eq!(
            run("$[?@ == @]", &document).len(),
            run("$[*]", &document).len()
        );
        assert!(run("$[?@ != @]", &document).is_empty());
    }

    #[test]
    fn nodes_alias_the_document() {
        let document = fixture();
        let nodes = run("$.store.book[0]", &document);
        assert!(std::ptr::eq(nodes[0].value, &document["store"]["book"][0]));
    }

    #[test]
    fn pulls_are_lazy() {
        let document = json!([[1], [2], [3]]);
        let compiled = compile("$[*][*]").expect("query should compile");
        let mut nodes = compiled.evaluate(&document);
        // Only as much of the stream as is pulled gets computed; the
        // sequence stays usable midway through.
        assert_eq!(nodes.next().map(|n| n.value.clone()), Some(json!(1)));
        assert_eq!(nodes.next().map(|n| n.value.clone()), Some(json!(2)));
        drop(nodes);
    }
}
