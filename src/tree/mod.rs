//! Translation tree model.
//!
//! A locale file is a nested JSON object. It is parsed into a [`Tree`] of
//! [`Node`]s so that walking and merging can match on node kinds instead of
//! inspecting `serde_json::Value` at every step.
//!
//! Arrays are opaque leaves unless at least one element is an object; such
//! arrays become [`Node::List`] and their elements are walked as indexed
//! sub-trees.

mod path;
pub mod store;

use indexmap::IndexMap;
use serde_json::{Map, Value};

pub use path::{KeyPath, Segment};

/// An ordered mapping of keys to nodes. Insertion order is the file order.
pub type Tree = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A translatable string.
    Text(String),
    /// A non-string leaf (number, bool, null, array of primitives), copied verbatim.
    Value(Value),
    /// A nested object.
    Branch(Tree),
    /// An array holding objects; elements are indexed sub-trees.
    List(Vec<Node>),
}

impl Node {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(text) => Node::Text(text),
            Value::Object(map) => Node::Branch(tree_from_map(map)),
            Value::Array(items) if items.iter().any(Value::is_object) => {
                Node::List(items.into_iter().map(Node::from_json).collect())
            }
            other => Node::Value(other),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Node::Text(text) => Value::String(text.clone()),
            Node::Value(value) => value.clone(),
            Node::Branch(tree) => Value::Object(tree_to_map(tree)),
            Node::List(items) => Value::Array(items.iter().map(Node::to_json).collect()),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Text(_) | Node::Value(_))
    }

    /// A leaf that counts as "already present" in a target tree.
    ///
    /// Empty strings are treated as gaps still waiting for a translation.
    pub fn is_filled_leaf(&self) -> bool {
        match self {
            Node::Text(text) => !text.is_empty(),
            Node::Value(_) => true,
            Node::Branch(_) | Node::List(_) => false,
        }
    }
}

/// Build a tree from a parsed JSON document. The root must be an object.
pub fn tree_from_json(value: Value) -> Option<Tree> {
    match value {
        Value::Object(map) => Some(tree_from_map(map)),
        _ => None,
    }
}

pub fn tree_to_json(tree: &Tree) -> Value {
    Value::Object(tree_to_map(tree))
}

fn tree_from_map(map: Map<String, Value>) -> Tree {
    map.into_iter()
        .map(|(key, value)| (key, Node::from_json(value)))
        .collect()
}

fn tree_to_map(tree: &Tree) -> Map<String, Value> {
    tree.iter()
        .map(|(key, node)| (key.clone(), node.to_json()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn parse(value: Value) -> Tree {
        tree_from_json(value).unwrap()
    }

    #[test]
    fn test_from_json_kinds() {
        let tree = parse(json!({
            "title": "Hello",
            "count": 3,
            "flags": [true, false],
            "nested": {"a": "A"},
            "cards": [{"label": "One"}, "plain"]
        }));

        assert_eq!(tree["title"], Node::Text("Hello".to_string()));
        assert_eq!(tree["count"], Node::Value(json!(3)));
        assert_eq!(tree["flags"], Node::Value(json!([true, false])));
        assert!(matches!(tree["nested"], Node::Branch(_)));
        match &tree["cards"] {
            Node::List(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[0], Node::Branch(_)));
                assert_eq!(items[1], Node::Text("plain".to_string()));
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(tree_from_json(json!(["a", "b"])).is_none());
        assert!(tree_from_json(json!("text")).is_none());
    }

    #[test]
    fn test_json_roundtrip_preserves_order() {
        let source = json!({"z": "last", "a": {"y": 1, "b": "B"}, "m": [{"k": "v"}]});
        let tree = parse(source.clone());
        let back = tree_to_json(&tree);

        assert_eq!(back, source);
        let keys: Vec<_> = back.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_filled_leaf() {
        assert!(Node::Text("x".into()).is_filled_leaf());
        assert!(!Node::Text(String::new()).is_filled_leaf());
        assert!(Node::Value(json!(0)).is_filled_leaf());
        assert!(!Node::Branch(Tree::new()).is_filled_leaf());
        assert!(!Node::List(Vec::new()).is_filled_leaf());
    }
}
