//! Missing-key detection between a source and a target tree.
//!
//! A source leaf is missing when the target has nothing at the same path,
//! holds an empty string there, or holds a branch/list where the source has a
//! leaf. A target leaf that is filled is never reported, even if its value or
//! JSON type differs from the source: missing means absent, not stale.
//!
//! Empty source objects and lists have no leaves; they are reported as
//! verbatim leaves when the target has no container there.

use serde_json::{Map, Value};

use crate::tree::{KeyPath, Node, Tree};

/// Source value of a missing leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    /// Needs translation.
    Text(String),
    /// Copied into the target as-is (numbers, booleans, null, primitive arrays, empty strings).
    Verbatim(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissingLeaf {
    pub path: KeyPath,
    pub leaf: Leaf,
}

impl MissingLeaf {
    pub fn text(&self) -> Option<&str> {
        match &self.leaf {
            Leaf::Text(text) => Some(text),
            Leaf::Verbatim(_) => None,
        }
    }
}

/// Missing leaves of `source` with respect to `target`, depth-first in source key order.
pub fn diff(source: &Tree, target: &Tree) -> Vec<MissingLeaf> {
    let mut missing = Vec::new();
    diff_branch(source, Some(target), &KeyPath::root(), &mut missing);
    missing
}

/// Number of missing leaves that need translation.
pub fn text_count(missing: &[MissingLeaf]) -> usize {
    missing.iter().filter(|m| m.text().is_some()).count()
}

fn diff_branch(source: &Tree, target: Option<&Tree>, prefix: &KeyPath, out: &mut Vec<MissingLeaf>) {
    for (key, node) in source {
        let counterpart = target.and_then(|t| t.get(key));
        diff_node(node, counterpart, prefix.child(key), out);
    }
}

fn diff_node(source: &Node, target: Option<&Node>, path: KeyPath, out: &mut Vec<MissingLeaf>) {
    match source {
        // An empty container has no leaves of its own; copy it so the
        // target keeps the same shape.
        Node::Branch(children) if children.is_empty() => {
            if !target.is_some_and(|t| matches!(t, Node::Branch(_)) || t.is_filled_leaf()) {
                out.push(MissingLeaf {
                    path,
                    leaf: Leaf::Verbatim(Value::Object(Map::new())),
                });
            }
        }
        Node::List(items) if items.is_empty() => {
            if !target.is_some_and(|t| matches!(t, Node::List(_)) || t.is_filled_leaf()) {
                out.push(MissingLeaf {
                    path,
                    leaf: Leaf::Verbatim(Value::Array(Vec::new())),
                });
            }
        }
        Node::Branch(children) => {
            let target = match target {
                Some(Node::Branch(tree)) => Some(tree),
                _ => None,
            };
            diff_branch(children, target, &path, out);
        }
        Node::List(items) => {
            let target = match target {
                Some(Node::List(items)) => Some(items.as_slice()),
                _ => None,
            };
            for (i, item) in items.iter().enumerate() {
                let counterpart = target.and_then(|t| t.get(i));
                diff_node(item, counterpart, path.index(i), out);
            }
        }
        // An empty source string is already matched by an empty target string.
        Node::Text(text) if text.is_empty() => {
            if !target.is_some_and(Node::is_leaf) {
                out.push(MissingLeaf {
                    path,
                    leaf: Leaf::Verbatim(Value::String(String::new())),
                });
            }
        }
        Node::Text(text) => {
            if !target.is_some_and(Node::is_filled_leaf) {
                out.push(MissingLeaf {
                    path,
                    leaf: Leaf::Text(text.clone()),
                });
            }
        }
        Node::Value(value) => {
            if !target.is_some_and(Node::is_filled_leaf) {
                out.push(MissingLeaf {
                    path,
                    leaf: Leaf::Verbatim(value.clone()),
                });
            }
        }
    }
}
