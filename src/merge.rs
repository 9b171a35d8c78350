//! Overlaying new leaves onto a target tree.
//!
//! Intermediate branches and list slots are created on demand. New keys are
//! appended after existing ones, so the order leaves are merged in is the order
//! they appear among their siblings. A path that already holds a filled leaf is
//! left alone.

use serde_json::Value;

use crate::tree::{KeyPath, Node, Segment, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// The path did not exist.
    Added,
    /// The path held an empty string or a branch/list, now overwritten.
    Replaced,
    /// The path already held a filled leaf.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub replaced: usize,
    pub skipped: usize,
    /// Written leaves holding non-empty text, i.e. translations.
    pub texts: usize,
}

impl MergeStats {
    fn record(&mut self, action: MergeAction, is_text: bool) {
        match action {
            MergeAction::Added => self.added += 1,
            MergeAction::Replaced => self.replaced += 1,
            MergeAction::Skipped => {
                self.skipped += 1;
                return;
            }
        }
        if is_text {
            self.texts += 1;
        }
    }

    /// Leaves actually written.
    pub fn written(&self) -> usize {
        self.added + self.replaced
    }
}

/// Merge `leaves` into `target` in iteration order.
pub fn merge<I>(target: &mut Tree, leaves: I) -> MergeStats
where
    I: IntoIterator<Item = (KeyPath, Node)>,
{
    let mut stats = MergeStats::default();
    for (path, node) in leaves {
        let is_text = matches!(&node, Node::Text(text) if !text.is_empty());
        stats.record(merge_leaf(target, &path, node), is_text);
    }
    stats
}

/// Set a single leaf at `path`.
pub fn merge_leaf(target: &mut Tree, path: &KeyPath, node: Node) -> MergeAction {
    match path.segments() {
        [] | [Segment::Index(_), ..] => MergeAction::Skipped,
        segments => set_in_tree(target, segments, node),
    }
}

fn empty_container(next: &Segment) -> Node {
    match next {
        Segment::Key(_) => Node::Branch(Tree::new()),
        Segment::Index(_) => Node::List(Vec::new()),
    }
}

fn set_slot(slot: &mut Node, node: Node) -> MergeAction {
    if slot.is_filled_leaf() {
        return MergeAction::Skipped;
    }
    *slot = node;
    MergeAction::Replaced
}

// `segments[0]` must be a key.
fn set_in_tree(tree: &mut Tree, segments: &[Segment], node: Node) -> MergeAction {
    let (Segment::Key(key), rest) = (&segments[0], &segments[1..]) else {
        return MergeAction::Skipped;
    };

    match rest.first() {
        None => match tree.get_mut(key) {
            Some(slot) => set_slot(slot, node),
            None => {
                tree.insert(key.clone(), node);
                MergeAction::Added
            }
        },
        Some(next) => {
            let child = tree
                .entry(key.clone())
                .or_insert_with(|| empty_container(next));
            set_in_node(child, rest, node)
        }
    }
}

fn set_in_list(items: &mut Vec<Node>, index: usize, rest: &[Segment], node: Node) -> MergeAction {
    while items.len() < index {
        items.push(Node::Value(Value::Null));
    }

    match rest.first() {
        None => match items.get_mut(index) {
            Some(slot) => set_slot(slot, node),
            None => {
                items.push(node);
                MergeAction::Added
            }
        },
        Some(next) => {
            if items.len() == index {
                items.push(empty_container(next));
            }
            set_in_node(&mut items[index], rest, node)
        }
    }
}

// Descend into `container` along `segments`, replacing it with an empty
// container of the right kind if it holds something else.
fn set_in_node(container: &mut Node, segments: &[Segment], node: Node) -> MergeAction {
    match (&segments[0], container) {
        (Segment::Key(_), Node::Branch(tree)) => set_in_tree(tree, segments, node),
        (Segment::Index(index), Node::List(items)) => {
            set_in_list(items, *index, &segments[1..], node)
        }
        (segment, container) => {
            *container = empty_container(segment);
            set_in_node(container, segments, node)
        }
    }
}
