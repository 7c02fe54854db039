pub mod aggregate;
pub mod arena;
pub mod flatten;
pub mod node;

use std::collections::HashMap;

use self::arena::{NodeId, NodeValue, PathNode, PathTree};
use crate::records::types::{Record, RecordSet};

/// Knobs for turning a record set into a display tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Replace an unnamed root that has a single child with that child
    pub promote_single_root: bool,
    /// Collapse chains of single-child directories into one segment
    pub flatten: bool,
    /// Order children by descending size, then name
    pub sort: bool,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            promote_single_root: true,
            flatten: true,
            sort: true,
        }
    }
}

/// Build the raw (leaf sizes only) PathTree from a flat record list.
pub fn build_tree(set: &RecordSet, options: &TreeOptions) -> PathTree {
    let mut tree = PathTree::new();
    if set.value_aware {
        tree.get_mut(tree.root).value = NodeValue::Unknown;
    }

    tracing::info!(
        "Building tree from {} records (value_aware={})",
        set.len(),
        set.value_aware
    );

    // Map from joined segments → NodeId. "/a/b", "a/b" and "a/b/" share a node.
    let mut path_map: HashMap<String, NodeId> = HashMap::new();

    for record in set.iter() {
        let segments: Vec<&str> = record.path.split('/').filter(|s| !s.is_empty()).collect();

        // "" and "/" name the synthetic root; its size only survives if no
        // other record gives it children.
        let id = if segments.is_empty() {
            tree.root
        } else {
            ensure_node(&mut tree, &mut path_map, &segments)
        };
        let node = tree.get_mut(id);
        node.size = record.size;
        node.value = leaf_value(record, set.value_aware);
    }

    if options.promote_single_root {
        promote_single_root(&mut tree);
    }

    let root_id = tree.root;
    if tree.get(root_id).size == 0.0 && tree.get(root_id).has_children() {
        let total: f64 = tree.children(root_id).map(|id| tree.get(id).size).sum();
        tree.get_mut(root_id).size = total;
    }

    tracing::info!(
        "Tree built: {} nodes, {} direct children of root",
        tree.len(),
        tree.children(tree.root).count()
    );

    tree
}

fn leaf_value(record: &Record, value_aware: bool) -> NodeValue {
    match record.value {
        Some(v) => NodeValue::Known(v),
        None if value_aware => NodeValue::Unknown,
        None => NodeValue::Untracked,
    }
}

/// Walk the segment chain from the root, creating missing nodes.
/// Iterative so deep paths never recurse.
fn ensure_node(
    tree: &mut PathTree,
    path_map: &mut HashMap<String, NodeId>,
    segments: &[&str],
) -> NodeId {
    let mut current = tree.root;
    let mut key = String::new();

    for segment in segments {
        if !key.is_empty() {
            key.push('/');
        }
        key.push_str(segment);

        current = match path_map.get(&key) {
            Some(&id) => id,
            None => {
                let id = tree.add_child(current, PathNode::segment(segment));
                path_map.insert(key.clone(), id);
                id
            }
        };
    }

    current
}

/// Drop the synthetic wrapper when every path shares one top-level segment.
fn promote_single_root(tree: &mut PathTree) {
    if tree.get(tree.root).name.is_some() {
        return;
    }
    if let Some(only) = tree.only_child(tree.root) {
        tracing::debug!(
            "Promoting '{}' to root",
            tree.get(only).name.as_deref().unwrap_or_default()
        );
        tree.get_mut(only).parent = None;
        tree.root = only;
    }
}
