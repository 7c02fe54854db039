//! Owned, serializable tree handed to renderers.

use compact_str::CompactString;
use serde::Serialize;

use super::arena::{NodeId, PathTree};

/// One element of the finished treemap.
///
/// Serializes as `{"id", "size", "value", "hasValues", "children"}`; the
/// root of an unpromoted tree has no `id`, leaves have no `children`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<CompactString>,
    pub size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    pub has_values: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Copy the reachable part of the arena, starting at its root.
    pub fn from_tree(tree: &PathTree) -> Self {
        Self::from_arena(tree, tree.root)
    }

    fn from_arena(tree: &PathTree, id: NodeId) -> Self {
        let node = tree.get(id);
        Node {
            id: node.name.clone(),
            size: node.size,
            value: node.value.known(),
            has_values: node.value.is_tracked(),
            children: tree
                .children(id)
                .map(|child| Self::from_arena(tree, child))
                .collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.depth_first().count()
    }

    pub fn leaf_count(&self) -> usize {
        self.depth_first().filter(|(_, n)| n.is_leaf()).count()
    }

    /// Pre-order walk yielding `(depth, node)`, root at depth 0.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: vec![(0, self)],
        }
    }
}

pub struct DepthFirst<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|c| (depth + 1, c)));
        Some((depth, node))
    }
}
