use compact_str::{format_compact, CompactString};

/// Index into the arena `Vec<PathNode>`. Uses u32 to save memory (supports up to ~4 billion nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Overlay value carried by a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum NodeValue {
    /// No value concept applies to this subtree
    #[default]
    Untracked,
    /// Values are tracked here but none is known
    Unknown,
    Known(f64),
}

impl NodeValue {
    pub fn known(self) -> Option<f64> {
        match self {
            NodeValue::Known(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_tracked(self) -> bool {
        !matches!(self, NodeValue::Untracked)
    }
}

/// A single node in the path tree, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct PathNode {
    /// Path segment (not full path). `None` only for the synthetic root.
    pub name: Option<CompactString>,
    /// Leaf size as listed; after aggregation, sum of children for directories.
    pub size: f64,
    pub value: NodeValue,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for leaves)
    pub first_child: Option<NodeId>,
    /// Last child node index, kept so appends stay O(1) and in input order
    pub last_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
}

impl PathNode {
    pub fn segment(name: &str) -> Self {
        PathNode {
            name: Some(CompactString::new(name)),
            size: 0.0,
            value: NodeValue::Untracked,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }

    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }
}

/// The path tree stored as a flat arena of nodes.
///
/// Children always sit at higher indices than their parents; aggregation
/// relies on that to run post-order by walking the arena backwards.
pub struct PathTree {
    /// All nodes in contiguous memory
    pub nodes: Vec<PathNode>,
    /// Root node index. Starts as the synthetic root, may be promoted.
    pub root: NodeId,
}

impl PathTree {
    /// Create an empty tree with a synthetic (unnamed) root node.
    pub fn new() -> Self {
        let root_node = PathNode {
            name: None,
            ..PathNode::segment("")
        };

        PathTree {
            nodes: vec![root_node],
            root: NodeId(0),
        }
    }

    /// Append a child node under the given parent. Returns the new node's ID.
    pub fn add_child(&mut self, parent: NodeId, mut node: PathNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.next_sibling = None;

        match self.nodes[parent.index()].last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.index()]
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> &mut PathNode {
        &mut self.nodes[id.index()]
    }

    /// Total number of arena slots, including nodes absorbed by flattening.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.get(self.root).first_child.is_none()
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// The child of `parent` if it has exactly one.
    pub fn only_child(&self, parent: NodeId) -> Option<NodeId> {
        let first = self.get(parent).first_child?;
        self.get(first).next_sibling.is_none().then_some(first)
    }

    /// Replace the child list of `parent` with `children`, in that order.
    pub fn relink_children(&mut self, parent: NodeId, children: &[NodeId]) {
        self.nodes[parent.index()].first_child = children.first().copied();
        self.nodes[parent.index()].last_child = children.last().copied();
        for w in children.windows(2) {
            self.nodes[w[0].index()].next_sibling = Some(w[1]);
        }
        if let Some(last) = children.last() {
            self.nodes[last.index()].next_sibling = None;
        }
    }

    /// Merge `child` into `parent`: the parent's name becomes
    /// `parent/child` and it takes over the child's size, value and
    /// children. The child slot is left detached in the arena.
    pub fn absorb_child(&mut self, parent: NodeId, child: NodeId) {
        let grandchildren: Vec<NodeId> = self.children(child).collect();
        let absorbed = self.nodes[child.index()].clone();

        let node = &mut self.nodes[parent.index()];
        node.name = match (&node.name, &absorbed.name) {
            (Some(own), Some(sub)) => Some(format_compact!("{}/{}", own, sub)),
            (None, sub) => sub.clone(),
            (own, None) => own.clone(),
        };
        node.size = absorbed.size;
        node.value = absorbed.value;
        node.first_child = absorbed.first_child;
        node.last_child = absorbed.last_child;

        for id in grandchildren {
            self.nodes[id.index()].parent = Some(parent);
        }

        let detached = &mut self.nodes[child.index()];
        detached.parent = None;
        detached.first_child = None;
        detached.last_child = None;
        detached.next_sibling = None;
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a PathTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}
