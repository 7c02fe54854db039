use super::arena::{NodeId, NodeValue, PathTree};

/// Compute aggregated sizes and values for all directory nodes (bottom-up).
///
/// After this, each directory's `size` equals the sum of its children's
/// sizes and its value is the size-weighted mean of the children that have
/// a known value. Children without one are left out of both sums. When all
/// valued children are empty the plain mean is used instead.
pub fn aggregate(tree: &mut PathTree) {
    // Process nodes in reverse order (children before parents) since
    // children always have higher indices than their parents in our arena.
    // This is guaranteed by the add_child insertion order.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let node = &tree.nodes[i];
        if !node.has_children() {
            continue;
        }

        let mut total = 0.0;
        let mut weighted = 0.0;
        let mut weight = 0.0;
        let mut plain = 0.0;
        let mut known = 0usize;
        let mut tracked = false;

        let mut child = node.first_child;
        while let Some(child_id) = child {
            let c = &tree.nodes[child_id.index()];
            total += c.size;
            match c.value {
                NodeValue::Known(v) => {
                    weighted += v * c.size;
                    weight += c.size;
                    plain += v;
                    known += 1;
                }
                NodeValue::Unknown => tracked = true,
                NodeValue::Untracked => {}
            }
            child = c.next_sibling;
        }

        tree.nodes[i].size = total;
        tree.nodes[i].value = if known == 0 {
            if tracked {
                NodeValue::Unknown
            } else {
                NodeValue::Untracked
            }
        } else if weight > 0.0 {
            NodeValue::Known(weighted / weight)
        } else {
            NodeValue::Known(plain / known as f64)
        };
    }
}

/// Sort children of every reachable node by size (descending), ties by name.
/// This re-links the sibling lists without moving nodes in the arena.
pub fn sort_children(tree: &mut PathTree) {
    let mut stack = vec![tree.root];
    while let Some(id) = stack.pop() {
        let mut children: Vec<NodeId> = tree.children(id).collect();
        if children.len() > 1 {
            children.sort_by(|a, b| {
                let (a, b) = (tree.get(*a), tree.get(*b));
                b.size.total_cmp(&a.size).then_with(|| a.name.cmp(&b.name))
            });
            tree.relink_children(id, &children);
        }
        stack.extend(children);
    }
}
