use super::arena::{NodeId, PathTree};

/// Collapse every run of single-child directories below the root into one
/// node named `a/b/c`. The root itself is never merged into its child.
/// Returns the number of merges performed; a second call returns 0.
pub fn flatten(tree: &mut PathTree) -> usize {
    let mut merged = 0;
    let mut stack: Vec<NodeId> = tree.children(tree.root).collect();

    while let Some(id) = stack.pop() {
        while let Some(only) = tree.only_child(id) {
            tree.absorb_child(id, only);
            merged += 1;
        }
        stack.extend(tree.children(id));
    }

    tracing::debug!("Flattened {} single-child directories", merged);
    merged
}
