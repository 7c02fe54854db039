// Public library interface for pathmap-rs
// The debug-tree binary drives the same pipeline as library callers.

pub mod coverage;
pub mod pipeline;
pub mod records;
pub mod tree;

pub use pipeline::{build_treemap, load_record_set, load_treemap};
pub use tree::node::Node;
pub use tree::TreeOptions;
