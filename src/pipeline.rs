//! Records → tree → aggregation → normalization, in one call.

use std::path::Path;

use anyhow::Result;

use crate::coverage::{self, CoverageReport};
use crate::records::{self, types::RecordSet};
use crate::tree::node::Node;
use crate::tree::{aggregate, build_tree, flatten, TreeOptions};

/// Build the display tree for an already-parsed record set.
pub fn build_treemap(set: &RecordSet, options: &TreeOptions) -> Node {
    let mut tree = build_tree(set, options);
    aggregate::aggregate(&mut tree);

    // Flatten before sorting so sibling order reflects the merged names.
    if options.flatten {
        flatten::flatten(&mut tree);
    }
    if options.sort {
        aggregate::sort_children(&mut tree);
    }

    let root = Node::from_tree(&tree);
    tracing::info!(
        "Treemap ready: root size {}, {} leaves, has_values={}",
        root.size,
        root.leaf_count(),
        root.has_values
    );
    root
}

/// Read a listing and, optionally, a coverage report, then build the tree.
pub fn load_treemap(input: &Path, report: Option<&Path>, options: &TreeOptions) -> Result<Node> {
    let set = load_record_set(input, report)?;
    Ok(build_treemap(&set, options))
}

/// Read a listing and, optionally, a coverage report joined onto it.
///
/// Both files are loaded in parallel; the report is only joined onto the
/// records once both loads have finished.
pub fn load_record_set(input: &Path, report: Option<&Path>) -> Result<RecordSet> {
    let (set, report) = rayon::join(
        || records::read_records(input),
        || report.map(coverage::load_report).transpose(),
    );
    let mut set = set?;
    let report: Option<CoverageReport> = report?;

    if let Some(report) = &report {
        coverage::reconcile(&mut set, report);
    }

    Ok(set)
}
