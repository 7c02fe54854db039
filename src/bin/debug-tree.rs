/// Diagnostic tool to verify the listing → tree → JSON pipeline
use pathmap::{build_treemap, load_record_set, TreeOptions};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pathmap=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        anyhow::bail!("usage: debug-tree <listing> [coverage-report]");
    };
    let report = args.next().map(PathBuf::from);

    let set = load_record_set(&input, report.as_deref())?;
    let root = build_treemap(&set, &TreeOptions::default());

    eprintln!("=== DIAGNOSTIC: Listing → Tree ===");
    eprintln!(
        "Records: {} (value_aware={}, overlay={:?})",
        set.len(),
        set.value_aware,
        set.overlay_label
    );
    eprintln!(
        "Root: '{}' (size={}, value={:?}, has_values={})",
        root.id.as_deref().unwrap_or("(root)"),
        root.size,
        root.value,
        root.has_values
    );
    eprintln!("Nodes: {} ({} leaves)", root.node_count(), root.leaf_count());

    eprintln!("Top 10 children of root:");
    for (i, child) in root.children.iter().take(10).enumerate() {
        eprintln!(
            "    [{}] '{}' - size={} value={:?} (children={})",
            i,
            child.id.as_deref().unwrap_or_default(),
            child.size,
            child.value,
            child.children.len()
        );
    }

    println!("{}", serde_json::to_string_pretty(&root)?);
    Ok(())
}
