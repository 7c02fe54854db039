use pathmap::records::parse_records;
use pathmap::records::types::{Record, RecordSet};
use pathmap::tree::{aggregate, build_tree, flatten};
use pathmap::{build_treemap, Node, TreeOptions};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = Record> {
    let segment = prop::sample::select(vec!["a", "b", "c", "src", "lib"]);
    (
        prop::collection::vec(segment, 1..5),
        0u32..1000,
        prop::option::of(0.0f64..=1.0),
    )
        .prop_map(|(segments, size, value)| Record {
            path: segments.join("/"),
            size: size as f64,
            value,
        })
}

fn set_strategy() -> impl Strategy<Value = RecordSet> {
    (prop::collection::vec(record_strategy(), 0..40), any::<bool>()).prop_map(
        |(records, overlay)| {
            let value_aware = overlay || records.iter().any(|r| r.value.is_some());
            RecordSet {
                records,
                value_aware,
                overlay_label: None,
            }
        },
    )
}

fn assert_conserved(node: &Node) {
    if node.is_leaf() {
        return;
    }
    let sum: f64 = node.children.iter().map(|c| c.size).sum();
    assert_eq!(node.size, sum, "size mismatch at {:?}", node.id);
    node.children.iter().for_each(assert_conserved);
}

/// A defined value anywhere below implies `has_values` on every ancestor.
fn value_below(node: &Node) -> bool {
    let below = node.children.iter().fold(false, |acc, c| value_below(c) || acc);
    if below || node.value.is_some() {
        assert!(node.has_values, "{:?} lost has_values", node.id);
    }
    below || node.value.is_some()
}

fn raw_node(text: &str, flatten_passes: usize) -> Node {
    let set = parse_records(text).unwrap();
    let mut tree = build_tree(&set, &TreeOptions::default());
    aggregate::aggregate(&mut tree);
    for _ in 0..flatten_passes {
        flatten::flatten(&mut tree);
    }
    Node::from_tree(&tree)
}

proptest! {
    #[test]
    fn sizes_are_conserved(set in set_strategy()) {
        let root = build_treemap(&set, &TreeOptions::default());
        assert_conserved(&root);
    }

    #[test]
    fn values_stay_in_unit_interval(set in set_strategy()) {
        let root = build_treemap(&set, &TreeOptions::default());
        for (_, node) in root.depth_first() {
            if let Some(v) = node.value {
                prop_assert!((0.0..=1.0).contains(&v), "value {} out of range", v);
            }
        }
        value_below(&root);
    }

    #[test]
    fn value_aware_sets_track_every_node(set in set_strategy()) {
        prop_assume!(set.value_aware);
        let root = build_treemap(&set, &TreeOptions::default());
        prop_assert!(root.depth_first().all(|(_, n)| n.has_values));
    }

    #[test]
    fn building_is_deterministic(set in set_strategy()) {
        let options = TreeOptions::default();
        prop_assert_eq!(build_treemap(&set, &options), build_treemap(&set, &options));
    }
}

#[test]
fn flattening_twice_changes_nothing() {
    let text = "1 a/b/c/d\n2 a/b/c/e\n3 x/y/z\n";
    assert_eq!(raw_node(text, 1), raw_node(text, 2));
}

#[test]
fn weighted_directory_value() {
    let set = parse_records("10 d/a\n30 d/b\n1 e\n[[cov]]\n0.5 d/a\n0.9 d/b\n").unwrap();
    let root = build_treemap(&set, &TreeOptions::default());
    let d = root.children.iter().find(|n| n.id.as_deref() == Some("d")).unwrap();
    assert_eq!(d.size, 40.0);
    assert!((d.value.unwrap() - 0.8).abs() < 1e-12);

    let e = root.children.iter().find(|n| n.id.as_deref() == Some("e")).unwrap();
    assert_eq!(e.value, None);
    assert!(e.has_values);
}

#[test]
fn missing_value_is_excluded_from_weighting() {
    let set = parse_records("10 d/a\n30 d/b\n5 f\n[[cov]]\n0.5 d/a\n").unwrap();
    let root = build_treemap(&set, &TreeOptions::default());
    let d = &root.children[0];
    assert_eq!(d.id.as_deref(), Some("d"));
    assert_eq!(d.value, Some(0.5));
}

#[test]
fn overlay_delimiter_alone_tracks_values_everywhere() {
    let set = parse_records("1 a\n2 b/c\n3 b/d\n[[x]]\n").unwrap();
    let root = build_treemap(&set, &TreeOptions::default());

    assert_eq!(root.leaf_count(), 3);
    for (_, node) in root.depth_first() {
        assert!(node.has_values, "{:?} should track values", node.id);
        assert_eq!(node.value, None);
    }
}

#[test]
fn root_only_listing_keeps_its_size() {
    let root = build_treemap(&parse_records("5 /\n").unwrap(), &TreeOptions::default());
    assert_eq!(root.id, None);
    assert_eq!(root.size, 5.0);
    assert!(root.children.is_empty());
}

#[test]
fn sort_breaks_size_ties_by_name() {
    let set = parse_records("5 b\n5 a\n3 c\n").unwrap();
    let root = build_treemap(&set, &TreeOptions::default());
    let ids: Vec<&str> = root.children.iter().filter_map(|c| c.id.as_deref()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn unsorted_output_keeps_listing_order() {
    let options = TreeOptions {
        sort: false,
        ..TreeOptions::default()
    };
    let root = build_treemap(&parse_records("1 z\n9 m\n5 a\n").unwrap(), &options);
    let ids: Vec<&str> = root.children.iter().filter_map(|c| c.id.as_deref()).collect();
    assert_eq!(ids, vec!["z", "m", "a"]);
}

#[test]
fn json_shape_matches_render_contract() {
    let set = parse_records("10 /x\n20 /y\n[[ scores ]]\n0.3 /x\n").unwrap();
    let root = build_treemap(&set, &TreeOptions::default());
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["size"], 30.0);
    assert_eq!(json["children"][0]["id"], "y");
    assert_eq!(json["children"][0]["hasValues"], true);
    assert!(json["children"][0].get("value").is_none());
    assert_eq!(json["children"][1]["value"], 0.3);
}
