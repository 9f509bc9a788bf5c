use dashboard_builder::aggregator::{
    build_dimension_tree, rebuild_structure_with_diagnostics, rebuild_tree,
    rebuild_tree_with_diagnostics, Diagnostic, Diagnostics, Tree,
};
use dashboard_builder::parser::{SegmentDimension, SegmentRecord, TimeSeries};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Deepest chain of nested objects below `node`
fn object_depth(node: &Value) -> usize {
    match node {
        Value::Object(map) => 1 + map.values().map(object_depth).max().unwrap_or(0),
        _ => 0,
    }
}

fn dimension(items: &[&str], edges: &[(&str, &[&str])]) -> SegmentDimension {
    SegmentDimension {
        items: items.iter().map(|s| s.to_string()).collect(),
        hierarchy: edges
            .iter()
            .map(|(parent, kids)| {
                (
                    parent.to_string(),
                    kids.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect(),
    }
}

fn sample_records() -> Vec<SegmentRecord> {
    vec![
        SegmentRecord::new("India", "By Product")
            .with_hierarchy(["Hardware", "Sensors"])
            .with_time_series(TimeSeries::from_years([(2024, 10.0), (2032, 25.0)]))
            .with_cagr(12.1),
        SegmentRecord::new("India", "By Product")
            .with_hierarchy(["Hardware", "Cameras"])
            .with_time_series(TimeSeries::from_years([(2024, 5.0), (2032, 9.0)])),
        SegmentRecord::new("India", "By Product")
            .with_hierarchy(["Hardware"])
            .with_time_series(TimeSeries::from_years([(2024, 15.0), (2032, 34.0)]))
            .aggregated(Some(1)),
        SegmentRecord::new("Peru", "By Application")
            .with_hierarchy(["Retail", "", "Online"])
            .with_time_series(TimeSeries::from_years([(2024, 3.0)])),
    ]
}

#[test]
fn test_rebuild_tree_full_shape() {
    let tree = rebuild_tree(&sample_records());

    assert_eq!(
        Value::Object(tree),
        json!({
            "India": {
                "By Product": {
                    "Hardware": {
                        "2024": 15.0,
                        "2032": 34.0,
                        "_aggregated": true,
                        "_level": 1,
                        "Sensors": {"2024": 10.0, "2032": 25.0, "CAGR": "12.1%"},
                        "Cameras": {"2024": 5.0, "2032": 9.0}
                    }
                }
            },
            "Peru": {
                "By Application": {
                    "Retail": {"Online": {"2024": 3.0}}
                }
            }
        })
    );
}

#[test]
fn test_rebuild_tree_is_idempotent() {
    let records = sample_records();

    let first = rebuild_tree(&records);
    let second = rebuild_tree(&records);

    assert_eq!(first, second);
}

#[test]
fn test_rebuild_tree_truncates_deep_hierarchy() {
    let labels: Vec<String> = (1..=15).map(|i| format!("L{}", i)).collect();
    let records = vec![SegmentRecord::new("India", "By Product")
        .with_hierarchy(labels)
        .with_time_series(TimeSeries::from_years([(2024, 1.0)]))];
    let mut diagnostics = Diagnostics::new();

    let tree = rebuild_tree_with_diagnostics(&records, &mut diagnostics);

    // segment type node + 10 label nodes; year values are not objects
    let segment_node = &tree["India"]["By Product"];
    assert_eq!(object_depth(segment_node), 11);

    let mut node = segment_node;
    for i in 1..=10 {
        node = &node[format!("L{}", i).as_str()];
    }
    assert_eq!(node["2024"], json!(1.0));
    assert!(node.get("L11").is_none());

    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(Diagnostic::DepthExceeded { depth: 15, limit: 10, .. })
    ));
}

#[test]
fn test_rebuild_tree_keeps_processing_after_truncation() {
    let deep: Vec<String> = (1..=12).map(|i| format!("L{}", i)).collect();
    let records = vec![
        SegmentRecord::new("India", "By Product").with_hierarchy(deep),
        SegmentRecord::new("Peru", "By Product")
            .with_hierarchy(["Retail"])
            .with_time_series(TimeSeries::from_years([(2030, 2.0)])),
    ];

    let tree = rebuild_tree(&records);

    assert_eq!(tree["Peru"]["By Product"]["Retail"]["2030"], json!(2.0));
}

#[test]
fn test_rebuild_tree_empty_input() {
    let tree = rebuild_tree(&[]);
    assert!(tree.is_empty());
}

#[test]
fn test_structure_cycle_omits_only_reentry() {
    // Root -> A -> B -> A
    let dim = dimension(
        &["Root", "A", "B"],
        &[("Root", &["A"]), ("A", &["B"]), ("B", &["A"])],
    );
    let mut diagnostics = Diagnostics::new();

    let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

    assert_eq!(Value::Object(tree), json!({"Root": {"A": {"B": {}}}}));
    assert_eq!(diagnostics.circular_references(), 1);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(Diagnostic::CircularReference { item, path, .. })
            if item == "A" && path == &vec!["Root".to_string(), "A".to_string(), "B".to_string()]
    ));
}

#[test]
fn test_structure_expands_shared_subtree_under_each_parent() {
    // Shared is reachable from both X and Y without any cycle
    let dim = dimension(
        &["X", "Y", "Shared", "Leaf"],
        &[("X", &["Shared"]), ("Y", &["Shared"]), ("Shared", &["Leaf"])],
    );
    let mut diagnostics = Diagnostics::new();

    let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

    assert_eq!(
        Value::Object(tree),
        json!({
            "X": {"Shared": {"Leaf": {}}},
            "Y": {"Shared": {"Leaf": {}}}
        })
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_structure_depth_cap() {
    let names: Vec<String> = (0..30).map(|i| format!("N{}", i)).collect();
    let dim = SegmentDimension {
        items: names.clone(),
        hierarchy: names
            .windows(2)
            .map(|pair| (pair[0].clone(), vec![pair[1].clone()]))
            .collect(),
    };
    let mut diagnostics = Diagnostics::new();

    let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

    assert_eq!(object_depth(&Value::Object(tree)), 21);
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics.iter().next(),
        Some(Diagnostic::StructureDepthExceeded { limit: 20, .. })
    ));
}

#[test]
fn test_structure_pure_cycle_has_no_top_level() {
    let dim = dimension(&["A", "B"], &[("A", &["B"]), ("B", &["A"])]);
    let mut diagnostics = Diagnostics::new();

    let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

    assert!(tree.is_empty());
}

#[test]
fn test_rebuild_structure_for_all_geographies() {
    let mut dims = BTreeMap::new();
    dims.insert(
        "By Product".to_string(),
        dimension(&["Hardware", "Sensors"], &[("Hardware", &["Sensors"])]),
    );
    dims.insert("By Application".to_string(), dimension(&[], &[]));
    let geographies = vec!["India".to_string(), "Peru".to_string(), "Chile".to_string()];
    let mut diagnostics = Diagnostics::new();

    let tree: Tree = rebuild_structure_with_diagnostics(&geographies, &dims, &mut diagnostics);

    assert_eq!(tree.len(), 3);
    assert_eq!(
        tree["Chile"],
        json!({"By Product": {"Hardware": {"Sensors": {}}}, "By Application": {}})
    );
    // Empty dimension is reported once, not once per geography
    assert_eq!(diagnostics.len(), 1);
}
