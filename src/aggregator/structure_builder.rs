//! Build the structural (year-free) segmentation tree from dimension definitions.
//!
//! The hierarchy mapping comes straight from user spreadsheets and is not
//! trusted: it may contain cycles or absurd nesting. Expansion is bounded by
//! `MAX_STRUCTURE_DEPTH` and by a per-path ancestor list, so an item shared by
//! several parents is expanded under each of them while a true cycle is cut
//! at its re-entry point.

use super::diagnostics::{Diagnostic, Diagnostics};
use super::tree_builder::Tree;
use crate::parser::SegmentDimension;
use crate::utils::config::MAX_STRUCTURE_DEPTH;
use log::debug;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Build `geography -> segmentType -> item -> child -> ...` without year data
///
/// **Public** - main entry point for the segmentation view
pub fn rebuild_structure(
    all_geographies: &[String],
    segment_dimensions: &BTreeMap<String, SegmentDimension>,
) -> Tree {
    let mut diagnostics = Diagnostics::new();
    rebuild_structure_with_diagnostics(all_geographies, segment_dimensions, &mut diagnostics)
}

/// Build the structural tree, collecting depth and cycle diagnostics
pub fn rebuild_structure_with_diagnostics(
    all_geographies: &[String],
    segment_dimensions: &BTreeMap<String, SegmentDimension>,
    diagnostics: &mut Diagnostics,
) -> Tree {
    debug!(
        "Building structure for {} geographies x {} segment types",
        all_geographies.len(),
        segment_dimensions.len()
    );

    // Every geography shares the same dimension shape, so build it once
    let mut by_segment_type = Tree::new();
    for (segment_type, dimension) in segment_dimensions {
        let node = build_dimension_tree(segment_type, dimension, diagnostics);
        by_segment_type.insert(segment_type.clone(), Value::Object(node));
    }

    all_geographies
        .iter()
        .map(|geography| (geography.clone(), Value::Object(by_segment_type.clone())))
        .collect()
}

/// Expand one dimension from its top-level items
///
/// Top-level items are those never listed as a child anywhere in the
/// hierarchy mapping.
pub fn build_dimension_tree(
    segment_type: &str,
    dimension: &SegmentDimension,
    diagnostics: &mut Diagnostics,
) -> Tree {
    if dimension.items.is_empty() {
        diagnostics.push(Diagnostic::MissingHierarchy {
            segment_type: segment_type.to_string(),
        });
        return Tree::new();
    }

    let children: HashSet<&str> = dimension
        .hierarchy
        .values()
        .flatten()
        .map(String::as_str)
        .collect();

    let mut expander = Expander {
        segment_type,
        hierarchy: &dimension.hierarchy,
        diagnostics,
    };

    let mut node = Tree::new();
    let mut path = Vec::new();

    for item in dimension.items.iter().filter(|i| !children.contains(i.as_str())) {
        let subtree = expander.expand(item, 1, &mut path);
        node.insert(item.clone(), Value::Object(subtree));
    }

    debug!("Dimension '{}': {} top-level items", segment_type, node.len());

    node
}

/// Recursive expansion state for one dimension
struct Expander<'a> {
    segment_type: &'a str,
    hierarchy: &'a BTreeMap<String, Vec<String>>,
    diagnostics: &'a mut Diagnostics,
}

impl Expander<'_> {
    /// Expand the children of `item`, which sits at `depth` (top level = 1)
    ///
    /// `path` holds the ancestors of `item` and is restored before returning.
    fn expand(&mut self, item: &str, depth: usize, path: &mut Vec<String>) -> Tree {
        let mut node = Tree::new();
        let hierarchy = self.hierarchy;

        let children = match hierarchy.get(item) {
            Some(children) if !children.is_empty() => children,
            _ => return node,
        };

        if depth >= MAX_STRUCTURE_DEPTH {
            self.diagnostics.push(Diagnostic::StructureDepthExceeded {
                segment_type: self.segment_type.to_string(),
                item: item.to_string(),
                limit: MAX_STRUCTURE_DEPTH,
            });
            return node;
        }

        path.push(item.to_string());

        for child in children {
            if path.iter().any(|ancestor| ancestor == child) {
                self.diagnostics.push(Diagnostic::CircularReference {
                    segment_type: self.segment_type.to_string(),
                    path: path.clone(),
                    item: child.clone(),
                });
                continue;
            }

            let subtree = self.expand(child, depth + 1, path);
            node.insert(child.clone(), Value::Object(subtree));
        }

        path.pop();

        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

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

    #[test]
    fn test_simple_hierarchy() {
        let dim = dimension(
            &["Hardware", "Sensors", "Cameras", "Software"],
            &[("Hardware", &["Sensors", "Cameras"])],
        );
        let mut diagnostics = Diagnostics::new();

        let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

        assert_eq!(
            Value::Object(tree),
            json!({"Hardware": {"Sensors": {}, "Cameras": {}}, "Software": {}})
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_self_loop_is_cut() {
        let dim = dimension(&["Root", "A"], &[("Root", &["A"]), ("A", &["A"])]);
        let mut diagnostics = Diagnostics::new();

        let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

        assert_eq!(Value::Object(tree), json!({"Root": {"A": {}}}));
        assert_eq!(diagnostics.circular_references(), 1);
    }

    #[test]
    fn test_empty_items_degrade_to_empty_node() {
        let dim = dimension(&[], &[("A", &["B"])]);
        let mut diagnostics = Diagnostics::new();

        let tree = build_dimension_tree("By Product", &dim, &mut diagnostics);

        assert!(tree.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_structure_is_repeated_per_geography() {
        let mut dims = BTreeMap::new();
        dims.insert("By Product".to_string(), dimension(&["A"], &[]));
        let geographies = vec!["India".to_string(), "Peru".to_string()];

        let tree = rebuild_structure(&geographies, &dims);

        assert_eq!(tree.len(), 2);
        assert_eq!(tree["India"], tree["Peru"]);
        assert_eq!(tree["Peru"], json!({"By Product": {"A": {}}}));
    }
}
