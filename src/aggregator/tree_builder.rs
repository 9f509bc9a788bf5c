//! Rebuild the nested export tree from flat segment records.
//!
//! Output shape:
//! `geography -> segmentType -> level1 -> ... -> {year: value, CAGR?, _aggregated?, _level?}`
//!
//! Example: a record for India / By Product / [Hardware, Sensors] with
//! `{2024: 10}` becomes `{"India": {"By Product": {"Hardware": {"Sensors": {"2024": 10.0}}}}}`.

use super::diagnostics::{Diagnostic, Diagnostics};
use crate::parser::SegmentRecord;
use crate::utils::config::{AGGREGATED_FIELD, CAGR_FIELD, LEVEL_FIELD, MAX_TREE_DEPTH};
use log::debug;
use serde_json::{Map, Value};

/// Nested JSON object produced by the rebuilders
pub type Tree = Map<String, Value>;

/// Rebuild the export tree from flat records
///
/// **Public** - main entry point for tree reconstruction
///
/// Diagnostics are logged and then discarded; use
/// [`rebuild_tree_with_diagnostics`] to inspect them.
pub fn rebuild_tree(records: &[SegmentRecord]) -> Tree {
    let mut diagnostics = Diagnostics::new();
    rebuild_tree_with_diagnostics(records, &mut diagnostics)
}

/// Rebuild the export tree, collecting structural diagnostics
///
/// # Algorithm
/// 1. Walk/create `geography` and `segmentType` nodes
/// 2. Walk/create one node per present hierarchy label, capped at `MAX_TREE_DEPTH`
/// 3. Merge year values and markers into the final node (later records win)
pub fn rebuild_tree_with_diagnostics(
    records: &[SegmentRecord],
    diagnostics: &mut Diagnostics,
) -> Tree {
    debug!("Rebuilding tree from {} records", records.len());

    let mut tree = Tree::new();

    for record in records {
        let depth = record.segment_hierarchy.depth();
        if depth > MAX_TREE_DEPTH {
            diagnostics.push(Diagnostic::DepthExceeded {
                geography: record.geography.clone(),
                segment_type: record.segment_type.clone(),
                depth,
                limit: MAX_TREE_DEPTH,
            });
        }

        let path = [record.geography.as_str(), record.segment_type.as_str()]
            .into_iter()
            .chain(record.segment_hierarchy.levels().take(MAX_TREE_DEPTH));

        let Some(node) = descend(&mut tree, path) else {
            continue;
        };

        merge_leaf(node, record);
    }

    debug!("Rebuilt tree with {} geographies", tree.len());

    tree
}

/// Walk `path` from `root`, creating object nodes as needed
///
/// A non-object value already sitting under a path key is replaced.
fn descend<'a, 'k>(
    root: &'a mut Tree,
    path: impl IntoIterator<Item = &'k str>,
) -> Option<&'a mut Tree> {
    path.into_iter().try_fold(root, |node, key| {
        let slot = node
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));

        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }

        slot.as_object_mut()
    })
}

/// Write year values and record markers into a leaf node
fn merge_leaf(node: &mut Tree, record: &SegmentRecord) {
    for (year, value) in record.time_series.iter() {
        node.insert(year.to_string(), Value::from(value));
    }

    if let Some(cagr) = record.cagr {
        node.insert(CAGR_FIELD.to_string(), Value::String(format_cagr(cagr)));
    }

    if record.is_aggregated {
        node.insert(AGGREGATED_FIELD.to_string(), Value::Bool(true));
        if let Some(level) = record.aggregation_level {
            node.insert(LEVEL_FIELD.to_string(), Value::from(level));
        }
    }
}

/// Render an authored CAGR as a percentage string (`8.4` -> `"8.4%"`)
pub fn format_cagr(cagr: f64) -> String {
    format!("{}%", cagr)
}
