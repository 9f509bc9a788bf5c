//! Pick the non-overlapping set of records that represents a true total.
//!
//! A dataset mixes leaf rows with pre-computed roll-ups, and a geography is
//! usually described once per segment type. Summing everything that matches
//! a filter would count the same market several times. The rules here choose
//! exactly one layer per total:
//!
//! - leaf rows win over roll-ups
//! - among roll-ups, level 1 wins, then the lowest level present
//! - in geography mode each geography contributes one segment type only,
//!   the first one appearing in input order
//!
//! The geography-mode tie-break is arbitrary but stable. Nothing about the
//! first segment type makes it a better total than the others.

use super::kpi::ViewMode;
use crate::parser::SegmentRecord;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

/// Records chosen for one KPI computation
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    /// Records to sum, in input order
    pub records: Vec<&'a SegmentRecord>,

    /// True when the geography filter was dropped to find data
    pub geography_fallback: bool,
}

impl Selection<'_> {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Select the records to aggregate for a filter
///
/// **Public** - encodes the double-counting policy
///
/// # Arguments
/// * `records` - Flat records of one data type
/// * `geographies` - Selected geographies; empty means all
/// * `segment_type` - Target segment type (ignored for filtering in geography mode)
/// * `view_mode` - Normal, matrix, or geography mode
///
/// When the selected geographies yield nothing, the selection is retried
/// across all geographies and `geography_fallback` is set.
pub fn select_records<'a>(
    records: &'a [SegmentRecord],
    geographies: &[String],
    segment_type: &str,
    view_mode: ViewMode,
) -> Selection<'a> {
    let selected = select_once(records, geographies, segment_type, view_mode);

    if selected.is_empty() && !geographies.is_empty() {
        debug!(
            "No records for {} selected geographies, retrying across all geographies",
            geographies.len()
        );
        let fallback = select_once(records, &[], segment_type, view_mode);
        if !fallback.is_empty() {
            return Selection {
                records: fallback,
                geography_fallback: true,
            };
        }
    }

    Selection {
        records: selected,
        geography_fallback: false,
    }
}

/// One pass of filtering plus layer selection
fn select_once<'a>(
    records: &'a [SegmentRecord],
    geographies: &[String],
    segment_type: &str,
    view_mode: ViewMode,
) -> Vec<&'a SegmentRecord> {
    let geography_mode = view_mode == ViewMode::GeographyMode;

    let candidates: Vec<&SegmentRecord> = records
        .iter()
        .filter(|r| geographies.is_empty() || geographies.contains(&r.geography))
        .filter(|r| geography_mode || r.segment_type == segment_type)
        .collect();

    debug!(
        "{} candidate records after filtering (geography mode: {})",
        candidates.len(),
        geography_mode
    );

    if geography_mode {
        select_per_geography(&candidates)
    } else {
        select_non_overlapping(&candidates)
    }
}

/// Geography mode: one segment type per geography, most granular layer of it
fn select_per_geography<'a>(candidates: &[&'a SegmentRecord]) -> Vec<&'a SegmentRecord> {
    let mut selected = Vec::new();

    for (geography, geo_records) in group_in_order(candidates, |r| r.geography.as_str()) {
        let by_type = group_in_order(&geo_records, |r| r.segment_type.as_str());

        // First segment type by input order
        let Some((segment_type, type_records)) = by_type.into_iter().next() else {
            continue;
        };

        let chosen = most_granular_layer(&type_records);
        debug!(
            "Geography '{}': using {} records of '{}'",
            geography,
            chosen.len(),
            segment_type
        );
        selected.extend(chosen);
    }

    selected
}

/// Leaf rows if any, else level-1 roll-ups, else every roll-up at the lowest level
fn most_granular_layer<'a>(records: &[&'a SegmentRecord]) -> Vec<&'a SegmentRecord> {
    let leaves = leaf_records(records);
    if !leaves.is_empty() {
        return leaves;
    }

    let top_level = level_one_records(records);
    if !top_level.is_empty() {
        return top_level;
    }

    let Some(min_rank) = records.iter().map(|r| level_rank(r)).min() else {
        return Vec::new();
    };

    records
        .iter()
        .copied()
        .filter(|r| level_rank(r) == min_rank)
        .collect()
}

/// Normal/matrix mode: leaf rows if any, else level-1 roll-ups,
/// else the lowest-level roll-up per (geography, segment type)
fn select_non_overlapping<'a>(candidates: &[&'a SegmentRecord]) -> Vec<&'a SegmentRecord> {
    let leaves = leaf_records(candidates);
    if !leaves.is_empty() {
        return leaves;
    }

    let top_level = level_one_records(candidates);
    if !top_level.is_empty() {
        return top_level;
    }

    group_in_order(candidates, |r| (r.geography.as_str(), r.segment_type.as_str()))
        .into_iter()
        .filter_map(|(_, group)| {
            // min_by_key keeps the first of equal ranks
            group.into_iter().min_by_key(|r| level_rank(r))
        })
        .collect()
}

fn leaf_records<'a>(records: &[&'a SegmentRecord]) -> Vec<&'a SegmentRecord> {
    records.iter().copied().filter(|r| !r.is_aggregated).collect()
}

fn level_one_records<'a>(records: &[&'a SegmentRecord]) -> Vec<&'a SegmentRecord> {
    records
        .iter()
        .copied()
        .filter(|r| r.aggregation_level == Some(1))
        .collect()
}

/// Sort key for roll-up level; a missing level ranks after every real one
fn level_rank(record: &SegmentRecord) -> i64 {
    record.aggregation_level.unwrap_or(i64::MAX)
}

/// Group records by key, keeping groups and members in first-seen order
fn group_in_order<'a, K, F>(
    records: &[&'a SegmentRecord],
    key: F,
) -> Vec<(K, Vec<&'a SegmentRecord>)>
where
    K: Eq + Hash + Copy,
    F: Fn(&'a SegmentRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a SegmentRecord>)> = Vec::new();

    for record in records.iter().copied() {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(k, groups.len());
                groups.push((k, vec![record]));
            }
        }
    }

    groups
}
