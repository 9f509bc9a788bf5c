//! Dataset schema definitions.
//!
//! This module defines the flat record shape produced by the
//! spreadsheet-to-JSON converter and consumed by the aggregator.
//! Wire names are camelCase to match the converter's output.

use super::time_series::TimeSeries;
use crate::utils::config::{DEFAULT_CURRENCY, DEFAULT_VALUE_UNIT, DEFAULT_VOLUME_UNIT};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One row of the flat dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentRecord {
    /// Country or region name
    pub geography: String,

    /// Segmentation dimension this row belongs to (e.g. "By Product")
    pub segment_type: String,

    /// Ordered hierarchy labels (level1, level2, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub segment_hierarchy: SegmentHierarchy,

    /// Year -> value series
    #[serde(default, deserialize_with = "null_as_default")]
    pub time_series: TimeSeries,

    /// Authored CAGR percentage, if any
    #[serde(
        default,
        deserialize_with = "lenient_percentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub cagr: Option<f64>,

    /// True for roll-up rows, false for leaf rows
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_aggregated: bool,

    /// Roll-up depth (1 = top-level total) when aggregated
    #[serde(
        default,
        deserialize_with = "lenient_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub aggregation_level: Option<i64>,
}

impl SegmentRecord {
    /// Create a leaf record with an empty hierarchy and series
    pub fn new(geography: impl Into<String>, segment_type: impl Into<String>) -> Self {
        Self {
            geography: geography.into(),
            segment_type: segment_type.into(),
            segment_hierarchy: SegmentHierarchy::default(),
            time_series: TimeSeries::default(),
            cagr: None,
            is_aggregated: false,
            aggregation_level: None,
        }
    }

    pub fn with_hierarchy<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segment_hierarchy = SegmentHierarchy::from_labels(labels);
        self
    }

    pub fn with_time_series(mut self, time_series: TimeSeries) -> Self {
        self.time_series = time_series;
        self
    }

    pub fn with_cagr(mut self, cagr: f64) -> Self {
        self.cagr = Some(cagr);
        self
    }

    /// Mark as a roll-up record at the given level
    pub fn aggregated(mut self, level: Option<i64>) -> Self {
        self.is_aggregated = true;
        self.aggregation_level = level;
        self
    }
}

/// Read an explicit `null` the same as a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keyed map where the map itself or any entry may be `null`
fn null_entries_as_default<'de, D, V>(deserializer: D) -> Result<BTreeMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Default + Deserialize<'de>,
{
    let raw = Option::<BTreeMap<String, Option<V>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Accept `8.4`, `"8.4"` and `"8.4%"`; anything else reads as absent
fn lenient_percentage<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

/// Accept integer levels, whole floats (`1.0`) and numeric strings
fn lenient_level<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    let as_float = match raw {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(level) => return Ok(Some(level)),
            None => n.as_f64(),
        },
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(as_float.filter(|v| v.is_finite() && v.fract() == 0.0).map(|v| v as i64))
}

/// Hierarchy labels of a record, indexed by level (level1 at index 0)
///
/// Deserialized from an object of `levelN` keys. Any N is accepted so a
/// malformed input deeper than the usual five levels is kept intact and
/// left to the depth guards downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Option<Value>>",
    into = "BTreeMap<String, String>"
)]
pub struct SegmentHierarchy {
    levels: Vec<Option<String>>,
}

impl SegmentHierarchy {
    /// Build from positional labels; empty labels become absent levels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels = labels.into_iter().map(|l| normalize_label(l.into())).collect();
        Self { levels }
    }

    /// Present labels in level order, absent/blank levels skipped
    pub fn levels(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().filter_map(|l| l.as_deref())
    }

    /// Number of present labels
    pub fn depth(&self) -> usize {
        self.levels().count()
    }
}

impl From<BTreeMap<String, Option<Value>>> for SegmentHierarchy {
    fn from(raw: BTreeMap<String, Option<Value>>) -> Self {
        let mut levels: Vec<Option<String>> = Vec::new();

        for (key, value) in raw {
            let Some(index) = key
                .strip_prefix("level")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n >= 1)
            else {
                continue;
            };

            let label = match value {
                Some(Value::String(s)) => normalize_label(s),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            if levels.len() < index {
                levels.resize(index, None);
            }
            levels[index - 1] = label;
        }

        Self { levels }
    }
}

impl From<SegmentHierarchy> for BTreeMap<String, String> {
    fn from(hierarchy: SegmentHierarchy) -> Self {
        hierarchy
            .levels
            .into_iter()
            .enumerate()
            .filter_map(|(i, label)| label.map(|l| (format!("level{}", i + 1), l)))
            .collect()
    }
}

fn normalize_label(label: String) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Definition of one segmentation dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentDimension {
    /// Flat list of item labels
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<String>,

    /// Parent item -> ordered child items (may be cyclic in malformed input)
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub hierarchy: BTreeMap<String, Vec<String>>,
}

/// Dataset-level metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_value_unit")]
    pub value_unit: String,

    #[serde(default = "default_volume_unit")]
    pub volume_unit: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            value_unit: default_value_unit(),
            volume_unit: default_volume_unit(),
        }
    }
}

impl Metadata {
    /// Unit label declared for a data type
    pub fn unit_for(&self, data_type: DataType) -> &str {
        match data_type {
            DataType::Value => &self.value_unit,
            DataType::Volume => &self.volume_unit,
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_value_unit() -> String {
    DEFAULT_VALUE_UNIT.to_string()
}

fn default_volume_unit() -> String {
    DEFAULT_VOLUME_UNIT.to_string()
}

/// Complete converted dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Value records
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: Vec<SegmentRecord>,

    /// Volume records (optional in the converter output)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<Vec<SegmentRecord>>,

    /// Declared geography universe
    #[serde(default, deserialize_with = "null_as_default")]
    pub all_geographies: Vec<String>,

    /// Segment type name -> dimension definition
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub segment_dimensions: BTreeMap<String, SegmentDimension>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,
}

impl Dataset {
    /// Records for a data type, or `None` when absent or empty
    pub fn records(&self, data_type: DataType) -> Option<&[SegmentRecord]> {
        let records = match data_type {
            DataType::Value => Some(self.value.as_slice()),
            DataType::Volume => self.volume.as_deref(),
        };
        records.filter(|r| !r.is_empty())
    }
}

/// Which of the two parallel collections to read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Value,
    Volume,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Value => write!(f, "value"),
            DataType::Volume => write!(f, "volume"),
        }
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(DataType::Value),
            "volume" => Ok(DataType::Volume),
            other => Err(format!("Unknown data type '{}' (expected value or volume)", other)),
        }
    }
}
