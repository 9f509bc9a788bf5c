//! Year-keyed time series with tolerant year lookup.
//!
//! Converted spreadsheets do not agree on how a year column is written:
//! `"2024"`, `" 2024"`, `"2024.0"` and `"2024E"` all show up. Keys are kept
//! as authored and matched to integer years on lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping from year key to numeric value for one record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, f64>")]
pub struct TimeSeries {
    values: BTreeMap<String, f64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from integer years
    pub fn from_years<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (i32, f64)>,
    {
        let values = entries
            .into_iter()
            .map(|(year, value)| (year.to_string(), value))
            .collect();
        Self { values }
    }

    /// Insert or overwrite a value under the key exactly as given
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over (key, value) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Look up the value for a year
    ///
    /// Tries the canonical key first, then any key that parses to the same year.
    pub fn value_for_year(&self, year: i32) -> Option<f64> {
        if let Some(value) = self.values.get(&year.to_string()) {
            return Some(*value);
        }

        self.values
            .iter()
            .find(|(key, _)| parse_year(key) == Some(year))
            .map(|(_, value)| *value)
    }

    /// Distinct parsable years, ascending
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.values.keys().filter_map(|k| parse_year(k)).collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

impl From<BTreeMap<String, Value>> for TimeSeries {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| coerce_number(&value).map(|v| (key, v)))
            .collect();
        Self { values }
    }
}

impl From<TimeSeries> for BTreeMap<String, f64> {
    fn from(series: TimeSeries) -> Self {
        series.values
    }
}

/// Parse the leading integer of a year key
///
/// Whitespace is trimmed and trailing text ignored, so `"2024E"` and
/// `"2024.0"` both read as 2024. Keys without leading digits yield `None`.
pub fn parse_year(key: &str) -> Option<i32> {
    let trimmed = key.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if end == 0 {
        return None;
    }

    digits[..end].parse::<i32>().ok().map(|year| sign * year)
}

/// Accept JSON numbers and numeric strings; everything else is dropped
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
