//! Loading and validation of converter output.
//!
//! The spreadsheet-to-JSON converter writes a single dataset document.
//! Loading only checks the document shape; record-level problems are
//! tolerated and surfaced by [`validate_dataset`] as counts.

use super::schema::{Dataset, SegmentRecord};
use crate::utils::error::DatasetError;
use log::{debug, warn};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a dataset from a JSON file
///
/// **Public** - main entry point for reading converter output
///
/// # Errors
/// * `DatasetError::ReadFailed` - file cannot be opened
/// * `DatasetError::JsonError` - not valid JSON or wrong field types
/// * `DatasetError::InvalidFormat` - top level is not an object
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let path = path.as_ref();
    debug!("Reading dataset from: {}", path.display());

    let file = File::open(path)?;
    let raw: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

    parse_dataset(raw)
}

/// Parse a dataset from an already-decoded JSON value
pub fn parse_dataset(raw: serde_json::Value) -> Result<Dataset, DatasetError> {
    if !raw.is_object() {
        return Err(DatasetError::InvalidFormat(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    let dataset: Dataset = serde_json::from_value(raw)?;

    debug!(
        "Dataset loaded: {} value records, {} volume records, {} segment dimensions",
        dataset.value.len(),
        dataset.volume.as_ref().map(|v| v.len()).unwrap_or(0),
        dataset.segment_dimensions.len()
    );

    Ok(dataset)
}

/// Shape report for one dataset
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetReport {
    pub value_records: usize,
    pub volume_records: usize,
    pub geographies: usize,
    pub segment_types: usize,
    pub aggregated_records: usize,
    pub leaf_records: usize,
    pub empty_geography_records: usize,
    pub empty_time_series_records: usize,

    /// Geographies used by records but missing from `allGeographies`
    pub undeclared_geographies: Vec<String>,

    /// Years seen across value records
    pub years: Vec<i32>,
}

impl DatasetReport {
    /// True when nothing suspicious was counted
    pub fn is_clean(&self) -> bool {
        self.empty_geography_records == 0
            && self.empty_time_series_records == 0
            && self.undeclared_geographies.is_empty()
    }
}

/// Count structural properties of a dataset
///
/// **Public** - never fails; problems are reported, not rejected
pub fn validate_dataset(dataset: &Dataset) -> DatasetReport {
    let volume: &[SegmentRecord] = dataset.volume.as_deref().unwrap_or(&[]);
    let all_records = || dataset.value.iter().chain(volume.iter());

    let declared: HashSet<&str> = dataset.all_geographies.iter().map(String::as_str).collect();

    let mut geographies = BTreeSet::new();
    let mut segment_types = BTreeSet::new();
    let mut undeclared = BTreeSet::new();
    let mut report = DatasetReport {
        value_records: dataset.value.len(),
        volume_records: volume.len(),
        years: available_years(&dataset.value),
        ..Default::default()
    };

    for record in all_records() {
        if record.geography.trim().is_empty() {
            report.empty_geography_records += 1;
        } else {
            geographies.insert(record.geography.as_str());
            if !declared.is_empty() && !declared.contains(record.geography.as_str()) {
                undeclared.insert(record.geography.clone());
            }
        }

        segment_types.insert(record.segment_type.as_str());

        if record.is_aggregated {
            report.aggregated_records += 1;
        } else {
            report.leaf_records += 1;
        }

        if record.time_series.is_empty() {
            report.empty_time_series_records += 1;
        }
    }

    report.geographies = geographies.len();
    report.segment_types = segment_types.len();
    report.undeclared_geographies = undeclared.into_iter().collect();

    if !report.undeclared_geographies.is_empty() {
        warn!(
            "{} geographies appear in records but not in allGeographies",
            report.undeclared_geographies.len()
        );
    }

    report
}

/// Distinct parsable years across records, ascending
pub fn available_years(records: &[SegmentRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = records
        .iter()
        .flat_map(|r| r.time_series.years())
        .collect();
    years.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::time_series::TimeSeries;
    use serde_json::json;

    #[test]
    fn test_parse_dataset_rejects_non_object() {
        let result = parse_dataset(json!([1, 2, 3]));
        assert!(matches!(result, Err(DatasetError::InvalidFormat(_))));
    }

    #[test]
    fn test_validate_counts() {
        let dataset = Dataset {
            value: vec![
                SegmentRecord::new("India", "By Product")
                    .with_time_series(TimeSeries::from_years([(2024, 1.0), (2030, 2.0)])),
                SegmentRecord::new("Peru", "By Product").aggregated(Some(1)),
                SegmentRecord::new("", "By Application")
                    .with_time_series(TimeSeries::from_years([(2025, 3.0)])),
            ],
            all_geographies: vec!["India".to_string()],
            ..Default::default()
        };

        let report = validate_dataset(&dataset);

        assert_eq!(report.value_records, 3);
        assert_eq!(report.geographies, 2);
        assert_eq!(report.segment_types, 2);
        assert_eq!(report.aggregated_records, 1);
        assert_eq!(report.leaf_records, 2);
        assert_eq!(report.empty_geography_records, 1);
        assert_eq!(report.empty_time_series_records, 1);
        assert_eq!(report.undeclared_geographies, vec!["Peru".to_string()]);
        assert_eq!(report.years, vec![2024, 2025, 2030]);
        assert!(!report.is_clean());
    }
}
