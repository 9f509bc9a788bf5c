//! Market-size KPIs over a filtered, de-duplicated record set.
//!
//! Values are summed at the first and last year of the first selected
//! record's series. No unit conversion is applied: the figures stay in the
//! dataset's declared unit (e.g. "Million").

use super::selection::{select_records, Selection};
use crate::parser::{DataType, Dataset, SegmentRecord};
use crate::utils::config::{ALL_GEOGRAPHIES_LABEL, DEFAULT_END_YEAR, DEFAULT_START_YEAR};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How totals are grouped for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Normal,
    GeographyMode,
    Matrix,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Normal => write!(f, "normal"),
            ViewMode::GeographyMode => write!(f, "geography-mode"),
            ViewMode::Matrix => write!(f, "matrix"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(ViewMode::Normal),
            "geography" | "geography-mode" => Ok(ViewMode::GeographyMode),
            "matrix" => Ok(ViewMode::Matrix),
            other => Err(format!(
                "Unknown view mode '{}' (expected normal, geography or matrix)",
                other
            )),
        }
    }
}

/// Inclusive year range chosen in the filter panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            start: DEFAULT_START_YEAR,
            end: DEFAULT_END_YEAR,
        }
    }
}

/// Filter selection supplied by the UI state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiFilters {
    /// Selected geographies; empty means all
    pub geographies: Vec<String>,

    /// Target segment type; `None` means the first one in the data
    pub segment_type: Option<String>,

    pub data_type: DataType,

    /// Only used when the selected records carry no parsable years
    pub year_range: YearRange,

    pub view_mode: ViewMode,
}

/// KPI card figures plus labels describing what was actually summed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub market_size_start: f64,
    pub market_size_end: f64,
    pub start_year: i32,
    pub end_year: i32,

    /// Compound annual growth rate, percent
    pub cagr: f64,

    pub absolute_growth: f64,

    /// Growth over the whole range, percent
    pub growth_percentage: f64,

    pub currency: String,
    pub unit: String,
    pub data_type: DataType,
    pub view_mode: ViewMode,

    /// Selected geographies, or "All Geographies" when none or after fallback
    pub geography_label: String,

    pub segment_type_label: String,

    /// Distinct geographies in the summed records, input order
    pub geographies_used: Vec<String>,

    pub records_used: usize,
}

impl KpiSummary {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and the CLI
    pub fn summary(&self) -> String {
        format!(
            "{} | {} | {}: {:.2} -> {}: {:.2} {} {} | CAGR: {:.2}% | Growth: {:.2}%",
            self.geography_label,
            self.segment_type_label,
            self.start_year,
            self.market_size_start,
            self.end_year,
            self.market_size_end,
            self.currency,
            self.unit,
            self.cagr,
            self.growth_percentage
        )
    }
}

/// Compute KPIs for a filter selection
///
/// **Public** - main entry point for KPI aggregation
///
/// # Returns
/// `None` when no record can be aggregated: empty dataset, unknown segment
/// type, or no match even after the all-geographies fallback. A summary
/// is never zero-filled to stand in for missing data.
pub fn compute_kpis(dataset: &Dataset, filters: &KpiFilters) -> Option<KpiSummary> {
    let Some(records) = dataset.records(filters.data_type) else {
        debug!("No {} records available", filters.data_type);
        return None;
    };

    let segment_type = resolve_segment_type(records, filters.segment_type.as_deref())?;

    let selection = select_records(records, &filters.geographies, &segment_type, filters.view_mode);
    if selection.is_empty() {
        debug!(
            "No records selected for segment type '{}' ({} mode)",
            segment_type, filters.view_mode
        );
        return None;
    }

    let (start_year, end_year) = year_bounds(selection.records[0], filters.year_range);

    let market_size_start = sum_for_year(&selection.records, start_year);
    let market_size_end = sum_for_year(&selection.records, end_year);

    let cagr = compound_growth_rate(market_size_start, market_size_end, start_year, end_year);
    let absolute_growth = market_size_end - market_size_start;
    let growth_percentage = if market_size_start != 0.0 {
        absolute_growth / market_size_start * 100.0
    } else {
        0.0
    };

    let summary = KpiSummary {
        market_size_start,
        market_size_end,
        start_year,
        end_year,
        cagr,
        absolute_growth,
        growth_percentage,
        currency: dataset.metadata.currency.clone(),
        unit: dataset.metadata.unit_for(filters.data_type).to_string(),
        data_type: filters.data_type,
        view_mode: filters.view_mode,
        geography_label: geography_label(&filters.geographies, &selection),
        segment_type_label: segment_type_label(&segment_type, &selection, filters.view_mode),
        geographies_used: distinct_in_order(selection.records.iter().map(|r| r.geography.as_str())),
        records_used: selection.records.len(),
    };

    debug!("KPI: {}", summary.summary());

    Some(summary)
}

/// Explicit segment type, or the first one in input order
fn resolve_segment_type(records: &[SegmentRecord], requested: Option<&str>) -> Option<String> {
    match requested.map(str::trim).filter(|s| !s.is_empty()) {
        Some(segment_type) => Some(segment_type.to_string()),
        None => records.first().map(|r| r.segment_type.clone()),
    }
}

/// Min and max parsable year of a record, or the filter range when it has none
pub fn year_bounds(record: &SegmentRecord, fallback: YearRange) -> (i32, i32) {
    let years = record.time_series.years();
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (fallback.start, fallback.end),
    }
}

/// Sum the value at `year` across records; missing years contribute zero
pub fn sum_for_year(records: &[&SegmentRecord], year: i32) -> f64 {
    records
        .iter()
        .map(|r| r.time_series.value_for_year(year).unwrap_or(0.0))
        .sum()
}

/// CAGR in percent
///
/// Zero when the start is not positive, the range is empty, or the ratio
/// has no real root (negative end value).
pub fn compound_growth_rate(start: f64, end: f64, start_year: i32, end_year: i32) -> f64 {
    if start <= 0.0 || end_year <= start_year {
        return 0.0;
    }

    let periods = f64::from(end_year - start_year);
    let rate = ((end / start).powf(1.0 / periods) - 1.0) * 100.0;

    if rate.is_finite() {
        rate
    } else {
        0.0
    }
}

fn geography_label(selected: &[String], selection: &Selection<'_>) -> String {
    if selected.is_empty() || selection.geography_fallback {
        ALL_GEOGRAPHIES_LABEL.to_string()
    } else {
        selected.join(", ")
    }
}

fn segment_type_label(target: &str, selection: &Selection<'_>, view_mode: ViewMode) -> String {
    if view_mode == ViewMode::GeographyMode {
        distinct_in_order(selection.records.iter().map(|r| r.segment_type.as_str())).join(", ")
    } else {
        target.to_string()
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
