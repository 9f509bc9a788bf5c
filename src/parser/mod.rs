//! Dataset schema and loading.
//!
//! This module handles:
//! - The flat record model produced by the spreadsheet converter
//! - Tolerant year-keyed time series
//! - Reading and validating converter output

pub mod dataset;
pub mod schema;
pub mod time_series;

// Re-export main types
pub use dataset::{available_years, load_dataset, parse_dataset, validate_dataset, DatasetReport};
pub use schema::{DataType, Dataset, Metadata, SegmentDimension, SegmentHierarchy, SegmentRecord};
pub use time_series::{parse_year, TimeSeries};
