//! Dashboard Builder
//!
//! Hierarchy reconstruction and KPI aggregation for market-sizing
//! dashboards built from uploaded spreadsheets.
//!
//! The core takes the flat records produced by a spreadsheet converter and:
//! - rebuilds the nested `geography -> segment type -> levels -> years`
//!   tree the dashboard exports as JSON
//! - computes market-size KPIs over a de-duplicated record selection
//!
//! ## Getting Started
//!
//! ```bash
//! dashboard-builder export --input dataset.json --output-dir dist/data
//! dashboard-builder kpi --input dataset.json --mode geography --summary
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
