//! Output writers for rebuilt trees, KPI summaries and export bundles.
//!
//! This module handles writing data to disk:
//! - Pretty JSON trees and summaries
//! - The dashboard data files plus export manifest

pub mod export;
pub mod json;

// Re-export main functions
pub use export::{export_dashboard, ExportManifest, ExportedFile};
pub use json::{read_json, tree_to_string, write_json, write_kpi_summary, write_tree};
