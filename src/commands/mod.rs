//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod export;
pub mod kpi;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use export::{execute_export, validate_export_args};
pub use kpi::{build_filters, execute_kpi, validate_kpi_args};
pub use models::{ExportArgs, KpiArgs};
pub use utils::{display_schema, display_version, validate_dataset_file};
