//! Hierarchy reconstruction and KPI aggregation over flat segment records.
//!
//! This module transforms the converter's flat record list into:
//! - The nested export tree (geography -> segment type -> levels -> years)
//! - The structural segmentation tree (from dimension definitions)
//! - Roll-up KPIs over a de-duplicated record selection
//!
//! Everything here is a pure function of its inputs. Malformed data degrades
//! and is reported through [`Diagnostics`]; nothing panics or errors.

pub mod diagnostics;
pub mod kpi;
pub mod selection;
pub mod structure_builder;
pub mod tree_builder;

// Re-export main types and functions
pub use diagnostics::{Diagnostic, Diagnostics};
pub use kpi::{compute_kpis, KpiFilters, KpiSummary, ViewMode, YearRange};
pub use selection::{select_records, Selection};
pub use structure_builder::{
    build_dimension_tree, rebuild_structure, rebuild_structure_with_diagnostics,
};
pub use tree_builder::{rebuild_tree, rebuild_tree_with_diagnostics, Tree};
