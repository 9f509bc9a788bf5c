//! Static data files for a deployable dashboard bundle.
//!
//! The packaging step (zip, static assets) lives elsewhere; this writes the
//! JSON it embeds:
//! - `value.json` and `volume.json` (record-driven trees)
//! - `segmentation_analysis.json` (dimension-driven structure)
//! - `manifest.json` (what was written, when, and how many diagnostics)

use super::json::{write_json, write_tree};
use crate::aggregator::{
    rebuild_structure_with_diagnostics, rebuild_tree_with_diagnostics, Diagnostics,
};
use crate::parser::{DataType, Dataset};
use crate::utils::config::{
    MANIFEST_FILE_NAME, SCHEMA_VERSION, SEGMENTATION_FILE_NAME, VALUE_FILE_NAME, VOLUME_FILE_NAME,
};
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Description of one export run, written as `manifest.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportManifest {
    /// Schema version for compatibility checking
    pub version: String,

    /// RFC 3339 timestamp of the export
    pub generated_at: String,

    pub files: Vec<ExportedFile>,

    pub value_records: usize,
    pub volume_records: usize,
    pub geographies: usize,

    /// Structural problems (depth, cycles) hit while rebuilding
    pub diagnostics: usize,
}

/// A file written by the export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFile {
    pub name: String,
    pub bytes: u64,
}

/// Write the dashboard data files into `output_dir`
///
/// **Public** - main entry point for export
///
/// `volume.json` is skipped when the dataset has no volume records.
///
/// # Errors
/// * `OutputError::InvalidPath` - `output_dir` exists and is not a directory
/// * `OutputError::WriteFailed` / `SerializationFailed` - from the JSON writer
pub fn export_dashboard(
    dataset: &Dataset,
    output_dir: impl AsRef<Path>,
) -> Result<ExportManifest, OutputError> {
    let output_dir = output_dir.as_ref();

    if output_dir.exists() && !output_dir.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Not a directory: {}",
            output_dir.display()
        )));
    }

    info!("Exporting dashboard data to: {}", output_dir.display());

    let mut diagnostics = Diagnostics::new();
    let mut files = Vec::new();

    let value_tree = rebuild_tree_with_diagnostics(&dataset.value, &mut diagnostics);
    let bytes = write_tree(&value_tree, output_dir.join(VALUE_FILE_NAME))?;
    files.push(ExportedFile {
        name: VALUE_FILE_NAME.to_string(),
        bytes,
    });

    if let Some(volume) = dataset.records(DataType::Volume) {
        let volume_tree = rebuild_tree_with_diagnostics(volume, &mut diagnostics);
        let bytes = write_tree(&volume_tree, output_dir.join(VOLUME_FILE_NAME))?;
        files.push(ExportedFile {
            name: VOLUME_FILE_NAME.to_string(),
            bytes,
        });
    } else {
        debug!("No volume records, skipping {}", VOLUME_FILE_NAME);
    }

    let structure = rebuild_structure_with_diagnostics(
        &dataset.all_geographies,
        &dataset.segment_dimensions,
        &mut diagnostics,
    );
    let bytes = write_tree(&structure, output_dir.join(SEGMENTATION_FILE_NAME))?;
    files.push(ExportedFile {
        name: SEGMENTATION_FILE_NAME.to_string(),
        bytes,
    });

    let manifest = ExportManifest {
        version: SCHEMA_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        files,
        value_records: dataset.value.len(),
        volume_records: dataset.volume.as_ref().map(|v| v.len()).unwrap_or(0),
        geographies: value_tree.len(),
        diagnostics: diagnostics.len(),
    };

    write_json(&manifest, output_dir.join(MANIFEST_FILE_NAME))?;

    info!(
        "Export complete: {} data files, {} diagnostics",
        manifest.files.len(),
        manifest.diagnostics
    );

    Ok(manifest)
}
