//! JSON output writer.
//!
//! Writes trees and KPI summaries to JSON files, pretty-printed with
//! 2-space indentation.

use crate::aggregator::{KpiSummary, Tree};
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Write any serializable value as pretty JSON
///
/// **Public** - shared by the tree, KPI and export writers
///
/// # Returns
/// Size of the written file in bytes
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_json<T>(value: &T, output_path: impl AsRef<Path>) -> Result<u64, OutputError>
where
    T: Serialize + ?Sized,
{
    let output_path = output_path.as_ref();

    info!("Writing JSON to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, value).map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;
    drop(writer);

    let size = calculate_file_size(output_path);
    info!("Written successfully ({} bytes)", size);

    Ok(size)
}

/// Write a rebuilt tree (`value.json`, `volume.json`, `segmentation_analysis.json`)
pub fn write_tree(tree: &Tree, output_path: impl AsRef<Path>) -> Result<u64, OutputError> {
    write_json(tree, output_path)
}

/// Write a KPI summary for the display layer
pub fn write_kpi_summary(
    summary: &KpiSummary,
    output_path: impl AsRef<Path>,
) -> Result<u64, OutputError> {
    write_json(summary, output_path)
}

/// Serialize a tree to a pretty JSON string
pub fn tree_to_string(tree: &Tree) -> Result<String, OutputError> {
    serde_json::to_string_pretty(tree).map_err(OutputError::SerializationFailed)
}

/// Read a JSON file back into a typed value
///
/// **Public** - useful for validation and testing
pub fn read_json<T: DeserializeOwned>(input_path: impl AsRef<Path>) -> Result<T, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading JSON from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let value = serde_json::from_reader(BufReader::new(file))
        .map_err(OutputError::SerializationFailed)?;

    Ok(value)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
