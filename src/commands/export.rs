//! Export command implementation.
//!
//! The export command:
//! 1. Loads the converted dataset
//! 2. Rebuilds value/volume trees and the segmentation structure
//! 3. Writes the JSON files and manifest

use super::models::ExportArgs;
use crate::output::{export_dashboard, ExportManifest};
use crate::parser::load_dataset;
use anyhow::{bail, Context, Result};
use log::info;
use std::time::Instant;

/// Execute the export command
///
/// **Public** - main entry point called from main.rs
///
/// # Example
/// ```ignore
/// let args = ExportArgs {
///     input: PathBuf::from("dataset.json"),
///     output_dir: PathBuf::from("dist/data"),
/// };
/// execute_export(args)?;
/// ```
pub fn execute_export(args: ExportArgs) -> Result<ExportManifest> {
    let start_time = Instant::now();

    info!("Step 1/2: Loading dataset from {}", args.input.display());
    let dataset = load_dataset(&args.input)
        .with_context(|| format!("Failed to load dataset {}", args.input.display()))?;

    info!("Step 2/2: Writing dashboard data to {}", args.output_dir.display());
    let manifest = export_dashboard(&dataset, &args.output_dir)
        .context("Failed to write dashboard data")?;

    for file in &manifest.files {
        info!("✓ {} ({} bytes)", file.name, file.bytes);
    }

    if manifest.diagnostics > 0 {
        info!(
            "{} structural diagnostics raised (run with --verbose for details)",
            manifest.diagnostics
        );
    }

    info!("Export completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(manifest)
}

/// Validate export arguments before doing any work
pub fn validate_export_args(args: &ExportArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        bail!("Dataset path cannot be empty");
    }

    if args.output_dir.as_os_str().is_empty() {
        bail!("Output directory cannot be empty");
    }

    if args.output_dir.is_file() {
        bail!("Output path is a file: {}", args.output_dir.display());
    }

    Ok(())
}
