use crate::parser::{load_dataset, validate_dataset, DatasetReport};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a converted dataset file
pub fn validate_dataset_file(file_path: PathBuf) -> Result<DatasetReport> {
    println!("Validating dataset: {}", file_path.display());

    let dataset = load_dataset(&file_path)
        .with_context(|| format!("Failed to load dataset {}", file_path.display()))?;
    let report = validate_dataset(&dataset);

    println!("✓ Valid dataset JSON");
    println!("  Value records: {}", report.value_records);
    println!("  Volume records: {}", report.volume_records);
    println!("  Geographies: {}", report.geographies);
    println!("  Segment types: {}", report.segment_types);
    println!(
        "  Leaf / aggregated: {} / {}",
        report.leaf_records, report.aggregated_records
    );
    if let (Some(first), Some(last)) = (report.years.first(), report.years.last()) {
        println!("  Years: {}-{}", first, last);
    }

    if !report.is_clean() {
        println!("  Warnings:");
        if report.empty_geography_records > 0 {
            println!("    {} records without geography", report.empty_geography_records);
        }
        if report.empty_time_series_records > 0 {
            println!("    {} records without time series", report.empty_time_series_records);
        }
        for geography in &report.undeclared_geographies {
            println!("    undeclared geography: {}", geography);
        }
    }

    Ok(report)
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Dashboard Builder Export Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Tree Structure (value.json / volume.json):");
        println!("  <geography>: object");
        println!("    <segmentType>: object");
        println!("      <level1>..<levelN>: object  - One node per hierarchy label");
        println!("        <year>: number            - Value for that year");
        println!("        CAGR: string?             - Authored CAGR (e.g. '8.4%')");
        println!("        _aggregated: bool?        - Present on roll-up records");
        println!("        _level: number?           - Roll-up level (1 = top)");
        println!();
        println!("Structure (segmentation_analysis.json):");
        println!("  <geography> -> <segmentType> -> <item> -> <child> ... -> {{}}");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Dashboard Builder v{}", env!("CARGO_PKG_VERSION"));
    println!("Export Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Hierarchy reconstruction and KPI aggregation for market-sizing dashboards.");
}
