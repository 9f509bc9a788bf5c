//! KPI command implementation.

use super::models::KpiArgs;
use crate::aggregator::{compute_kpis, KpiFilters, KpiSummary, YearRange};
use crate::output::write_kpi_summary;
use crate::parser::load_dataset;
use anyhow::{bail, Context, Result};
use log::{debug, info};

/// Execute the kpi command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The computed summary, or `None` when no data matches the filters.
/// No-data is a normal outcome, not an error.
pub fn execute_kpi(args: KpiArgs) -> Result<Option<KpiSummary>> {
    let dataset = load_dataset(&args.input)
        .with_context(|| format!("Failed to load dataset {}", args.input.display()))?;

    let filters = build_filters(&args);
    debug!("KPI filters: {:?}", filters);

    let Some(summary) = compute_kpis(&dataset, &filters) else {
        debug!("compute_kpis returned no summary");
        println!("No KPI data available");
        return Ok(None);
    };

    if let Some(output) = &args.output {
        write_kpi_summary(&summary, output).context("Failed to write KPI summary")?;
        info!("✓ KPI summary written to: {}", output.display());
    }

    if args.print_summary {
        print_summary(&summary);
    }

    Ok(Some(summary))
}

/// Validate kpi arguments before doing any work
pub fn validate_kpi_args(args: &KpiArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        bail!("Dataset path cannot be empty");
    }

    if let (Some(from), Some(to)) = (args.from_year, args.to_year) {
        if from > to {
            bail!("Start year {} is after end year {}", from, to);
        }
    }

    Ok(())
}

/// Translate CLI arguments into aggregator filters
pub fn build_filters(args: &KpiArgs) -> KpiFilters {
    let defaults = YearRange::default();

    KpiFilters {
        geographies: args.geographies.clone(),
        segment_type: args.segment_type.clone(),
        data_type: args.data_type,
        year_range: YearRange {
            start: args.from_year.unwrap_or(defaults.start),
            end: args.to_year.unwrap_or(defaults.end),
        },
        view_mode: args.view_mode,
    }
}

fn print_summary(summary: &KpiSummary) {
    println!("\n{}", "=".repeat(80));
    println!("KPI SUMMARY");
    println!("{}", "=".repeat(80));
    println!("Geographies:   {}", summary.geography_label);
    println!("Segment type:  {}", summary.segment_type_label);
    println!("Data type:     {} ({} mode)", summary.data_type, summary.view_mode);
    println!(
        "Market size:   {:.2} ({}) -> {:.2} ({}) {} {}",
        summary.market_size_start,
        summary.start_year,
        summary.market_size_end,
        summary.end_year,
        summary.currency,
        summary.unit
    );
    println!("CAGR:          {:.2}%", summary.cagr);
    println!(
        "Growth:        {:.2} ({:.2}%)",
        summary.absolute_growth, summary.growth_percentage
    );
    println!("Records used:  {}", summary.records_used);
    println!("{}", "=".repeat(80));
}
