//! Dashboard Builder CLI
//!
//! Rebuilds export trees and computes KPIs from converted
//! market-sizing datasets.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard_builder::aggregator::ViewMode;
use dashboard_builder::commands::{
    display_schema, display_version, execute_export, execute_kpi, validate_dataset_file,
    validate_export_args, validate_kpi_args, ExportArgs, KpiArgs,
};
use dashboard_builder::parser::DataType;
use env_logger::Env;
use std::path::PathBuf;

/// Dashboard Builder - market-sizing data aggregation
#[derive(Parser, Debug)]
#[command(name = "dashboard-builder")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Write value.json, volume.json and segmentation_analysis.json
    Export {
        /// Converted dataset JSON
        #[arg(short, long, env = "DASHBOARD_DATASET")]
        input: PathBuf,

        /// Output directory for the data files
        #[arg(short, long, default_value = "dashboard-data")]
        output_dir: PathBuf,
    },

    /// Compute market-size KPIs for a filter selection
    Kpi {
        /// Converted dataset JSON
        #[arg(short, long, env = "DASHBOARD_DATASET")]
        input: PathBuf,

        /// Geography to include (repeatable; omit for all)
        #[arg(short, long = "geography")]
        geographies: Vec<String>,

        /// Segment type (defaults to the first one in the data)
        #[arg(short, long)]
        segment_type: Option<String>,

        /// Data type: value or volume
        #[arg(short, long, default_value = "value")]
        data_type: DataType,

        /// View mode: normal, geography or matrix
        #[arg(short, long, default_value = "normal")]
        mode: ViewMode,

        /// First year, used when records carry no years
        #[arg(long)]
        from: Option<i32>,

        /// Last year, used when records carry no years
        #[arg(long)]
        to: Option<i32>,

        /// Output path for the JSON summary
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a converted dataset file
    Validate {
        /// Path to dataset JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display export schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Export { input, output_dir } => {
            let args = ExportArgs { input, output_dir };

            validate_export_args(&args)?;
            execute_export(args)?;
        }

        Commands::Kpi {
            input,
            geographies,
            segment_type,
            data_type,
            mode,
            from,
            to,
            output,
            summary,
        } => {
            let args = KpiArgs {
                input,
                geographies,
                segment_type,
                data_type,
                view_mode: mode,
                from_year: from,
                to_year: to,
                output,
                print_summary: summary,
            };

            validate_kpi_args(&args)?;
            execute_kpi(args)?;
        }

        Commands::Validate { file } => {
            validate_dataset_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
