use crate::aggregator::ViewMode;
use crate::parser::DataType;
use std::path::PathBuf;

/// Arguments for the export command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ExportArgs {
    /// Converted dataset JSON
    pub input: PathBuf,

    /// Directory receiving value.json, volume.json, segmentation_analysis.json
    pub output_dir: PathBuf,
}

impl Default for ExportArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dataset.json"),
            output_dir: PathBuf::from("dashboard-data"),
        }
    }
}

/// Arguments for the kpi command
#[derive(Debug, Clone)]
pub struct KpiArgs {
    /// Converted dataset JSON
    pub input: PathBuf,

    /// Selected geographies (empty = all)
    pub geographies: Vec<String>,

    /// Target segment type (None = first in data)
    pub segment_type: Option<String>,

    pub data_type: DataType,

    pub view_mode: ViewMode,

    /// Year range used only when records carry no parsable years
    pub from_year: Option<i32>,
    pub to_year: Option<i32>,

    /// Output path for the JSON summary (optional)
    pub output: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for KpiArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("dataset.json"),
            geographies: Vec::new(),
            segment_type: None,
            data_type: DataType::Value,
            view_mode: ViewMode::Normal,
            from_year: None,
            to_year: None,
            output: None,
            print_summary: false,
        }
    }
}
