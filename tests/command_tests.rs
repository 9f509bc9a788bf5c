use dashboard_builder::aggregator::ViewMode;
use dashboard_builder::commands::{
    build_filters, execute_export, execute_kpi, validate_export_args, validate_kpi_args,
    ExportArgs, KpiArgs,
};
use dashboard_builder::output::read_json;
use dashboard_builder::parser::DataType;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

fn write_dataset(dir: &Path) -> PathBuf {
    let dataset = json!({
        "value": [
            {
                "geography": "India",
                "segmentType": "By Product",
                "segmentHierarchy": {"level1": "Hardware"},
                "timeSeries": {"2024": 100, "2032": 200}
            },
            {
                "geography": "India",
                "segmentType": "By Application",
                "segmentHierarchy": {"level1": "Retail"},
                "timeSeries": {"2024": 100, "2032": 200}
            }
        ],
        "allGeographies": ["India"],
        "segmentDimensions": {
            "By Product": {"items": ["Hardware"], "hierarchy": {}}
        }
    });
    let path = dir.join("dataset.json");
    fs::write(&path, serde_json::to_string_pretty(&dataset).unwrap()).unwrap();
    path
}

#[test]
fn test_validate_export_args_valid() {
    let args = ExportArgs::default();
    assert!(validate_export_args(&args).is_ok());
}

#[test]
fn test_validate_export_args_empty_input() {
    let args = ExportArgs {
        input: PathBuf::new(),
        ..Default::default()
    };
    assert!(validate_export_args(&args).is_err());
}

#[test]
fn test_validate_export_args_output_is_file() {
    let temp_file = tempfile::NamedTempFile::new().unwrap();
    let args = ExportArgs {
        output_dir: temp_file.path().to_path_buf(),
        ..Default::default()
    };
    assert!(validate_export_args(&args).is_err());
}

#[test]
fn test_validate_kpi_args_year_order() {
    let args = KpiArgs {
        from_year: Some(2030),
        to_year: Some(2024),
        ..Default::default()
    };
    assert!(validate_kpi_args(&args).is_err());

    let args = KpiArgs {
        from_year: Some(2024),
        to_year: Some(2030),
        ..Default::default()
    };
    assert!(validate_kpi_args(&args).is_ok());
}

#[test]
fn test_build_filters_defaults_year_range() {
    let args = KpiArgs {
        from_year: Some(2020),
        data_type: DataType::Volume,
        view_mode: ViewMode::GeographyMode,
        ..Default::default()
    };

    let filters = build_filters(&args);

    assert_eq!(filters.year_range.start, 2020);
    assert_eq!(filters.year_range.end, 2032);
    assert_eq!(filters.data_type, DataType::Volume);
    assert_eq!(filters.view_mode, ViewMode::GeographyMode);
}

#[test]
fn test_execute_export_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_dataset(temp_dir.path());
    let output_dir = temp_dir.path().join("out");

    let manifest = execute_export(ExportArgs {
        input,
        output_dir: output_dir.clone(),
    })
    .unwrap();

    assert_eq!(manifest.files.len(), 2);
    let value: Value = read_json(output_dir.join("value.json")).unwrap();
    assert_eq!(value["India"]["By Application"]["Retail"]["2032"], json!(200.0));
}

#[test]
fn test_execute_kpi_geography_mode_writes_summary() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_dataset(temp_dir.path());
    let output = temp_dir.path().join("kpi.json");

    let summary = execute_kpi(KpiArgs {
        input,
        view_mode: ViewMode::GeographyMode,
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap()
    .unwrap();

    assert_eq!(summary.market_size_start, 100.0);
    assert_eq!(summary.market_size_end, 200.0);

    let written: Value = read_json(&output).unwrap();
    assert_eq!(written["marketSizeEnd"], json!(200.0));
    assert_eq!(written["segmentTypeLabel"], json!("By Product"));
}

#[test]
fn test_execute_kpi_no_data_is_not_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = write_dataset(temp_dir.path());
    let output = temp_dir.path().join("kpi.json");

    let result = execute_kpi(KpiArgs {
        input,
        segment_type: Some("By Region".to_string()),
        output: Some(output.clone()),
        ..Default::default()
    })
    .unwrap();

    assert!(result.is_none());
    assert!(!output.exists());
}

#[test]
fn test_execute_kpi_missing_dataset_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    let result = execute_kpi(KpiArgs {
        input: temp_dir.path().join("missing.json"),
        ..Default::default()
    });

    assert!(result.is_err());
}
