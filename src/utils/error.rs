//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! The aggregation core has no error type: data-shape problems degrade
//! and are reported through diagnostics or a `None` KPI.

use thiserror::Error;

/// Errors that can occur while loading a converted dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
