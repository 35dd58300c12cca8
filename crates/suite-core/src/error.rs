//! Error types for suite-core

use thiserror::Error;

/// Result type alias for suite-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while parsing, shaping, rendering or exporting data
#[derive(Error, Debug)]
pub enum CoreError {
    /// Payload did not have the expected JSON shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Operation does not apply to the requested data kind
    #[error("Unsupported data kind: {0}")]
    UnsupportedKind(String),

    /// A row does not have one cell per header
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Export refused because the data is an error variant
    #[error("{0}")]
    ExportAborted(String),

    /// Export refused because there is nothing to write
    #[error("Nothing to export: {0}")]
    NothingToExport(String),

    /// CSV encoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet encoding error
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
