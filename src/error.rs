//! Fatal errors. Structural mismatches between the two tables are never
//! errors; they are resolved by the aligner and reported as events.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FrameDiffError {
    #[error("path {} does not exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("column '{column}' not found in {table}")]
    IndexColumnNotFound { column: String, table: String },

    #[error("column '{column}' in {table} has duplicate values and cannot be used as index")]
    DuplicateIndex { column: String, table: String },

    #[error("{table} has duplicate column names: {columns}")]
    DuplicateColumns { table: String, columns: String },

    #[error("{table} has duplicate row labels: {labels}")]
    DuplicateLabels { table: String, labels: String },

    #[error("invalid input: pass either two file paths or two tables")]
    InvalidInputPair,

    #[error("file format mismatch: '{first}' vs '{second}', same file types expected")]
    FormatMismatch { first: String, second: String },

    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),

    #[error("invalid load parameter '{key}': {reason}")]
    InvalidLoadParam { key: String, reason: String },

    #[error("loading {} aborted: only one column was found", .0.display())]
    LoadAborted(PathBuf),

    #[error("column '{column}' has {found} cells, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("tables are not aligned: {0}")]
    Misaligned(String),

    #[error("{0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Excel(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameDiffError>;
