//! Error types for tabular export

use thiserror::Error;

/// Export error types
///
/// Parsing and reconciliation are infallible; only writing files can fail.
#[derive(Debug, Error)]
pub enum TabularError {
    /// Spreadsheet writer failure
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// IO error while writing an export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing to export
    #[error("No columns to export")]
    NoColumns,
}

/// Result type for tabular operations
pub type TabularResult<T> = Result<T, TabularError>;
