//! Error types for query sources and workbook adapters.

use thiserror::Error;

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while reading query results or editing workbooks
#[derive(Debug, Error)]
pub enum DataError {
    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Database driver named in the configuration is not available
    #[error("Unsupported database driver: {0}")]
    UnsupportedDriver(String),

    /// Failed to open workbook
    #[error("Failed to open workbook: {0}")]
    WorkbookOpen(String),

    /// Failed to write workbook
    #[error("Failed to save workbook: {0}")]
    WorkbookSave(String),

    /// Sheet not found in workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Invalid cell address (row or column out of range)
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
