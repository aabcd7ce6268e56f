//! Error types for report generation.

use sql2xlsx_data::DataError;
use thiserror::Error;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can abort a report run
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    Config(String),

    /// Partition type is not one of day/month/year
    #[error("Unsupported partition type: {0}")]
    UnsupportedGranularity(String),

    /// Partition dates are unparseable or reversed
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    /// Database could not be opened or the query failed
    #[error("Query failed: {0}")]
    Query(#[source] DataError),

    /// Output workbook could not be cloned, opened or saved
    #[error("Template I/O failed for {path}: {source}")]
    TemplateIo {
        /// Output file being produced
        path: String,
        /// Underlying adapter error
        #[source]
        source: DataError,
    },

    /// A cell in the report sheet could not be written
    #[error("Failed to write cell {address}: {source}")]
    CellWrite {
        /// A1-style address, or row/column pair when out of range
        address: String,
        /// Underlying adapter error
        #[source]
        source: DataError,
    },
}

impl Error {
    /// Build a [`Error::CellWrite`] for a 1-indexed cell
    pub fn cell_write(row: u32, col: u32, source: DataError) -> Self {
        let address = sql2xlsx_data::cell_ref(row, col)
            .unwrap_or_else(|_| format!("row {}, column {}", row, col));
        Error::CellWrite { address, source }
    }
}
