//! Query source implementations.
//!
//! This module contains adapters for databases that execute the per-partition
//! report query.

pub mod sqlite;

pub use sqlite::SqliteSource;

use crate::error::{DataError, Result};
use crate::value::Row;

/// Trait for sources that can execute a query and return its rows
pub trait QuerySource {
    /// Execute a query and collect its result rows
    ///
    /// # Arguments
    /// * `query` - Fully resolved query text
    ///
    /// # Returns
    /// The result rows in order, each an ordered list of scalar values
    fn execute(&mut self, query: &str) -> Result<Vec<Row>>;
}

impl<T: QuerySource + ?Sized> QuerySource for Box<T> {
    fn execute(&mut self, query: &str) -> Result<Vec<Row>> {
        (**self).execute(query)
    }
}

/// Open a query source for a configured driver name
///
/// # Arguments
/// * `driver` - Driver name from configuration (`sqlite3` or `sqlite`)
/// * `name` - Data source name; a database path for SQLite
pub fn open_source(driver: &str, name: &str) -> Result<Box<dyn QuerySource>> {
    if !is_supported_driver(driver) {
        return Err(DataError::UnsupportedDriver(driver.to_string()));
    }
    Ok(Box::new(SqliteSource::open(name)?))
}

/// Check whether a driver name can be opened by [`open_source`]
pub fn is_supported_driver(driver: &str) -> bool {
    matches!(driver.to_ascii_lowercase().as_str(), "sqlite3" | "sqlite")
}
