//! SQLite query source using rusqlite.

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::Connection;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::sources::QuerySource;
use crate::value::{CellValue, Row};

/// SQLite database query source
pub struct SqliteSource {
    /// Database name as configured
    name: String,
    /// Open connection, owned for the lifetime of the source
    conn: Connection,
}

impl SqliteSource {
    /// Open an existing SQLite database file
    ///
    /// Unlike `Connection::open`, a missing file is an error rather than a
    /// freshly created empty database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let name = path.as_ref().display().to_string();

        if name != ":memory:" && !path.as_ref().exists() {
            return Err(DataError::FileNotFound(name));
        }

        let conn = Connection::open(path.as_ref())?;
        debug!("Opened SQLite database {}", name);

        Ok(Self { name, conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            name: ":memory:".to_string(),
            conn: Connection::open_in_memory()?,
        })
    }

    /// Borrow the underlying connection
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Convert a borrowed SQLite value into an owned cell value
    ///
    /// Text and blob columns both become text; invalid UTF-8 is replaced.
    fn convert(value: ValueRef<'_>) -> CellValue {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Integer(i) => CellValue::Integer(i),
            ValueRef::Real(f) => CellValue::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                CellValue::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl QuerySource for SqliteSource {
    fn execute(&mut self, query: &str) -> Result<Vec<Row>> {
        let mut stmt = self.conn.prepare(query)?;
        let column_count = stmt.column_count();

        let mut rows = stmt.query([])?;
        let mut result = Vec::new();

        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                values.push(Self::convert(row.get_ref(idx)?));
            }
            result.push(values);
        }

        debug!(
            "Query on {} returned {} rows x {} columns",
            self.name,
            result.len(),
            column_count
        );

        Ok(result)
    }
}
