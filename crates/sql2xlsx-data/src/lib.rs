//! # sql2xlsx-data
//!
//! Collaborators for sql2xlsx: databases that run the report query and
//! workbooks that receive its rows.
//!
//! ## Features
//!
//! - **SQLite Support**: Execute queries with `rusqlite`, keeping column order
//!   and scalar types
//! - **Template Workbooks**: Clone `.xlsx` templates and edit cells, styles
//!   and rows with `umya-spreadsheet`
//! - **Addressing**: 1-indexed rows/columns and A1 notation up to `XFD`
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::path::Path;
//! use sql2xlsx_data::{QuerySource, SheetWriter, SqliteSource, TemplateSource, XlsxTemplate};
//!
//! let mut db = SqliteSource::open("sales.db")?;
//! let rows = db.execute("SELECT region, units FROM sales")?;
//!
//! let template = XlsxTemplate::new("template.xlsx", "Sheet1")?;
//! let mut sheet = template.instantiate(Path::new("report.xlsx"))?;
//! for (i, row) in rows.iter().enumerate() {
//!     sheet.set_row(10 + i as u32, 1, row)?;
//! }
//! template.save(sheet)?;
//! ```

pub mod address;
pub mod error;
pub mod sources;
pub mod value;
pub mod workbook;

// Re-exports
pub use address::{cell_ref, column_letters, MAX_COLUMN, MAX_ROW};
pub use error::{DataError, Result};
pub use sources::{is_supported_driver, open_source, QuerySource, SqliteSource};
pub use value::{CellValue, Row};
pub use workbook::{
    MemoryCell, MemorySheet, MemoryStyle, MemoryTemplate, SheetWriter, TemplateSource, XlsxSheet,
    XlsxTemplate,
};
