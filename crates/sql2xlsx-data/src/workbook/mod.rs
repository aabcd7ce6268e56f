//! Workbook adapters.
//!
//! A [`TemplateSource`] clones a template workbook into a new output file and
//! hands back a [`SheetWriter`] bound to the report sheet. The writer is
//! returned to the source to be persisted.
//!
//! - [`XlsxTemplate`]: `.xlsx` files through `umya-spreadsheet`
//! - [`MemoryTemplate`]: in-memory grid, used by tests and dry runs

pub mod memory;
pub mod xlsx;

pub use memory::{MemoryCell, MemorySheet, MemoryStyle, MemoryTemplate};
pub use xlsx::{XlsxSheet, XlsxTemplate};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::value::CellValue;

/// Cell-level write access to a single sheet
///
/// Rows and columns are 1-indexed.
pub trait SheetWriter {
    /// Opaque cell style handle
    type Style: Clone;

    /// Write `values` left to right starting at (`row`, `col`)
    ///
    /// NULL values leave the corresponding cell untouched.
    fn set_row(&mut self, row: u32, col: u32, values: &[CellValue]) -> Result<()>;

    /// Write a text value into a single cell
    fn set_cell_text(&mut self, row: u32, col: u32, text: &str) -> Result<()>;

    /// Write a formula (without the leading `=`) into a single cell
    fn set_cell_formula(&mut self, row: u32, col: u32, formula: &str) -> Result<()>;

    /// Read the style of a cell; missing cells have the default style
    fn cell_style(&self, row: u32, col: u32) -> Result<Self::Style>;

    /// Replace the style of a cell
    fn set_cell_style(&mut self, row: u32, col: u32, style: Self::Style) -> Result<()>;

    /// Insert one blank row at `row`, shifting it and every row below down by one
    fn insert_row(&mut self, row: u32) -> Result<()>;
}

/// Factory for per-partition copies of a template workbook
pub trait TemplateSource {
    /// Sheet writer produced for each copy
    type Sheet: SheetWriter;

    /// Clone the template to `dest` and open its report sheet
    fn instantiate(&self, dest: &Path) -> Result<Self::Sheet>;

    /// Persist and close a sheet produced by [`TemplateSource::instantiate`]
    ///
    /// # Returns
    /// The path the workbook was written to
    fn save(&self, sheet: Self::Sheet) -> Result<PathBuf>;
}
