//! XLSX workbook adapter using umya-spreadsheet.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use umya_spreadsheet::{Spreadsheet, Style, Worksheet};

use crate::address::cell_ref;
use crate::error::{DataError, Result};
use crate::value::CellValue;
use crate::workbook::{SheetWriter, TemplateSource};

/// Template workbook on disk
#[derive(Debug, Clone)]
pub struct XlsxTemplate {
    /// Path to the template `.xlsx`
    path: PathBuf,
    /// Name of the sheet that receives the report
    sheet: String,
}

impl XlsxTemplate {
    /// Create a template source from a file path and sheet name
    ///
    /// The sheet is checked when each copy is opened, not here.
    pub fn new(path: impl AsRef<Path>, sheet: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }

        Ok(Self {
            path: path.to_path_buf(),
            sheet: sheet.into(),
        })
    }

    /// Template file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Report sheet name
    pub fn sheet(&self) -> &str {
        &self.sheet
    }
}

impl TemplateSource for XlsxTemplate {
    type Sheet = XlsxSheet;

    fn instantiate(&self, dest: &Path) -> Result<XlsxSheet> {
        fs::copy(&self.path, dest)?;

        let book = umya_spreadsheet::reader::xlsx::read(dest)
            .map_err(|e| DataError::WorkbookOpen(format!("{}: {}", dest.display(), e)))?;

        if book.get_sheet_by_name(&self.sheet).is_none() {
            return Err(DataError::SheetNotFound(format!(
                "{} in {}",
                self.sheet,
                dest.display()
            )));
        }

        debug!("Cloned template {} to {}", self.path.display(), dest.display());

        Ok(XlsxSheet {
            path: dest.to_path_buf(),
            sheet: self.sheet.clone(),
            book,
        })
    }

    fn save(&self, sheet: XlsxSheet) -> Result<PathBuf> {
        umya_spreadsheet::writer::xlsx::write(&sheet.book, &sheet.path)
            .map_err(|e| DataError::WorkbookSave(format!("{}: {}", sheet.path.display(), e)))?;
        Ok(sheet.path)
    }
}

/// Report sheet of an open workbook copy
pub struct XlsxSheet {
    /// Output file the workbook is saved to
    path: PathBuf,
    /// Report sheet name
    sheet: String,
    /// In-memory workbook
    book: Spreadsheet,
}

impl XlsxSheet {
    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn worksheet(&self) -> Result<&Worksheet> {
        self.book
            .get_sheet_by_name(&self.sheet)
            .ok_or_else(|| DataError::SheetNotFound(self.sheet.clone()))
    }

    fn worksheet_mut(&mut self) -> Result<&mut Worksheet> {
        self.book
            .get_sheet_by_name_mut(&self.sheet)
            .ok_or_else(|| DataError::SheetNotFound(self.sheet.clone()))
    }
}

impl SheetWriter for XlsxSheet {
    type Style = Style;

    fn set_row(&mut self, row: u32, col: u32, values: &[CellValue]) -> Result<()> {
        // Validate the whole run before touching the sheet
        cell_ref(row, col)?;
        cell_ref(row, col.saturating_add(values.len().saturating_sub(1) as u32))?;

        let worksheet = self.worksheet_mut()?;
        for (offset, value) in values.iter().enumerate() {
            let coordinate = (col + offset as u32, row);
            match value {
                CellValue::Null => {}
                CellValue::Integer(i) => {
                    worksheet.get_cell_mut(coordinate).set_value_number(*i as f64);
                }
                CellValue::Real(f) => {
                    worksheet.get_cell_mut(coordinate).set_value_number(*f);
                }
                CellValue::Text(s) => {
                    worksheet.get_cell_mut(coordinate).set_value_string(s.clone());
                }
            }
        }
        Ok(())
    }

    fn set_cell_text(&mut self, row: u32, col: u32, text: &str) -> Result<()> {
        cell_ref(row, col)?;
        self.worksheet_mut()?
            .get_cell_mut((col, row))
            .set_value_string(text.to_string());
        Ok(())
    }

    fn set_cell_formula(&mut self, row: u32, col: u32, formula: &str) -> Result<()> {
        cell_ref(row, col)?;
        self.worksheet_mut()?
            .get_cell_mut((col, row))
            .set_formula(formula.trim_start_matches('=').to_string());
        Ok(())
    }

    fn cell_style(&self, row: u32, col: u32) -> Result<Style> {
        cell_ref(row, col)?;
        Ok(self
            .worksheet()?
            .get_cell((col, row))
            .map(|cell| cell.get_style().clone())
            .unwrap_or_default())
    }

    fn set_cell_style(&mut self, row: u32, col: u32, style: Style) -> Result<()> {
        cell_ref(row, col)?;
        self.worksheet_mut()?
            .get_cell_mut((col, row))
            .set_style(style);
        Ok(())
    }

    fn insert_row(&mut self, row: u32) -> Result<()> {
        cell_ref(row, 1)?;
        self.worksheet_mut()?.insert_new_row(&row, &1);
        Ok(())
    }
}
