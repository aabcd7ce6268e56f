//! In-memory workbook adapter.
//!
//! Cells live in an ordered map keyed by (row, column). Saved sheets are kept
//! by the template so callers can inspect every output after a run.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::address::cell_ref;
use crate::error::Result;
use crate::value::CellValue;
use crate::workbook::{SheetWriter, TemplateSource};

/// Style handle for in-memory cells (an application-defined style id)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemoryStyle(pub u32);

/// Content of one in-memory cell
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemoryCell {
    /// Stored value; `Null` for formula-only or style-only cells
    pub value: CellValue,
    /// Formula text, if the cell holds a formula
    pub formula: Option<String>,
    /// Cell style
    pub style: MemoryStyle,
}

/// In-memory sheet
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    /// Path the sheet was instantiated for
    path: PathBuf,
    /// Cells keyed by 1-indexed (row, column)
    cells: BTreeMap<(u32, u32), MemoryCell>,
}

impl MemorySheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Path this sheet is bound to (empty for a bare template)
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a cell
    pub fn cell(&self, row: u32, col: u32) -> Option<&MemoryCell> {
        self.cells.get(&(row, col))
    }

    /// Value of a cell, `Null` when empty
    pub fn value(&self, row: u32, col: u32) -> CellValue {
        self.cell(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Formula of a cell, if any
    pub fn formula(&self, row: u32, col: u32) -> Option<&str> {
        self.cell(row, col).and_then(|c| c.formula.as_deref())
    }

    /// Builder-style value setter, for preparing templates
    pub fn with_value(mut self, row: u32, col: u32, value: impl Into<CellValue>) -> Self {
        self.cells.entry((row, col)).or_default().value = value.into();
        self
    }

    /// Builder-style style setter, for preparing templates
    pub fn with_style(mut self, row: u32, col: u32, style: MemoryStyle) -> Self {
        self.cells.entry((row, col)).or_default().style = style;
        self
    }

    fn cell_mut(&mut self, row: u32, col: u32) -> Result<&mut MemoryCell> {
        cell_ref(row, col)?;
        Ok(self.cells.entry((row, col)).or_default())
    }
}

impl SheetWriter for MemorySheet {
    type Style = MemoryStyle;

    fn set_row(&mut self, row: u32, col: u32, values: &[CellValue]) -> Result<()> {
        cell_ref(row, col)?;
        cell_ref(row, col.saturating_add(values.len().saturating_sub(1) as u32))?;

        for (offset, value) in values.iter().enumerate() {
            if value.is_null() {
                continue;
            }
            let cell = self.cell_mut(row, col + offset as u32)?;
            cell.value = value.clone();
            cell.formula = None;
        }
        Ok(())
    }

    fn set_cell_text(&mut self, row: u32, col: u32, text: &str) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.value = CellValue::Text(text.to_string());
        cell.formula = None;
        Ok(())
    }

    fn set_cell_formula(&mut self, row: u32, col: u32, formula: &str) -> Result<()> {
        let cell = self.cell_mut(row, col)?;
        cell.value = CellValue::Null;
        cell.formula = Some(formula.trim_start_matches('=').to_string());
        Ok(())
    }

    fn cell_style(&self, row: u32, col: u32) -> Result<MemoryStyle> {
        cell_ref(row, col)?;
        Ok(self.cell(row, col).map(|c| c.style).unwrap_or_default())
    }

    fn set_cell_style(&mut self, row: u32, col: u32, style: MemoryStyle) -> Result<()> {
        self.cell_mut(row, col)?.style = style;
        Ok(())
    }

    fn insert_row(&mut self, row: u32) -> Result<()> {
        cell_ref(row, 1)?;
        let shifted: BTreeMap<_, _> = std::mem::take(&mut self.cells)
            .into_iter()
            .map(|((r, c), cell)| if r >= row { ((r + 1, c), cell) } else { ((r, c), cell) })
            .collect();
        self.cells = shifted;
        Ok(())
    }
}

/// In-memory template: every instance starts as a copy of `template`
#[derive(Debug, Default)]
pub struct MemoryTemplate {
    template: MemorySheet,
    saved: RefCell<Vec<MemorySheet>>,
}

impl MemoryTemplate {
    /// Create a template source from a prepared sheet
    pub fn new(template: MemorySheet) -> Self {
        Self {
            template,
            saved: RefCell::new(Vec::new()),
        }
    }

    /// Sheets saved so far, in save order
    pub fn saved(&self) -> Vec<MemorySheet> {
        self.saved.borrow().clone()
    }

    /// Paths of the sheets saved so far
    pub fn saved_paths(&self) -> Vec<PathBuf> {
        self.saved.borrow().iter().map(|s| s.path.clone()).collect()
    }
}

impl TemplateSource for MemoryTemplate {
    type Sheet = MemorySheet;

    fn instantiate(&self, dest: &Path) -> Result<MemorySheet> {
        let mut sheet = self.template.clone();
        sheet.path = dest.to_path_buf();
        Ok(sheet)
    }

    fn save(&self, sheet: MemorySheet) -> Result<PathBuf> {
        let path = sheet.path.clone();
        self.saved.borrow_mut().push(sheet);
        Ok(path)
    }
}
