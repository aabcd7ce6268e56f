//! A1-style cell addressing.
//!
//! Rows and columns are 1-indexed throughout, as they appear in configuration
//! files and in spreadsheet applications.

use crate::error::{DataError, Result};

/// Largest column index in a worksheet (`XFD`)
pub const MAX_COLUMN: u32 = 16_384;

/// Largest row index in a worksheet
pub const MAX_ROW: u32 = 1_048_576;

/// Convert a 1-indexed column number to letters (1=A, 26=Z, 27=AA, 52=AZ)
pub fn column_letters(col: u32) -> Result<String> {
    if col == 0 || col > MAX_COLUMN {
        return Err(DataError::InvalidAddress(format!(
            "column {} is outside 1..={}",
            col, MAX_COLUMN
        )));
    }

    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();

    Ok(String::from_utf8_lossy(&letters).into_owned())
}

/// Build an A1-style reference from a 1-indexed (row, column) pair
pub fn cell_ref(row: u32, col: u32) -> Result<String> {
    if row == 0 || row > MAX_ROW {
        return Err(DataError::InvalidAddress(format!(
            "row {} is outside 1..={}",
            row, MAX_ROW
        )));
    }
    Ok(format!("{}{}", column_letters(col)?, row))
}
