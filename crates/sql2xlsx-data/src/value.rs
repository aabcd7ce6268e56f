//! Scalar cell values produced by query sources.

/// A single scalar value from a query result column
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// SQL NULL; the target cell is left untouched
    #[default]
    Null,
    /// Integer value
    Integer(i64),
    /// Floating point value
    Real(f64),
    /// Text value
    Text(String),
}

/// One result row, in column order
pub type Row = Vec<CellValue>;

impl CellValue {
    /// Check whether this value is SQL NULL
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Real(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}
