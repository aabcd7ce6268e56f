//! Report population.
//!
//! [`populate`] is the grid step: it writes query rows, header variables and
//! totalizations into one sheet. [`ReportWriter`] wraps it with the per
//! partition file lifecycle (clone template, run query, populate, save).

use std::path::{Path, PathBuf};

use sql2xlsx_data::{DataError, QuerySource, Row, SheetWriter, TemplateSource};
use tracing::{debug, info, warn};

use crate::config::{Config, Totalization, Variable};
use crate::error::{Error, Result};
use crate::partition::Partition;
use crate::placeholder::{resolve, PlaceholderContext, Token};

/// Write position inside the data grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    /// Next row to write (1-indexed)
    pub row: u32,
    /// First column of every row (1-indexed)
    pub col: u32,
}

impl GridCursor {
    /// Cursor at the grid origin
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Move to the next row
    pub fn advance(&mut self) -> Result<()> {
        self.row = self
            .row
            .checked_add(1)
            .ok_or_else(|| Error::Config("data grid exceeds the row range".to_string()))?;
        Ok(())
    }
}

/// Where and what to write in each partition's sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLayout {
    /// First data row (1-indexed)
    pub start_row: u32,
    /// First data column (1-indexed)
    pub start_col: u32,
    /// Header cells
    pub variables: Vec<Variable>,
    /// Column totals below the grid
    pub totalizations: Vec<Totalization>,
    /// Fail on variable and totalization write errors
    pub strict_cells: bool,
}

impl ReportLayout {
    /// Layout described by a configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            start_row: config.template.start_row,
            start_col: config.template.start_col,
            variables: config.output.variables.clone(),
            totalizations: config.output.totalizations.clone(),
            strict_cells: config.output.strict_cells,
        }
    }
}

/// Outcome of [`populate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulateSummary {
    /// Number of data rows written
    pub rows_written: usize,
    /// Last written data row; `start_row - 1` when no rows were written
    pub last_row: u32,
    /// Row holding the totalizations, if any were configured
    pub total_row: Option<u32>,
    /// Variable and totalization cells that could not be written
    pub skipped_cells: usize,
}

/// Populate a sheet with result rows, header variables and totalizations
///
/// Data-row failures are always fatal. Variable and totalization failures are
/// logged and counted unless `layout.strict_cells` is set.
pub fn populate<S: SheetWriter>(
    sheet: &mut S,
    layout: &ReportLayout,
    rows: &[Row],
    context: &PlaceholderContext,
) -> Result<PopulateSummary> {
    let mut cursor = GridCursor::new(layout.start_row, layout.start_col);
    for row in rows {
        sheet
            .set_row(cursor.row, cursor.col, row)
            .map_err(|e| Error::cell_write(cursor.row, cursor.col, e))?;
        cursor.advance()?;
    }

    let mut summary = PopulateSummary {
        rows_written: rows.len(),
        last_row: cursor.row.saturating_sub(1),
        ..Default::default()
    };

    for variable in &layout.variables {
        let value = resolve(&variable.value, context);
        if let Err(e) = sheet.set_cell_text(variable.row, variable.col, &value) {
            let err = Error::cell_write(variable.row, variable.col, e);
            skip_or_fail(layout, &mut summary, err)?;
        }
    }

    if layout.totalizations.is_empty() {
        return Ok(summary);
    }

    let total_row = cursor.row;
    sheet
        .insert_row(total_row)
        .map_err(|e| Error::cell_write(total_row, layout.start_col, e))?;
    summary.total_row = Some(total_row);

    let totals_context = context.clone().with(Token::RowsLast, summary.last_row);
    for total in &layout.totalizations {
        let formula = resolve(&total.formula, &totals_context);
        if let Err(err) = write_total(sheet, total_row, total.col, &formula) {
            skip_or_fail(layout, &mut summary, err)?;
        }
    }

    Ok(summary)
}

/// Write one total; the style comes from the cell above when there is one
fn write_total<S: SheetWriter>(sheet: &mut S, row: u32, col: u32, formula: &str) -> Result<()> {
    sheet
        .set_cell_formula(row, col, formula)
        .map_err(|e| Error::cell_write(row, col, e))?;

    let above = row.saturating_sub(1);
    if above == 0 {
        return Ok(());
    }
    let style = sheet
        .cell_style(above, col)
        .map_err(|e| Error::cell_write(above, col, e))?;
    sheet
        .set_cell_style(row, col, style)
        .map_err(|e| Error::cell_write(row, col, e))
}

fn skip_or_fail(layout: &ReportLayout, summary: &mut PopulateSummary, err: Error) -> Result<()> {
    if layout.strict_cells {
        return Err(err);
    }
    warn!("Skipping cell: {}", err);
    summary.skipped_cells += 1;
    Ok(())
}

/// One saved partition report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionReport {
    /// Running partition number
    pub num: usize,
    /// Partition covered by the file
    pub partition: Partition,
    /// Saved output file
    pub path: PathBuf,
    /// Grid statistics
    pub summary: PopulateSummary,
}

/// Produces one output file per partition from a template
pub struct ReportWriter<'a, T: TemplateSource> {
    template: &'a T,
    layout: ReportLayout,
    query: String,
    output_name: String,
    time_format: String,
    output_dir: PathBuf,
}

impl<'a, T: TemplateSource> ReportWriter<'a, T> {
    /// Create a writer
    ///
    /// # Arguments
    /// * `template` - Template workbook cloned for every partition
    /// * `layout` - Grid origin, variables and totalizations
    /// * `query` - Query template
    /// * `output_name` - Output file name template, without extension
    /// * `time_format` - strftime layout for partition bounds
    pub fn new(
        template: &'a T,
        layout: ReportLayout,
        query: impl Into<String>,
        output_name: impl Into<String>,
        time_format: impl Into<String>,
    ) -> Self {
        Self {
            template,
            layout,
            query: query.into(),
            output_name: output_name.into(),
            time_format: time_format.into(),
            output_dir: PathBuf::from("."),
        }
    }

    /// Writer configured from a [`Config`]
    pub fn from_config(template: &'a T, config: &Config) -> Self {
        Self::new(
            template,
            ReportLayout::from_config(config),
            config.input.query.clone(),
            config.output.name.clone(),
            config.input.time_format.clone(),
        )
    }

    /// Set the directory receiving output files
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Directory receiving output files
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Query, populate and save the report for one partition
    pub fn write_partition<Q: QuerySource + ?Sized>(
        &self,
        source: &mut Q,
        partition: &Partition,
        num: usize,
    ) -> Result<PartitionReport> {
        let context = PlaceholderContext::for_partition(partition, &self.time_format, num)?;
        if let (Some(begin), Some(end)) = (context.get(Token::PartBeg), context.get(Token::PartEnd))
        {
            info!("Processing partition: {} to {}", begin, end);
        }

        let file_name = format!("{}.xlsx", resolve(&self.output_name, &context));
        let dest = self.output_dir.join(file_name);
        let template_error = |source: DataError| Error::TemplateIo {
            path: dest.display().to_string(),
            source,
        };

        let mut sheet = self.template.instantiate(&dest).map_err(template_error)?;

        let query = resolve(&self.query, &context);
        debug!("Executing query: {}", query);
        let rows = source.execute(&query).map_err(Error::Query)?;

        let summary = populate(&mut sheet, &self.layout, &rows, &context)?;
        let path = self.template.save(sheet).map_err(template_error)?;
        debug!(
            "Saved {} ({} rows, {} skipped cells)",
            path.display(),
            summary.rows_written,
            summary.skipped_cells
        );

        Ok(PartitionReport {
            num,
            partition: *partition,
            path,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sql2xlsx_data::{CellValue, MemorySheet, MemoryStyle, MemoryTemplate};

    /// Query source returning canned rows and recording queries
    #[derive(Default)]
    struct CannedSource {
        rows: Vec<Row>,
        queries: Vec<String>,
        fail: bool,
    }

    impl QuerySource for CannedSource {
        fn execute(&mut self, query: &str) -> sql2xlsx_data::Result<Vec<Row>> {
            self.queries.push(query.to_string());
            if self.fail {
                return Err(DataError::Io(std::io::Error::other("syntax error")));
            }
            Ok(self.rows.clone())
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                vec![
                    CellValue::Text(format!("2022-01-0{}", i + 1)),
                    CellValue::Integer(10 * (i as i64 + 1)),
                    CellValue::Real(1.5),
                ]
            })
            .collect()
    }

    fn layout() -> ReportLayout {
        ReportLayout {
            start_row: 10,
            start_col: 1,
            variables: vec![Variable {
                row: 2,
                col: 2,
                value: "{part.beg} - {part.end}".to_string(),
            }],
            totalizations: vec![Totalization {
                col: 2,
                formula: "SUM(B10:B{rows.last})".to_string(),
            }],
            strict_cells: false,
        }
    }

    fn context() -> PlaceholderContext {
        PlaceholderContext::new()
            .with(Token::PartBeg, "2022-01-01")
            .with(Token::PartEnd, "2022-01-31")
            .with(Token::Num, 1)
    }

    fn partition() -> Partition {
        Partition {
            begin: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 1, 31).unwrap(),
        }
    }

    #[test]
    fn test_grid_cursor_advance() {
        let mut cursor = GridCursor::new(10, 3);
        cursor.advance().unwrap();
        assert_eq!(cursor, GridCursor::new(11, 3));

        let mut cursor = GridCursor::new(u32::MAX, 1);
        assert!(cursor.advance().is_err());
    }

    #[test]
    fn test_rows_fill_grid_and_total_follows() {
        let mut sheet = MemorySheet::new();
        let summary = populate(&mut sheet, &layout(), &rows(3), &context()).unwrap();

        assert_eq!(summary.rows_written, 3);
        assert_eq!(summary.last_row, 12);
        assert_eq!(summary.total_row, Some(13));
        assert_eq!(summary.skipped_cells, 0);

        assert_eq!(sheet.value(10, 1), CellValue::Text("2022-01-01".to_string()));
        assert_eq!(sheet.value(11, 2), CellValue::Integer(20));
        assert_eq!(sheet.value(12, 3), CellValue::Real(1.5));
        assert_eq!(sheet.formula(13, 2), Some("SUM(B10:B12)"));
        assert_eq!(sheet.value(2, 2), CellValue::Text("2022-01-01 - 2022-01-31".to_string()));
    }

    #[test]
    fn test_total_inherits_style_from_cell_above() {
        let mut sheet = MemorySheet::new().with_style(12, 2, MemoryStyle(7));
        populate(&mut sheet, &layout(), &rows(3), &context()).unwrap();

        assert_eq!(sheet.cell(13, 2).unwrap().style, MemoryStyle(7));
    }

    #[test]
    fn test_footer_shifts_down() {
        let mut sheet = MemorySheet::new().with_value(13, 1, "footer");
        populate(&mut sheet, &layout(), &rows(3), &context()).unwrap();

        assert_eq!(sheet.value(14, 1), CellValue::Text("footer".to_string()));
        assert!(sheet.value(13, 1).is_null());
    }

    #[test]
    fn test_no_totalizations_no_insert() {
        let mut sheet = MemorySheet::new().with_value(13, 1, "footer");
        let mut layout = layout();
        layout.totalizations.clear();

        let summary = populate(&mut sheet, &layout, &rows(3), &context()).unwrap();

        assert_eq!(summary.total_row, None);
        assert_eq!(sheet.value(13, 1), CellValue::Text("footer".to_string()));
    }

    #[test]
    fn test_zero_rows() {
        let mut sheet = MemorySheet::new();
        let summary = populate(&mut sheet, &layout(), &[], &context()).unwrap();

        assert_eq!(summary.rows_written, 0);
        assert_eq!(summary.last_row, 9);
        assert_eq!(summary.total_row, Some(10));
        assert_eq!(sheet.formula(10, 2), Some("SUM(B10:B9)"));
    }

    #[test]
    fn test_zero_rows_at_first_row_keeps_total() {
        let mut sheet = MemorySheet::new();
        let layout = ReportLayout {
            start_row: 1,
            start_col: 1,
            variables: Vec::new(),
            totalizations: vec![Totalization {
                col: 1,
                formula: "SUM(A1:A{rows.last})".to_string(),
            }],
            strict_cells: true,
        };

        let summary = populate(&mut sheet, &layout, &[], &context()).unwrap();

        assert_eq!(summary.last_row, 0);
        assert_eq!(summary.total_row, Some(1));
        assert_eq!(summary.skipped_cells, 0);
        assert_eq!(sheet.formula(1, 1), Some("SUM(A1:A0)"));
        assert_eq!(sheet.cell(1, 1).unwrap().style, MemoryStyle::default());
    }

    #[test]
    fn test_null_leaves_template_cell() {
        let mut sheet = MemorySheet::new().with_value(10, 2, "keep");
        let rows = vec![vec![CellValue::Integer(1), CellValue::Null]];
        populate(&mut sheet, &layout(), &rows, &context()).unwrap();

        assert_eq!(sheet.value(10, 2), CellValue::Text("keep".to_string()));
    }

    #[test]
    fn test_data_row_failure_is_fatal() {
        let mut sheet = MemorySheet::new();
        let mut layout = layout();
        layout.start_col = 16384;

        let err = populate(&mut sheet, &layout, &rows(1), &context()).unwrap_err();
        assert!(matches!(err, Error::CellWrite { .. }));
    }

    #[test]
    fn test_lenient_cells_are_skipped() {
        let mut sheet = MemorySheet::new();
        let mut layout = layout();
        layout.variables.push(Variable {
            row: 1,
            col: 20000,
            value: "x".to_string(),
        });
        layout.totalizations.push(Totalization {
            col: 20000,
            formula: "SUM(x)".to_string(),
        });

        let summary = populate(&mut sheet, &layout, &rows(2), &context()).unwrap();

        assert_eq!(summary.skipped_cells, 2);
        assert_eq!(sheet.formula(12, 2), Some("SUM(B10:B11)"));
    }

    #[test]
    fn test_strict_cells_fail() {
        let mut sheet = MemorySheet::new();
        let mut layout = layout();
        layout.strict_cells = true;
        layout.variables.push(Variable {
            row: 1,
            col: 20000,
            value: "x".to_string(),
        });

        let err = populate(&mut sheet, &layout, &rows(2), &context()).unwrap_err();
        match err {
            Error::CellWrite { address, .. } => assert_eq!(address, "row 1, column 20000"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_write_partition() {
        let template = MemoryTemplate::new(MemorySheet::new().with_value(1, 1, "Sales"));
        let writer = ReportWriter::new(
            &template,
            layout(),
            "SELECT * FROM t WHERE d BETWEEN '{part.beg}' AND '{part.end}'",
            "sales-{num}-{part.beg}",
            "%Y%m%d",
        )
        .with_output_dir("out");
        let mut source = CannedSource {
            rows: rows(3),
            ..Default::default()
        };

        let report = writer.write_partition(&mut source, &partition(), 4).unwrap();

        assert_eq!(report.num, 4);
        assert_eq!(report.path, PathBuf::from("out/sales-4-20220101.xlsx"));
        assert_eq!(report.summary.last_row, 12);
        assert_eq!(
            source.queries,
            vec!["SELECT * FROM t WHERE d BETWEEN '20220101' AND '20220131'".to_string()]
        );

        let saved = template.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].path(), Path::new("out/sales-4-20220101.xlsx"));
        assert_eq!(saved[0].value(1, 1), CellValue::Text("Sales".to_string()));
        assert_eq!(saved[0].formula(13, 2), Some("SUM(B10:B12)"));
    }

    #[test]
    fn test_write_partition_query_failure() {
        let template = MemoryTemplate::default();
        let writer = ReportWriter::new(&template, layout(), "SELEC", "out", "%Y-%m-%d");
        let mut source = CannedSource {
            fail: true,
            ..Default::default()
        };

        let err = writer.write_partition(&mut source, &partition(), 1).unwrap_err();

        assert!(matches!(err, Error::Query(_)));
        assert!(template.saved().is_empty());
    }

    #[test]
    fn test_write_partition_bad_time_format() {
        let template = MemoryTemplate::default();
        let writer = ReportWriter::new(&template, layout(), "q", "out", "%Q");
        let mut source = CannedSource::default();

        let err = writer.write_partition(&mut source, &partition(), 1).unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(source.queries.is_empty());
    }
}
