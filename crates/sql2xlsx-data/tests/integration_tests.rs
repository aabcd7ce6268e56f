//! Integration tests for sql2xlsx-data

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tempfile::TempDir;

use sql2xlsx_data::{
    open_source, CellValue, DataError, QuerySource, SheetWriter, SqliteSource, TemplateSource,
    XlsxTemplate,
};

/// Write a small template: a title in A1, a header row in row 2 and a
/// styled data row in row 3, plus a footer in row 5
fn create_template(dir: &Path) -> PathBuf {
    let path = dir.join("template.xlsx");
    let mut book = umya_spreadsheet::new_file();
    {
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut("A1").set_value("Monthly report");
        sheet.get_cell_mut("A2").set_value("Region");
        sheet.get_cell_mut("B2").set_value("Units");
        sheet
            .get_cell_mut("B3")
            .get_style_mut()
            .get_number_format_mut()
            .set_format_code("#,##0.00");
        sheet.get_cell_mut("A5").set_value("Footer");
    }
    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

fn create_database(dir: &Path) -> PathBuf {
    let path = dir.join("sales.db");
    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "
        CREATE TABLE sales (day TEXT, region TEXT, units INTEGER);
        INSERT INTO sales VALUES ('2022-01-03', 'north', 4);
        INSERT INTO sales VALUES ('2022-01-15', 'south', 2);
        ",
    )
    .unwrap();
    path
}

fn number_format(sheet: &umya_spreadsheet::Worksheet, coordinate: &str) -> Option<String> {
    sheet.get_cell(coordinate).and_then(|cell| {
        cell.get_style()
            .get_number_format()
            .map(|format| format.get_format_code().to_string())
    })
}

#[test]
fn test_sqlite_source_from_file() {
    let dir = TempDir::new().unwrap();
    let db = create_database(dir.path());

    let mut source = SqliteSource::open(&db).expect("Failed to open database");
    let rows = source
        .execute("SELECT region, units FROM sales ORDER BY day")
        .expect("Failed to run query");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], CellValue::from("north"));
    assert_eq!(rows[1][1], CellValue::Integer(2));
}

#[test]
fn test_open_source_by_driver_name() {
    let dir = TempDir::new().unwrap();
    let db = create_database(dir.path());

    let mut source = open_source("sqlite3", db.to_str().unwrap()).unwrap();
    let rows = source.execute("SELECT COUNT(*) FROM sales").unwrap();
    assert_eq!(rows, vec![vec![CellValue::Integer(2)]]);
}

#[test]
fn test_xlsx_template_missing_file() {
    let result = XlsxTemplate::new("/nonexistent/path/template.xlsx", "Sheet1");
    assert!(matches!(result, Err(DataError::FileNotFound(_))));
}

#[test]
fn test_xlsx_template_missing_sheet() {
    let dir = TempDir::new().unwrap();
    let template = XlsxTemplate::new(create_template(dir.path()), "Nope").unwrap();

    let result = template.instantiate(&dir.path().join("out.xlsx"));
    assert!(matches!(result, Err(DataError::SheetNotFound(_))));
}

#[test]
fn test_xlsx_clone_leaves_template_untouched() {
    let dir = TempDir::new().unwrap();
    let template_path = create_template(dir.path());
    let template = XlsxTemplate::new(&template_path, "Sheet1").unwrap();

    let out = dir.path().join("out.xlsx");
    let mut sheet = template.instantiate(&out).unwrap();
    sheet.set_cell_text(1, 1, "Changed").unwrap();
    let saved = template.save(sheet).unwrap();
    assert_eq!(saved, out);

    let original = umya_spreadsheet::reader::xlsx::read(&template_path).unwrap();
    let original = original.get_sheet_by_name("Sheet1").unwrap();
    assert_eq!(original.get_value("A1"), "Monthly report");

    let copy = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
    let copy = copy.get_sheet_by_name("Sheet1").unwrap();
    assert_eq!(copy.get_value("A1"), "Changed");
}

#[test]
fn test_xlsx_rows_insert_and_style_copy() {
    let dir = TempDir::new().unwrap();
    let template = XlsxTemplate::new(create_template(dir.path()), "Sheet1").unwrap();

    let out = dir.path().join("report.xlsx");
    let mut sheet = template.instantiate(&out).unwrap();

    sheet
        .set_row(3, 1, &[CellValue::from("north"), CellValue::Integer(4)])
        .unwrap();
    sheet
        .set_row(4, 1, &[CellValue::from("south"), CellValue::Real(2.5)])
        .unwrap();

    // Footer moves from row 5 to row 6
    sheet.insert_row(5).unwrap();
    let style = sheet.cell_style(3, 2).unwrap();
    sheet.set_cell_formula(5, 2, "SUM(B3:B4)").unwrap();
    sheet.set_cell_style(5, 2, style).unwrap();

    template.save(sheet).unwrap();

    let book = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
    let ws = book.get_sheet_by_name("Sheet1").unwrap();

    assert_eq!(ws.get_value("A3"), "north");
    assert_eq!(ws.get_value("B3").parse::<f64>().unwrap(), 4.0);
    assert_eq!(ws.get_value("A4"), "south");
    assert_eq!(ws.get_value("B4").parse::<f64>().unwrap(), 2.5);
    assert_eq!(ws.get_value("A6"), "Footer");
    assert_eq!(ws.get_cell("B5").unwrap().get_formula(), "SUM(B3:B4)");
    assert_eq!(number_format(ws, "B3"), Some("#,##0.00".to_string()));
    assert_eq!(number_format(ws, "B5"), Some("#,##0.00".to_string()));
}

#[test]
fn test_xlsx_rejects_invalid_address() {
    let dir = TempDir::new().unwrap();
    let template = XlsxTemplate::new(create_template(dir.path()), "Sheet1").unwrap();

    let mut sheet = template.instantiate(&dir.path().join("bad.xlsx")).unwrap();
    assert!(matches!(
        sheet.set_cell_text(0, 1, "x"),
        Err(DataError::InvalidAddress(_))
    ));
    assert!(matches!(
        sheet.set_cell_formula(1, 20_000, "SUM(A1)"),
        Err(DataError::InvalidAddress(_))
    ));
}
