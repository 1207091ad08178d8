//! Integration tests for metadata export readers

use crate::fixtures::{write_metadata_parquet, write_metadata_xlsx};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use handover_index::io::metadata::{read_metadata, read_parquet};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_read_xlsx_export() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("metadata.xlsx");
    write_metadata_xlsx(
        &path,
        &["Document No", "File Name", "File"],
        &[&["DOC-1", "a.txt", ""], &["DOC-2", " b.txt ", "PDF"]],
    );

    let table = read_metadata(&path).unwrap();

    assert_eq!(table.columns, vec!["Document No", "File Name", "File"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(
        table.rows[0],
        vec![Some("DOC-1".to_string()), Some("a.txt".to_string()), None]
    );
    assert_eq!(
        table.rows[1][1].as_deref(),
        Some(" b.txt "),
        "non-blank cells keep their surrounding whitespace"
    );
}

#[test]
fn test_read_parquet_export() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("metadata.parquet");
    write_metadata_parquet(
        &path,
        &["Document No", "File Name", "File"],
        &[&["DOC-1", "a.txt", ""], &["", "", ""], &["DOC-3", "c.txt", "DWG"]],
    );

    let table = read_metadata(&path).unwrap();

    assert_eq!(table.columns, vec!["Document No", "File Name", "File"]);
    assert_eq!(table.rows.len(), 2, "blank rows are dropped");
    assert_eq!(table.rows[1][2].as_deref(), Some("DWG"));
    assert_eq!(table.rows[0][2], None);
}

#[test]
fn test_header_only_export_has_no_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("metadata.xlsx");
    write_metadata_xlsx(&path, &["Document No", "File Name", "File"], &[]);

    let table = read_metadata(&path).unwrap();

    assert_eq!(table.columns.len(), 3);
    assert!(table.rows.is_empty());
}

#[test]
fn test_missing_file_is_not_found() {
    let err = read_metadata(std::path::Path::new("/nonexistent/metadata.xls")).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_corrupt_parquet_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"This is not a valid Parquet file!")
        .unwrap();
    temp_file.flush().unwrap();

    let result = read_parquet(temp_file.path());

    assert!(result.is_err());
}

#[test]
fn test_date_cells_read_as_iso_dates() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("metadata.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    for (col, name) in (0u16..).zip(["Document No", "File Name", "File", "Date Modified"]) {
        sheet.write_string(0, col, name).unwrap();
    }
    sheet.write_string(1, 0, "DOC-1").unwrap();
    sheet.write_string(1, 1, "a.txt").unwrap();
    let modified = ExcelDateTime::from_ymd(2023, 7, 15).unwrap();
    sheet
        .write_datetime_with_format(1, 3, &modified, &date_format)
        .unwrap();
    workbook.save(&path).unwrap();

    let table = read_metadata(&path).unwrap();

    assert_eq!(table.rows[0][3].as_deref(), Some("2023-07-15"));
}

#[test]
fn test_repeated_headers_are_numbered() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("metadata.xlsx");
    write_metadata_xlsx(
        &path,
        &["Document No", "File Name", "File", "Title", "Title"],
        &[&["DOC-1", "a.txt", "", "Short", "Long"]],
    );

    let table = read_metadata(&path).unwrap();

    assert_eq!(
        table.columns,
        vec!["Document No", "File Name", "File", "Title", "Title.1"]
    );
    assert_eq!(table.rows[0][4].as_deref(), Some("Long"));
}
