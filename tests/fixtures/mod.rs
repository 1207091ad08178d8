//! Test fixtures for deterministic testing

#![allow(dead_code)]

use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use handover_index::{MetadataColumns, ReportConfig};
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Create a handover tree:
///
/// ```text
/// handover/
///   readme.txt
///   $RECYCLE.BIN/junk.txt
///   Drawings/GA.pdf
///   Drawings/Sections/S1.dwg
///   Reports/a.txt
///   Reports/b.txt
/// ```
pub fn create_handover_fixture(base: &Path) -> std::io::Result<PathBuf> {
    let root = base.join("handover");

    fs::create_dir_all(root.join("$RECYCLE.BIN"))?;
    fs::create_dir_all(root.join("Drawings/Sections"))?;
    fs::create_dir_all(root.join("Reports"))?;

    fs::write(root.join("readme.txt"), b"read me")?;
    fs::write(root.join("$RECYCLE.BIN/junk.txt"), b"junk")?;
    fs::write(root.join("Drawings/GA.pdf"), b"%PDF")?;
    fs::write(root.join("Drawings/Sections/S1.dwg"), b"dwg")?;
    fs::write(root.join("Reports/a.txt"), b"a")?;
    fs::write(root.join("Reports/b.txt"), b"b")?;

    Ok(root)
}

/// Write a metadata workbook with the given header and rows on its first sheet.
pub fn write_metadata_xlsx(path: &Path, header: &[&str], rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in (0u16..).zip(header) {
        sheet.write_string(0, col, *name).unwrap();
    }
    for (row, values) in (1u32..).zip(rows) {
        for (col, value) in (0u16..).zip(values.iter()) {
            if !value.is_empty() {
                sheet.write_string(row, col, *value).unwrap();
            }
        }
    }

    workbook.save(path).unwrap();
}

/// Write a Parquet metadata export with nullable string columns; empty strings become nulls.
pub fn write_metadata_parquet(path: &Path, header: &[&str], rows: &[&[&str]]) {
    let schema = Arc::new(Schema::new(
        header
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let columns: Vec<ArrayRef> = (0..header.len())
        .map(|col| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|row| row.get(col).copied().filter(|v| !v.is_empty()))
                .collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

/// Standard metadata: `a.txt` and `GA.pdf` are registered documents.
pub fn write_standard_metadata(path: &Path) {
    write_metadata_xlsx(
        path,
        &["Document No", "File Name", "File", "Title", "Revision"],
        &[
            &["DOC-1", "a.txt", "", "Report A", "B"],
            &["DWG-100", "GA.pdf", "PDF", "General Arrangement", "C"],
        ],
    );
}

/// Config pointing at `metadata`, with no macro project and forward-slash links.
pub fn test_config(metadata: &Path) -> ReportConfig {
    ReportConfig {
        output_file_name: "Handover Index.xlsm".to_string(),
        metadata_path: metadata.to_path_buf(),
        vba_project: None,
        columns: MetadataColumns::default(),
        prune_marker: '$',
        toc_indent: 6,
        link_separator: '/',
        stage_notifier: None,
    }
}
