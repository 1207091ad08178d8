//! Metadata export readers
//!
//! The export is a table whose first row names the columns. Spreadsheet formats are
//! read with calamine (first worksheet only); Parquet exports are read through the
//! Arrow record batch reader. Blank cells become `None` regardless of format; other
//! cells keep their text exactly, since the file name column is matched verbatim
//! against names on disk. Date cells are rendered as ISO dates.

use crate::models::MetadataTable;
use arrow_array::cast::AsArray;
use arrow_array::types::{
    Date32Type, Date64Type, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type,
    UInt64Type,
};
use arrow_array::{Array, RecordBatch};
use arrow_schema::DataType;
use calamine::{Data, DataType as _, Reader, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashSet;
use std::fs::File;
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Spreadsheet extensions handed to calamine.
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Read a metadata export, picking the reader from the file extension.
pub fn read_metadata(path: &Path) -> Result<MetadataTable> {
    if !path.is_file() {
        return Err(Error::new(
            ErrorKind::NotFound,
            format!("no file at {}", path.display()),
        ));
    }

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let mut table = if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        read_spreadsheet(path)?
    } else if extension == "parquet" {
        read_parquet(path)?
    } else {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("unsupported metadata format '.{extension}'"),
        ));
    };

    table.columns = dedupe_headers(table.columns);

    log::debug!(
        "Loaded metadata from {}: {} columns, {} rows",
        path.display(),
        table.columns.len(),
        table.rows.len()
    );

    Ok(table)
}

/// Read the first worksheet of a spreadsheet export.
pub fn read_spreadsheet(path: &Path) -> Result<MetadataTable> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::new(ErrorKind::InvalidData, "workbook has no worksheets"))?
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(MetadataTable::default());
    };

    let columns: Vec<String> = header
        .iter()
        .map(|cell| spreadsheet_value(cell).unwrap_or_default())
        .collect();

    let rows = rows
        .map(|row| {
            let mut values: Vec<Option<String>> = row.iter().map(spreadsheet_value).collect();
            values.resize(columns.len(), None);
            values
        })
        .filter(|values| values.iter().any(Option::is_some))
        .collect();

    Ok(MetadataTable { columns, rows })
}

fn spreadsheet_value(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) if !dt.is_duration() => cell
            .as_datetime()
            .map_or_else(|| cell.to_string(), format_datetime),
        Data::DateTimeIso(iso) => iso.clone(),
        other => other.to_string(),
    };
    normalize(text)
}

/// Read a Parquet export; every column must be a string, integer, float, boolean or date.
pub fn read_parquet(path: &Path) -> Result<MetadataTable> {
    let file = File::open(path)?;

    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect();

    let reader = builder
        .build()
        .map_err(|e| Error::new(ErrorKind::InvalidData, e))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        append_batch_rows(&batch, &mut rows)?;
    }

    Ok(MetadataTable { columns, rows })
}

fn append_batch_rows(batch: &RecordBatch, rows: &mut Vec<Vec<Option<String>>>) -> Result<()> {
    for row_idx in 0..batch.num_rows() {
        let mut values = Vec::with_capacity(batch.num_columns());
        for (col_idx, column) in batch.columns().iter().enumerate() {
            let value = arrow_value(column.as_ref(), row_idx).ok_or_else(|| {
                Error::new(
                    ErrorKind::InvalidData,
                    format!(
                        "Invalid type for: {} ({})",
                        batch.schema().field(col_idx).name(),
                        column.data_type()
                    ),
                )
            })?;
            values.push(value);
        }
        if values.iter().any(Option::is_some) {
            rows.push(values);
        }
    }
    Ok(())
}

/// `None` for unsupported column types, `Some(None)` for null or blank cells.
fn arrow_value(array: &dyn Array, row: usize) -> Option<Option<String>> {
    let text = match array.data_type() {
        DataType::Utf8 => array.as_string_opt::<i32>()?.value(row).to_string(),
        DataType::LargeUtf8 => array.as_string_opt::<i64>()?.value(row).to_string(),
        DataType::Int32 => array.as_primitive_opt::<Int32Type>()?.value(row).to_string(),
        DataType::Int64 => array.as_primitive_opt::<Int64Type>()?.value(row).to_string(),
        DataType::UInt32 => array.as_primitive_opt::<UInt32Type>()?.value(row).to_string(),
        DataType::UInt64 => array.as_primitive_opt::<UInt64Type>()?.value(row).to_string(),
        DataType::Float32 => {
            format_float(f64::from(array.as_primitive_opt::<Float32Type>()?.value(row)))
        }
        DataType::Float64 => format_float(array.as_primitive_opt::<Float64Type>()?.value(row)),
        DataType::Boolean => array.as_boolean_opt()?.value(row).to_string(),
        DataType::Date32 => {
            format_date(array.as_primitive_opt::<Date32Type>()?.value_as_date(row))
        }
        DataType::Date64 => {
            format_date(array.as_primitive_opt::<Date64Type>()?.value_as_date(row))
        }
        DataType::Null => return Some(None),
        _ => return None,
    };

    if array.is_null(row) {
        return Some(None);
    }
    Some(normalize(text))
}

/// Whole floats print without a fractional part so numeric ids match their text form.
#[allow(clippy::cast_possible_truncation)]
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn format_date(value: Option<NaiveDate>) -> String {
    value.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Whitespace-only cells are absent; anything else is kept verbatim.
fn normalize(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Repeated header names get `.1`, `.2`, ... suffixes so every column stays addressable.
pub fn dedupe_headers(columns: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut unique = Vec::with_capacity(columns.len());

    for name in columns {
        let mut candidate = name.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{name}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        unique.push(candidate);
    }

    unique
}
