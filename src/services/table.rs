//! Projection of merged rows onto the Data and Contents sheet columns.
//!
//! Links are spreadsheet formulas that prefix a path relative to the scanned root
//! with the directory the workbook is opened from, so the workbook keeps working
//! when the whole tree is copied elsewhere.

use crate::models::{MergedRow, RootLabel, TocEntry, WORKBOOK_DIR_FORMULA};
use crate::services::merge::MetadataIndex;
use crate::services::toc::parallel_lists;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DATA_SHEET: &str = "Data";
pub const CONTENTS_SHEET: &str = "Contents";

/// Generated Data sheet columns, in order.
pub const DATA_COLUMNS: [&str; 8] = [
    "RelativePath",
    "Spaces",
    "Folder",
    "Category",
    "Path",
    "Basename",
    "Document No",
    "Extension",
];
pub const CONTENTS_COLUMNS: [&str; 2] = ["Relative path", "Table of Contents"];

/// Zero-based Data sheet column holding the visible path link.
pub const PATH_COLUMN: u16 = 4;
/// Letter of the Data sheet column checked by the row-colouring rules.
pub const CATEGORY_COLUMN_LETTER: char = 'D';

/// A single rendered cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    /// Formula text including the leading `=`.
    Formula(String),
}

impl Cell {
    fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Cell::Empty, |v| Cell::Text(v.to_string()))
    }

    fn label(label: &RootLabel) -> Self {
        match label {
            RootLabel::Named(name) => Cell::Text(name.clone()),
            RootLabel::DriveRelative => Cell::Formula(format!("={WORKBOOK_DIR_FORMULA}")),
        }
    }
}

/// One Contents sheet line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentsLine {
    pub relative_path: Cell,
    pub link: Cell,
}

/// Data sheet headers: the generated columns followed by carried-over metadata columns.
///
/// A metadata column sharing a generated column's name is suffixed with ` (metadata)`.
#[must_use]
pub fn data_headers(index: &MetadataIndex<'_>) -> Vec<String> {
    let mut headers: Vec<String> = DATA_COLUMNS.iter().map(ToString::to_string).collect();
    for name in index.extra_columns() {
        if DATA_COLUMNS.contains(&name) {
            headers.push(format!("{name} (metadata)"));
        } else {
            headers.push(name.to_string());
        }
    }
    headers
}

/// Cells of one Data sheet row, aligned with [`data_headers`].
#[must_use]
pub fn data_row(row: &MergedRow, separator: char) -> Vec<Cell> {
    let entry = &row.entry;
    let link = link_path(&entry.link_segments, separator);

    let document = row
        .document_number
        .as_deref()
        .map_or(Cell::Empty, |doc| Cell::Formula(hyperlink_formula(&link, Some(doc))));

    let mut cells = Vec::with_capacity(DATA_COLUMNS.len() + row.extra.len());
    cells.push(Cell::label(&entry.relative_path));
    cells.push(Cell::Number(f64::from(entry.depth)));
    cells.push(Cell::label(&entry.folder));
    cells.push(Cell::Text(entry.category.to_string()));
    cells.push(Cell::Formula(hyperlink_formula(&link, None)));
    cells.push(Cell::label(&entry.name));
    cells.push(document);
    cells.push(Cell::optional_text(row.extension.as_deref()));
    cells.extend(row.extra.iter().map(|v| Cell::optional_text(v.as_deref())));
    cells
}

/// Contents lines linking each folder to its first row on the Data sheet.
#[must_use]
pub fn contents_lines(toc: &[TocEntry], rows: &[MergedRow]) -> Vec<ContentsLine> {
    let mut first_row: HashMap<&Path, usize> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        if row.entry.is_folder() {
            // Sheet rows are 1-based and the header occupies row 1.
            first_row.entry(row.entry.path.as_path()).or_insert(i + 2);
        }
    }

    let (targets, labels) = parallel_lists(toc);
    toc.iter()
        .zip(targets.into_iter().zip(labels))
        .map(|(entry, (target, label))| {
            let link = match first_row.get(entry.path.as_path()) {
                Some(&sheet_row) => Cell::Formula(internal_link_formula(sheet_row, label)),
                None => Cell::Text(label.to_string()),
            };
            ContentsLine {
                relative_path: Cell::label(target),
                link,
            }
        })
        .collect()
}

/// Path below the scanned root as written into links; the root itself is `.`.
#[must_use]
pub fn link_path(segments: &[String], separator: char) -> String {
    if segments.is_empty() {
        return ".".to_string();
    }
    segments.join(separator.to_string().as_str())
}

/// `=HYPERLINK(<workbook dir>&"<path>"[,"<text>"])`
#[must_use]
pub fn hyperlink_formula(path: &str, text: Option<&str>) -> String {
    let target = format!("{WORKBOOK_DIR_FORMULA}&\"{}\"", escape_formula_text(path));
    match text {
        Some(text) => format!("=HYPERLINK({target},\"{}\")", escape_formula_text(text)),
        None => format!("=HYPERLINK({target})"),
    }
}

/// Jump to the path column of `sheet_row` on the Data sheet.
#[must_use]
pub fn internal_link_formula(sheet_row: usize, text: &str) -> String {
    let column = char::from(b'A' + u8::try_from(PATH_COLUMN).unwrap_or(0));
    format!(
        "=HYPERLINK(\"#'{DATA_SHEET}'!{column}{sheet_row}\",\"{}\")",
        escape_formula_text(text)
    )
}

/// Double embedded quotes for use inside a formula string literal.
#[must_use]
pub fn escape_formula_text(text: &str) -> String {
    text.replace('"', "\"\"")
}

/// Row-colouring rule matching rows whose category cell equals `category`.
#[must_use]
pub fn category_rule(category: &str) -> String {
    format!("=INDIRECT(\"{CATEGORY_COLUMN_LETTER}\"&ROW())=\"{category}\"")
}
