//! Left join of scanned entries against the metadata export

use crate::models::{Category, DirEntry, MergedRow, MetadataTable};
use crate::{Error, MetadataColumns, Result};
use std::collections::HashMap;
use std::path::Path;

/// Metadata export validated and indexed by file name
#[derive(Debug)]
pub struct MetadataIndex<'a> {
    table: &'a MetadataTable,
    identifier: usize,
    file_type: usize,
    extra: Vec<usize>,
    by_name: HashMap<&'a str, Vec<usize>>,
}

impl<'a> MetadataIndex<'a> {
    /// Check the required columns and index rows by file name.
    ///
    /// # Errors
    /// Returns `Error::MissingColumns` listing every required column the table lacks.
    pub fn build(table: &'a MetadataTable, columns: &MetadataColumns) -> Result<Self> {
        let missing: Vec<String> = columns
            .required()
            .into_iter()
            .filter(|name| !table.columns.iter().any(|c| c == *name))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let position = |name: &str| table.columns.iter().position(|c| c == name);
        let (Some(identifier), Some(file_name), Some(file_type)) = (
            position(columns.identifier.as_str()),
            position(columns.file_name.as_str()),
            position(columns.file_type.as_str()),
        ) else {
            return Err(Error::MissingColumns(Vec::new()));
        };

        let extra = (0..table.columns.len())
            .filter(|i| ![identifier, file_name, file_type].contains(i))
            .collect();

        let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
        for (row_idx, row) in table.rows.iter().enumerate() {
            if let Some(Some(name)) = row.get(file_name) {
                by_name.entry(name.as_str()).or_default().push(row_idx);
            }
        }

        log::debug!(
            "Indexed {} metadata rows under {} distinct file names",
            table.rows.len(),
            by_name.len()
        );

        Ok(Self {
            table,
            identifier,
            file_type,
            extra,
            by_name,
        })
    }

    /// Names of the carried-over metadata columns, in export order.
    pub fn extra_columns(&self) -> impl Iterator<Item = &str> {
        self.extra.iter().map(|&i| self.table.columns[i].as_str())
    }

    fn cell(&self, row: usize, col: usize) -> Option<String> {
        self.table.rows.get(row)?.get(col)?.clone()
    }

    fn matches(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map_or(&[][..], Vec::as_slice)
    }
}

/// Join every entry with each metadata row sharing its name, then fill defaults.
///
/// Entries without a match yield one row with empty metadata; entries matching
/// several metadata rows yield one row per match.
#[must_use]
pub fn merge_metadata(entries: &[DirEntry], index: &MetadataIndex<'_>) -> Vec<MergedRow> {
    let mut rows = Vec::with_capacity(entries.len());

    for entry in entries {
        let matches = entry.name.as_named().map_or(&[][..], |n| index.matches(n));

        if matches.is_empty() {
            rows.push(MergedRow {
                entry: entry.clone(),
                document_number: None,
                extension: None,
                extra: vec![None; index.extra.len()],
                matched: false,
            });
            continue;
        }

        for &row in matches {
            rows.push(MergedRow {
                entry: entry.clone(),
                document_number: index.cell(row, index.identifier),
                extension: index.cell(row, index.file_type),
                extra: index.extra.iter().map(|&col| index.cell(row, col)).collect(),
                matched: true,
            });
        }
    }

    rows.into_iter()
        .map(fill_document_number)
        .map(fill_extension)
        .collect()
}

/// Give files without a document number their name minus the extension.
#[must_use]
pub fn fill_document_number(mut row: MergedRow) -> MergedRow {
    if row.entry.category == Category::File
        && row.document_number.is_none()
        && let Some(name) = row.entry.name.as_named()
    {
        row.document_number = Some(strip_extension(name).to_string());
    }
    row
}

/// Give files without a type the suffix of their name.
#[must_use]
pub fn fill_extension(mut row: MergedRow) -> MergedRow {
    if row.entry.category == Category::File
        && row.extension.is_none()
        && let Some(name) = row.entry.name.as_named()
    {
        row.extension = name_extension(name).map(ToString::to_string);
    }
    row
}

/// `"manual.docx"` becomes `"manual"`; dotfiles and extensionless names are unchanged.
#[must_use]
pub fn strip_extension(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

/// Suffix without the leading dot, if the name has a non-empty one.
#[must_use]
pub fn name_extension(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}
