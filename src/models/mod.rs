//! Data models for scanned entries, merged report rows, and run summaries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Formula yielding the directory that holds the workbook, including the trailing separator.
pub const WORKBOOK_DIR_FORMULA: &str = r#"LEFT(CELL("filename",A1),FIND("[",CELL("filename",A1))-1)"#;

/// Kind of filesystem object a row describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Folder,
    File,
}

impl Category {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Folder => "Folder",
            Category::File => "File",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A name or relative path, or the placeholder used when the scan root is a drive root.
///
/// Scanning `E:\` yields an empty base name and an empty relative path. Rather than
/// carrying empty strings around, that case is `DriveRelative`, which the report
/// renders as a formula pointing at the workbook's own directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootLabel {
    Named(String),
    DriveRelative,
}

impl RootLabel {
    #[must_use]
    pub fn as_named(&self) -> Option<&str> {
        match self {
            RootLabel::Named(name) => Some(name),
            RootLabel::DriveRelative => None,
        }
    }
}

impl fmt::Display for RootLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RootLabel::Named(name) => f.write_str(name),
            RootLabel::DriveRelative => f.write_str("<drive root>"),
        }
    }
}

/// One scanned filesystem object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirEntry {
    pub path: PathBuf,
    /// Segments below the root's parent; the root itself is 1.
    pub depth: u16,
    pub name: RootLabel,
    pub category: Category,
    /// Folder the row belongs to: the folder itself for folders, the containing one for files.
    pub folder: RootLabel,
    pub relative_path: RootLabel,
    /// Path segments below the scan root, empty for the root itself.
    pub link_segments: Vec<String>,
}

impl DirEntry {
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.category == Category::Folder
    }
}

/// A scanned entry joined with at most one metadata record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRow {
    pub entry: DirEntry,
    pub document_number: Option<String>,
    pub extension: Option<String>,
    /// Non-key metadata columns, aligned with `MetadataTable::extra_columns`.
    pub extra: Vec<Option<String>>,
    pub matched: bool,
}

/// One line of the table of contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub path: PathBuf,
    pub relative_path: RootLabel,
    pub label: String,
    pub depth: u16,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub target: String,
    pub output: String,
    pub folder_count: usize,
    pub file_count: usize,
    pub row_count: usize,
    pub metadata_rows: usize,
    pub matched_rows: usize,
    pub macro_embedded: bool,
    pub errors: Vec<ErrorItem>,
}

/// Tabular metadata export, header row split from the values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataTable {
    pub columns: Vec<String>,
    /// Row-major cells; blank cells are `None`.
    pub rows: Vec<Vec<Option<String>>>,
}

/// Represents an error encountered during scanning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorItem {
    pub path: String,
    pub code: String,
    pub message: String,
}
