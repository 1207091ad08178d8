//! Table of contents derived from the folder entries of a scan

use crate::models::{DirEntry, RootLabel, TocEntry};

/// Character used to pad labels so nesting shows in a plain column.
pub const INDENT_CHAR: char = '.';

/// One entry per folder, in scan order, labelled with depth-proportional indentation.
#[must_use]
pub fn build_contents(entries: &[DirEntry], indent_unit: usize) -> Vec<TocEntry> {
    entries
        .iter()
        .filter(|entry| entry.is_folder())
        .map(|entry| {
            let name = match &entry.name {
                RootLabel::Named(name) => name.clone(),
                RootLabel::DriveRelative => entry.path.to_string_lossy().to_string(),
            };
            TocEntry {
                path: entry.path.clone(),
                relative_path: entry.relative_path.clone(),
                label: indent_label(&name, entry.depth, indent_unit),
                depth: entry.depth,
            }
        })
        .collect()
}

/// Split contents into the link targets and the visible labels.
#[must_use]
pub fn parallel_lists(toc: &[TocEntry]) -> (Vec<&RootLabel>, Vec<&str>) {
    toc.iter()
        .map(|entry| (&entry.relative_path, entry.label.as_str()))
        .unzip()
}

/// Prefix `name` with `depth * unit` indent characters.
#[must_use]
pub fn indent_label(name: &str, depth: u16, unit: usize) -> String {
    let width = usize::from(depth) * unit;
    let mut label = String::with_capacity(width + name.len());
    label.extend(std::iter::repeat_n(INDENT_CHAR, width));
    label.push_str(name);
    label
}

/// Number of leading indent characters in a label.
#[must_use]
pub fn indent_width(label: &str) -> usize {
    label.chars().take_while(|&c| c == INDENT_CHAR).count()
}
