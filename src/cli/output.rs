//! Output formatting for CLI

use crate::RunSummary;
use std::fmt::Write;
use std::path::Path;

/// Completion message naming where the workbook was stored
#[must_use]
pub fn format_text(summary: &RunSummary) -> String {
    let location = Path::new(&summary.output)
        .parent()
        .map_or_else(|| summary.target.clone(), |p| p.display().to_string());

    let mut text = format!(
        "SUCCESS - Complete. Output file stored under {location}. Please don't move it from this location.\n\
         {} folders, {} files, {} rows ({} matched against metadata)",
        summary.folder_count, summary.file_count, summary.row_count, summary.matched_rows
    );

    if !summary.macro_embedded {
        text.push_str("\nNote: no macro project was embedded");
    }

    if !summary.errors.is_empty() {
        let _ = write!(
            text,
            "\nWarning: {} directories could not be read and were skipped",
            summary.errors.len()
        );
    }

    text
}

/// Format summary as JSON
pub fn format_json(summary: &RunSummary) -> String {
    let output = serde_json::json!({
        "target": summary.target,
        "output": summary.output,
        "folders": summary.folder_count,
        "files": summary.file_count,
        "rows": summary.row_count,
        "metadata_rows": summary.metadata_rows,
        "matched_rows": summary.matched_rows,
        "macro_embedded": summary.macro_embedded,
        "error_count": summary.errors.len(),
        "errors": if summary.errors.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(summary.errors)
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}
