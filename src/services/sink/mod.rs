//! Report sinks receiving the rendered Data and Contents sheets.

use crate::services::table::{Cell, ContentsLine};
use std::io;
use std::path::PathBuf;

/// Result returned by a sink after the report has been handed over.
#[derive(Debug, Default)]
pub struct SinkFinish {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    pub contents: Vec<ContentsLine>,
    pub row_count: u64,
    pub output_path: Option<PathBuf>,
    pub macro_embedded: bool,
}

impl SinkFinish {
    #[must_use]
    pub fn written(output_path: PathBuf, row_count: u64, macro_embedded: bool) -> Self {
        Self {
            row_count,
            output_path: Some(output_path),
            macro_embedded,
            ..Self::default()
        }
    }
}

/// Trait implemented by sinks that receive the report sheets.
pub trait ReportSink {
    /// Provide the Data sheet header row; called before any row.
    fn set_columns(&mut self, headers: &[String]) -> io::Result<()>;

    /// Record one Data sheet row.
    fn record_row(&mut self, row: Vec<Cell>) -> io::Result<()>;

    /// Provide the Contents sheet lines.
    fn set_contents(&mut self, contents: Vec<ContentsLine>) -> io::Result<()>;

    /// Finalize the sink once every row has been recorded.
    fn finish(self: Box<Self>) -> io::Result<SinkFinish>;
}

pub mod memory;
pub mod workbook;
