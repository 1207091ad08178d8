//! In-memory sink retaining the rendered sheets for callers that inspect them.

use super::{ReportSink, SinkFinish};
use crate::services::table::{Cell, ContentsLine};
use std::io;

#[derive(Default)]
pub struct MemorySink {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    contents: Vec<ContentsLine>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemorySink {
    fn set_columns(&mut self, headers: &[String]) -> io::Result<()> {
        self.headers = headers.to_vec();
        Ok(())
    }

    fn record_row(&mut self, row: Vec<Cell>) -> io::Result<()> {
        if row.len() != self.headers.len() {
            return Err(io::Error::other(format!(
                "row has {} cells but the sheet has {} columns",
                row.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    fn set_contents(&mut self, contents: Vec<ContentsLine>) -> io::Result<()> {
        self.contents = contents;
        Ok(())
    }

    fn finish(self: Box<Self>) -> io::Result<SinkFinish> {
        let row_count = self.rows.len() as u64;
        Ok(SinkFinish {
            headers: self.headers,
            rows: self.rows,
            contents: self.contents,
            row_count,
            output_path: None,
            macro_embedded: false,
        })
    }
}
