//! Spreadsheet sink writing the handover workbook.
//!
//! Rows are buffered and the whole workbook is rendered in `finish`. The bytes go to a
//! temporary file next to the destination which is then renamed over it, so a failed
//! run never leaves a truncated workbook behind.

use super::{ReportSink, SinkFinish};
use crate::ReportConfig;
use crate::models::Category;
use crate::services::table::{
    CONTENTS_COLUMNS, CONTENTS_SHEET, Cell, ContentsLine, DATA_SHEET, category_rule,
};
use rust_xlsxwriter::{
    Color, ConditionalFormatFormula, Format, FormatAlign, FormatBorder, Formula, Workbook,
    Worksheet, XlsxError,
};
use std::io::{Error, Result, Write};
use std::path::{Path, PathBuf};

/// Widths of the visible Data sheet columns, starting at column E.
const DATA_COLUMN_WIDTHS: [f64; 4] = [75.0, 35.0, 35.0, 10.0];
const METADATA_COLUMN_WIDTH: f64 = 25.0;
/// Leading Data sheet columns kept for filtering and navigation but hidden.
const HIDDEN_DATA_COLUMNS: u16 = 4;
const CONTENTS_WIDTH: f64 = 70.0;

const USAGE_NOTE: &str = "NOTE\n\n\
    * Click table of contents values to jump to the relevant folder in the Data tab\n\n\
    * In the Data tab, click on a value under \"Document No\" or \"Path\" to open the file or folder\n\n\
    * The Data tab can be filtered, but avoid sorting it as this breaks the contents links";

/// Sink implementation that renders the report into an `.xlsm`/`.xlsx` workbook.
pub struct WorkbookSink {
    output_path: PathBuf,
    vba_project: Option<PathBuf>,
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    contents: Vec<ContentsLine>,
}

impl WorkbookSink {
    /// Create a sink writing into `target_dir` under the configured file name.
    ///
    /// Without a macro project the workbook cannot be a valid `.xlsm` package, so the
    /// file name falls back to the `.xlsx` extension.
    #[must_use]
    pub fn new(target_dir: &Path, config: &ReportConfig) -> Self {
        let vba_project = config.vba_project.clone().filter(|p| p.is_file());
        let mut output_path = target_dir.join(&config.output_file_name);

        if vba_project.is_none() && has_extension(&output_path, "xlsm") {
            log::warn!(
                "No macro project found{}; writing a macro-free workbook instead",
                config
                    .vba_project
                    .as_ref()
                    .map(|p| format!(" at {}", p.display()))
                    .unwrap_or_default()
            );
            output_path.set_extension("xlsx");
        }

        Self {
            output_path,
            vba_project,
            headers: Vec::new(),
            rows: Vec::new(),
            contents: Vec::new(),
        }
    }

    /// Destination the workbook will be written to.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn render(&self) -> std::result::Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.contents_sheet()?);
        workbook.push_worksheet(self.data_sheet()?);

        if let Some(vba) = &self.vba_project {
            workbook.add_vba_project(vba)?;
        }

        workbook.save_to_buffer()
    }

    fn contents_sheet(&self) -> std::result::Result<Worksheet, XlsxError> {
        let mut sheet = Worksheet::new();
        sheet.set_name(CONTENTS_SHEET)?;

        let header = Format::new().set_bold().set_border(FormatBorder::Thin);
        for (col, name) in (0u16..).zip(CONTENTS_COLUMNS) {
            sheet.write_string_with_format(0, col, name, &header)?;
        }

        for (row, line) in (1u32..).zip(&self.contents) {
            write_cell(&mut sheet, row, 0, &line.relative_path)?;
            write_cell(&mut sheet, row, 1, &line.link)?;
        }

        sheet.set_column_hidden(0)?;
        sheet.set_column_width(1, CONTENTS_WIDTH)?;

        let note = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);
        sheet.merge_range(1, 3, 12, 6, USAGE_NOTE, &note)?;

        Ok(sheet)
    }

    fn data_sheet(&self) -> std::result::Result<Worksheet, XlsxError> {
        let mut sheet = Worksheet::new();
        sheet.set_name(DATA_SHEET)?;

        let header = Format::new()
            .set_bold()
            .set_border_bottom(FormatBorder::Medium)
            .set_border_left(FormatBorder::Thin)
            .set_border_right(FormatBorder::Thin)
            .set_background_color(Color::RGB(0x00AD_D8E6))
            .set_align(FormatAlign::Center);
        for (col, name) in (0u16..).zip(&self.headers) {
            sheet.write_string_with_format(0, col, name, &header)?;
        }

        for (row, cells) in (1u32..).zip(&self.rows) {
            for (col, cell) in (0u16..).zip(cells) {
                write_cell(&mut sheet, row, col, cell)?;
            }
        }

        let last_col = u16::try_from(self.headers.len().saturating_sub(1)).unwrap_or(u16::MAX);
        let last_row = u32::try_from(self.rows.len()).unwrap_or(u32::MAX);
        if last_row > 0 {
            let folder = Format::new()
                .set_background_color(Color::RGB(0x00FF_C7CE))
                .set_font_color(Color::RGB(0x009C_0006))
                .set_border_bottom(FormatBorder::Thin)
                .set_border_top(FormatBorder::Thin)
                .set_bold();
            let file = Format::new().set_border(FormatBorder::Thin);

            let folder_rule = ConditionalFormatFormula::new()
                .set_rule(category_rule(Category::Folder.as_str()).as_str())
                .set_format(&folder);
            let file_rule = ConditionalFormatFormula::new()
                .set_rule(category_rule(Category::File.as_str()).as_str())
                .set_format(&file);

            sheet.add_conditional_format(1, 0, last_row, last_col, &folder_rule)?;
            sheet.add_conditional_format(1, 0, last_row, last_col, &file_rule)?;
        }

        sheet.set_freeze_panes(1, 0)?;

        for col in 0..HIDDEN_DATA_COLUMNS {
            sheet.set_column_hidden(col)?;
        }
        for (col, width) in (HIDDEN_DATA_COLUMNS..).zip(DATA_COLUMN_WIDTHS) {
            sheet.set_column_width(col, width)?;
        }
        let first_metadata_col = HIDDEN_DATA_COLUMNS + DATA_COLUMN_WIDTHS.len() as u16;
        for col in first_metadata_col..=last_col {
            sheet.set_column_width(col, METADATA_COLUMN_WIDTH)?;
        }

        Ok(sheet)
    }
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
) -> std::result::Result<(), XlsxError> {
    match cell {
        Cell::Empty => {}
        Cell::Text(text) => {
            sheet.write_string(row, col, text)?;
        }
        Cell::Number(value) => {
            sheet.write_number(row, col, *value)?;
        }
        Cell::Formula(formula) => {
            sheet.write_formula(row, col, Formula::new(formula))?;
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

impl ReportSink for WorkbookSink {
    fn set_columns(&mut self, headers: &[String]) -> Result<()> {
        self.headers = headers.to_vec();
        Ok(())
    }

    fn record_row(&mut self, row: Vec<Cell>) -> Result<()> {
        self.rows.push(row);
        Ok(())
    }

    fn set_contents(&mut self, contents: Vec<ContentsLine>) -> Result<()> {
        self.contents = contents;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<SinkFinish> {
        let bytes = self.render().map_err(Error::other)?;

        let dir = self
            .output_path
            .parent()
            .ok_or_else(|| Error::other("workbook path has no parent directory"))?;

        let mut staged = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
            Error::new(
                e.kind(),
                format!("cannot write into {}: {e}", dir.display()),
            )
        })?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.output_path).map_err(|e| {
            Error::new(
                e.error.kind(),
                format!("cannot save {}: {}", self.output_path.display(), e.error),
            )
        })?;

        log::info!(
            "Workbook saved: {} ({} rows, macro project: {})",
            self.output_path.display(),
            self.rows.len(),
            self.vba_project.is_some()
        );

        Ok(SinkFinish::written(
            self.output_path.clone(),
            self.rows.len() as u64,
            self.vba_project.is_some(),
        ))
    }
}
