//! Handover Index Library
//!
//! This library walks a directory tree, joins every file against a document metadata
//! export keyed by file name, and renders the result as a spreadsheet with a data sheet
//! and a table-of-contents sheet whose links stay valid when the tree is copied.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{
    Category, DirEntry, ErrorItem, MergedRow, MetadataTable, RootLabel, RunSummary, TocEntry,
};

use services::sink::{ReportSink, SinkFinish};
use std::fmt;
use std::path::{Path, PathBuf};
use std::result;
use std::sync::Arc;

/// Name of the artifact written into the target directory.
pub const OUTPUT_FILE_NAME: &str = "Handover Index.xlsm";
/// Metadata export looked up next to the executable.
pub const METADATA_FILE_NAME: &str = "metadata.xls";
/// Macro project embedded into the workbook when present next to the executable.
pub const VBA_PROJECT_FILE_NAME: &str = "vbaProject.bin";

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    Metadata {
        path: PathBuf,
        message: String,
        required: Vec<String>,
    },
    MissingColumns(Vec<String>),
    Render(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Metadata {
                path,
                message,
                required,
            } => write!(
                f,
                "Metadata error: could not read '{}': {message}. The metadata export must exist \
                 at that location and have a header row with at least these columns: {}",
                path.display(),
                required.join(", ")
            ),
            Error::MissingColumns(columns) => write!(
                f,
                "Metadata error: please check these column names are present in the metadata file: {columns:?}"
            ),
            Error::Render(msg) => write!(f, "Render error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Column names the metadata export is joined and filled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataColumns {
    pub identifier: String,
    pub file_name: String,
    pub file_type: String,
}

impl Default for MetadataColumns {
    fn default() -> Self {
        Self {
            identifier: "Document No".to_string(),
            file_name: "File Name".to_string(),
            file_type: "File".to_string(),
        }
    }
}

impl MetadataColumns {
    #[must_use]
    pub fn required(&self) -> [&str; 3] {
        [
            self.identifier.as_str(),
            self.file_name.as_str(),
            self.file_type.as_str(),
        ]
    }
}

/// Pipeline stage, reported to the configured notifier before it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadingMetadata,
    Scanning,
    Merging,
    BuildingContents,
    Linking,
    Saving,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::LoadingMetadata => "Loading metadata...",
            Stage::Scanning => "Getting directory tree...",
            Stage::Merging => "Merging metadata...",
            Stage::BuildingContents => "Creating table of contents...",
            Stage::Linking => "Generating hyperlinks...",
            Stage::Saving => "Saving workbook...",
        })
    }
}

pub type StageNotifier = Arc<dyn Fn(Stage) + Send + Sync>;

/// Immutable settings shared by every stage of a run
#[derive(Clone)]
pub struct ReportConfig {
    pub output_file_name: String,
    pub metadata_path: PathBuf,
    pub vba_project: Option<PathBuf>,
    pub columns: MetadataColumns,
    /// Directories whose name starts with this character are not descended into.
    pub prune_marker: char,
    /// Dots of indentation per depth level in the table of contents.
    pub toc_indent: usize,
    pub link_separator: char,
    pub stage_notifier: Option<StageNotifier>,
}

impl fmt::Debug for ReportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportConfig")
            .field("output_file_name", &self.output_file_name)
            .field("metadata_path", &self.metadata_path)
            .field("vba_project", &self.vba_project)
            .field("columns", &self.columns)
            .field("prune_marker", &self.prune_marker)
            .field("toc_indent", &self.toc_indent)
            .field("link_separator", &self.link_separator)
            .field("stage_notifier", &self.stage_notifier.is_some())
            .finish()
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        let program_dir = program_dir();
        let vba_project = program_dir.join(VBA_PROJECT_FILE_NAME);

        Self {
            output_file_name: OUTPUT_FILE_NAME.to_string(),
            metadata_path: program_dir.join(METADATA_FILE_NAME),
            vba_project: vba_project.is_file().then_some(vba_project),
            columns: MetadataColumns::default(),
            prune_marker: '$',
            toc_indent: 6,
            link_separator: std::path::MAIN_SEPARATOR,
            stage_notifier: None,
        }
    }
}

impl ReportConfig {
    fn notify(&self, stage: Stage) {
        log::info!("{stage}");
        if let Some(notifier) = &self.stage_notifier {
            notifier(stage);
        }
    }
}

/// Directory holding the running executable, falling back to the working directory.
#[must_use]
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Generate the handover workbook inside `target`.
///
/// # Errors
/// Fails when the target is not an existing directory, when the metadata export is
/// missing, unreadable or lacks a required column, and when the workbook cannot be
/// written. Nothing is written to `target` unless every earlier stage succeeded.
pub fn generate_report<P: AsRef<Path>>(target: P, config: &ReportConfig) -> Result<RunSummary> {
    let target = services::scan::resolve_target(target.as_ref())?;
    let sink = services::sink::workbook::WorkbookSink::new(&target, config);
    run_pipeline(&target, config, Box::new(sink)).map(|(summary, _)| summary)
}

/// Run the full pipeline, handing the rendered sheets to `sink`.
///
/// Returns the run summary together with whatever the sink reported on finishing.
///
/// # Errors
/// See [`generate_report`].
pub fn generate_report_with_sink<P: AsRef<Path>>(
    target: P,
    config: &ReportConfig,
    sink: Box<dyn ReportSink>,
) -> Result<(RunSummary, SinkFinish)> {
    let target = services::scan::resolve_target(target.as_ref())?;
    run_pipeline(&target, config, sink)
}

/// Pipeline body; `target` has already been through `resolve_target`.
fn run_pipeline(
    target: &Path,
    config: &ReportConfig,
    mut sink: Box<dyn ReportSink>,
) -> Result<(RunSummary, SinkFinish)> {
    config.notify(Stage::LoadingMetadata);
    let table = io::metadata::read_metadata(&config.metadata_path).map_err(|e| {
        Error::Metadata {
            path: config.metadata_path.clone(),
            message: e.to_string(),
            required: config
                .columns
                .required()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    })?;
    let index = services::merge::MetadataIndex::build(&table, &config.columns)?;

    config.notify(Stage::Scanning);
    let scan = services::scan::scan_tree(target, config.prune_marker)?;

    config.notify(Stage::Merging);
    let rows = services::merge::merge_metadata(&scan.entries, &index);

    config.notify(Stage::BuildingContents);
    let toc = services::toc::build_contents(&scan.entries, config.toc_indent);

    config.notify(Stage::Linking);
    let headers = services::table::data_headers(&index);
    let contents = services::table::contents_lines(&toc, &rows);

    config.notify(Stage::Saving);
    let render_err = |e: std::io::Error| Error::Render(e.to_string());
    sink.set_columns(&headers).map_err(render_err)?;
    for row in &rows {
        sink.record_row(services::table::data_row(row, config.link_separator))
            .map_err(render_err)?;
    }
    sink.set_contents(contents).map_err(render_err)?;
    let finish = sink.finish().map_err(render_err)?;

    let folder_count = scan.entries.iter().filter(|e| e.is_folder()).count();
    let summary = RunSummary {
        target: target.to_string_lossy().to_string(),
        output: finish
            .output_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default(),
        folder_count,
        file_count: scan.entries.len() - folder_count,
        row_count: rows.len(),
        metadata_rows: table.rows.len(),
        matched_rows: rows.iter().filter(|r| r.matched).count(),
        macro_embedded: finish.macro_embedded,
        errors: scan.errors,
    };

    log::info!(
        "Report complete: {} rows ({} folders, {} files, {} matched)",
        summary.row_count,
        summary.folder_count,
        summary.file_count,
        summary.matched_rows
    );

    Ok((summary, finish))
}
