//! Top-down directory walk producing one `DirEntry` per folder and file.
//!
//! Each directory is listed before anything of it is emitted, so a directory that
//! cannot be read is skipped as a whole. Within a directory the folder's own entry
//! comes first, then its files, then each subdirectory's walk, all in name order.

use crate::models::{Category, DirEntry, ErrorItem, RootLabel};
use crate::{Error, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Entries and skipped-directory errors from one walk
#[derive(Debug, Default)]
pub struct ScanResult {
    pub entries: Vec<DirEntry>,
    pub errors: Vec<ErrorItem>,
}

/// Traversal context to track state during directory walk
struct TraversalContext {
    prune_marker: char,
    separator: char,
    entries: Vec<DirEntry>,
    errors: Vec<ErrorItem>,
}

impl TraversalContext {
    fn new(prune_marker: char) -> Self {
        Self {
            prune_marker,
            separator: std::path::MAIN_SEPARATOR,
            entries: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn should_prune(&self, name: &str) -> bool {
        name.starts_with(self.prune_marker)
    }

    fn join_relative(&self, segments: &[String]) -> String {
        let mut joined = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                joined.push(self.separator);
            }
            joined.push_str(segment);
        }
        joined
    }

    /// Record an error encountered during traversal
    fn record_error(&mut self, path: &Path, error: &std::io::Error) {
        let code = match error.kind() {
            std::io::ErrorKind::NotFound => "ENOENT",
            std::io::ErrorKind::PermissionDenied => "EACCES",
            _ => "IO",
        };

        log::warn!("Skipping {}: {error}", path.display());
        self.errors.push(ErrorItem {
            path: path.to_string_lossy().to_string(),
            code: code.to_string(),
            message: error.to_string(),
        });
    }
}

/// Directory listing split into files and descendable subdirectories
struct Listing {
    files: Vec<String>,
    dirs: Vec<String>,
}

fn list_directory(dir: &Path) -> std::io::Result<Listing> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            dirs.push(name);
        } else if file_type.is_symlink() {
            // Symlinked directories are neither listed as files nor followed.
            let points_to_dir = fs::metadata(entry.path()).is_ok_and(|m| m.is_dir());
            if points_to_dir {
                log::debug!("Not following directory link {}", entry.path().display());
            } else {
                files.push(name);
            }
        } else {
            files.push(name);
        }
    }

    files.sort();
    dirs.sort();
    Ok(Listing { files, dirs })
}

/// Make `target` absolute and lexically normalized, and check it is a directory.
///
/// # Errors
/// Returns `Error::InvalidInput` when the path does not exist or is not a directory.
pub fn resolve_target(target: &Path) -> Result<PathBuf> {
    let shown = target.to_string_lossy().to_string();

    if !target.exists() {
        return Err(Error::InvalidInput(format!(
            "Target path not found: {shown}"
        )));
    }

    if !target.is_dir() {
        return Err(Error::InvalidInput(format!(
            "Target path is not a directory: {shown}"
        )));
    }

    let absolute = std::path::absolute(target)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    Ok(normalized)
}

/// Label of the scan root: its base name, or the drive placeholder for filesystem roots.
#[must_use]
pub fn root_label(root: &Path) -> RootLabel {
    match root.file_name() {
        Some(name) if !name.is_empty() => RootLabel::Named(name.to_string_lossy().to_string()),
        _ => RootLabel::DriveRelative,
    }
}

/// Walk `root` top-down, skipping directories whose name starts with `prune_marker`.
///
/// # Errors
/// Returns an error when the root itself cannot be listed. Unreadable subdirectories
/// are skipped and reported in `ScanResult::errors`.
pub fn scan_tree(root: &Path, prune_marker: char) -> Result<ScanResult> {
    let mut context = TraversalContext::new(prune_marker);

    let listing = list_directory(root).map_err(|e| {
        Error::InvalidInput(format!("Cannot read target directory {}: {e}", root.display()))
    })?;

    let label = root_label(root);
    let mut segments = Vec::new();
    emit_directory(root, &label, &listing, &mut segments, &mut context);

    log::debug!(
        "Scan of {} produced {} entries ({} skipped directories)",
        root.display(),
        context.entries.len(),
        context.errors.len()
    );

    Ok(ScanResult {
        entries: context.entries,
        errors: context.errors,
    })
}

fn emit_directory(
    dir: &Path,
    label: &RootLabel,
    listing: &Listing,
    segments: &mut Vec<String>,
    context: &mut TraversalContext,
) {
    log::info!("Processing folder {label}");

    let depth = depth_for(segments.len());
    let relative_path = if segments.is_empty() {
        label.clone()
    } else {
        RootLabel::Named(context.join_relative(segments))
    };

    context.entries.push(DirEntry {
        path: dir.to_path_buf(),
        depth,
        name: label.clone(),
        category: Category::Folder,
        folder: label.clone(),
        relative_path,
        link_segments: segments.clone(),
    });

    for file in &listing.files {
        segments.push(file.clone());
        let entry = DirEntry {
            path: dir.join(file),
            depth: depth_for(segments.len()),
            name: RootLabel::Named(file.clone()),
            category: Category::File,
            folder: label.clone(),
            relative_path: RootLabel::Named(context.join_relative(segments)),
            link_segments: segments.clone(),
        };
        segments.pop();

        log::trace!("File entry: {} (depth: {})", entry.path.display(), entry.depth);
        context.entries.push(entry);
    }

    for name in &listing.dirs {
        if context.should_prune(name) {
            log::debug!("Pruning {}", dir.join(name).display());
            continue;
        }

        let child = dir.join(name);
        let child_listing = match list_directory(&child) {
            Ok(l) => l,
            Err(e) => {
                context.record_error(&child, &e);
                continue;
            }
        };

        segments.push(name.clone());
        emit_directory(
            &child,
            &RootLabel::Named(name.clone()),
            &child_listing,
            segments,
            context,
        );
        segments.pop();
    }
}

/// The root sits at depth 1; every segment below it adds one.
fn depth_for(segment_count: usize) -> u16 {
    u16::try_from(segment_count + 1).unwrap_or(u16::MAX)
}
