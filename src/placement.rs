//! Placement of dropped files into a project's category directories.
//!
//! A placement classifies the file, resolves the effective directory for
//! its category, makes sure the directory exists, picks a free name and
//! copies the bytes. The source file is never modified and an existing
//! destination file is never overwritten.
use crate::category::{Category, classify};
use crate::config::{AppConfig, Project};
use crate::error::{PlacementError, Result};
use crate::paths::{Mode, resolve_paths};
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Lifecycle of one placement: `Processing`, then `Complete` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementStatus {
    Processing,
    Complete,
    Failed(String),
}

impl PlacementStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, PlacementStatus::Complete)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PlacementStatus::Failed(_))
    }
}

impl fmt::Display for PlacementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementStatus::Processing => f.write_str("Processing"),
            PlacementStatus::Complete => f.write_str("Complete"),
            PlacementStatus::Failed(reason) => write!(f, "Failed: {}", reason),
        }
    }
}

/// Log record of one placement attempt.
#[derive(Debug, Clone)]
pub struct FileCopyEntry {
    /// File name of the dropped file.
    pub filename: String,
    /// Extension without the leading dot, empty if none.
    pub extension: String,
    /// Category picked for the file.
    pub category: Category,
    pub status: PlacementStatus,
    /// Final path of the copy, set once complete.
    pub destination: Option<PathBuf>,
    /// When the attempt started.
    pub started_at: DateTime<Local>,
}

impl FileCopyEntry {
    fn processing(file_path: &Path) -> Self {
        let filename = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = file_path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let category = classify(&extension);

        Self {
            filename,
            extension,
            category,
            status: PlacementStatus::Processing,
            destination: None,
            started_at: Local::now(),
        }
    }
}

/// Outcome of [`place`].
pub type PlacementResult = FileCopyEntry;

/// Append-only record of the placements of a session.
#[derive(Debug, Default)]
pub struct PlacementLog {
    entries: Vec<FileCopyEntry>,
}

impl PlacementLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: FileCopyEntry) {
        self.entries.push(entry);
    }

    /// Entries in the order the files were processed.
    pub fn entries(&self) -> &[FileCopyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_failed()).count()
    }
}

/// Where a file would go, without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPlacement {
    pub category: Category,
    pub directory: PathBuf,
    pub destination: PathBuf,
}

/// Computes the category and destination of `file_path` for a project.
pub fn plan(file_path: &Path, project: &Project, mode: Mode) -> PlannedPlacement {
    let extension = file_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let category = classify(&extension);
    let effective = resolve_paths(&project.standard_paths, Some(&project.custom_paths), mode);
    let directory = effective.get(category).to_path_buf();
    let destination = match file_path.file_name() {
        Some(name) => unique_destination(&directory.join(name)),
        None => directory.clone(),
    };

    PlannedPlacement {
        category,
        directory,
        destination,
    }
}

/// Places one file into the project and returns its log entry.
///
/// Failures are reported through the entry's status, never as an `Err`,
/// so a caller looping over several files keeps going.
///
/// # Examples
///
/// ```no_run
/// use projorg::config::Project;
/// use projorg::paths::Mode;
/// use projorg::placement::place;
/// use std::path::Path;
///
/// let project = Project::new("Trip", Path::new("/root/Trip"));
/// let entry = place(Path::new("/tmp/photo.png"), &project, Mode::Standard);
/// println!("{}: {}", entry.filename, entry.status);
/// ```
pub fn place(file_path: &Path, project: &Project, mode: Mode) -> PlacementResult {
    let mut entry = FileCopyEntry::processing(file_path);
    let effective = resolve_paths(&project.standard_paths, Some(&project.custom_paths), mode);
    let directory = effective.get(entry.category);

    log::debug!(
        "{} classified as {}, target {}",
        entry.filename,
        entry.category,
        directory.display()
    );

    match copy_into(file_path, directory) {
        Ok(destination) => {
            log::info!("Placed {} at {}", file_path.display(), destination.display());
            entry.status = PlacementStatus::Complete;
            entry.destination = Some(destination);
        }
        Err(e) => {
            log::warn!("Placing {} failed: {}", file_path.display(), e);
            entry.status = PlacementStatus::Failed(e.to_string());
        }
    }
    entry
}

/// Places every path into the active project, one after another.
///
/// # Errors
///
/// Returns `NoActiveProject` or `ActiveProjectNotFound` before any file is
/// touched. Per-file failures are recorded in the log instead.
pub fn place_batch<P: AsRef<Path>>(config: &AppConfig, paths: &[P]) -> Result<PlacementLog> {
    place_batch_with(config, paths, |_| {})
}

/// Like [`place_batch`], calling `on_entry` after each file.
pub fn place_batch_with<P, F>(
    config: &AppConfig,
    paths: &[P],
    mut on_entry: F,
) -> Result<PlacementLog>
where
    P: AsRef<Path>,
    F: FnMut(&FileCopyEntry),
{
    let project = config.active()?;
    let mut placements = PlacementLog::new();
    for path in paths {
        let entry = place(path.as_ref(), project, config.mode);
        on_entry(&entry);
        placements.push(entry);
    }
    Ok(placements)
}

fn copy_into(file_path: &Path, directory: &Path) -> std::result::Result<PathBuf, PlacementError> {
    let file_name = file_path
        .file_name()
        .ok_or_else(|| PlacementError::InvalidSource {
            path: file_path.to_path_buf(),
            reason: "path has no file name".to_string(),
        })?;

    let mut source = open_source(file_path)?;
    if directory.as_os_str().is_empty() {
        return Err(PlacementError::DirectoryCreation {
            path: directory.to_path_buf(),
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                "no directory configured for this category",
            ),
        });
    }
    ensure_directory(directory)?;
    let (destination, mut target) = create_unique(&directory.join(file_name))?;

    io::copy(&mut source, &mut target).map_err(|e| PlacementError::Copy {
        from: file_path.to_path_buf(),
        to: destination.clone(),
        source: e,
    })?;

    if let Ok(metadata) = source.metadata()
        && let Err(e) = fs::set_permissions(&destination, metadata.permissions())
    {
        log::debug!("Could not copy permissions to {}: {}", destination.display(), e);
    }

    Ok(destination)
}

fn open_source(file_path: &Path) -> std::result::Result<File, PlacementError> {
    let invalid = |reason: String| PlacementError::InvalidSource {
        path: file_path.to_path_buf(),
        reason,
    };

    let file = File::open(file_path).map_err(|e| invalid(e.to_string()))?;
    let metadata = file.metadata().map_err(|e| invalid(e.to_string()))?;
    if !metadata.is_file() {
        return Err(invalid("not a regular file".to_string()));
    }
    Ok(file)
}

/// Creates `directory` and any missing parents. Succeeds if it already exists.
pub fn ensure_directory(directory: &Path) -> std::result::Result<(), PlacementError> {
    fs::create_dir_all(directory).map_err(|source| PlacementError::DirectoryCreation {
        path: directory.to_path_buf(),
        source,
    })
}

/// Builds the `n`-th candidate name for `path`: `n == 0` is the path itself,
/// otherwise `<stem> (n)<.ext>` in the same directory.
fn candidate(path: &Path, n: u32) -> PathBuf {
    if n == 0 {
        return path.to_path_buf();
    }
    let mut name = path.file_stem().map(OsString::from).unwrap_or_default();
    name.push(format!(" ({})", n));
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    path.with_file_name(name)
}

/// Returns `path` if free, else the first free `<stem> (n)<.ext>` with n = 1, 2, …
///
/// ```
/// use projorg::placement::unique_destination;
/// use std::fs;
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::write(dir.path().join("report.pdf"), "a").unwrap();
/// fs::write(dir.path().join("report (1).pdf"), "b").unwrap();
///
/// let next = unique_destination(&dir.path().join("report.pdf"));
/// assert_eq!(next, dir.path().join("report (2).pdf"));
/// ```
pub fn unique_destination(path: &Path) -> PathBuf {
    (0..)
        .map(|n| candidate(path, n))
        .find(|p| !p.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Probes names like [`unique_destination`] and opens the first free one
/// with `create_new`, so a name claimed by someone else between the check
/// and the open is skipped rather than overwritten.
fn create_unique(path: &Path) -> std::result::Result<(PathBuf, File), PlacementError> {
    let mut n = 0u32;
    loop {
        let destination = candidate(path, n);
        if destination.exists() {
            log::debug!("{} exists, trying next name", destination.display());
            n += 1;
            continue;
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&destination)
        {
            Ok(file) => return Ok((destination, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(e) => {
                return Err(PlacementError::Copy {
                    from: path.to_path_buf(),
                    to: destination,
                    source: e,
                });
            }
        }
    }
}
