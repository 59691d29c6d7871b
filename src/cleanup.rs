//! Run log and previous-run cleanup.
//!
//! Every file a conversion writes below the Docusaurus root is appended to a
//! plain-text log, one record per line:
//!
//! ```text
//! 2024-05-01 09:30:12,Intro__de.md,/i18n/de/docusaurus-plugin-content-docs/current/guide/01-Intro.md
//! ```
//!
//! The next run reads the log before writing anything, removes the recorded
//! files and whatever directories they leave empty, then deletes the log.
//! Hand-written files in the site are never touched because they never
//! appear in the log.
//!
//! ## Removal order
//!
//! 1. Every logged file.
//! 2. Every ancestor directory of a logged file, deepest first, stopping
//!    below the Docusaurus root. Directories that still hold other files
//!    are left alone.
//! 3. The log itself.
//!
//! Failures in steps 1 and 2 are collected in the [`CleanupReport`] and do
//! not stop the pass.

use crate::destination::to_filesystem_path;
use chrono::Local;
use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    /// Source file name inside the vault.
    pub source_name: String,
    /// Destination relative to the Docusaurus root, starting with `/`.
    pub destination: String,
}

impl LogEntry {
    /// Entry stamped with the current local time.
    pub fn now(source_name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            source_name: source_name.into(),
            destination: destination.into(),
        }
    }

    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.timestamp, self.source_name, self.destination)
    }

    /// Parse one log line.
    ///
    /// The timestamp ends at the first comma and the destination starts after
    /// the last, so source names containing commas survive.
    pub fn parse(line: &str) -> Option<Self> {
        let (timestamp, rest) = line.trim_end().split_once(',')?;
        let (source_name, destination) = rest.rsplit_once(',')?;
        if destination.is_empty() {
            return None;
        }
        Some(Self {
            timestamp: timestamp.to_string(),
            source_name: source_name.to_string(),
            destination: destination.to_string(),
        })
    }
}

/// Append-only writer for the run log.
#[derive(Debug)]
pub struct RunLog {
    file: File,
    written: usize,
}

impl RunLog {
    /// Open (or create) the log for appending.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self { file, written: 0 })
    }

    pub fn append(&mut self, entry: &LogEntry) -> io::Result<()> {
        writeln!(self.file, "{}", entry.to_line())?;
        self.written += 1;
        Ok(())
    }

    pub fn record(&mut self, source_name: &str, destination: &str) -> io::Result<()> {
        self.append(&LogEntry::now(source_name, destination))
    }

    /// Entries appended through this handle.
    pub fn written(&self) -> usize {
        self.written
    }
}

/// Read every well-formed entry. A missing log yields no entries.
pub fn read_log(path: &Path) -> Result<Vec<LogEntry>, CleanupError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    Ok(content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|line| {
            let entry = LogEntry::parse(line);
            if entry.is_none() {
                tracing::warn!(line, "ignoring malformed log line");
            }
            entry
        })
        .collect())
}

/// A path that could not be removed.
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// What a cleanup pass did.
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// `false` when there was no log to clean from.
    pub log_found: bool,
    pub files_removed: Vec<PathBuf>,
    pub dirs_removed: Vec<PathBuf>,
    /// Directories left in place because they still hold other files.
    pub dirs_kept: usize,
    pub failures: Vec<CleanupFailure>,
}

/// Remove everything the previous run recorded in `log_path`, then the log.
pub fn clean_previous_run(
    docusaurus_root: &Path,
    log_path: &Path,
) -> Result<CleanupReport, CleanupError> {
    let mut report = CleanupReport::default();
    if !log_path.exists() {
        tracing::debug!(log = %log_path.display(), "no run log, nothing to clean");
        return Ok(report);
    }
    report.log_found = true;

    let entries = read_log(log_path)?;
    let (files, dirs) = collect_targets(docusaurus_root, &entries);

    for file in files {
        match fs::remove_file(&file) {
            Ok(()) => report.files_removed.push(file),
            Err(error) => {
                tracing::warn!(path = %file.display(), "failed to remove file: {error}");
                report.failures.push(CleanupFailure { path: file, error });
            }
        }
    }

    for dir in dirs {
        match fs::remove_dir(&dir) {
            Ok(()) => report.dirs_removed.push(dir),
            Err(_) if dir_has_entries(&dir) => report.dirs_kept += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(path = %dir.display(), "failed to remove directory: {error}");
                report.failures.push(CleanupFailure { path: dir, error });
            }
        }
    }

    fs::remove_file(log_path)?;
    Ok(report)
}

/// Files to remove in log order, and their ancestor directories below the
/// root ordered deepest first.
fn collect_targets(root: &Path, entries: &[LogEntry]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut dirs = BTreeSet::new();

    for entry in entries {
        if entry.destination.split('/').any(|s| s == "..") {
            tracing::warn!(destination = %entry.destination, "ignoring log entry outside the site");
            continue;
        }
        let file = to_filesystem_path(root, &entry.destination);
        if file == root {
            continue;
        }
        let mut parent = file.parent();
        while let Some(dir) = parent {
            if dir == root || !dir.starts_with(root) {
                break;
            }
            dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        files.push(file);
    }

    let mut dirs: Vec<PathBuf> = dirs.into_iter().collect();
    dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
    (files, dirs)
}

fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
