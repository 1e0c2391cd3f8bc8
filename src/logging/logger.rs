//! Structured logger with per-file summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{FileEntry, FileStatus};
use super::subscriber::STAGE_TARGET;
use super::utils::log_file_path;

/// Structured logger with summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/dfm/<command>.log` (default `~/.cache/dfm/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    files: Mutex<Vec<FileEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber)
    /// via [`FileLayer`](super::subscriber::FileLayer); this constructor does
    /// not write to the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            files: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded file entries (test-only).
    #[cfg(test)]
    pub(crate) fn file_entries(&self) -> Vec<FileEntry> {
        self.files.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}

impl Logger {
    /// Record a file result for the summary.
    pub fn record_file(&self, name: &str, status: FileStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.files.lock() {
            guard.push(FileEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed files.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.files.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|f| f.status == FileStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded files.
    pub fn print_summary(&self) {
        let files = match self.files.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if files.is_empty() {
            return;
        }

        println!();
        self.stage("Summary");
        for entry in &files {
            self.info(&summary_line(entry));
        }

        println!();
        self.info(&totals_line(&files));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

fn summary_line(entry: &FileEntry) -> String {
    let (icon, color) = entry.status.icon();
    let suffix = entry
        .message
        .as_ref()
        .map_or_else(String::new, |msg| format!(" ({msg})"));
    format!("{color}{icon} {}{suffix}\x1b[0m", entry.name)
}

fn totals_line(files: &[FileEntry]) -> String {
    let count = |status: FileStatus| files.iter().filter(|f| f.status == status).count();
    format!(
        "{} files: \x1b[32m{} ok\x1b[0m, \x1b[33m{} skipped\x1b[0m, \x1b[31m{} failed\x1b[0m",
        files.len(),
        count(FileStatus::Ok),
        count(FileStatus::Skipped),
        count(FileStatus::Failed)
    )
}
