//! Per-file outcome records collected for the run summary.

/// Result of one file for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Identifier shown to the user.
    pub name: String,
    /// Final status of the file.
    pub status: FileStatus,
    /// Optional detail message (skip reason or error description).
    pub message: Option<String>,
}

/// Status of a processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The operation completed.
    Ok,
    /// The operation was a correct no-op.
    Skipped,
    /// The operation could not complete.
    Failed,
}

impl FileStatus {
    /// Summary icon and ANSI colour for this status.
    #[must_use]
    pub const fn icon(self) -> (&'static str, &'static str) {
        match self {
            Self::Ok => ("✓", "\x1b[32m"),
            Self::Skipped => ("○", "\x1b[33m"),
            Self::Failed => ("✗", "\x1b[31m"),
        }
    }
}
