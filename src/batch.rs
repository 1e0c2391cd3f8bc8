//! Aggregate the outcomes of one lifecycle operation over many dotfiles.
//!
//! A failure never stops the batch: every entity is processed and the report
//! is turned into an error only at the end.
use thiserror::Error;

use crate::dotfile::{OpError, OpResult};

/// Outcome of one operation on one dotfile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The file reached the requested state.
    Done,
    /// The operation declined; the reason says why.
    Skipped(String),
    /// The operation failed; the reason includes the underlying cause.
    Failed(String),
}

impl From<OpResult> for Outcome {
    fn from(result: OpResult) -> Self {
        match result {
            Ok(()) => Self::Done,
            Err(e @ OpError::Skip { .. }) => Self::Skipped(e.detail()),
            Err(e @ OpError::Fail { .. }) => Self::Failed(e.detail()),
        }
    }
}

/// One processed file.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Identifier shown to the user (store-relative path or argument).
    pub id: String,
    /// What happened.
    pub outcome: Outcome,
}

/// Raised when at least one file in a batch failed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{failed} file(s) failed")]
pub struct BatchError {
    /// Number of failed files.
    pub failed: usize,
    /// Number of skipped files.
    pub skipped: usize,
}

/// Ordered record of every file processed in a batch.
///
/// # Examples
///
/// ```
/// use dfm::batch::{BatchReport, Outcome};
///
/// let mut report = BatchReport::default();
/// report.record("bashrc", Outcome::Done);
/// report.record("vimrc", Outcome::Skipped("already linked".into()));
///
/// assert_eq!(report.summary(), "1 done, 1 skipped, 0 failed");
/// assert!(report.into_result().is_ok());
/// ```
#[derive(Debug, Default, Clone)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    /// Append an outcome.
    pub fn record(&mut self, id: impl Into<String>, outcome: impl Into<Outcome>) {
        self.entries.push(BatchEntry {
            id: id.into(),
            outcome: outcome.into(),
        });
    }

    /// All recorded entries, in processing order.
    #[must_use]
    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Number of files that reached the requested state.
    #[must_use]
    pub fn done(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Done))
    }

    /// Number of skipped files.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// Number of failed files.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// One-line count summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} done, {} skipped, {} failed",
            self.done(),
            self.skipped(),
            self.failed()
        )
    }

    /// Convert to an error if any file failed. Skips alone never fail a batch.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError`] when at least one entry failed.
    pub fn into_result(self) -> Result<(), BatchError> {
        let failed = self.failed();
        if failed == 0 {
            Ok(())
        } else {
            Err(BatchError {
                failed,
                skipped: self.skipped(),
            })
        }
    }
}
