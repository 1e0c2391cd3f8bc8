//! Outcome of a single lifecycle operation.
//!
//! Lifecycle operations return [`OpResult`]: `Ok(())` when the file reached
//! the requested state, [`OpError::Skip`] when the operation correctly
//! declined (already done, nothing to do) and [`OpError::Fail`] when it could
//! not complete. Batch callers match on the variant and keep going.

use std::io;

use thiserror::Error;

/// Result of a lifecycle operation on one dotfile.
pub type OpResult = Result<(), OpError>;

/// Why a lifecycle operation did not run to completion.
#[derive(Error, Debug)]
pub enum OpError {
    /// The desired end state already holds, or there is nothing to act on.
    #[error("{reason}")]
    Skip {
        /// Human-readable explanation.
        reason: String,
    },

    /// The operation could not reach the desired state.
    #[error("{reason}")]
    Fail {
        /// Human-readable explanation.
        reason: String,
        /// Underlying I/O error, when a filesystem call failed.
        #[source]
        source: Option<io::Error>,
    },
}

impl OpError {
    /// Build a [`OpError::Skip`].
    pub fn skip(reason: impl Into<String>) -> Self {
        Self::Skip {
            reason: reason.into(),
        }
    }

    /// Build a [`OpError::Fail`] without an underlying cause.
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
            source: None,
        }
    }

    /// Build a [`OpError::Fail`] from a failed filesystem call.
    pub fn io(reason: impl Into<String>, source: io::Error) -> Self {
        Self::Fail {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Whether this is a [`OpError::Skip`].
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        matches!(self, Self::Skip { .. })
    }

    /// Whether this is a [`OpError::Fail`].
    #[must_use]
    pub const fn is_fail(&self) -> bool {
        matches!(self, Self::Fail { .. })
    }

    /// Reason followed by the underlying cause, if any.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::Fail {
                reason,
                source: Some(source),
            } => format!("{reason}: {source}"),
            Self::Skip { reason } | Self::Fail { reason, .. } => reason.clone(),
        }
    }
}

/// Attach a description to a failed filesystem call.
pub(crate) trait IoResultExt<T> {
    /// Convert an I/O error into [`OpError::Fail`] with the given reason.
    fn or_fail(self, reason: impl FnOnce() -> String) -> Result<T, OpError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn or_fail(self, reason: impl FnOnce() -> String) -> Result<T, OpError> {
        self.map_err(|e| OpError::io(reason(), e))
    }
}
