//! Enumerate candidate dotfiles from the physical contents of the store.
use std::sync::Arc;

use crate::dotfile::DotFile;
use crate::fs::{self, StoreEntry};
use crate::paths::PathResolver;

/// Walks the store and yields one candidate per regular file or valid alias.
///
/// Each call to [`candidates`](Self::candidates) re-walks the tree; nothing is
/// cached between scans.
#[derive(Debug, Clone)]
pub struct StoreScanner {
    resolver: Arc<PathResolver>,
}

impl StoreScanner {
    /// Create a scanner over the resolver's store root.
    #[must_use]
    pub const fn new(resolver: Arc<PathResolver>) -> Self {
        Self { resolver }
    }

    /// Lazily produce candidates, before any precedence is applied.
    ///
    /// Symlinks that do not form a valid alias are dropped with a debug event.
    pub fn candidates(&self) -> impl Iterator<Item = DotFile> + '_ {
        fs::files_in(self.resolver.store()).filter_map(|entry| self.candidate(entry))
    }

    fn candidate(&self, entry: StoreEntry) -> Option<DotFile> {
        match entry {
            StoreEntry::File(stored) => {
                let original = self.resolver.home_path_for(&stored);
                match DotFile::new(Arc::clone(&self.resolver), stored, original) {
                    Ok(df) => Some(df),
                    Err(e) => {
                        tracing::debug!("skipping store entry: {e}");
                        None
                    }
                }
            }
            StoreEntry::Symlink(stored) => DotFile::alias(Arc::clone(&self.resolver), stored),
        }
    }
}
