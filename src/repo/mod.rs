//! The store as a whole: scanning it into a working set and mapping
//! home-side arguments onto entities.
mod resolver;
mod scanner;

pub use resolver::ConflictResolver;
pub use scanner::StoreScanner;

use std::path::Path;
use std::sync::Arc;

use crate::dotfile::DotFile;
use crate::error::PathError;
use crate::paths::{PathResolver, normalize};

/// A store and home pair for one host.
#[derive(Debug, Clone)]
pub struct Repo {
    resolver: Arc<PathResolver>,
}

impl Repo {
    /// Create a repo over the resolver's roots.
    #[must_use]
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
        }
    }

    /// The path mapping in use.
    #[must_use]
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Scan the store and return the working set: exactly one entity per
    /// home path, ordered by home path.
    #[must_use]
    pub fn stored_dotfiles(&self) -> Vec<DotFile> {
        let scanner = StoreScanner::new(Arc::clone(&self.resolver));
        ConflictResolver.resolve(scanner.candidates())
    }

    /// Build the entity for storing the home file at `original`.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `original` is not a dotfile under home.
    pub fn dotfile_for(
        &self,
        original: &Path,
        host_specific: bool,
        force_copy: bool,
    ) -> Result<DotFile, PathError> {
        let stored = self
            .resolver
            .to_store_path(original, host_specific, force_copy)?;
        DotFile::new(Arc::clone(&self.resolver), stored, normalize(original))
    }

    /// Find the entity managing the home path `original`.
    ///
    /// The working set is consulted first so host-specific, forced-copy and
    /// alias entries resolve exactly as a scan would. If nothing in the store
    /// claims the path, a plain generic entity is returned.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `original` is not a dotfile under home.
    pub fn find(&self, original: &Path) -> Result<DotFile, PathError> {
        self.find_in(&self.stored_dotfiles(), original)
    }

    /// Like [`find`](Self::find), against an already scanned working set.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `original` is not a dotfile under home.
    pub fn find_in(&self, working_set: &[DotFile], original: &Path) -> Result<DotFile, PathError> {
        let fallback = self.dotfile_for(original, false, false)?;
        let found = working_set
            .iter()
            .find(|df| df.original_path() == fallback.original_path())
            .cloned();
        Ok(found.unwrap_or(fallback))
    }
}
