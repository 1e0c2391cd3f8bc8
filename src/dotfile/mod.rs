//! A single managed dotfile: where it is stored, where it must appear in
//! home, and the predicates and lifecycle operations over that pair.
//!
//! Nothing is cached. Every predicate re-inspects the filesystem, so an
//! entity is only ever as stale as the call that queries it.
mod error;
mod ops;
mod state;

pub use error::{OpError, OpResult};
pub use state::State;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::PathError;
use crate::fs;
use crate::paths::{PathResolver, StoredName, absolute_link_target};

/// One managed dotfile.
///
/// An alias is a stored symlink pointing at another store entry; for an
/// alias, `alias_target` holds the resolved target and that target (not the
/// alias file) is what gets linked into home.
#[derive(Debug, Clone)]
pub struct DotFile {
    stored: PathBuf,
    original: PathBuf,
    alias_target: Option<PathBuf>,
    resolver: Arc<PathResolver>,
}

impl DotFile {
    /// Create an entity for a stored file and its home location.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::RelativePath`] if either path is relative. This is
    /// a configuration error, not a per-file condition.
    pub fn new(
        resolver: Arc<PathResolver>,
        stored: PathBuf,
        original: PathBuf,
    ) -> Result<Self, PathError> {
        for path in [&stored, &original] {
            if !path.is_absolute() {
                return Err(PathError::RelativePath(path.clone()));
            }
        }
        Ok(Self {
            stored,
            original,
            alias_target: None,
            resolver,
        })
    }

    /// Create an alias entity for the store symlink at `stored`.
    ///
    /// Returns `None` when the link is not a valid alias: not a relative
    /// symlink, resolving outside the store root, or pointing at itself.
    #[must_use]
    pub fn alias(resolver: Arc<PathResolver>, stored: PathBuf) -> Option<Self> {
        let target = alias_target_of(&resolver, &stored)?;
        let original = resolver.home_path_for(&stored);
        let mut dotfile = Self::new(resolver, stored, original).ok()?;
        dotfile.alias_target = Some(target);
        Some(dotfile)
    }

    /// Absolute path inside the store.
    #[must_use]
    pub fn stored_path(&self) -> &Path {
        &self.stored
    }

    /// Absolute path inside home where the link or copy must exist.
    #[must_use]
    pub fn original_path(&self) -> &Path {
        &self.original
    }

    /// Resolved target of an alias entity.
    #[must_use]
    pub fn alias_target(&self) -> Option<&Path> {
        self.alias_target.as_deref()
    }

    /// Whether this entity is an alias of another store entry.
    #[must_use]
    pub const fn is_alias(&self) -> bool {
        self.alias_target.is_some()
    }

    /// Store-relative identifier, e.g. `config/git/config.host-box`.
    #[must_use]
    pub fn id(&self) -> String {
        self.resolver
            .store_relative(&self.stored)
            .unwrap_or(&self.stored)
            .display()
            .to_string()
    }

    /// Path the home location must resolve to when linked: the alias target
    /// for an alias, the stored path otherwise.
    #[must_use]
    pub fn link_source(&self) -> &Path {
        self.alias_target.as_deref().unwrap_or(&self.stored)
    }

    fn stored_name(&self) -> StoredName {
        self.resolver.stored_name(&self.stored)
    }

    /// Whether the stored name carries the forced-copy marker.
    #[must_use]
    pub fn must_be_copied(&self) -> bool {
        self.stored_name().force_copy
    }

    /// Whether the stored name carries the current host's marker.
    #[must_use]
    pub fn is_from_this_host(&self) -> bool {
        self.stored_name().is_for_host(self.resolver.host())
    }

    /// Whether the stored name carries no host marker at all.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.stored_name().is_host_specific()
    }

    /// Whether the content is in the store.
    ///
    /// For a plain entity the stored path is a regular file; for an alias the
    /// stored path is a symlink whose target is a regular file.
    #[must_use]
    pub fn is_stored(&self) -> bool {
        match &self.alias_target {
            Some(target) => fs::is_symlink(&self.stored) && fs::is_regular_file(target),
            None => fs::is_regular_file(&self.stored),
        }
    }

    /// Whether the home file can be moved into the store: it is a plain
    /// regular file and nothing occupies the stored path yet.
    #[must_use]
    pub fn is_ready_to_be_stored(&self) -> bool {
        fs::is_regular_file(&self.original) && !fs::exists(&self.stored)
    }

    /// Whether the home location holds what the store says it should.
    ///
    /// Linked entities have a symlink in home whose immediate target is the
    /// link source (same device and inode). Forced-copy entities have a
    /// regular file in home with content identical to the stored copy, and no
    /// plain stored file competes for the same name.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        if self.must_be_copied() {
            return self.is_copied();
        }

        if !self.is_stored() || !fs::is_symlink(&self.original) {
            return false;
        }

        std::fs::read_link(&self.original).is_ok_and(|raw| {
            let target = absolute_link_target(&self.original, &raw);
            fs::same_file(&target, self.link_source())
        })
    }

    fn is_copied(&self) -> bool {
        fs::is_regular_file(&self.original)
            && fs::is_regular_file(self.link_source())
            && !fs::exists(&self.uncopied_sibling())
            && fs::same_content(&self.original, self.link_source())
    }

    /// The stored path this entity would have without the forced-copy marker.
    fn uncopied_sibling(&self) -> PathBuf {
        let name = self.stored_name();
        let mut sibling = name.logical.into_os_string();
        if let Some(host) = name.host {
            sibling.push(format!("{}{host}", crate::host::HOST_MARKER_PREFIX));
        }
        self.resolver.store().join(sibling)
    }

    /// Current lifecycle state, derived from the filesystem.
    #[must_use]
    pub fn current_state(&self) -> State {
        if self.is_linked() {
            State::Linked
        } else if !self.is_stored() {
            State::Missing
        } else if !fs::exists(&self.original) {
            State::NotLinked
        } else {
            State::Conflict
        }
    }

    pub(crate) fn resolver(&self) -> &PathResolver {
        &self.resolver
    }
}

/// Resolve the alias target of the store symlink at `stored`, if it is a
/// valid single-hop alias inside the store.
fn alias_target_of(resolver: &PathResolver, stored: &Path) -> Option<PathBuf> {
    let raw = std::fs::read_link(stored).ok()?;
    if raw.is_absolute() {
        tracing::debug!(
            "ignoring {}: alias links must be relative",
            stored.display()
        );
        return None;
    }
    let target = absolute_link_target(stored, &raw);
    if target == stored || !target.starts_with(resolver.store()) || target == resolver.store() {
        tracing::debug!(
            "ignoring {}: link target {} is not a store entry",
            stored.display(),
            target.display()
        );
        return None;
    }
    Some(target)
}
