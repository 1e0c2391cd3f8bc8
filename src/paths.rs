//! Bidirectional mapping between store-relative and home paths.
//!
//! A stored file `config/git/config` is expected at `~/.config/git/config`.
//! Stored names may carry a host marker (`.host-<name>`) and a forced-copy
//! marker (`.force-copy`) on their final component, in either order; both are
//! dropped when deriving the home path, which is host-agnostic.
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::PathError;
use crate::host::{FORCE_COPY_MARKER, HOST_MARKER_PREFIX, HostName, is_valid_name};

/// A store-relative path split into its logical name and markers.
///
/// # Examples
///
/// ```
/// use dfm::paths::StoredName;
/// use std::path::Path;
///
/// let name = StoredName::parse(Path::new("config/foo.host-box.force-copy"));
/// assert_eq!(name.logical, Path::new("config/foo"));
/// assert_eq!(name.host.as_deref(), Some("box"));
/// assert!(name.force_copy);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredName {
    /// The path with all markers removed.
    pub logical: PathBuf,
    /// Host named by a `.host-<name>` marker, if any.
    pub host: Option<String>,
    /// Whether the `.force-copy` marker is present.
    pub force_copy: bool,
}

impl StoredName {
    /// Split the markers off the final component of `rel`.
    #[must_use]
    pub fn parse(rel: &Path) -> Self {
        let Some(file_name) = rel.file_name().and_then(|n| n.to_str()) else {
            return Self {
                logical: rel.to_path_buf(),
                host: None,
                force_copy: false,
            };
        };

        let mut stem = file_name;
        let mut host = None;
        let mut force_copy = false;
        loop {
            if !force_copy
                && let Some(rest) = stem.strip_suffix(FORCE_COPY_MARKER)
                && !rest.is_empty()
            {
                stem = rest;
                force_copy = true;
                continue;
            }
            if host.is_none()
                && let Some((rest, name)) = split_host_marker(stem)
            {
                stem = rest;
                host = Some(name.to_string());
                continue;
            }
            break;
        }

        Self {
            logical: rel.with_file_name(stem),
            host,
            force_copy,
        }
    }

    /// Whether the name carries any host marker.
    #[must_use]
    pub const fn is_host_specific(&self) -> bool {
        self.host.is_some()
    }

    /// Whether the name carries the marker of `host`.
    #[must_use]
    pub fn is_for_host(&self, host: &HostName) -> bool {
        self.host.as_deref() == Some(host.as_str())
    }
}

fn split_host_marker(stem: &str) -> Option<(&str, &str)> {
    let (rest, name) = stem.rsplit_once(HOST_MARKER_PREFIX)?;
    (!rest.is_empty() && is_valid_name(name)).then_some((rest, name))
}

/// Maps paths between the store and home trees for one host.
#[derive(Debug, Clone)]
pub struct PathResolver {
    store: PathBuf,
    home: PathBuf,
    host: HostName,
}

impl PathResolver {
    /// Create a resolver for the given absolute roots.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::RelativePath`] if either root is relative.
    pub fn new(store: PathBuf, home: PathBuf, host: HostName) -> Result<Self, PathError> {
        for root in [&store, &home] {
            if !root.is_absolute() {
                return Err(PathError::RelativePath(root.clone()));
            }
        }
        Ok(Self {
            store: normalize(&store),
            home: normalize(&home),
            host,
        })
    }

    /// Root of the store tree.
    #[must_use]
    pub fn store(&self) -> &Path {
        &self.store
    }

    /// Root of the home tree.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The host this resolver maps for.
    #[must_use]
    pub const fn host(&self) -> &HostName {
        &self.host
    }

    /// Path of `stored` relative to the store root, if it lies inside it.
    #[must_use]
    pub fn store_relative<'a>(&self, stored: &'a Path) -> Option<&'a Path> {
        stored.strip_prefix(&self.store).ok()
    }

    /// Parse the markers of an absolute stored path.
    #[must_use]
    pub fn stored_name(&self, stored: &Path) -> StoredName {
        StoredName::parse(self.store_relative(stored).unwrap_or(stored))
    }

    /// Home location of the file stored at `stored_rel` (relative to the store).
    ///
    /// Any host marker and the forced-copy marker are removed, a dot is
    /// prepended, and the result is resolved under the home root.
    #[must_use]
    pub fn to_home_path(&self, stored_rel: &Path) -> PathBuf {
        let logical = StoredName::parse(stored_rel).logical;
        let mut dotted = OsString::from(".");
        dotted.push(logical.as_os_str());
        self.home.join(dotted)
    }

    /// Home location of an absolute stored path.
    #[must_use]
    pub fn home_path_for(&self, stored: &Path) -> PathBuf {
        self.to_home_path(self.store_relative(stored).unwrap_or(stored))
    }

    /// Store location for the dotfile at the absolute home path `original`.
    ///
    /// If `original` already is a symlink to a file in the store carrying this
    /// host's marker, that target is returned unchanged so repeated stores
    /// keep the file host-specific.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::OutsideHome`] if `original` is not under the home
    /// root and [`PathError::NotADotfile`] if its home-relative path does not
    /// start with a dot.
    pub fn to_store_path(
        &self,
        original: &Path,
        host_specific: bool,
        force_copy: bool,
    ) -> Result<PathBuf, PathError> {
        let original = normalize(original);
        let rel = original
            .strip_prefix(&self.home)
            .map_err(|_| PathError::OutsideHome(original.clone()))?;

        let rel = rel.to_string_lossy();
        let stripped = rel
            .strip_prefix('.')
            .filter(|s| !s.is_empty() && !s.starts_with(['.', '/']))
            .ok_or_else(|| PathError::NotADotfile(original.clone()))?;

        if let Some(existing) = self.linked_host_specific_target(&original) {
            return Ok(existing);
        }

        let mut stored = OsString::from(stripped);
        if host_specific {
            stored.push(self.host.suffix());
        }
        if force_copy {
            stored.push(FORCE_COPY_MARKER);
        }
        Ok(self.store.join(stored))
    }

    fn linked_host_specific_target(&self, original: &Path) -> Option<PathBuf> {
        let target = std::fs::read_link(original).ok()?;
        let target = absolute_link_target(original, &target);
        let is_ours = target.starts_with(&self.store)
            && target
                .file_name()
                .is_some_and(|n| n.to_string_lossy().ends_with(&self.host.suffix()));
        is_ours.then_some(target)
    }
}

/// Resolve a symlink's raw target against the directory containing `link`,
/// then normalize it lexically.
#[must_use]
pub fn absolute_link_target(link: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        normalize(raw)
    } else {
        normalize(&link.parent().unwrap_or(link).join(raw))
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Symlinks are not consulted.
///
/// # Examples
///
/// ```
/// use dfm::paths::normalize;
/// use std::path::Path;
///
/// assert_eq!(normalize(Path::new("/a/./b/../c")), Path::new("/a/c"));
/// ```
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
