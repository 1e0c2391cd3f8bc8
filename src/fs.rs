//! Filesystem primitives shared by the dotfile lifecycle and the store scanner.
//!
//! Predicates never follow the final symlink and never fail: a path that
//! cannot be inspected simply does not satisfy them.
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use walkdir::WalkDir;

/// Whether anything (including a dangling symlink) exists at `path`.
#[must_use]
pub fn exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Whether `path` is a regular file (not a symlink, not a directory).
#[must_use]
pub fn is_regular_file(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.file_type().is_file())
}

/// Whether `path` is a symbolic link, dangling or not.
#[must_use]
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink())
}

/// Whether `path` is a real directory (not a symlink to one).
#[must_use]
pub fn is_real_dir(path: &Path) -> bool {
    path.symlink_metadata().is_ok_and(|m| m.file_type().is_dir())
}

/// Whether `a` and `b` name the same filesystem object, compared by device
/// and inode without following a final symlink on either side.
#[must_use]
pub fn same_file(a: &Path, b: &Path) -> bool {
    let (Ok(ma), Ok(mb)) = (a.symlink_metadata(), b.symlink_metadata()) else {
        return false;
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt as _;
        ma.dev() == mb.dev() && ma.ino() == mb.ino()
    }

    #[cfg(not(unix))]
    {
        ma.file_type() == mb.file_type()
            && match (dunce::canonicalize(a), dunce::canonicalize(b)) {
                (Ok(ca), Ok(cb)) => ca == cb,
                _ => false,
            }
    }
}

/// SHA-256 digest of the file content at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn content_hash(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hasher.finalize().to_vec())
}

/// Whether the files at `a` and `b` have byte-identical content.
///
/// Unreadable files never compare equal.
#[must_use]
pub fn same_content(a: &Path, b: &Path) -> bool {
    match (content_hash(a), content_hash(b)) {
        (Ok(ha), Ok(hb)) => ha == hb,
        _ => false,
    }
}

/// A non-directory entry found while walking the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEntry {
    /// A regular file holding content.
    File(PathBuf),
    /// A symbolic link (possibly an alias to another store entry).
    Symlink(PathBuf),
}

impl StoreEntry {
    /// Absolute path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::File(p) | Self::Symlink(p) => p,
        }
    }
}

/// Lazily walk `dir`, yielding every regular file and symlink below it.
///
/// Hidden entries directly under `dir` are skipped and not descended into, so
/// repository metadata such as `.git` never shows up. Hidden names deeper in
/// the tree (`config/app/.secret`) are regular content. Symlinks are
/// reported, not followed. A missing `dir` yields nothing; unreadable
/// subtrees are skipped with a debug event.
pub fn files_in(dir: &Path) -> impl Iterator<Item = StoreEntry> + use<> {
    WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() != 1 || !e.file_name().to_string_lossy().starts_with('.'))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::debug!("skipping unreadable store entry: {err}");
                None
            }
        })
        .filter_map(|e| {
            let file_type = e.file_type();
            if file_type.is_symlink() {
                Some(StoreEntry::Symlink(e.into_path()))
            } else if file_type.is_file() {
                Some(StoreEntry::File(e.into_path()))
            } else {
                None
            }
        })
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Whether `path` is a directory with no entries.
#[must_use]
pub fn is_empty_dir(path: &Path) -> bool {
    is_real_dir(path) && std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

/// Remove `start` and then each parent while they are empty directories.
///
/// Stops at the first non-empty directory and never removes `root` or
/// anything outside it. A `start` that is missing or not a directory is a
/// no-op.
///
/// # Errors
///
/// Returns an error if an empty directory cannot be removed.
pub fn delete_empty_dirs(start: &Path, root: &Path) -> io::Result<()> {
    let mut dir = start;
    while dir != root && dir.starts_with(root) && is_empty_dir(dir) {
        std::fs::remove_dir(dir)?;
        tracing::debug!("removed empty directory {}", dir.display());
        match dir.parent() {
            Some(parent) => dir = parent,
            None => break,
        }
    }
    Ok(())
}

/// Create a symlink at `link` pointing to `target`.
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_file(target, link)
    }
}

/// Move `from` to `to`, falling back to copy + delete when a plain rename is
/// not possible (e.g. across filesystems).
///
/// # Errors
///
/// Returns an error if neither strategy succeeds. When the fallback fails,
/// whatever it wrote at `to` is removed and `from` is left in place.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(
                "rename {} -> {} failed ({rename_err}), copying instead",
                from.display(),
                to.display()
            );
            let copied = std::fs::copy(from, to).and_then(|_| std::fs::remove_file(from));
            if copied.is_err() && exists(from) {
                let _ = std::fs::remove_file(to);
            }
            copied
        }
    }
}
