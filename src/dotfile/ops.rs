//! Lifecycle operations: store, link, restore, delete.
//!
//! Each operation checks its preconditions first and then performs the
//! smallest possible sequence of filesystem mutations. Directory creation
//! comes first since it is idempotent; the rename or symlink that changes
//! what home sees comes last.
use std::path::Path;

use super::DotFile;
use super::error::{IoResultExt as _, OpError, OpResult};
use crate::fs;

impl DotFile {
    /// Move the home file into the store and link it back.
    ///
    /// Forced-copy entities are copied into the store instead and the home
    /// file is left in place.
    ///
    /// # Errors
    ///
    /// [`OpError::Skip`] if already linked; [`OpError::Fail`] if the file is
    /// not ready to be stored or a filesystem call fails. A failed link-back
    /// moves the file back to home before reporting.
    pub fn store(&self) -> OpResult {
        if self.is_linked() {
            return Err(OpError::skip("already stored"));
        }
        if !self.is_ready_to_be_stored() {
            return Err(OpError::fail(self.not_ready_reason()));
        }

        fs::ensure_parent_dir(&self.stored)
            .or_fail(|| format!("failed to create {}", parent_display(&self.stored)))?;

        if self.must_be_copied() {
            std::fs::copy(&self.original, &self.stored)
                .or_fail(|| "failed to copy file into store".to_string())?;
            tracing::debug!(
                "copied {} -> {}",
                self.original.display(),
                self.stored.display()
            );
            return Ok(());
        }

        fs::move_file(&self.original, &self.stored)
            .or_fail(|| "failed to move file into store".to_string())?;

        if let Err(e) = fs::create_symlink(&self.stored, &self.original) {
            if let Err(rollback) = fs::move_file(&self.stored, &self.original) {
                tracing::debug!(
                    "rollback of {} failed: {rollback}",
                    self.stored.display()
                );
            }
            return Err(OpError::io("failed to link stored file back", e));
        }

        tracing::debug!(
            "stored {} -> {}",
            self.original.display(),
            self.stored.display()
        );
        Ok(())
    }

    fn not_ready_reason(&self) -> String {
        if fs::exists(&self.stored) {
            format!("{} already exists in store", self.id())
        } else if !fs::exists(&self.original) {
            format!("{} does not exist", self.original.display())
        } else {
            format!("{} is not a regular file", self.original.display())
        }
    }

    /// Create the home-side link (or copy) for a stored file.
    ///
    /// With `force`, anything occupying the home path that is not a real
    /// directory is removed first.
    ///
    /// # Errors
    ///
    /// [`OpError::Skip`] if already linked; [`OpError::Fail`] if nothing is
    /// stored, the home path is occupied, or a filesystem call fails.
    pub fn link(&self, force: bool) -> OpResult {
        if self.is_linked() {
            return Err(OpError::skip("already linked"));
        }
        if !self.is_stored() {
            return Err(OpError::fail(format!("{} is not stored", self.id())));
        }

        if fs::exists(&self.original) {
            if !force || fs::is_real_dir(&self.original) {
                return Err(OpError::fail(format!(
                    "{} already exists",
                    self.original.display()
                )));
            }
            std::fs::remove_file(&self.original)
                .or_fail(|| format!("failed to remove {}", self.original.display()))?;
            tracing::debug!("removed conflicting {}", self.original.display());
        }

        fs::ensure_parent_dir(&self.original)
            .or_fail(|| format!("failed to create {}", parent_display(&self.original)))?;

        let source = self.link_source();
        if self.must_be_copied() {
            std::fs::copy(source, &self.original)
                .or_fail(|| "failed to copy stored file".to_string())?;
        } else {
            fs::create_symlink(source, &self.original)
                .or_fail(|| "failed to create symlink".to_string())?;
        }

        tracing::debug!(
            "linked {} -> {}",
            self.original.display(),
            source.display()
        );
        Ok(())
    }

    /// Return the stored content to home and drop it from the store.
    ///
    /// Forced-copy entities only lose their store copy. Alias entities only
    /// lose their home link; the alias and its target stay in the store.
    ///
    /// # Errors
    ///
    /// [`OpError::Skip`] if nothing is stored; [`OpError::Fail`] if the file
    /// is not linked or a filesystem call fails.
    pub fn restore(&self) -> OpResult {
        if self.is_ready_to_be_stored() {
            return Err(OpError::skip("not stored"));
        }
        if !self.is_linked() {
            return Err(OpError::fail(format!("{} is not linked", self.id())));
        }

        if self.is_alias() {
            std::fs::remove_file(&self.original)
                .or_fail(|| format!("failed to remove {}", self.original.display()))?;
            return self.prune(&self.original, self.resolver().home());
        }

        if self.must_be_copied() {
            std::fs::remove_file(&self.stored)
                .or_fail(|| format!("failed to remove {}", self.stored.display()))?;
            return self.prune(&self.stored, self.resolver().store());
        }

        std::fs::remove_file(&self.original)
            .or_fail(|| format!("failed to remove link {}", self.original.display()))?;

        if let Err(e) = fs::move_file(&self.stored, &self.original) {
            if let Err(relink) = fs::create_symlink(&self.stored, &self.original) {
                tracing::debug!(
                    "relinking {} failed: {relink}",
                    self.original.display()
                );
            }
            return Err(OpError::io("failed to move file out of store", e));
        }

        tracing::debug!(
            "restored {} <- {}",
            self.original.display(),
            self.stored.display()
        );
        self.prune(&self.stored, self.resolver().store())
    }

    /// Remove both the stored file and its home link or copy.
    ///
    /// For an alias only the alias symlink is removed from the store; its
    /// target belongs to another entity.
    ///
    /// # Errors
    ///
    /// [`OpError::Skip`] if neither side exists; [`OpError::Fail`] if the file
    /// is not linked or a filesystem call fails.
    pub fn delete(&self) -> OpResult {
        if !fs::exists(&self.original) && !fs::exists(&self.stored) {
            return Err(OpError::skip("nothing to delete"));
        }
        if !self.is_linked() {
            return Err(OpError::fail(format!("{} is not linked", self.id())));
        }

        std::fs::remove_file(&self.original)
            .or_fail(|| format!("failed to remove {}", self.original.display()))?;
        std::fs::remove_file(&self.stored)
            .or_fail(|| format!("failed to remove {}", self.stored.display()))?;

        tracing::debug!(
            "deleted {} and {}",
            self.stored.display(),
            self.original.display()
        );
        self.prune(&self.stored, self.resolver().store())?;
        self.prune(&self.original, self.resolver().home())
    }

    /// Remove now-empty directories above `removed`, bounded by `root`.
    #[allow(clippy::unused_self)]
    fn prune(&self, removed: &Path, root: &Path) -> OpResult {
        let Some(parent) = removed.parent() else {
            return Ok(());
        };
        fs::delete_empty_dirs(parent, root)
            .or_fail(|| format!("failed to remove empty directories above {}", removed.display()))
    }
}

fn parent_display(path: &Path) -> String {
    path.parent().unwrap_or(path).display().to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::super::State;
    use super::super::tests::Fixture;
    use std::sync::Arc;

    // -----------------------------------------------------------------------
    // store
    // -----------------------------------------------------------------------

    #[cfg(unix)]
    #[test]
    fn store_moves_file_and_links_back() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.original_path(), "X");

        df.store().unwrap();

        assert_eq!(std::fs::read_to_string(df.stored_path()).unwrap(), "X");
        assert_eq!(std::fs::read_link(df.original_path()).unwrap(), df.stored_path());
        assert!(df.is_linked());
    }

    #[test]
    fn store_creates_intermediate_directories() {
        let fx = Fixture::new();
        let df = fx.dotfile("config/app/settings.toml");
        Fixture::write(df.original_path(), "k = 1");

        df.store().unwrap();

        assert!(df.stored_path().is_file());
        assert!(df.is_linked());
    }

    #[test]
    fn store_twice_skips_and_changes_nothing() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.original_path(), "X");
        df.store().unwrap();

        let err = df.store().unwrap_err();

        assert!(err.is_skip(), "{err:?}");
        assert_eq!(std::fs::read_to_string(df.stored_path()).unwrap(), "X");
        assert!(df.is_linked());
    }

    #[test]
    fn store_fails_when_store_entry_exists() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.original_path(), "home");
        Fixture::write(df.stored_path(), "store");

        let err = df.store().unwrap_err();

        assert!(err.is_fail());
        assert!(err.to_string().contains("already exists in store"));
        assert_eq!(std::fs::read_to_string(df.original_path()).unwrap(), "home");
    }

    #[test]
    fn store_fails_when_original_missing() {
        let fx = Fixture::new();
        let err = fx.dotfile("bashrc").store().unwrap_err();
        assert!(err.is_fail());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn store_forced_copy_keeps_home_file() {
        let fx = Fixture::new();
        let df = fx.dotfile("npmrc.force-copy");
        Fixture::write(df.original_path(), "registry");

        df.store().unwrap();

        assert!(crate::fs::is_regular_file(df.original_path()));
        assert_eq!(std::fs::read_to_string(df.stored_path()).unwrap(), "registry");
        assert!(df.is_linked());
    }

    // -----------------------------------------------------------------------
    // link
    // -----------------------------------------------------------------------

    #[test]
    fn link_creates_symlink_to_stored_file() {
        let fx = Fixture::new();
        let df = fx.dotfile("config/git/config");
        Fixture::write(df.stored_path(), "");

        df.link(false).unwrap();

        assert!(df.is_linked());
        assert_eq!(df.current_state(), State::Linked);
    }

    #[test]
    fn link_fails_on_conflict_without_force() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.stored_path(), "stored");
        Fixture::write(df.original_path(), "local");

        let err = df.link(false).unwrap_err();

        assert!(err.is_fail());
        assert_eq!(std::fs::read_to_string(df.original_path()).unwrap(), "local");
    }

    #[test]
    fn link_force_replaces_conflicting_file() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.stored_path(), "stored");
        Fixture::write(df.original_path(), "local");

        df.link(true).unwrap();

        assert!(df.is_linked());
    }

    #[test]
    fn link_force_never_removes_directory() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.stored_path(), "stored");
        std::fs::create_dir_all(df.original_path()).unwrap();

        assert!(df.link(true).unwrap_err().is_fail());
        assert!(df.original_path().is_dir());
    }

    #[test]
    fn link_skips_when_already_linked() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.stored_path(), "");
        df.link(false).unwrap();

        assert!(df.link(false).unwrap_err().is_skip());
    }

    #[test]
    fn link_fails_when_not_stored() {
        let fx = Fixture::new();
        let err = fx.dotfile("bashrc").link(false).unwrap_err();
        assert!(err.is_fail());
        assert!(err.to_string().contains("is not stored"));
    }

    #[test]
    fn link_forced_copy_writes_identical_bytes() {
        let fx = Fixture::new();
        let df = fx.dotfile("npmrc.force-copy");
        Fixture::write(df.stored_path(), "registry");

        df.link(false).unwrap();

        assert!(crate::fs::is_regular_file(df.original_path()));
        assert_eq!(std::fs::read_to_string(df.original_path()).unwrap(), "registry");
        assert!(df.is_linked());
    }

    #[cfg(unix)]
    #[test]
    fn link_alias_points_at_alias_target() {
        let fx = Fixture::new();
        Fixture::write(&fx.store.join("bashrc"), "x");
        std::os::unix::fs::symlink("bashrc", fx.store.join("bash_profile")).unwrap();
        let df =
            super::DotFile::alias(Arc::clone(&fx.resolver), fx.store.join("bash_profile")).unwrap();

        df.link(false).unwrap();

        assert_eq!(
            std::fs::read_link(fx.home.join(".bash_profile")).unwrap(),
            fx.store.join("bashrc")
        );
    }

    // -----------------------------------------------------------------------
    // restore
    // -----------------------------------------------------------------------

    #[test]
    fn restore_undoes_store() {
        let fx = Fixture::new();
        let df = fx.dotfile("config/app/rc");
        Fixture::write(df.original_path(), "X");
        df.store().unwrap();

        df.restore().unwrap();

        assert!(df.is_ready_to_be_stored());
        assert!(!df.is_linked());
        assert_eq!(std::fs::read_to_string(df.original_path()).unwrap(), "X");
        assert!(!fx.store.join("config").exists(), "empty store dirs pruned");
        assert!(fx.store.exists(), "store root kept");
    }

    #[test]
    fn restore_skips_unstored_file() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.original_path(), "X");
        assert!(df.restore().unwrap_err().is_skip());
    }

    #[test]
    fn restore_fails_when_not_linked() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.stored_path(), "X");
        assert!(df.restore().unwrap_err().is_fail());
        assert!(df.stored_path().exists());
    }

    #[test]
    fn restore_forced_copy_removes_store_copy_only() {
        let fx = Fixture::new();
        let df = fx.dotfile("sub/npmrc.force-copy");
        Fixture::write(df.original_path(), "registry");
        df.store().unwrap();

        df.restore().unwrap();

        assert!(!crate::fs::exists(df.stored_path()));
        assert!(!fx.store.join("sub").exists());
        assert_eq!(std::fs::read_to_string(df.original_path()).unwrap(), "registry");
    }

    #[cfg(unix)]
    #[test]
    fn restore_alias_only_removes_home_link() {
        let fx = Fixture::new();
        Fixture::write(&fx.store.join("bashrc"), "x");
        std::os::unix::fs::symlink("bashrc", fx.store.join("bash_profile")).unwrap();
        let df =
            super::DotFile::alias(Arc::clone(&fx.resolver), fx.store.join("bash_profile")).unwrap();
        df.link(false).unwrap();

        df.restore().unwrap();

        assert!(!crate::fs::exists(df.original_path()));
        assert!(crate::fs::is_symlink(df.stored_path()));
        assert!(fx.store.join("bashrc").is_file());
    }

    // -----------------------------------------------------------------------
    // delete
    // -----------------------------------------------------------------------

    #[test]
    fn delete_removes_both_sides() {
        let fx = Fixture::new();
        let df = fx.dotfile("config/tool/rc");
        Fixture::write(df.original_path(), "X");
        df.store().unwrap();

        df.delete().unwrap();

        assert!(!crate::fs::exists(df.stored_path()));
        assert!(!crate::fs::exists(df.original_path()));
        assert!(!fx.store.join("config").exists());
        assert!(!fx.home.join(".config").exists());
        assert!(fx.home.exists(), "home root kept");
    }

    #[cfg(unix)]
    #[test]
    fn delete_keeps_store_when_home_side_cannot_be_removed() {
        use std::os::unix::fs::PermissionsExt as _;

        let fx = Fixture::new();
        let df = fx.dotfile("config/tool/rc");
        Fixture::write(df.original_path(), "X");
        df.store().unwrap();
        let locked = fx.home.join(".config/tool");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555)).unwrap();
        if std::fs::write(locked.join("writable"), "").is_ok() {
            // Permissions are not enforced (running as root).
            return;
        }

        let err = df.delete().unwrap_err();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        assert!(err.is_fail());
        assert_eq!(std::fs::read_to_string(df.stored_path()).unwrap(), "X");
        assert!(df.is_linked());
    }

    #[test]
    fn delete_skips_when_nothing_exists() {
        let fx = Fixture::new();
        assert!(fx.dotfile("bashrc").delete().unwrap_err().is_skip());
    }

    #[test]
    fn delete_fails_when_not_linked() {
        let fx = Fixture::new();
        let df = fx.dotfile("bashrc");
        Fixture::write(df.stored_path(), "X");
        Fixture::write(df.original_path(), "Y");

        assert!(df.delete().unwrap_err().is_fail());
        assert!(df.stored_path().exists());
        assert!(df.original_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn delete_alias_keeps_target() {
        let fx = Fixture::new();
        Fixture::write(&fx.store.join("bashrc"), "x");
        std::os::unix::fs::symlink("bashrc", fx.store.join("bash_profile")).unwrap();
        let df =
            super::DotFile::alias(Arc::clone(&fx.resolver), fx.store.join("bash_profile")).unwrap();
        df.link(false).unwrap();

        df.delete().unwrap();

        assert!(!crate::fs::exists(df.stored_path()));
        assert!(!crate::fs::exists(df.original_path()));
        assert_eq!(std::fs::read_to_string(fx.store.join("bashrc")).unwrap(), "x");
    }
}
