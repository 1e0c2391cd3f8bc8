//! Run configuration: home and store roots plus the host identity.
//!
//! Each value is taken from the first source that provides it:
//!
//! 1. command-line flag (or its environment variable, handled by clap),
//! 2. the optional TOML settings file,
//! 3. a built-in default.
mod settings;

pub use settings::{Settings, default_settings_path};

use std::path::{Path, PathBuf};

use crate::error::{ConfigError, DfmError};
use crate::host::HostName;
use crate::paths::PathResolver;

/// Name of the store directory created under home when none is configured.
pub const DEFAULT_STORE_DIR: &str = "dotfiles";

/// Values supplied on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Home root.
    pub home: Option<PathBuf>,
    /// Store root.
    pub store: Option<PathBuf>,
    /// Host name.
    pub host: Option<String>,
    /// Settings file location.
    pub config: Option<PathBuf>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Absolute home root.
    pub home: PathBuf,
    /// Absolute store root.
    pub store: PathBuf,
    /// Host whose `.host-<name>` entries take precedence.
    pub host: HostName,
}

impl Config {
    /// Resolve the configuration from `overrides`, the settings file and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`DfmError`] if the settings file is unreadable, a root
    /// cannot be resolved, home is not a readable directory, or the host name
    /// is invalid or cannot be detected.
    pub fn load(overrides: Overrides) -> Result<Self, DfmError> {
        let user_home = std::env::var_os("HOME").map(PathBuf::from);
        let settings_path = overrides.config.clone().or_else(|| {
            default_settings_path(
                std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
                user_home.as_deref(),
            )
        });
        let settings = match settings_path {
            Some(path) => Settings::load(&path)?,
            None => Settings::default(),
        };
        Self::resolve(overrides, settings, user_home.as_deref())
    }

    /// Merge the sources without touching the environment.
    ///
    /// `user_home` is the login home directory; it is the default home root
    /// and the expansion of a leading `~` in settings values.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn resolve(
        overrides: Overrides,
        settings: Settings,
        user_home: Option<&Path>,
    ) -> Result<Self, DfmError> {
        let home = overrides
            .home
            .or_else(|| settings.home.as_deref().map(|h| expand(h, user_home)))
            .or_else(|| user_home.map(Path::to_path_buf))
            .ok_or(ConfigError::MissingHome)?;
        let home = absolutize("home", &home)?;
        std::fs::read_dir(&home).map_err(|source| ConfigError::UnreadableHome {
            path: home.clone(),
            source,
        })?;

        let store = overrides
            .store
            .or_else(|| settings.store.as_deref().map(|s| expand(s, user_home)))
            .unwrap_or_else(|| home.join(DEFAULT_STORE_DIR));
        let store = absolutize("store", &store)?;

        let host = match overrides.host.or(settings.host) {
            Some(name) => HostName::from_qualified(&name)?,
            None => HostName::detect()?,
        };

        tracing::debug!(
            "home={} store={} host={host}",
            home.display(),
            store.display()
        );
        Ok(Self { home, store, host })
    }

    /// Build the path mapping for this configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`DfmError`] if a root is not absolute.
    pub fn resolver(&self) -> Result<PathResolver, DfmError> {
        Ok(PathResolver::new(
            self.store.clone(),
            self.home.clone(),
            self.host.clone(),
        )?)
    }
}

fn expand(value: &str, user_home: Option<&Path>) -> PathBuf {
    let home = || user_home.and_then(Path::to_str);
    PathBuf::from(shellexpand::tilde_with_context(value, home).as_ref())
}

fn absolutize(name: &'static str, path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|source| ConfigError::UnresolvableRoot {
        name,
        path: path.to_path_buf(),
        source,
    })
}
