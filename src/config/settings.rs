//! Optional TOML settings file.
//!
//! ```toml
//! home = "~"
//! store = "~/src/dotfiles"
//! host = "laptop"
//! ```
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Contents of the settings file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Home root; a leading `~` expands to the login home directory.
    pub home: Option<String>,
    /// Store root; a leading `~` expands to the login home directory.
    pub store: Option<String>,
    /// Host name used for `.host-<name>` precedence.
    pub host: Option<String>,
}

impl Settings {
    /// Load settings from `path`. A missing file yields empty settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file exists but cannot be read and
    /// [`ConfigError::InvalidSettings`] if it is not valid TOML or contains
    /// unknown keys.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("no settings file at {}", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::InvalidSettings {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }
}

/// Default settings location: `$XDG_CONFIG_HOME/dfm/config.toml`, falling
/// back to `~/.config/dfm/config.toml`.
#[must_use]
pub fn default_settings_path(
    xdg_config_home: Option<PathBuf>,
    user_home: Option<&Path>,
) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|p| p.is_absolute())
        .or_else(|| user_home.map(|h| h.join(".config")))?;
    Some(base.join("dfm").join("config.toml"))
}
