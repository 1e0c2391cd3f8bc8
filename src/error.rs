//! Domain-specific error types for the dotfile manager.
//!
//! This module provides the fatal side of the error hierarchy using
//! [`thiserror`]. Per-file lifecycle outcomes (skip / fail) live in
//! [`crate::dotfile::OpError`] because they never abort a run; everything
//! here is a precondition violation of the tool's own configuration.
//! Command handlers at the CLI boundary convert these to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DfmError
//! ├── Config(ConfigError)  roots, settings file, home directory
//! ├── Host(HostError)      host name detection and validation
//! └── Path(PathError)      mapping between home and store paths
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotfile manager.
#[derive(Error, Debug)]
pub enum DfmError {
    /// Configuration-related error (roots, settings file).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Host identity could not be established.
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// A path could not be mapped between the home and store trees.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// Errors that arise while resolving the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No home directory was given and none could be derived from the environment.
    #[error("cannot determine home directory: use --home or set DOTFILES_HOME_DIR")]
    MissingHome,

    /// A root directory could not be made absolute.
    #[error("cannot resolve {name} directory {path}: {source}")]
    UnresolvableRoot {
        /// Which root (`home` or `store`).
        name: &'static str,
        /// The path as given.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The home directory does not exist or cannot be listed.
    #[error("home directory {path} is not readable: {source}")]
    UnreadableHome {
        /// The absolute home path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file exists but could not be read.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML or has unexpected keys.
    #[error("Invalid settings file {path}: {message}")]
    InvalidSettings {
        /// Path to the settings file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },
}

/// Errors that arise while establishing the host identity.
#[derive(Error, Debug)]
pub enum HostError {
    /// The host name cannot be used inside a `.host-<name>` marker.
    #[error("invalid host name '{0}': only letters, digits and '-' are allowed")]
    Invalid(String),

    /// No source produced a host name.
    #[error("failed to retrieve host name: {0}")]
    DetectionFailed(String),
}

/// Errors that arise while mapping paths between the home and store trees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Only hidden files directly or indirectly under home can be managed.
    #[error("{0} is not a dotfile")]
    NotADotfile(PathBuf),

    /// The path does not live under the home directory.
    #[error("{0} is outside of the home directory")]
    OutsideHome(PathBuf),

    /// Entities must be built from absolute paths.
    #[error("path must be absolute: {0}")]
    RelativePath(PathBuf),
}
