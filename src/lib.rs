//! Dotfile manager engine.
//!
//! Keeps a version-controlled store directory and the user's home directory
//! in sync: every stored file appears in home as a hidden dotfile, normally a
//! symlink back into the store and, for files marked `.force-copy`, a byte
//! copy. Files can be specific to one machine through a `.host-<name>` marker.
//!
//! The public API is organised into layers:
//!
//! - **[`paths`]**, **[`host`]**, **[`fs`]**: path mapping, suffix grammar and filesystem primitives
//! - **[`dotfile`]**: one managed file, its state and its lifecycle operations
//! - **[`repo`]**: scanning the store into a working set with host precedence
//! - **[`batch`]**: running one operation over many files
//! - **[`commands`]**: top-level subcommand orchestration (`list`, `store`, `restore`, `link`, `delete`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dotfile;
pub mod error;
pub mod fs;
pub mod host;
pub mod logging;
pub mod paths;
pub mod repo;

/// Version string: the git description baked in at build time, or the
/// package version.
pub const VERSION: &str = match option_env!("DFM_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
