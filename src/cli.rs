use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;
use crate::dotfile::State;

/// Top-level CLI entry point for the dotfile manager.
#[derive(Parser, Debug)]
#[command(
    name = "dfm",
    about = "Dotfile manager: keep a version-controlled store linked into your home directory",
    version = crate::VERSION
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Home directory dotfiles are linked into
    #[arg(long, global = true, env = "DOTFILES_HOME_DIR")]
    pub home: Option<PathBuf>,

    /// Directory files are stored in
    #[arg(long, global = true, env = "DOTFILES_STORE_DIR")]
    pub store: Option<PathBuf>,

    /// Host name used for host-specific files (first label of a qualified name)
    #[arg(long, global = true, env = "HOST")]
    pub host: Option<String>,

    /// Settings file (default: $XDG_CONFIG_HOME/dfm/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl From<&GlobalOpts> for Overrides {
    fn from(opts: &GlobalOpts) -> Self {
        Self {
            home: opts.home.clone(),
            store: opts.store.clone(),
            host: opts.host.clone(),
            config: opts.config.clone(),
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stored dotfiles and their states
    #[command(visible_alias = "l")]
    List(ListOpts),
    /// Put files into the store and link them back
    #[command(visible_alias = "s")]
    Store(StoreOpts),
    /// Move files from the store back to their original locations
    #[command(visible_alias = "r")]
    Restore(FilesOpts),
    /// Link stored files to their original locations
    Link(LinkOpts),
    /// Delete files from both home and store
    #[command(visible_alias = "d")]
    Delete(FilesOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Store(_) => "store",
            Self::Restore(_) => "restore",
            Self::Link(_) => "link",
            Self::Delete(_) => "delete",
            Self::Version => "version",
        }
    }
}

/// Options for the `list` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ListOpts {
    /// Only show files in this state
    #[arg(long, value_parser = parse_state)]
    pub state: Option<State>,
}

/// Options for the `store` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct StoreOpts {
    /// Store as specific to the current host
    #[arg(long)]
    pub host_specific: bool,

    /// Copy into home instead of linking
    #[arg(long)]
    pub copy: bool,

    /// Home files to store
    pub files: Vec<PathBuf>,
}

/// Options for the `link` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct LinkOpts {
    /// Replace conflicting files in home
    #[arg(short, long)]
    pub force: bool,

    /// Home paths to link (default: everything stored)
    pub files: Vec<PathBuf>,
}

/// Options for subcommands that act on named home files.
#[derive(Parser, Debug, Clone, Default)]
pub struct FilesOpts {
    /// Home files to act on
    pub files: Vec<PathBuf>,
}

fn parse_state(s: &str) -> Result<State, String> {
    State::ALL
        .into_iter()
        .find(|state| state.as_str() == s || state.as_str().replace(' ', "-") == s)
        .ok_or_else(|| format!("expected one of: linked, not-linked, conflict, missing (got '{s}')"))
}
