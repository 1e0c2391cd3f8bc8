pub mod delete;
pub mod link;
pub mod list;
pub mod restore;
pub mod store;
pub mod version;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::batch::{BatchReport, Outcome};
use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::dotfile::{DotFile, OpResult};
use crate::error::PathError;
use crate::logging::{FileStatus, Logger};
use crate::repo::Repo;

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved roots and host.
    pub config: Config,
    /// Store and home for the resolved host.
    pub repo: Repo,
}

impl CommandSetup {
    /// Resolve the configuration and open the repo.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be resolved; these errors
    /// are fatal for the whole run.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let config = Config::load(global.into())?;
        log.debug(&format!("home: {}", config.home.display()));
        log.debug(&format!("store: {}", config.store.display()));
        log.debug(&format!("host: {}", config.host));
        let repo = Repo::new(config.resolver()?);
        Ok(Self { config, repo })
    }

    /// Map home-side arguments onto entities of the working set.
    #[must_use]
    pub fn find_args(&self, files: &[PathBuf]) -> Vec<Target> {
        let working_set = self.repo.stored_dotfiles();
        files
            .iter()
            .map(|arg| resolve_arg(arg, |abs| self.repo.find_in(&working_set, abs)))
            .collect()
    }
}

/// A dotfile to act on, or the argument that could not be mapped to one.
pub type Target = Result<DotFile, Unresolved>;

/// A command-line argument that does not name a manageable dotfile.
#[derive(Debug, Clone)]
pub struct Unresolved {
    /// The argument as given.
    pub arg: String,
    /// Why it could not be used.
    pub reason: String,
}

/// Make `arg` absolute and hand it to `lookup`.
pub fn resolve_arg(arg: &Path, lookup: impl FnOnce(&Path) -> Result<DotFile, PathError>) -> Target {
    let unresolved = |reason: String| Unresolved {
        arg: arg.display().to_string(),
        reason,
    };
    let abs = std::path::absolute(arg).map_err(|e| unresolved(e.to_string()))?;
    lookup(&abs).map_err(|e| unresolved(e.to_string()))
}

/// Fail fast when a command that needs file arguments got none.
///
/// # Errors
///
/// Returns an error if `files` is empty.
pub fn ensure_args_present(files: &[PathBuf]) -> Result<()> {
    if files.is_empty() {
        anyhow::bail!("no arguments provided");
    }
    Ok(())
}

/// Wording for one lifecycle operation in console output.
#[derive(Debug, Clone, Copy)]
pub struct Action {
    /// Imperative verb, e.g. `store`.
    pub verb: &'static str,
    /// Past tense, e.g. `stored`.
    pub past: &'static str,
}

/// Run `op` on every target, log each outcome, print the summary, and fail
/// if any file failed. A failure never stops the remaining files.
///
/// # Errors
///
/// Returns an error if one or more files failed.
pub fn run_batch(
    action: Action,
    targets: impl IntoIterator<Item = Target>,
    op: impl Fn(&DotFile) -> OpResult,
    log: &Logger,
) -> Result<()> {
    let mut report = BatchReport::default();

    for target in targets {
        let (id, outcome) = match target {
            Ok(df) => (df.id(), Outcome::from(op(&df))),
            Err(unresolved) => (unresolved.arg, Outcome::Failed(unresolved.reason)),
        };
        log_outcome(action, &id, &outcome, log);
        report.record(id, outcome);
    }

    log.print_summary();
    log.debug(&report.summary());
    report.into_result()?;
    Ok(())
}

fn log_outcome(action: Action, id: &str, outcome: &Outcome, log: &Logger) {
    match outcome {
        Outcome::Done => {
            log.info(&format!("{}: {id}", action.past));
            log.record_file(id, FileStatus::Ok, None);
        }
        Outcome::Skipped(reason) => {
            log.info(&format!("skipped {}: {id} ({reason})", action.verb));
            log.record_file(id, FileStatus::Skipped, Some(reason));
        }
        Outcome::Failed(reason) => {
            log.error(&format!("failed to {}: {id} ({reason})", action.verb));
            log.record_file(id, FileStatus::Failed, Some(reason));
        }
    }
}
