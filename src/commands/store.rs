//! Store command implementation.
use anyhow::Result;

use super::{Action, CommandSetup, ensure_args_present, resolve_arg, run_batch};
use crate::cli::{GlobalOpts, StoreOpts};
use crate::dotfile::DotFile;
use crate::logging::Logger;

const STORE: Action = Action {
    verb: "store",
    past: "stored",
};

/// Run the store command.
///
/// # Errors
///
/// Returns an error if no files are given, the configuration cannot be
/// resolved, or any file fails to be stored.
pub fn run(global: &GlobalOpts, opts: &StoreOpts, log: &Logger) -> Result<()> {
    ensure_args_present(&opts.files)?;
    let setup = CommandSetup::init(global, log)?;

    log.stage("Storing files");
    let targets = opts.files.iter().map(|arg| {
        resolve_arg(arg, |abs| {
            setup.repo.dotfile_for(abs, opts.host_specific, opts.copy)
        })
    });
    run_batch(STORE, targets, DotFile::store, log)
}
