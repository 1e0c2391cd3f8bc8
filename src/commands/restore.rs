//! Restore command implementation.
use anyhow::Result;

use super::{Action, CommandSetup, ensure_args_present, run_batch};
use crate::cli::{FilesOpts, GlobalOpts};
use crate::dotfile::DotFile;
use crate::logging::Logger;

const RESTORE: Action = Action {
    verb: "restore",
    past: "restored",
};

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if no files are given, the configuration cannot be
/// resolved, or any file fails to be restored.
pub fn run(global: &GlobalOpts, opts: &FilesOpts, log: &Logger) -> Result<()> {
    ensure_args_present(&opts.files)?;
    let setup = CommandSetup::init(global, log)?;

    log.stage("Restoring files");
    run_batch(RESTORE, setup.find_args(&opts.files), DotFile::restore, log)
}
