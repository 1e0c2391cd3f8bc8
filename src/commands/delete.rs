//! Delete command implementation.
use anyhow::Result;

use super::{Action, CommandSetup, ensure_args_present, run_batch};
use crate::cli::{FilesOpts, GlobalOpts};
use crate::dotfile::DotFile;
use crate::logging::Logger;

const DELETE: Action = Action {
    verb: "delete",
    past: "deleted",
};

/// Run the delete command.
///
/// # Errors
///
/// Returns an error if no files are given, the configuration cannot be
/// resolved, or any file fails to be deleted.
pub fn run(global: &GlobalOpts, opts: &FilesOpts, log: &Logger) -> Result<()> {
    ensure_args_present(&opts.files)?;
    let setup = CommandSetup::init(global, log)?;

    log.stage("Deleting files");
    run_batch(DELETE, setup.find_args(&opts.files), DotFile::delete, log)
}
