//! Link command implementation.
use anyhow::Result;

use super::{Action, CommandSetup, Target, run_batch};
use crate::cli::{GlobalOpts, LinkOpts};
use crate::logging::Logger;

const LINK: Action = Action {
    verb: "link",
    past: "linked",
};

/// Run the link command.
///
/// Without file arguments every stored file that is not linked yet is
/// linked; files already linked are left out of the summary entirely.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved or any file
/// fails to be linked.
pub fn run(global: &GlobalOpts, opts: &LinkOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;

    log.stage("Linking files");
    if opts.force {
        log.warn("conflicting files in home will be replaced");
    }
    let targets: Vec<Target> = if opts.files.is_empty() {
        setup
            .repo
            .stored_dotfiles()
            .into_iter()
            .filter(|df| !df.is_linked())
            .map(Ok)
            .collect()
    } else {
        setup.find_args(&opts.files)
    };

    if targets.is_empty() {
        log.info("everything is linked");
        return Ok(());
    }
    run_batch(LINK, targets, |df| df.link(opts.force), log)
}
