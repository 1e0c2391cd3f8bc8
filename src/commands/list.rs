//! List command implementation.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, ListOpts};
use crate::dotfile::{DotFile, State};
use crate::logging::Logger;
use crate::paths::PathResolver;

/// Width of the right-aligned state column (the longest label).
const STATE_WIDTH: usize = 10;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved.
pub fn run(global: &GlobalOpts, opts: &ListOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let resolver = setup.repo.resolver();

    let mut shown = 0usize;
    for df in setup.repo.stored_dotfiles() {
        let state = df.current_state();
        if opts.state.is_some_and(|wanted| wanted != state) {
            continue;
        }
        println!("{}", list_line(&df, state, resolver, true));
        shown += 1;
    }
    log.debug(&format!("listed {shown} file(s)"));
    Ok(())
}

/// Render one listing line: the right-aligned state, then the stored id.
///
/// Aliases are shown as `<alias> -> <target>`, both relative to the store.
#[must_use]
pub fn list_line(df: &DotFile, state: State, resolver: &PathResolver, color: bool) -> String {
    let pad = " ".repeat(STATE_WIDTH.saturating_sub(state.as_str().len()));
    let label = if color {
        state.colored()
    } else {
        state.as_str().to_string()
    };

    let id = match df.alias_target() {
        Some(target) => {
            let target = resolver.store_relative(target).unwrap_or(target);
            format!("{} -> {}", df.id(), target.display())
        }
        None => df.id(),
    };
    format!("{pad}{label} {id}")
}
