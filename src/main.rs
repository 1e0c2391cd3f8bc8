use anyhow::Result;
use clap::Parser;

use dfm::cli::{Cli, Command};
use dfm::{commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = logging::Logger::new(name);

    match &args.command {
        Command::List(opts) => commands::list::run(&args.global, opts, &log),
        Command::Store(opts) => commands::store::run(&args.global, opts, &log),
        Command::Restore(opts) => commands::restore::run(&args.global, opts, &log),
        Command::Link(opts) => commands::link::run(&args.global, opts, &log),
        Command::Delete(opts) => commands::delete::run(&args.global, opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
