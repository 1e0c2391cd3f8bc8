#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for argument parsing, configuration, the subcommands
//! and listing output.

mod common;

use std::path::PathBuf;

use clap::Parser;
use common::{HOST, TestEnv, TestEnvBuilder};
use dfm::cli::{Cli, Command, FilesOpts, LinkOpts, StoreOpts};
use dfm::commands;
use dfm::commands::list::list_line;
use dfm::config::{Config, Overrides, Settings};
use dfm::dotfile::State;
use dfm::fs;
use dfm::logging::Logger;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Global flags are accepted after the subcommand.
#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "dfm", "store", "--host-specific", "--store", "/s", "--home", "/h", "~/.bashrc",
    ])
    .unwrap();

    assert_eq!(cli.global.store.as_deref(), Some(std::path::Path::new("/s")));
    assert_eq!(cli.global.home.as_deref(), Some(std::path::Path::new("/h")));
    let Command::Store(opts) = cli.command else {
        panic!("expected store");
    };
    assert!(opts.host_specific);
    assert!(!opts.copy);
    assert_eq!(opts.files.len(), 1);
}

/// Short aliases map to their subcommands.
#[test]
fn visible_aliases() {
    for (alias, name) in [("l", "list"), ("s", "store"), ("r", "restore"), ("d", "delete")] {
        let cli = Cli::try_parse_from(["dfm", alias]).unwrap();
        assert_eq!(cli.command.name(), name);
    }
}

/// `--state` accepts the hyphenated spelling.
#[test]
fn list_state_filter() {
    let cli = Cli::try_parse_from(["dfm", "list", "--state", "not-linked"]).unwrap();
    let Command::List(opts) = cli.command else {
        panic!("expected list");
    };
    assert_eq!(opts.state, Some(State::NotLinked));

    assert!(Cli::try_parse_from(["dfm", "list", "--state", "broken"]).is_err());
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Command-line values win over the settings file.
#[test]
fn flags_override_settings() {
    let env = TestEnvBuilder::new().build();
    let overrides = Overrides::from(&env.global_opts());
    let settings = Settings {
        home: Some("/nonexistent".to_string()),
        store: Some("~/elsewhere".to_string()),
        host: Some("other".to_string()),
    };

    let config = Config::resolve(overrides, settings, None).unwrap();

    assert_eq!(config.home, env.home);
    assert_eq!(config.store, env.store);
    assert_eq!(config.host.as_str(), HOST);
}

/// The store defaults to `dotfiles` under home.
#[test]
fn store_defaults_under_home() {
    let env = TestEnvBuilder::new().build();
    let overrides = Overrides {
        home: Some(env.home.clone()),
        host: Some(HOST.to_string()),
        ..Overrides::default()
    };

    let config = Config::resolve(overrides, Settings::default(), None).unwrap();

    assert_eq!(config.store, env.home.join("dotfiles"));
}

/// An invalid host name is a fatal configuration error.
#[test]
fn invalid_host_is_rejected() {
    let env = TestEnvBuilder::new().build();
    let overrides = Overrides {
        home: Some(env.home.clone()),
        host: Some("bad host".to_string()),
        ..Overrides::default()
    };

    assert!(Config::resolve(overrides, Settings::default(), None).is_err());
}

/// Loading with an explicit missing settings file falls back to flags.
#[test]
fn load_with_missing_settings_file() {
    let env = TestEnvBuilder::new().build();

    let config = Config::load(Overrides::from(&env.global_opts())).unwrap();

    assert_eq!(config.store, env.store);
}

/// A `~` in the settings file expands to the login home directory.
#[test]
fn load_expands_tilde_from_settings_file() {
    let Some(login_home) = std::env::var_os("HOME").map(PathBuf::from) else {
        return;
    };
    let env = TestEnvBuilder::new()
        .with_home_file("dfm.toml", "store = \"~/dfm-dots\"\n")
        .build();
    let overrides = Overrides {
        home: Some(env.home.clone()),
        host: Some(HOST.to_string()),
        config: Some(env.home.join("dfm.toml")),
        ..Overrides::default()
    };

    let config = Config::load(overrides).unwrap();

    assert_eq!(config.store, login_home.join("dfm-dots"));
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn paths(env: &TestEnv, rels: &[&str]) -> Vec<PathBuf> {
    rels.iter().map(|rel| env.home.join(rel)).collect()
}

/// `store` then `restore` by name round-trips the home files; an argument
/// that is not a dotfile fails on its own without stopping the others.
#[test]
fn store_then_restore_commands() {
    let env = TestEnvBuilder::new()
        .with_home_file(".bashrc", "B")
        .with_home_file(".config/git/config", "G")
        .with_home_file("notes", "N")
        .build();
    let log = Logger::new("test");
    let store = StoreOpts {
        files: paths(&env, &[".bashrc", "notes", ".config/git/config"]),
        ..StoreOpts::default()
    };

    let err = commands::store::run(&env.global_opts(), &store, &log).unwrap_err();

    assert_eq!(err.to_string(), "1 file(s) failed");
    assert!(fs::is_symlink(&env.home.join(".bashrc")));
    assert!(fs::is_symlink(&env.home.join(".config/git/config")));
    assert_eq!(env.read_store("config/git/config"), "G");
    assert_eq!(env.read_home("notes"), "N");

    let restore = FilesOpts {
        files: paths(&env, &[".bashrc", ".config/git/config"]),
    };
    commands::restore::run(&env.global_opts(), &restore, &log).unwrap();

    assert!(fs::is_regular_file(&env.home.join(".bashrc")));
    assert_eq!(env.read_home(".config/git/config"), "G");
    assert!(!env.store.join("bashrc").exists());
    assert!(!env.store.join("config").exists());
}

/// `store --host-specific` names the stored file after the host.
#[test]
fn store_host_specific_command() {
    let env = TestEnvBuilder::new()
        .with_home_file(".gitconfig", "[user]")
        .build();
    let opts = StoreOpts {
        host_specific: true,
        files: paths(&env, &[".gitconfig"]),
        ..StoreOpts::default()
    };

    commands::store::run(&env.global_opts(), &opts, &Logger::new("test")).unwrap();

    assert_eq!(env.read_store("gitconfig.host-myhost"), "[user]");
    assert!(env.stored(".gitconfig").is_linked());
}

/// Commands taking file arguments refuse to run without any.
#[test]
fn file_commands_require_arguments() {
    let env = TestEnv::new();
    let err = commands::delete::run(&env.global_opts(), &FilesOpts::default(), &Logger::new("test"))
        .unwrap_err();
    assert_eq!(err.to_string(), "no arguments provided");
}

/// `link` without arguments links every unlinked entry, leaves conflicts in
/// place, and reports them as failures.
#[cfg(unix)]
#[test]
fn link_everything_over_mixed_working_set() {
    let env = TestEnvBuilder::new()
        .with_stored("inputrc", "I")
        .with_stored("zshrc", "Z")
        .with_stored("vimrc.host-myhost", "V")
        .with_stored("tmux.conf.host-otherhost", "T")
        .with_home_file(".zshrc", "local")
        .build();
    std::os::unix::fs::symlink(env.store.join("inputrc"), env.home.join(".inputrc")).unwrap();
    let log = Logger::new("test");

    let err = commands::link::run(&env.global_opts(), &LinkOpts::default(), &log).unwrap_err();

    assert_eq!(err.to_string(), "1 file(s) failed");
    assert_eq!(env.stored(".inputrc").current_state(), State::Linked);
    assert_eq!(env.stored(".vimrc").current_state(), State::Linked);
    assert_eq!(env.read_home(".zshrc"), "local");
    assert!(!fs::exists(&env.home.join(".tmux.conf")));

    let force = LinkOpts {
        force: true,
        files: paths(&env, &[".zshrc"]),
    };
    commands::link::run(&env.global_opts(), &force, &log).unwrap();
    assert_eq!(env.read_home(".zshrc"), "Z");
}

/// `delete` removes both sides of a linked file.
#[test]
fn delete_command_removes_both_sides() {
    let env = TestEnvBuilder::new()
        .with_home_file(".profile", "P")
        .build();
    let log = Logger::new("test");
    let files = paths(&env, &[".profile"]);
    commands::store::run(
        &env.global_opts(),
        &StoreOpts {
            files: files.clone(),
            ..StoreOpts::default()
        },
        &log,
    )
    .unwrap();

    commands::delete::run(&env.global_opts(), &FilesOpts { files }, &log).unwrap();

    assert!(!fs::exists(&env.home.join(".profile")));
    assert!(!fs::exists(&env.store.join("profile")));
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Listing lines right-align the state column.
#[test]
fn list_lines() {
    let env = TestEnvBuilder::new()
        .with_stored("bashrc", "")
        .with_stored("config/git/config.host-myhost", "")
        .with_stored("npmrc.force-copy", "x")
        .with_home_file(".npmrc", "x")
        .build();
    let repo = env.repo();

    let out: Vec<String> = repo
        .stored_dotfiles()
        .iter()
        .map(|df| list_line(df, df.current_state(), repo.resolver(), false))
        .collect();

    insta::assert_snapshot!(out.join("\n"), @r"
    not linked bashrc
    not linked config/git/config.host-myhost
        linked npmrc.force-copy
    ");
}
