// Shared helpers for integration tests.
//
// Provides a temporary store and home pair and a fluent builder so each
// integration test can set up an isolated environment without repeating
// filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use dfm::cli::GlobalOpts;
use dfm::dotfile::DotFile;
use dfm::host::HostName;
use dfm::paths::PathResolver;
use dfm::repo::Repo;

/// Host name every test environment runs as.
pub const HOST: &str = "myhost";

/// An isolated store and home backed by a [`tempfile::TempDir`].
///
/// Both trees are deleted when dropped.
pub struct TestEnv {
    root: tempfile::TempDir,
    pub store: PathBuf,
    pub home: PathBuf,
}

impl TestEnv {
    /// Empty store and home.
    pub fn new() -> Self {
        TestEnvBuilder::new().build()
    }

    /// Repo over this environment for [`HOST`].
    pub fn repo(&self) -> Repo {
        Repo::new(self.resolver())
    }

    /// Path mapping over this environment for [`HOST`].
    pub fn resolver(&self) -> PathResolver {
        PathResolver::new(
            self.store.clone(),
            self.home.clone(),
            HostName::new(HOST).expect("valid host"),
        )
        .expect("absolute roots")
    }

    /// Global CLI options pointing at this environment.
    pub fn global_opts(&self) -> GlobalOpts {
        GlobalOpts {
            home: Some(self.home.clone()),
            store: Some(self.store.clone()),
            host: Some(HOST.to_string()),
            config: Some(self.root.path().join("no-such-config.toml")),
        }
    }

    /// Entity for storing the home file `rel` (e.g. `.bashrc`).
    pub fn dotfile(&self, rel: &str) -> DotFile {
        self.repo()
            .dotfile_for(&self.home.join(rel), false, false)
            .expect("dotfile under home")
    }

    /// The working-set entity whose home path is `rel`.
    pub fn stored(&self, rel: &str) -> DotFile {
        let home = self.home.join(rel);
        self.repo()
            .stored_dotfiles()
            .into_iter()
            .find(|df| df.original_path() == home)
            .unwrap_or_else(|| panic!("{rel} not in working set"))
    }

    /// Read a file under home.
    pub fn read_home(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home.join(rel)).expect("read home file")
    }

    /// Read a file under the store.
    pub fn read_store(&self, rel: &str) -> String {
        std::fs::read_to_string(self.store.join(rel)).expect("read store file")
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}

/// Fluent builder for [`TestEnv`].
pub struct TestEnvBuilder {
    env: TestEnv,
}

impl TestEnvBuilder {
    /// Begin building with an empty store and home.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let store = root.path().join("store");
        let home = root.path().join("home");
        std::fs::create_dir_all(&store).expect("create store");
        std::fs::create_dir_all(&home).expect("create home");
        Self {
            env: TestEnv { root, store, home },
        }
    }

    /// Write `content` to `rel` inside the store.
    pub fn with_stored(self, rel: &str, content: &str) -> Self {
        write(&self.env.store.join(rel), content);
        self
    }

    /// Write `content` to `rel` inside home.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write(&self.env.home.join(rel), content);
        self
    }

    /// Create a store symlink `alias` pointing at the relative `target`.
    #[cfg(unix)]
    pub fn with_alias(self, alias: &str, target: &str) -> Self {
        let link = self.env.store.join(alias);
        if let Some(parent) = link.parent() {
            std::fs::create_dir_all(parent).expect("create alias parent");
        }
        std::os::unix::fs::symlink(target, link).expect("create alias");
        self
    }

    /// Create a home symlink `rel` pointing at `target`.
    #[cfg(unix)]
    pub fn with_home_link(self, rel: &str, target: &Path) -> Self {
        let link = self.env.home.join(rel);
        if let Some(parent) = link.parent() {
            std::fs::create_dir_all(parent).expect("create link parent");
        }
        std::os::unix::fs::symlink(target, link).expect("create home link");
        self
    }

    /// Finish building and return the environment.
    pub fn build(self) -> TestEnv {
        self.env
    }
}
