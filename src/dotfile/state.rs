//! The four derived states of a dotfile.
use std::fmt;

/// Current state of a dotfile, recomputed from the filesystem on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum State {
    /// Home holds the expected link (or identical copy).
    Linked,
    /// Content is stored and nothing occupies the home path.
    NotLinked,
    /// Content is stored but something else occupies the home path.
    Conflict,
    /// Nothing is stored for this entity.
    Missing,
}

impl State {
    /// All states, in listing order.
    pub const ALL: [Self; 4] = [Self::Linked, Self::NotLinked, Self::Conflict, Self::Missing];

    /// Plain lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::NotLinked => "not linked",
            Self::Conflict => "conflict",
            Self::Missing => "missing",
        }
    }

    /// Label wrapped in ANSI styling for console output.
    #[must_use]
    pub fn colored(self) -> String {
        let style = match self {
            Self::Linked => "1;32",
            Self::NotLinked => "1;33",
            Self::Conflict => "1;31",
            Self::Missing => "1;3;31",
        };
        format!("\x1b[{style}m{}\x1b[0m", self.as_str())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
