//! Helpers shared by the logger and the subscriber.
use std::path::PathBuf;

/// `chrono` format of the log file header.
pub(super) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// `chrono` format of per-event timestamps.
pub(super) const TIME_FORMAT: &str = "%H:%M:%S";

/// Remove ANSI CSI escape sequences (colours, cursor movement) from `s`.
pub(super) fn strip_ansi(s: &str) -> String {
    #[derive(Clone, Copy)]
    enum Scan {
        Text,
        Escape,
        Sequence,
    }

    let mut scan = Scan::Text;
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        scan = match (scan, c) {
            (Scan::Text, '\x1b') => Scan::Escape,
            (Scan::Text, c) => {
                out.push(c);
                Scan::Text
            }
            (Scan::Sequence, '@'..='~') => Scan::Text,
            (Scan::Escape, '[') | (Scan::Sequence, _) => Scan::Sequence,
            (Scan::Escape, _) => Scan::Text,
        };
    }
    out
}

/// Directory holding per-command log files: `$XDG_CACHE_HOME/dfm`, or
/// `$HOME/.cache/dfm`. Created on demand.
pub(super) fn cache_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))?;
    let dir = base.join("dfm");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for one command, e.g. `~/.cache/dfm/link.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
