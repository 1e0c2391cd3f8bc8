//! Host identity and the host-suffix marker used by host-specific dotfiles.
use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::error::HostError;

/// Prefix of the marker appended to host-specific stored files.
pub const HOST_MARKER_PREFIX: &str = ".host-";

/// Marker appended to stored files that must be copied instead of linked.
pub const FORCE_COPY_MARKER: &str = ".force-copy";

/// Name of the machine the tool runs on, as used in `.host-<name>` markers.
///
/// # Examples
///
/// ```
/// use dfm::host::HostName;
///
/// let host = HostName::new("laptop").unwrap();
/// assert_eq!(host.suffix(), ".host-laptop");
/// assert!(HostName::new("bad.name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostName(String);

impl HostName {
    /// Validate and wrap a host name.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Invalid`] if `name` is empty or contains anything
    /// other than ASCII letters, digits and `-`.
    pub fn new(name: impl Into<String>) -> Result<Self, HostError> {
        let name = name.into();
        if is_valid_name(&name) {
            Ok(Self(name))
        } else {
            Err(HostError::Invalid(name))
        }
    }

    /// Validate the first label of a possibly fully qualified name, so
    /// `box.example.com` becomes `box`. `.` separates markers in stored file
    /// names and can never be part of a host name.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::Invalid`] if the first label is not a valid name.
    pub fn from_qualified(raw: &str) -> Result<Self, HostError> {
        Self::new(raw.trim().split('.').next().unwrap_or_default())
    }

    /// Detect the name of the current machine, keeping only the first label.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::DetectionFailed`] if no source yields a usable name.
    pub fn detect() -> Result<Self, HostError> {
        let from_files = ["/proc/sys/kernel/hostname", "/etc/hostname"]
            .iter()
            .find_map(|path| read_name_file(Path::new(path)));

        let raw = match from_files {
            Some(name) => name,
            None => hostname_command()?,
        };

        tracing::debug!("detected host name {raw:?}");
        Self::from_qualified(&raw).map_err(|e| HostError::DetectionFailed(e.to_string()))
    }

    /// The bare host name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The marker appended to stored paths of files specific to this host.
    #[must_use]
    pub fn suffix(&self) -> String {
        format!("{HOST_MARKER_PREFIX}{}", self.0)
    }
}

impl fmt::Display for HostName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether `name` is usable inside a `.host-<name>` marker.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn read_name_file(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let name = content.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn hostname_command() -> Result<String, HostError> {
    let output = Command::new("hostname")
        .output()
        .map_err(|e| HostError::DetectionFailed(format!("failed to execute hostname: {e}")))?;
    if !output.status.success() {
        return Err(HostError::DetectionFailed(format!(
            "hostname exited with {}",
            output.status
        )));
    }
    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        return Err(HostError::DetectionFailed(
            "hostname printed nothing".to_string(),
        ));
    }
    Ok(name)
}
