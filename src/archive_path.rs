//! Validated entry paths for safe extraction.
//!
//! Entry names inside a game archive come from an untrusted file. Before an
//! entry is written below the extraction directory its name is turned into
//! an [`ArchivePath`], which refuses anything that could escape that
//! directory or that Windows cannot create.

use crate::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Maximum length for archive paths (in bytes).
const MAX_PATH_LENGTH: usize = 32768;

/// Windows device names that cannot be used as file names.
const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Reserved names also match with an extension ("CON.txt").
fn is_windows_reserved(name: &str) -> bool {
    let base = match name.find('.') {
        Some(pos) => &name[..pos],
        None => name,
    };

    WINDOWS_RESERVED_NAMES
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
}

/// A relative, forward-slash separated path that stays inside its root.
///
/// Validation rejects:
/// - NUL bytes and empty paths
/// - Absolute paths (leading `/`)
/// - Empty segments, trailing `/`
/// - `.` and `..` segments
/// - Windows reserved device names
///
/// # Examples
///
/// ```
/// use lovepatch::ArchivePath;
///
/// let path = ArchivePath::new("scripts/main.lua").unwrap();
/// assert_eq!(path.components().count(), 2);
///
/// // ZIP directory entries carry a trailing slash, Windows tools use `\`.
/// let dir = ArchivePath::from_entry_name("assets\\sounds/").unwrap();
/// assert_eq!(dir.as_str(), "assets/sounds");
///
/// assert!(ArchivePath::new("../escape.lua").is_err());
/// assert!(ArchivePath::new("/etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a new `ArchivePath` from a string, validating it as-is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`] when any rule above is broken.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Creates an `ArchivePath` from a raw ZIP entry name.
    ///
    /// Backslashes become forward slashes and a single trailing slash (the
    /// ZIP directory marker) is dropped before validation.
    pub fn from_entry_name(name: &str) -> Result<Self> {
        let normalized = name.replace('\\', "/");
        let trimmed = normalized.strip_suffix('/').unwrap_or(&normalized);
        Self::new(trimmed)
    }

    fn validate(s: &str) -> Result<()> {
        if s.contains('\0') {
            return Err(Error::InvalidArchivePath("contains NUL byte".into()));
        }

        if s.is_empty() {
            return Err(Error::InvalidArchivePath("empty path".into()));
        }

        if s.len() > MAX_PATH_LENGTH {
            return Err(Error::InvalidArchivePath(format!(
                "path exceeds maximum length of {} bytes",
                MAX_PATH_LENGTH
            )));
        }

        if s.starts_with('/') {
            return Err(Error::InvalidArchivePath(
                "absolute path not allowed".into(),
            ));
        }

        if s.ends_with('/') {
            return Err(Error::InvalidArchivePath(
                "trailing slash not allowed".into(),
            ));
        }

        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidArchivePath(
                    "empty segment (consecutive slashes)".into(),
                ));
            }
            if segment == "." {
                return Err(Error::InvalidArchivePath("'.' segment not allowed".into()));
            }
            if segment == ".." {
                return Err(Error::InvalidArchivePath(
                    "'..' segment not allowed (path traversal)".into(),
                ));
            }
            // Drive prefixes such as "C:" would make the joined path absolute on Windows.
            if segment.contains(':') {
                return Err(Error::InvalidArchivePath(format!(
                    "':' not allowed in segment '{}'",
                    segment
                )));
            }
            if is_windows_reserved(segment) {
                return Err(Error::InvalidArchivePath(format!(
                    "Windows reserved filename '{}' not allowed",
                    segment
                )));
            }
        }

        Ok(())
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an iterator over the path segments.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Resolves this path below `root` using native separators.
    pub fn resolve(&self, root: impl AsRef<Path>) -> PathBuf {
        let mut path = root.as_ref().to_path_buf();
        for segment in self.components() {
            path.push(segment);
        }
        path
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
