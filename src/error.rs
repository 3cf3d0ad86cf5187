//! Error types for hybrid-file patching.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when splitting, reading, rewriting, and reassembling fused
//! executables, along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Errors
//! that concern a single archive entry are recovered inside the reader and
//! reported as [`SkippedEntry`](crate::read::SkippedEntry) values; everything
//! else propagates with `?`:
//!
//! ```rust,no_run
//! use lovepatch::{Patcher, PatchOptions, Result};
//!
//! fn patch(path: &str) -> Result<()> {
//!     let report = Patcher::new(PatchOptions::default()).patch_path(path)?;
//!     println!("changed: {}", report.changed());
//!     Ok(())
//! }
//! ```
//!
//! ## User-Friendly Error Messages
//!
//! ```rust
//! use lovepatch::Error;
//!
//! fn print_user_message(error: &Error) {
//!     match error {
//!         Error::Io(e) => println!("File error: {}", e),
//!         Error::InvalidArchive(_) => println!("The file does not contain a readable ZIP archive."),
//!         Error::WriteFailed { .. } => println!("Could not build the patched archive."),
//!         _ => println!("Error: {}", error),
//!     }
//! }
//! ```

use std::io;

/// Helper struct for formatting CorruptEntry error messages.
struct CorruptEntryDisplay<'a> {
    index: usize,
    name: Option<&'a str>,
    reason: &'a str,
}

impl std::fmt::Display for CorruptEntryDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Corrupt entry {}", self.index)?;
        if let Some(name) = self.name {
            write!(f, " ({})", name)?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// The main error type for patching operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | Unreadable input, unwritable output |
/// | Format | [`InvalidArchive`][Self::InvalidArchive], [`CorruptEntry`][Self::CorruptEntry] | Damaged ZIP data |
/// | Writing | [`WriteFailed`][Self::WriteFailed], [`InvalidCompressionLevel`][Self::InvalidCompressionLevel] | Re-encoding the archive |
/// | Paths | [`InvalidArchivePath`][Self::InvalidArchivePath], [`InvalidInputPath`][Self::InvalidInputPath] | Unsafe entry names, odd inputs |
/// | Resources | [`ResourceLimitExceeded`][Self::ResourceLimitExceeded] | Oversized entries |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// Returned when the input cannot be read or an output artifact cannot be
    /// written. Check the underlying [`std::io::ErrorKind`] for specifics.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive portion could not be opened.
    ///
    /// This happens when the central directory is missing or unreadable, for
    /// example when the input is neither a ZIP file nor a fused executable.
    /// Individual damaged entries do not produce this error.
    #[error("Invalid ZIP archive: {0}")]
    InvalidArchive(String),

    /// A single archive entry could not be parsed or decompressed.
    ///
    /// The reader never propagates this error; it records the entry as
    /// skipped and continues with the next directory record.
    #[error("{}", CorruptEntryDisplay { index: *index, name: name.as_deref(), reason })]
    CorruptEntry {
        /// Index of the central-directory record.
        index: usize,
        /// Entry name, when the record itself could be parsed.
        name: Option<String>,
        /// A description of the failure.
        reason: String,
    },

    /// A resource limit was exceeded.
    ///
    /// Guards against entries that declare absurd uncompressed sizes.
    #[error("Resource limit exceeded: {0}")]
    ResourceLimitExceeded(String),

    /// Adding an entry to, or finalizing, the rebuilt archive failed.
    ///
    /// The writer has no degraded mode: a truncated archive is never
    /// returned.
    #[error("Failed to write entry '{path}': {reason}")]
    WriteFailed {
        /// The entry being written, or `<finish>` for finalization.
        path: String,
        /// A description of the failure.
        reason: String,
    },

    /// An archive entry name is not safe to materialize on disk.
    ///
    /// ```rust
    /// use lovepatch::ArchivePath;
    ///
    /// assert!(ArchivePath::from_entry_name("../escape.lua").is_err());
    /// ```
    #[error("Invalid archive path: {0}")]
    InvalidArchivePath(String),

    /// Output artifact names cannot be derived from the input path.
    #[error("Invalid input path: {0}")]
    InvalidInputPath(String),

    /// An invalid compression level was provided.
    ///
    /// ```rust
    /// use lovepatch::{Error, write::WriteOptions};
    ///
    /// assert!(WriteOptions::new().level(9).is_ok());
    /// let result = WriteOptions::new().level(15);
    /// assert!(matches!(result, Err(Error::InvalidCompressionLevel { level: 15 })));
    /// ```
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The invalid level that was provided.
        level: u32,
    },
}

impl Error {
    /// Returns `true` if this is a data corruption error.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Error::CorruptEntry { .. } | Error::InvalidArchive(_))
    }

    /// Returns the entry index associated with this error, if any.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Error::CorruptEntry { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Returns the entry name/path associated with this error, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lovepatch::Error;
    ///
    /// fn log_error(error: &Error) {
    ///     if let Some(name) = error.entry_name() {
    ///         eprintln!("Error for '{}': {}", name, error);
    ///     }
    /// }
    /// ```
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::CorruptEntry { name, .. } => name.as_deref(),
            Error::WriteFailed { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Creates a CorruptEntry error.
    pub fn corrupt_entry(index: usize, name: Option<String>, reason: impl Into<String>) -> Self {
        Error::CorruptEntry {
            index,
            name,
            reason: reason.into(),
        }
    }

    /// Creates a WriteFailed error.
    pub fn write_failed(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::WriteFailed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for patching operations.
pub type Result<T> = std::result::Result<T, Error>;
