//! Splitting and reassembling hybrid (stub + archive) files.
//!
//! A fused executable has the following structure:
//!
//! ```text
//! +------------------+
//! |   Stub (.exe)    |  <- Opaque native executable, never interpreted
//! +------------------+
//! |   ZIP Archive    |  <- Starts at the first local file header signature
//! +------------------+
//! ```
//!
//! [`split`] cuts a whole-file buffer into those two parts by borrowing,
//! and [`assemble`] glues a prefix back in front of a freshly written
//! archive.
//!
//! # Example
//!
//! ```rust
//! use lovepatch::sfx::{assemble, split, HybridFile};
//!
//! let mut raw = b"MZstub".to_vec();
//! raw.extend_from_slice(b"PK\x03\x04archive");
//!
//! let hybrid = HybridFile::parse(&raw);
//! assert_eq!(hybrid.offset(), 6);
//! assert_eq!(hybrid.prefix(), b"MZstub");
//!
//! let (prefix, blob) = split(&raw, 6);
//! assert_eq!(assemble(prefix, blob), raw);
//! ```

pub mod stub;

pub use stub::StubFormat;

use std::io::Write;
use std::path::Path;

use crate::format::detect::{SignatureScan, scan_signature};
use crate::Result;

/// Splits `raw` at `offset` into `(prefix, archive_blob)`.
///
/// Offset `0` yields an empty prefix and the whole buffer as the archive.
/// Offsets past the end are clamped. The archive blob is not validated.
pub fn split(raw: &[u8], offset: usize) -> (&[u8], &[u8]) {
    raw.split_at(offset.min(raw.len()))
}

/// Concatenates `prefix` and `archive` into a new buffer.
pub fn assemble(prefix: &[u8], archive: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(prefix.len() + archive.len());
    output.extend_from_slice(prefix);
    output.extend_from_slice(archive);
    output
}

/// Result of assembling a hybrid file into a writer.
#[must_use = "assemble result should be checked to verify the sizes written"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssembleResult {
    /// Total size of the hybrid file in bytes.
    pub total_size: u64,
    /// Size of the stub prefix in bytes.
    pub prefix_size: u64,
    /// Size of the archive in bytes.
    pub archive_size: u64,
}

/// Writes `prefix` followed by `archive` to `output`.
pub fn assemble_into<W: Write>(
    output: &mut W,
    prefix: &[u8],
    archive: &[u8],
) -> Result<AssembleResult> {
    output.write_all(prefix)?;
    output.write_all(archive)?;

    let prefix_size = prefix.len() as u64;
    let archive_size = archive.len() as u64;
    Ok(AssembleResult {
        total_size: prefix_size + archive_size,
        prefix_size,
        archive_size,
    })
}

/// Writes the stub on its own so it can be launched without the archive.
///
/// An existing file at `path` is only replaced once the whole stub is on
/// disk. On Unix the result is marked executable.
pub fn write_stub(path: impl AsRef<Path>, prefix: &[u8]) -> Result<u64> {
    crate::fs::write_atomic(path, true, |writer| {
        writer.write_all(prefix)?;
        Ok(prefix.len() as u64)
    })
}

/// A whole-file buffer viewed as stub + archive.
#[derive(Debug, Clone, Copy)]
pub struct HybridFile<'a> {
    raw: &'a [u8],
    scan: SignatureScan,
}

impl<'a> HybridFile<'a> {
    /// Scans `raw` for the archive signature and records the split point.
    pub fn parse(raw: &'a [u8]) -> Self {
        Self {
            raw,
            scan: scan_signature(raw),
        }
    }

    /// Returns the raw scan outcome.
    pub fn scan(&self) -> SignatureScan {
        self.scan
    }

    /// Returns the archive offset (`0` when none was found).
    pub fn offset(&self) -> usize {
        self.scan.offset()
    }

    /// Returns the executable prefix (empty for a pure archive).
    pub fn prefix(&self) -> &'a [u8] {
        split(self.raw, self.offset()).0
    }

    /// Returns the archive blob.
    pub fn archive(&self) -> &'a [u8] {
        split(self.raw, self.offset()).1
    }

    /// Returns the whole input.
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Classifies the prefix; `None` for a pure archive.
    pub fn stub_format(&self) -> Option<StubFormat> {
        if self.offset() == 0 {
            None
        } else {
            Some(StubFormat::detect(self.prefix()))
        }
    }
}
