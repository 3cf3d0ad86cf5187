//! Archive offset discovery in hybrid files.
//!
//! A fused executable is a native stub followed by a ZIP archive. The stub is
//! never parsed; the archive is located by scanning forward for the first
//! ZIP local file header signature.
//!
//! # Example
//!
//! ```rust
//! use lovepatch::format::detect::{find_signature, scan_signature, SignatureScan};
//!
//! let mut data = vec![0xCCu8; 16];
//! data.extend_from_slice(b"PK\x03\x04rest-of-archive");
//!
//! assert_eq!(find_signature(&data), 16);
//! assert_eq!(scan_signature(&data), SignatureScan::Found(16));
//! assert_eq!(scan_signature(b"no archive here"), SignatureScan::NotFound);
//! ```

use super::{LOCAL_FILE_HEADER_SIGNATURE, SIGNATURE_LEN};

/// Outcome of a signature scan.
///
/// [`find_signature`] folds both variants into a single offset where `0`
/// means either "archive starts at byte 0" or "no signature at all". Callers
/// that need to tell those apart use [`scan_signature`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScan {
    /// The signature first occurs at this offset.
    Found(usize),
    /// The signature does not occur anywhere in the buffer.
    NotFound,
}

impl SignatureScan {
    /// Returns the archive offset, using `0` for [`SignatureScan::NotFound`].
    pub fn offset(self) -> usize {
        match self {
            SignatureScan::Found(offset) => offset,
            SignatureScan::NotFound => 0,
        }
    }

    /// Returns `true` if a signature was found.
    pub fn is_found(self) -> bool {
        matches!(self, SignatureScan::Found(_))
    }

    /// Returns `true` if the archive is preceded by a non-empty stub.
    pub fn has_prefix(self) -> bool {
        self.offset() > 0
    }
}

/// Scans `buffer` for the first ZIP local file header signature.
///
/// The scan is a plain forward pass over every 4-byte window. Buffers shorter
/// than the signature yield [`SignatureScan::NotFound`] without scanning.
pub fn scan_signature(buffer: &[u8]) -> SignatureScan {
    if buffer.len() < SIGNATURE_LEN {
        return SignatureScan::NotFound;
    }

    match buffer
        .windows(SIGNATURE_LEN)
        .position(|w| w == LOCAL_FILE_HEADER_SIGNATURE)
    {
        Some(pos) => SignatureScan::Found(pos),
        None => SignatureScan::NotFound,
    }
}

/// Returns the offset of the first ZIP local file header signature.
///
/// Absence of a match is not an error: `0` is returned and the whole buffer
/// is then treated as a pure archive with no executable prefix.
pub fn find_signature(buffer: &[u8]) -> usize {
    scan_signature(buffer).offset()
}
