//! ZIP format constants and signature detection.
//!
//! Only the handful of magic numbers needed to locate an archive inside a
//! hybrid file live here; actual ZIP parsing is delegated to the `zip` crate.

pub mod detect;

/// ZIP local file header signature (`0x04034b50` little-endian).
///
/// Every entry in a ZIP archive starts with these 4 bytes: `'P' 'K' 0x03 0x04`.
/// The first occurrence in a fused executable marks where the archive begins.
pub const LOCAL_FILE_HEADER_SIGNATURE: &[u8; 4] = b"PK\x03\x04";

/// ZIP end of central directory signature (`0x06054b50` little-endian).
///
/// An archive without any entries consists of this record only.
pub const END_OF_CENTRAL_DIRECTORY_SIGNATURE: &[u8; 4] = b"PK\x05\x06";

/// Length of the signatures above.
pub const SIGNATURE_LEN: usize = 4;
