//! Archive entry types.

use crate::timestamp::Timestamp;

/// Per-entry metadata captured from the central directory.
///
/// This struct is marked `#[non_exhaustive]` to allow adding new fields
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct EntryMetadata {
    /// Index of the central-directory record.
    pub index: usize,
    /// Compression method the entry was stored with.
    pub compression: zip::CompressionMethod,
    /// DOS modification time, if the record carries a valid one.
    pub modified: Option<Timestamp>,
    /// Unix permission bits, when the archive was made on a Unix host.
    pub unix_mode: Option<u32>,
    /// Whether the record is a directory marker (name ends in `/`).
    pub is_dir: bool,
    /// CRC-32 of the uncompressed data as stated in the record.
    pub crc32: u32,
    /// Compressed size in bytes.
    pub compressed_size: u64,
    /// Uncompressed size in bytes as stated in the record.
    pub size: u64,
    /// Per-file comment (usually empty).
    pub comment: String,
}

impl EntryMetadata {
    /// Creates metadata for an entry that was not read from an archive.
    ///
    /// The entry is a regular Deflate-compressed file without timestamp or
    /// permissions.
    pub fn new(index: usize, size: u64) -> Self {
        Self {
            index,
            compression: zip::CompressionMethod::Deflated,
            modified: None,
            unix_mode: None,
            is_dir: false,
            crc32: 0,
            compressed_size: 0,
            size,
            comment: String::new(),
        }
    }

    /// Marks the metadata as describing a directory.
    pub fn directory(mut self) -> Self {
        self.is_dir = true;
        self
    }

    /// Sets the modification time.
    pub fn modified(mut self, modified: Timestamp) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Sets the Unix permission bits.
    pub fn unix_mode(mut self, mode: u32) -> Self {
        self.unix_mode = Some(mode);
        self
    }
}

/// A decompressed archive entry.
///
/// The path and metadata are fixed at construction; only the content can be
/// replaced afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    path: String,
    content: Vec<u8>,
    metadata: EntryMetadata,
}

impl ArchiveEntry {
    /// Creates an entry.
    pub fn new(path: impl Into<String>, content: Vec<u8>, metadata: EntryMetadata) -> Self {
        Self {
            path: path.into(),
            content,
            metadata,
        }
    }

    /// Returns the entry name exactly as stored in the archive.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the decompressed content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the metadata.
    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    /// Returns true if this entry is a directory marker.
    pub fn is_dir(&self) -> bool {
        self.metadata.is_dir || self.path.ends_with('/')
    }

    /// Replaces the content, returning the previous bytes.
    pub fn set_content(&mut self, content: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.content, content)
    }
}

/// A central-directory record that was parsed successfully.
///
/// Records are kept in listed order next to the [`ContentMap`] so the writer
/// can reproduce the original entry order.
///
/// [`ContentMap`]: super::ContentMap
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryRecord {
    /// Index of the record.
    pub index: usize,
    /// Entry name as stored.
    pub path: String,
    /// Metadata captured from the record.
    pub metadata: EntryMetadata,
}

/// An entry that could not be read and was left out of the content map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Index of the central-directory record.
    pub index: usize,
    /// Entry name, when the record itself could be parsed.
    pub name: Option<String>,
    /// A description of the failure.
    pub reason: String,
}

impl SkippedEntry {
    /// Creates a skipped entry record.
    pub fn new(index: usize, name: Option<String>, reason: impl Into<String>) -> Self {
        Self {
            index,
            name,
            reason: reason.into(),
        }
    }

    /// Converts this record into the equivalent [`Error::CorruptEntry`].
    ///
    /// [`Error::CorruptEntry`]: crate::Error::CorruptEntry
    pub fn to_error(&self) -> crate::Error {
        crate::Error::corrupt_entry(self.index, self.name.clone(), self.reason.clone())
    }
}

impl std::fmt::Display for SkippedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_error())
    }
}
