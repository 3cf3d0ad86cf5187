//! Reading ZIP archives into memory.
//!
//! The reader walks the central directory in listed order and decompresses
//! every entry into a [`ContentMap`]. A damaged entry never aborts the read:
//! it is logged, reported as a [`SkippedEntry`], and the next record is
//! processed. Only an archive whose central directory cannot be opened at
//! all is an error.
//!
//! # Example
//!
//! ```rust
//! use std::io::{Cursor, Write};
//! use lovepatch::read::read_archive;
//!
//! let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
//! writer.start_file("main.lua", zip::write::SimpleFileOptions::default())?;
//! writer.write_all(b"function love.run() end")?;
//! let blob = writer.finish()?.into_inner();
//!
//! let result = read_archive(&blob)?;
//! assert_eq!(result.map.len(), 1);
//! assert!(result.skipped.is_empty());
//! assert_eq!(
//!     result.map.get("main.lua").unwrap().content(),
//!     b"function love.run() end"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod content_map;
mod entry;
mod options;

pub use content_map::ContentMap;
pub use entry::{ArchiveEntry, DirectoryRecord, EntryMetadata, SkippedEntry};
pub use options::{DEFAULT_MAX_ENTRY_SIZE, ReadOptions};

use std::io::{Cursor, Read, Seek};

use crate::timestamp::Timestamp;
use crate::{Error, Result};

/// Outcome of reading a whole archive.
#[derive(Debug, Clone, Default)]
pub struct ReadResult {
    /// Successfully decompressed entries.
    pub map: ContentMap,
    /// Every parsed central-directory record, in listed order.
    pub records: Vec<DirectoryRecord>,
    /// Entries left out of the map.
    pub skipped: Vec<SkippedEntry>,
}

impl ReadResult {
    /// Returns true if every record was read.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, skipped: SkippedEntry) {
        log::warn!("skipping {}", skipped);
        self.skipped.push(skipped);
    }
}

/// A ZIP archive opened for reading.
pub struct ArchiveReader<R> {
    archive: zip::ZipArchive<R>,
    options: ReadOptions,
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Opens an archive with default options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchive`] if the central directory cannot be
    /// located or parsed.
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with_options(reader, ReadOptions::default())
    }

    /// Opens an archive with the given options.
    pub fn open_with_options(reader: R, options: ReadOptions) -> Result<Self> {
        let archive =
            zip::ZipArchive::new(reader).map_err(|e| Error::InvalidArchive(e.to_string()))?;
        log::debug!("opened archive with {} records", archive.len());
        Ok(Self { archive, options })
    }

    /// Returns the number of central-directory records.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns true if the archive has no records.
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Decompresses every entry in record order.
    pub fn read_all(&mut self) -> ReadResult {
        let mut result = ReadResult::default();
        let limit = self.options.max_entry_size;

        for index in 0..self.archive.len() {
            let mut file = match self.archive.by_index(index) {
                Ok(file) => file,
                Err(e) => {
                    result.skip(SkippedEntry::new(index, None, e.to_string()));
                    continue;
                }
            };

            let path = file.name().to_string();
            let metadata = EntryMetadata {
                index,
                compression: file.compression(),
                modified: file.last_modified().map(Timestamp::from_zip),
                unix_mode: file.unix_mode(),
                is_dir: file.is_dir(),
                crc32: file.crc32(),
                compressed_size: file.compressed_size(),
                size: file.size(),
                comment: file.comment().to_string(),
            };

            result.records.push(DirectoryRecord {
                index,
                path: path.clone(),
                metadata: metadata.clone(),
            });

            match read_content(&mut file, metadata.size, limit) {
                Ok(content) => {
                    log::debug!("read entry {} '{}' ({} bytes)", index, path, content.len());
                    result.map.insert(ArchiveEntry::new(path, content, metadata));
                }
                Err(e) => result.skip(SkippedEntry::new(index, Some(path), e.to_string())),
            }
        }

        log::info!(
            "read {} entries ({} skipped)",
            result.map.len(),
            result.skipped.len()
        );
        result
    }
}

/// Reads an in-memory archive blob with default options.
pub fn read_archive(blob: &[u8]) -> Result<ReadResult> {
    read_archive_with_options(blob, ReadOptions::default())
}

/// Reads an in-memory archive blob.
pub fn read_archive_with_options(blob: &[u8], options: ReadOptions) -> Result<ReadResult> {
    let mut reader = ArchiveReader::open_with_options(Cursor::new(blob), options)?;
    Ok(reader.read_all())
}

/// Decompresses one entry, allocating exactly its stated size.
fn read_content<R: Read>(reader: &mut R, size: u64, limit: u64) -> Result<Vec<u8>> {
    if size > limit {
        return Err(Error::ResourceLimitExceeded(format!(
            "entry size {} exceeds limit {}",
            size, limit
        )));
    }

    let capacity = usize::try_from(size)
        .map_err(|_| Error::ResourceLimitExceeded(format!("entry size {} too large", size)))?;
    let mut content = Vec::with_capacity(capacity);
    // One byte of slack exposes streams longer than stated.
    reader
        .by_ref()
        .take(size.saturating_add(1))
        .read_to_end(&mut content)?;

    if content.len() as u64 != size {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "size mismatch: expected {} bytes, got {}",
                size,
                content.len()
            ),
        )));
    }
    Ok(content)
}
