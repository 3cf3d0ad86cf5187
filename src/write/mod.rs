//! Rebuilding ZIP archives from a content map.
//!
//! The writer always produces a brand-new archive in memory. Entries follow
//! the order of the original central directory, so an unmodified map
//! round-trips to an archive that lists the same paths in the same order
//! with the same content.
//!
//! # Metadata
//!
//! Metadata is carried over on a best-effort basis:
//!
//! | Field | Preserved |
//! |-------|-----------|
//! | DOS modification time | Yes, when the source record has one |
//! | Unix permission bits | Yes, when the source was made on Unix |
//! | Compression method | No, files are re-encoded per [`WriteOptions`] |
//! | Extra fields, file comments | No |
//!
//! # Example
//!
//! ```rust
//! use lovepatch::read::{ArchiveEntry, ContentMap, EntryMetadata, read_archive};
//! use lovepatch::write::{WriteOptions, write_content_map};
//!
//! let mut map = ContentMap::new();
//! map.insert(ArchiveEntry::new("main.lua", b"print(1)".to_vec(), EntryMetadata::new(0, 8)));
//!
//! let written = write_content_map(&map, &WriteOptions::default())?;
//! assert_eq!(written.entries_written, 1);
//!
//! let reread = read_archive(&written.data)?;
//! assert_eq!(reread.map.get("main.lua").unwrap().content(), b"print(1)");
//! # Ok::<(), lovepatch::Error>(())
//! ```

mod options;

pub use options::{DEFAULT_LEVEL, WriteOptions};

use std::collections::HashSet;
use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::read::{ArchiveEntry, ContentMap, DirectoryRecord};
use crate::{Error, Result};

/// Result of rebuilding an archive.
#[must_use = "write result holds the encoded archive"]
#[derive(Debug, Clone, Default)]
pub struct WriteResult {
    /// The encoded archive.
    pub data: Vec<u8>,
    /// Number of file entries written.
    pub entries_written: usize,
    /// Number of directory entries written.
    pub directories_written: usize,
    /// Total uncompressed bytes written.
    pub total_bytes: u64,
}

impl WriteResult {
    /// Returns the encoded archive size in bytes.
    pub fn archive_size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Builds a fresh archive from `map`, ordered by `records`.
///
/// Each path is written once, at the position of its first record. Records
/// whose path is absent from the map (entries that failed to read) are
/// skipped. Map entries not covered by any record are appended afterwards
/// in map order.
///
/// # Errors
///
/// Returns [`Error::WriteFailed`] if any entry cannot be added or the
/// archive cannot be finalized. No partial archive is returned.
pub fn write_archive(
    map: &ContentMap,
    records: &[DirectoryRecord],
    options: &WriteOptions,
) -> Result<WriteResult> {
    let mut builder = ArchiveBuilder::new(options);
    let mut written: HashSet<&str> = HashSet::with_capacity(map.len());

    for record in records {
        if written.contains(record.path.as_str()) {
            continue;
        }
        match map.get(&record.path) {
            Some(entry) => {
                builder.add(entry)?;
                written.insert(entry.path());
            }
            None => log::debug!("record {} '{}' has no content, skipping", record.index, record.path),
        }
    }

    for entry in map.iter() {
        if written.insert(entry.path()) {
            builder.add(entry)?;
        }
    }

    builder.finish()
}

/// Builds a fresh archive from `map` in map order.
pub fn write_content_map(map: &ContentMap, options: &WriteOptions) -> Result<WriteResult> {
    write_archive(map, &[], options)
}

/// Incremental ZIP encoder over an in-memory buffer.
struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: WriteOptions,
    result: WriteResult,
}

impl ArchiveBuilder {
    fn new(options: &WriteOptions) -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: *options,
            result: WriteResult::default(),
        }
    }

    fn file_options(&self, entry: &ArchiveEntry) -> SimpleFileOptions {
        let method = self.options.compression_method();
        let mut file_options = SimpleFileOptions::default().compression_method(method);

        if method != zip::CompressionMethod::Stored {
            file_options = file_options.compression_level(Some(self.options.level as i64));
        }
        if entry.content().len() as u64 > u32::MAX as u64 {
            file_options = file_options.large_file(true);
        }

        if self.options.preserve_metadata {
            let meta = entry.metadata();
            if let Some(datetime) = meta.modified.and_then(|ts| ts.to_zip()) {
                file_options = file_options.last_modified_time(datetime);
            }
            if let Some(mode) = meta.unix_mode {
                file_options = file_options.unix_permissions(mode);
            }
        }

        file_options
    }

    fn add(&mut self, entry: &ArchiveEntry) -> Result<()> {
        let path = entry.path();
        let file_options = self.file_options(entry);

        if entry.is_dir() {
            self.writer
                .add_directory(path, file_options)
                .map_err(|e| Error::write_failed(path, e))?;
            self.result.directories_written += 1;
            log::debug!("wrote directory '{}'", path);
            return Ok(());
        }

        self.writer
            .start_file(path, file_options)
            .map_err(|e| Error::write_failed(path, e))?;
        self.writer
            .write_all(entry.content())
            .map_err(|e| Error::write_failed(path, e))?;

        self.result.entries_written += 1;
        self.result.total_bytes += entry.content().len() as u64;
        log::debug!("wrote '{}' ({} bytes)", path, entry.content().len());
        Ok(())
    }

    fn finish(self) -> Result<WriteResult> {
        let mut result = self.result;
        result.data = self
            .writer
            .finish()
            .map_err(|e| Error::write_failed("<finish>", e))?
            .into_inner();

        log::info!(
            "wrote archive: {} files, {} directories, {} bytes",
            result.entries_written,
            result.directories_written,
            result.archive_size()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::{EntryMetadata, read_archive};
    use crate::timestamp::Timestamp;

    fn entry(index: usize, path: &str, content: &[u8]) -> ArchiveEntry {
        ArchiveEntry::new(
            path,
            content.to_vec(),
            EntryMetadata::new(index, content.len() as u64),
        )
    }

    fn record(index: usize, path: &str) -> DirectoryRecord {
        DirectoryRecord {
            index,
            path: path.to_string(),
            metadata: EntryMetadata::new(index, 0),
        }
    }

    #[test]
    fn test_write_in_record_order() {
        let map: ContentMap = vec![
            entry(0, "a.lua", b"a"),
            entry(1, "b.lua", b"b"),
            entry(2, "c.lua", b"c"),
        ]
        .into_iter()
        .collect();
        let records = vec![record(2, "c.lua"), record(0, "a.lua"), record(1, "b.lua")];

        let result = write_archive(&map, &records, &WriteOptions::default()).unwrap();
        assert_eq!(result.entries_written, 3);
        assert_eq!(result.total_bytes, 3);

        let reread = read_archive(&result.data).unwrap();
        let paths: Vec<_> = reread.map.paths().collect();
        assert_eq!(paths, vec!["c.lua", "a.lua", "b.lua"]);
    }

    #[test]
    fn test_duplicate_records_written_once() {
        let map: ContentMap = vec![entry(0, "dup.lua", b"first"), entry(2, "dup.lua", b"last")]
            .into_iter()
            .collect();
        let records = vec![record(0, "dup.lua"), record(1, "gone.lua"), record(2, "dup.lua")];

        let result = write_archive(&map, &records, &WriteOptions::default()).unwrap();
        assert_eq!(result.entries_written, 1);

        let reread = read_archive(&result.data).unwrap();
        assert_eq!(reread.records.len(), 1);
        assert_eq!(reread.map.get("dup.lua").unwrap().content(), b"last");
    }

    #[test]
    fn test_unrecorded_entries_appended() {
        let map: ContentMap = vec![entry(0, "old.lua", b"o"), entry(1, "new.lua", b"n")]
            .into_iter()
            .collect();
        let result = write_archive(&map, &[record(0, "old.lua")], &WriteOptions::default()).unwrap();

        let reread = read_archive(&result.data).unwrap();
        let paths: Vec<_> = reread.map.paths().collect();
        assert_eq!(paths, vec!["old.lua", "new.lua"]);
    }

    #[test]
    fn test_directories_and_empty_files() {
        let mut map = ContentMap::new();
        map.insert(ArchiveEntry::new(
            "assets/",
            Vec::new(),
            EntryMetadata::new(0, 0).directory(),
        ));
        map.insert(entry(1, "assets/empty.txt", b""));

        let result = write_content_map(&map, &WriteOptions::default()).unwrap();
        assert_eq!(result.directories_written, 1);
        assert_eq!(result.entries_written, 1);

        let reread = read_archive(&result.data).unwrap();
        assert!(reread.map.get("assets/").unwrap().is_dir());
        assert!(reread.map.get("assets/empty.txt").unwrap().content().is_empty());
    }

    #[test]
    fn test_metadata_preserved() {
        let ts = Timestamp::new(2019, 4, 1, 13, 37, 10).unwrap();
        let mut map = ContentMap::new();
        map.insert(ArchiveEntry::new(
            "run.sh",
            b"#!/bin/sh".to_vec(),
            EntryMetadata::new(0, 9).modified(ts).unix_mode(0o755),
        ));

        let result = write_content_map(&map, &WriteOptions::default()).unwrap();
        let reread = read_archive(&result.data).unwrap();
        let meta = reread.map.get("run.sh").unwrap().metadata();
        assert_eq!(meta.modified, Some(ts));
        assert_eq!(meta.unix_mode.map(|m| m & 0o777), Some(0o755));
    }

    #[test]
    fn test_level_zero_stores() {
        let map: ContentMap = vec![entry(0, "data.txt", &[b'x'; 1000])].into_iter().collect();
        let opts = WriteOptions::new().level(0).unwrap();
        let result = write_content_map(&map, &opts).unwrap();

        let reread = read_archive(&result.data).unwrap();
        let meta = reread.map.get("data.txt").unwrap().metadata();
        assert_eq!(meta.compression, zip::CompressionMethod::Stored);
        assert_eq!(meta.compressed_size, 1000);
    }

    #[test]
    fn test_deflate_shrinks_repetitive_content() {
        let map: ContentMap = vec![entry(0, "data.txt", &[b'x'; 10_000])].into_iter().collect();
        let result = write_content_map(&map, &WriteOptions::default()).unwrap();
        assert!(result.archive_size() < 10_000);
        assert_eq!(result.total_bytes, 10_000);
    }

    #[test]
    fn test_empty_map_produces_valid_archive() {
        let result = write_content_map(&ContentMap::new(), &WriteOptions::default()).unwrap();
        assert!(result.data.starts_with(crate::format::END_OF_CENTRAL_DIRECTORY_SIGNATURE));
        assert!(read_archive(&result.data).unwrap().map.is_empty());
    }
}
