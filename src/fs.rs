//! Filesystem output: atomic file replacement and unpacking a content map
//! as a directory tree.
//!
//! The patched game is also unpacked next to the input so a debugger can map
//! breakpoints onto real source files. Entry names are validated through
//! [`ArchivePath`] first; anything that would land outside the destination
//! is skipped.
//!
//! # Example
//!
//! ```rust,no_run
//! use lovepatch::fs::materialize;
//! use lovepatch::read::read_archive;
//!
//! let blob = std::fs::read("game.love")?;
//! let result = read_archive(&blob)?;
//! let written = materialize(&result.map, "game")?;
//! println!("{} files written", written.files_written);
//! # Ok::<(), lovepatch::Error>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::read::{ArchiveEntry, ContentMap};
use crate::{ArchivePath, Result};

/// An entry that could not be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeFailure {
    /// Entry path as stored in the archive.
    pub path: String,
    /// A description of the failure.
    pub reason: String,
}

/// Result of materializing a content map.
#[must_use = "materialize result lists entries that were not written"]
#[derive(Debug, Clone, Default)]
pub struct MaterializeResult {
    /// Number of files written.
    pub files_written: usize,
    /// Number of directory entries created.
    pub directories_created: usize,
    /// Total bytes written.
    pub bytes_written: u64,
    /// Entries that were skipped.
    pub skipped: Vec<MaterializeFailure>,
}

impl MaterializeResult {
    /// Returns true if every entry was written.
    pub fn is_ok(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, path: &str, reason: impl std::fmt::Display) {
        log::warn!("could not write '{}': {}", path, reason);
        self.skipped.push(MaterializeFailure {
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Creates every missing parent directory of `path`.
pub fn ensure_parent_dirs(path: impl AsRef<Path>) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Replaces `path` with whatever `write` produces.
///
/// The bytes go to a temporary file in the same directory, which is synced
/// and then renamed over `path`. If `write` or any later step fails, the
/// temporary file is removed and an existing file at `path` is untouched.
/// On Unix the result gets mode `0o755` when `executable` is set and `0o644`
/// otherwise.
pub fn write_atomic<T, F>(path: impl AsRef<Path>, executable: bool, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<T>,
{
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    let value = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let value = write(&mut writer)?;
        writer.flush()?;
        value
    };
    temp.as_file().sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = if executable { 0o755 } else { 0o644 };
        temp.as_file().set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = executable;

    temp.persist(path).map_err(|e| e.error)?;
    Ok(value)
}

/// Writes every entry of `map` below `dest`.
///
/// Directory entries become directories, file entries become files with
/// their modification time restored when the archive recorded one.
///
/// # Errors
///
/// Only failing to create `dest` itself is an error. Per-entry failures,
/// including unsafe entry names, are collected in
/// [`MaterializeResult::skipped`].
pub fn materialize(map: &ContentMap, dest: impl AsRef<Path>) -> Result<MaterializeResult> {
    let dest = dest.as_ref();
    fs::create_dir_all(dest)?;

    let mut result = MaterializeResult::default();
    for entry in map {
        let path = match ArchivePath::from_entry_name(entry.path()) {
            Ok(path) => path,
            Err(e) => {
                result.skip(entry.path(), e);
                continue;
            }
        };

        if entry.is_dir() {
            match fs::create_dir_all(path.resolve(dest)) {
                Ok(()) => result.directories_created += 1,
                Err(e) => result.skip(entry.path(), e),
            }
            continue;
        }

        match write_entry(entry, &path, dest) {
            Ok(()) => {
                result.files_written += 1;
                result.bytes_written += entry.content().len() as u64;
            }
            Err(e) => result.skip(entry.path(), e),
        }
    }

    log::info!(
        "materialized {} files into '{}' ({} skipped)",
        result.files_written,
        dest.display(),
        result.skipped.len()
    );
    Ok(result)
}

fn write_entry(entry: &ArchiveEntry, path: &ArchivePath, dest: &Path) -> Result<()> {
    let target = path.resolve(dest);
    ensure_parent_dirs(&target)?;
    fs::write(&target, entry.content())?;

    if let Some(secs) = entry.metadata().modified.and_then(|ts| ts.as_unix_secs()) {
        let mtime = filetime::FileTime::from_unix_time(secs, 0);
        if let Err(e) = filetime::set_file_mtime(&target, mtime) {
            log::debug!("failed to set mtime on '{}': {}", target.display(), e);
        }
    }
    Ok(())
}
