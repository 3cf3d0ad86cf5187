//! Options for reading archives.

/// Default per-entry size limit (1 GiB).
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 1024 * 1024 * 1024;

/// Options controlling how entries are decompressed.
///
/// # Example
///
/// ```rust
/// use lovepatch::read::ReadOptions;
///
/// let options = ReadOptions::new().max_entry_size(64 * 1024 * 1024);
/// assert_eq!(options.max_entry_size, 64 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Entries whose stated uncompressed size exceeds this are skipped.
    pub max_entry_size: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
        }
    }
}

impl ReadOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-entry size limit.
    pub fn max_entry_size(mut self, limit: u64) -> Self {
        self.max_entry_size = limit;
        self
    }
}
