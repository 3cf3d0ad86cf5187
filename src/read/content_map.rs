//! Order-preserving map of decompressed entries.

use std::collections::HashMap;

use super::entry::ArchiveEntry;

/// Decompressed archive entries keyed by path.
///
/// Iteration follows insertion order. Inserting a path that is already
/// present replaces the stored entry in place, so the path keeps the
/// position of its first occurrence while the later content wins.
///
/// Every entry in the map was decompressed successfully; entries that
/// failed are reported by the reader instead of being stored empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentMap {
    entries: Vec<ArchiveEntry>,
    index: HashMap<String, usize>,
}

impl ContentMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the entry it replaced, if any.
    pub fn insert(&mut self, entry: ArchiveEntry) -> Option<ArchiveEntry> {
        match self.index.get(entry.path()) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos], entry)),
            None => {
                self.index.insert(entry.path().to_string(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    /// Returns the entry stored under `path`.
    pub fn get(&self, path: &str) -> Option<&ArchiveEntry> {
        self.index.get(path).map(|&pos| &self.entries[pos])
    }

    /// Returns a mutable reference to the entry stored under `path`.
    pub fn get_mut(&mut self, path: &str) -> Option<&mut ArchiveEntry> {
        self.index.get(path).map(|&pos| &mut self.entries[pos])
    }

    /// Returns true if `path` is present.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ArchiveEntry> {
        self.entries.iter()
    }

    /// Iterates mutably over entries in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ArchiveEntry> {
        self.entries.iter_mut()
    }

    /// Iterates over paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(ArchiveEntry::path)
    }
}

impl<'a> IntoIterator for &'a ContentMap {
    type Item = &'a ArchiveEntry;
    type IntoIter = std::slice::Iter<'a, ArchiveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ArchiveEntry> for ContentMap {
    fn from_iter<I: IntoIterator<Item = ArchiveEntry>>(iter: I) -> Self {
        let mut map = Self::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}
