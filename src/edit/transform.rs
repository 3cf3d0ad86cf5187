//! The transformation contract and its result types.

use crate::read::ContentMap;

/// What a transform did to a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryOutcome {
    /// The content was rewritten.
    Modified,
    /// The content already carried the change; left untouched.
    AlreadyApplied,
    /// The entry matched but had no insertion point; left untouched.
    MarkerNotFound,
}

impl EntryOutcome {
    /// Returns the outcome as a short string.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryOutcome::Modified => "modified",
            EntryOutcome::AlreadyApplied => "already-applied",
            EntryOutcome::MarkerNotFound => "marker-not-found",
        }
    }

    /// Returns true if the entry content was changed.
    pub fn is_modified(&self) -> bool {
        matches!(self, EntryOutcome::Modified)
    }
}

impl std::fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for one entry touched by a transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    /// Name of the transform that produced this report.
    pub transform: String,
    /// Entry path.
    pub path: String,
    /// What happened.
    pub outcome: EntryOutcome,
}

/// Result of applying one or more transforms to a content map.
#[must_use = "transform result tells whether the archive must be rewritten"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformResult {
    /// True if any entry was modified.
    pub changed: bool,
    /// Per-entry outcomes, in the order entries were visited.
    pub entries: Vec<EntryReport>,
}

impl TransformResult {
    /// Creates an empty, unchanged result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome for `path`.
    pub fn record(&mut self, transform: &str, path: &str, outcome: EntryOutcome) {
        self.changed |= outcome.is_modified();
        self.entries.push(EntryReport {
            transform: transform.to_string(),
            path: path.to_string(),
            outcome,
        });
    }

    /// Folds another result into this one.
    pub fn merge(&mut self, other: TransformResult) {
        self.changed |= other.changed;
        self.entries.extend(other.entries);
    }

    /// Returns true if at least one entry matched the transform's target.
    pub fn target_found(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns the number of entries with the given outcome.
    pub fn count(&self, outcome: EntryOutcome) -> usize {
        self.entries.iter().filter(|e| e.outcome == outcome).count()
    }

    /// Returns the paths of modified entries.
    pub fn modified_paths(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_modified())
            .map(|e| e.path.as_str())
    }
}

/// A named content transformation over a [`ContentMap`].
///
/// Implementations may replace the content of existing entries but cannot
/// rename, add, or drop them. Applying a transform twice must leave the map
/// as it was after the first application.
pub trait Transform {
    /// Returns a short name used in logs and reports.
    fn name(&self) -> &str;

    /// Applies the transformation in place.
    fn apply(&self, map: &mut ContentMap) -> TransformResult;
}

impl<T: Transform + ?Sized> Transform for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn apply(&self, map: &mut ContentMap) -> TransformResult {
        (**self).apply(map)
    }
}

/// Runs several transforms in sequence.
///
/// The chain reports a change if any member did.
#[derive(Default)]
pub struct TransformChain {
    transforms: Vec<Box<dyn Transform>>,
}

impl TransformChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform.
    pub fn with(mut self, transform: impl Transform + 'static) -> Self {
        self.transforms.push(Box::new(transform));
        self
    }

    /// Returns the number of transforms.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Returns true if the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl std::fmt::Debug for TransformChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.transforms.iter().map(|t| t.name()))
            .finish()
    }
}

impl Transform for TransformChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn apply(&self, map: &mut ContentMap) -> TransformResult {
        let mut result = TransformResult::new();
        for transform in &self.transforms {
            log::debug!("applying transform '{}'", transform.name());
            result.merge(transform.apply(map));
        }
        result
    }
}
