//! Debugger bootstrap injection for LÖVE entry scripts.
//!
//! The Local Lua Debugger extension for VS Code starts its debuggee with
//! `LOCAL_LUA_DEBUGGER_VSCODE=1`. A small guard is inserted on the line
//! before `function love.run(` so the game attaches to the debugger when
//! launched that way and runs normally otherwise.

use super::transform::{EntryOutcome, Transform, TransformResult};
use crate::read::ContentMap;

/// Entry patched when no other target is configured.
pub const DEFAULT_TARGET: &str = "main.lua";

/// Text whose presence means the bootstrap is already installed.
pub const SENTINEL: &[u8] = b"require(\"lldebugger\")";

/// Insertion anchor; the bootstrap goes at the start of this line.
pub const MARKER: &[u8] = b"function love.run(";

/// The inserted bootstrap block.
pub const BOOTSTRAP: &[u8] = b"if os.getenv(\"LOCAL_LUA_DEBUGGER_VSCODE\") == \"1\" then\n  require(\"lldebugger\").start()\nend\n\n";

/// Inserts the debugger bootstrap into the target script.
///
/// An entry matches when its path is the target or ends in `/` (or `\`)
/// followed by the target, so `main.lua` also matches `game/main.lua` but not
/// `notmain.lua`. An empty target matches nothing. Insertion works on raw
/// bytes; scripts need not be valid UTF-8.
///
/// # Example
///
/// ```rust
/// use lovepatch::edit::{DebuggerInjection, Transform};
/// use lovepatch::read::{ArchiveEntry, ContentMap, EntryMetadata};
///
/// let mut map = ContentMap::new();
/// let script = b"local x = 1\nfunction love.run()\nend\n".to_vec();
/// map.insert(ArchiveEntry::new("main.lua", script, EntryMetadata::new(0, 0)));
///
/// let injection = DebuggerInjection::new();
/// assert!(injection.apply(&mut map).changed);
/// assert!(!injection.apply(&mut map).changed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggerInjection {
    target: String,
}

impl Default for DebuggerInjection {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
        }
    }
}

impl DebuggerInjection {
    /// Creates an injection targeting `main.lua`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target entry name.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Returns the target entry name.
    pub fn target_name(&self) -> &str {
        &self.target
    }

    /// Returns true if `path` names a target entry.
    pub fn matches(&self, path: &str) -> bool {
        if self.target.is_empty() {
            return false;
        }
        path.strip_suffix(self.target.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.ends_with(['/', '\\']))
    }

    /// Computes the patched content, or the reason no patch applies.
    pub fn inject(content: &[u8]) -> Result<Vec<u8>, EntryOutcome> {
        if contains(content, SENTINEL) {
            return Err(EntryOutcome::AlreadyApplied);
        }

        let marker = find(content, MARKER).ok_or(EntryOutcome::MarkerNotFound)?;
        let line_start = content[..marker]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);

        let mut patched = Vec::with_capacity(content.len() + BOOTSTRAP.len());
        patched.extend_from_slice(&content[..line_start]);
        patched.extend_from_slice(BOOTSTRAP);
        patched.extend_from_slice(&content[line_start..]);
        Ok(patched)
    }
}

impl Transform for DebuggerInjection {
    fn name(&self) -> &str {
        "debugger-injection"
    }

    fn apply(&self, map: &mut ContentMap) -> TransformResult {
        let mut result = TransformResult::new();

        for entry in map.iter_mut() {
            if entry.is_dir() || !self.matches(entry.path()) {
                continue;
            }

            let outcome = match Self::inject(entry.content()) {
                Ok(patched) => {
                    entry.set_content(patched);
                    log::info!("injected debugger bootstrap into '{}'", entry.path());
                    EntryOutcome::Modified
                }
                Err(EntryOutcome::AlreadyApplied) => {
                    log::info!("'{}' already loads the debugger", entry.path());
                    EntryOutcome::AlreadyApplied
                }
                Err(outcome) => {
                    log::warn!(
                        "'{}' has no `function love.run(`, left unchanged",
                        entry.path()
                    );
                    outcome
                }
            };
            result.record(self.name(), entry.path(), outcome);
        }

        if !result.target_found() {
            log::warn!("no entry matching '{}' in archive", self.target);
        }
        result
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    find(haystack, needle).is_some()
}
