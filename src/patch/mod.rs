//! The end-to-end patching pipeline.
//!
//! [`Patcher::patch_path`] drives every stage for one input file:
//!
//! 1. Read the whole input (fatal on failure).
//! 2. Save the executable stub on its own as `<stem>.love.<ext>` when the
//!    archive does not start at byte 0 (warning on failure).
//! 3. Read the archive into a [`ContentMap`] (fatal only if the central
//!    directory is unreadable; bad entries are skipped).
//! 4. Apply the transform. If nothing changed, stop without writing
//!    anything else.
//! 5. Rebuild the archive in memory (fatal on failure).
//! 6. Write `<stem>.patched.<ext>` as stub + new archive (fatal on failure).
//!    The file is replaced atomically, so a failed run leaves any earlier
//!    output intact.
//! 7. Unpack the game tree next to the input (per-file warnings).
//! 8. Write `.vscode/launch.json` (warning on failure).
//!
//! The input file is never modified.
//!
//! # Example
//!
//! ```rust,no_run
//! use lovepatch::{PatchOptions, Patcher};
//!
//! let options = PatchOptions::new().target("main.lua").extract(false);
//! let report = Patcher::new(options).patch_path("Balatro.exe")?;
//! if report.changed() {
//!     println!("wrote {}", report.paths.patched.display());
//! }
//! # Ok::<(), lovepatch::Error>(())
//! ```

mod launch;
mod paths;

pub use launch::{DEBUGGER_TYPE, LAUNCH_VERSION, LaunchConfig};
pub use paths::{DEFAULT_EXTRACT_DIR, LAUNCHER_INFIX, OutputPaths, PATCHED_INFIX};

use std::path::{Path, PathBuf};

use crate::edit::{DEFAULT_TARGET, DebuggerInjection, Transform, TransformResult};
use crate::format::detect::SignatureScan;
use crate::fs::MaterializeResult;
use crate::read::{ContentMap, DirectoryRecord, ReadOptions, SkippedEntry, read_archive_with_options};
use crate::sfx::{self, HybridFile, StubFormat};
use crate::write::{WriteOptions, WriteResult, write_archive};
use crate::Result;

/// Configuration for a patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    /// Entry name receiving the debugger bootstrap, matched at a path boundary.
    pub target: String,
    /// Name of the directory the game tree is unpacked into.
    pub extract_dir_name: String,
    /// Archive reading options.
    pub read: ReadOptions,
    /// Archive writing options.
    pub write: WriteOptions,
    /// Unpack the patched game tree next to the input.
    pub extract: bool,
    /// Write `.vscode/launch.json`.
    pub launch_config: bool,
    /// Save the executable stub on its own.
    pub launcher: bool,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            extract_dir_name: DEFAULT_EXTRACT_DIR.to_string(),
            read: ReadOptions::default(),
            write: WriteOptions::default(),
            extract: true,
            launch_config: true,
            launcher: true,
        }
    }
}

impl PatchOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target entry name.
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Sets the extract directory name.
    pub fn extract_dir_name(mut self, name: impl Into<String>) -> Self {
        self.extract_dir_name = name.into();
        self
    }

    /// Sets the read options.
    pub fn read_options(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    /// Sets the write options.
    pub fn write_options(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }

    /// Enables or disables unpacking the game tree.
    pub fn extract(mut self, extract: bool) -> Self {
        self.extract = extract;
        self
    }

    /// Enables or disables writing the launch configuration.
    pub fn launch_config(mut self, launch_config: bool) -> Self {
        self.launch_config = launch_config;
        self
    }

    /// Enables or disables saving the stub on its own.
    pub fn launcher(mut self, launcher: bool) -> Self {
        self.launcher = launcher;
        self
    }
}

/// Result of the in-memory pipeline.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// Where the archive was found.
    pub scan: SignatureScan,
    /// Kind of executable stub, `None` for a pure archive.
    pub stub_format: Option<StubFormat>,
    /// The (possibly transformed) entries.
    pub map: ContentMap,
    /// Central-directory records in listed order.
    pub records: Vec<DirectoryRecord>,
    /// Entries that could not be read.
    pub skipped: Vec<SkippedEntry>,
    /// What the transform did.
    pub transform: TransformResult,
    /// The rebuilt archive, present only when something changed.
    pub written: Option<WriteResult>,
    /// The assembled hybrid file, present only when something changed.
    pub output: Option<Vec<u8>>,
}

impl PatchOutcome {
    /// Returns true if the transform modified at least one entry.
    pub fn changed(&self) -> bool {
        self.transform.changed
    }

    /// Returns the archive offset within the input.
    pub fn offset(&self) -> usize {
        self.scan.offset()
    }
}

/// An output file or directory written by [`Patcher::patch_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    /// The stub saved on its own.
    Launcher(PathBuf),
    /// The unpacked game tree.
    GameTree(PathBuf),
    /// The patched hybrid file.
    Patched(PathBuf),
    /// The VS Code launch configuration.
    LaunchConfig(PathBuf),
}

impl Artifact {
    /// Returns a short label for the artifact kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Artifact::Launcher(_) => "launcher",
            Artifact::GameTree(_) => "game-tree",
            Artifact::Patched(_) => "patched",
            Artifact::LaunchConfig(_) => "launch-config",
        }
    }

    /// Returns the artifact path.
    pub fn path(&self) -> &Path {
        match self {
            Artifact::Launcher(p)
            | Artifact::GameTree(p)
            | Artifact::Patched(p)
            | Artifact::LaunchConfig(p) => p,
        }
    }
}

/// Summary of a [`Patcher::patch_path`] run.
#[must_use = "patch report tells whether any output was produced"]
#[derive(Debug, Clone)]
pub struct PatchReport {
    /// Output locations derived from the input.
    pub paths: OutputPaths,
    /// Size of the input file in bytes.
    pub input_size: u64,
    /// Where the archive was found.
    pub scan: SignatureScan,
    /// Kind of executable stub, `None` for a pure archive.
    pub stub_format: Option<StubFormat>,
    /// Number of entries decompressed.
    pub entries_read: usize,
    /// Entries that could not be read.
    pub skipped: Vec<SkippedEntry>,
    /// What the transform did.
    pub transform: TransformResult,
    /// Size of the rebuilt archive, when one was written.
    pub archive_size: Option<u64>,
    /// Size of the patched hybrid file, when one was written.
    pub output_size: Option<u64>,
    /// Result of unpacking the game tree, when attempted.
    pub materialized: Option<MaterializeResult>,
    /// Everything written, in order.
    pub artifacts: Vec<Artifact>,
    /// Non-fatal problems with auxiliary outputs.
    pub warnings: Vec<String>,
}

impl PatchReport {
    fn new(paths: OutputPaths, raw: &[u8], hybrid: &HybridFile<'_>) -> Self {
        Self {
            paths,
            input_size: raw.len() as u64,
            scan: hybrid.scan(),
            stub_format: hybrid.stub_format(),
            entries_read: 0,
            skipped: Vec::new(),
            transform: TransformResult::new(),
            archive_size: None,
            output_size: None,
            materialized: None,
            artifacts: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Returns true if the transform modified at least one entry.
    pub fn changed(&self) -> bool {
        self.transform.changed
    }

    /// Returns the archive offset within the input.
    pub fn offset(&self) -> usize {
        self.scan.offset()
    }

    /// Returns true if the stub was saved on its own.
    pub fn has_launcher(&self) -> bool {
        self.artifacts
            .iter()
            .any(|a| matches!(a, Artifact::Launcher(_)))
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Runs the patching pipeline with a configurable transform.
pub struct Patcher {
    options: PatchOptions,
    transform: Box<dyn Transform>,
}

impl std::fmt::Debug for Patcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patcher")
            .field("options", &self.options)
            .field("transform", &self.transform.name())
            .finish()
    }
}

impl Patcher {
    /// Creates a patcher that injects the debugger bootstrap into the
    /// configured target.
    pub fn new(options: PatchOptions) -> Self {
        let transform = Box::new(DebuggerInjection::new().target(options.target.clone()));
        Self { options, transform }
    }

    /// Replaces the transform.
    pub fn with_transform(mut self, transform: Box<dyn Transform>) -> Self {
        self.transform = transform;
        self
    }

    /// Returns the options.
    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    /// Runs the in-memory pipeline over a whole input buffer.
    ///
    /// When the transform changes nothing, [`PatchOutcome::output`] is
    /// `None`. Otherwise it holds the original stub followed by the rebuilt
    /// archive.
    pub fn patch_bytes(&self, raw: &[u8]) -> Result<PatchOutcome> {
        let hybrid = HybridFile::parse(raw);
        let mut outcome = self.read_and_transform(&hybrid)?;
        if outcome.changed() {
            let written = write_archive(&outcome.map, &outcome.records, &self.options.write)?;
            outcome.output = Some(sfx::assemble(hybrid.prefix(), &written.data));
            outcome.written = Some(written);
        }
        Ok(outcome)
    }

    /// Runs the full pipeline for a file on disk.
    ///
    /// # Errors
    ///
    /// Fails if the input cannot be read, the archive cannot be opened, the
    /// rebuilt archive cannot be encoded, or the patched file cannot be
    /// written. Problems with the launcher, the game tree, or the launch
    /// configuration are reported in [`PatchReport::warnings`] instead.
    pub fn patch_path(&self, input: impl AsRef<Path>) -> Result<PatchReport> {
        let input = input.as_ref();
        let paths = OutputPaths::with_extract_dir(input, &self.options.extract_dir_name)?;

        let raw = std::fs::read(input)?;
        let hybrid = HybridFile::parse(&raw);
        log::info!(
            "read '{}' ({} bytes, archive at offset {})",
            input.display(),
            raw.len(),
            hybrid.offset()
        );
        let mut report = PatchReport::new(paths, &raw, &hybrid);

        if hybrid.scan().has_prefix() && self.options.launcher {
            match sfx::write_stub(&report.paths.launcher, hybrid.prefix()) {
                Ok(_) => {
                    log::info!("wrote launcher '{}'", report.paths.launcher.display());
                    report
                        .artifacts
                        .push(Artifact::Launcher(report.paths.launcher.clone()));
                }
                Err(e) => report.warn(format!(
                    "failed to write launcher '{}': {}",
                    report.paths.launcher.display(),
                    e
                )),
            }
        }

        let mut outcome = self.read_and_transform(&hybrid)?;
        report.entries_read = outcome.map.len();
        report.skipped = std::mem::take(&mut outcome.skipped);
        report.transform = std::mem::take(&mut outcome.transform);

        if !report.changed() {
            log::info!("nothing to patch, no output written");
            return Ok(report);
        }

        let written = write_archive(&outcome.map, &outcome.records, &self.options.write)?;
        report.archive_size = Some(written.archive_size());

        let assembled = write_hybrid(&report.paths.patched, hybrid.prefix(), &written.data)?;
        log::info!(
            "wrote patched file '{}' ({} bytes)",
            report.paths.patched.display(),
            assembled.total_size
        );
        report.output_size = Some(assembled.total_size);
        report
            .artifacts
            .push(Artifact::Patched(report.paths.patched.clone()));

        if self.options.extract {
            let extract_dir = report.paths.extract_dir.clone();
            match crate::fs::materialize(&outcome.map, &extract_dir) {
                Ok(result) => {
                    for failure in &result.skipped {
                        report.warnings.push(format!(
                            "failed to unpack '{}': {}",
                            failure.path, failure.reason
                        ));
                    }
                    report.materialized = Some(result);
                    report.artifacts.push(Artifact::GameTree(extract_dir));
                }
                Err(e) => report.warn(format!(
                    "failed to unpack game tree into '{}': {}",
                    extract_dir.display(),
                    e
                )),
            }
        }

        if self.options.launch_config {
            let config = LaunchConfig::from_paths(&report.paths, report.has_launcher());
            match config.write_to(&report.paths.launch_config) {
                Ok(()) => report
                    .artifacts
                    .push(Artifact::LaunchConfig(report.paths.launch_config.clone())),
                Err(e) => report.warn(format!(
                    "failed to write '{}': {}",
                    report.paths.launch_config.display(),
                    e
                )),
            }
        }

        Ok(report)
    }

    fn read_and_transform(&self, hybrid: &HybridFile<'_>) -> Result<PatchOutcome> {
        let read = read_archive_with_options(hybrid.archive(), self.options.read)?;
        let mut map = read.map;

        log::debug!("applying transform '{}'", self.transform.name());
        let transform = self.transform.apply(&mut map);

        Ok(PatchOutcome {
            scan: hybrid.scan(),
            stub_format: hybrid.stub_format(),
            map,
            records: read.records,
            skipped: read.skipped,
            transform,
            written: None,
            output: None,
        })
    }
}

/// Replaces `path` with stub + archive; executable when a stub is present.
fn write_hybrid(path: &Path, prefix: &[u8], archive: &[u8]) -> Result<sfx::AssembleResult> {
    crate::fs::write_atomic(path, !prefix.is_empty(), |writer| {
        sfx::assemble_into(writer, prefix, archive)
    })
}
