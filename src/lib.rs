//! # lovepatch
//!
//! Patch the game archive inside a fused LÖVE executable.
//!
//! A fused game is a native executable stub with a ZIP archive appended.
//! This crate locates the archive, decompresses it into memory, applies a
//! content transformation, and writes a new hybrid file made of the
//! untouched stub followed by a freshly built archive. The stock
//! transformation inserts a Local Lua Debugger bootstrap into `main.lua`.
//!
//! ## Quick Start
//!
//! ### Patching a File
//!
//! ```rust,no_run
//! use lovepatch::{PatchOptions, Patcher, Result};
//!
//! fn main() -> Result<()> {
//!     let report = Patcher::new(PatchOptions::default()).patch_path("Balatro.exe")?;
//!
//!     if report.changed() {
//!         for artifact in &report.artifacts {
//!             println!("{}: {}", artifact.kind(), artifact.path().display());
//!         }
//!     } else {
//!         println!("nothing to patch");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Working In Memory
//!
//! ```rust
//! use std::io::{Cursor, Write};
//! use lovepatch::{PatchOptions, Patcher};
//!
//! let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
//! zip.start_file("main.lua", zip::write::SimpleFileOptions::default())?;
//! zip.write_all(b"function love.run()\nend\n")?;
//! let archive = zip.finish()?.into_inner();
//!
//! let mut fused = b"MZ-stub-bytes".to_vec();
//! fused.extend_from_slice(&archive);
//!
//! let outcome = Patcher::new(PatchOptions::default()).patch_bytes(&fused)?;
//! assert!(outcome.changed());
//! assert!(outcome.output.unwrap().starts_with(b"MZ-stub-bytes"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module |
//! |-------|--------|
//! | Find the archive offset | [`format::detect`] |
//! | Split stub and archive | [`sfx`] |
//! | Decompress entries | [`read`] |
//! | Transform content | [`edit`] |
//! | Rebuild the archive | [`write`] |
//! | Reassemble stub + archive | [`sfx`] |
//! | Orchestrate and write outputs | [`patch`] |
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | No | Command-line interface tool |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod archive_path;
pub mod edit;
pub mod error;
pub mod format;
pub mod fs;
pub mod patch;
pub mod read;
pub mod sfx;
pub mod timestamp;
pub mod write;

pub use archive_path::ArchivePath;
pub use error::{Error, Result};
pub use timestamp::Timestamp;

// Re-export the pipeline at crate root for convenience
pub use patch::{Artifact, OutputPaths, PatchOptions, PatchOutcome, PatchReport, Patcher};

// Re-export the building blocks
pub use edit::{DebuggerInjection, EntryOutcome, Transform, TransformChain, TransformResult};
pub use format::detect::{SignatureScan, find_signature, scan_signature};
pub use read::{ArchiveEntry, ContentMap, ReadOptions, ReadResult, read_archive};
pub use sfx::{HybridFile, StubFormat, assemble, split};
pub use write::{WriteOptions, WriteResult, write_archive};
