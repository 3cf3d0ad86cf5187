//! Content transformations over a decompressed archive.
//!
//! A [`Transform`] receives exclusive access to the [`ContentMap`] between
//! reading and writing. It may replace the content of existing entries and
//! reports whether anything changed; when nothing did, the pipeline stops
//! without writing any output.
//!
//! # Example
//!
//! ```rust
//! use lovepatch::edit::{DebuggerInjection, Transform, TransformChain};
//! use lovepatch::read::ContentMap;
//!
//! let chain = TransformChain::new()
//!     .with(DebuggerInjection::new())
//!     .with(DebuggerInjection::new().target("menu.lua"));
//!
//! let mut map = ContentMap::new();
//! let result = chain.apply(&mut map);
//! assert!(!result.changed);
//! ```
//!
//! [`ContentMap`]: crate::read::ContentMap

mod debugger;
mod transform;

pub use debugger::{BOOTSTRAP, DEFAULT_TARGET, DebuggerInjection, MARKER, SENTINEL};
pub use transform::{EntryOutcome, EntryReport, Transform, TransformChain, TransformResult};
