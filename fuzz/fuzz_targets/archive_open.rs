//! Fuzz target for the read and patch pipeline with arbitrary byte input.
//!
//! Treats the input as a fused executable: scans for the archive, splits
//! off the stub, reads every entry and runs the debugger injection. The
//! goal is to find panics, hangs, or memory issues in the scan and read
//! paths.
//!
//! Run with: cargo +nightly fuzz run archive_open

#![no_main]

use libfuzzer_sys::fuzz_target;
use lovepatch::{HybridFile, PatchOptions, Patcher, ReadOptions, read};

fuzz_target!(|data: &[u8]| {
    let hybrid = HybridFile::parse(data);

    // The split must always cover the whole input
    assert_eq!(hybrid.prefix().len() + hybrid.archive().len(), data.len());
    assert_eq!(hybrid.offset(), hybrid.prefix().len());

    // Small entry limit keeps zip bombs from exhausting memory
    let options = ReadOptions::new().max_entry_size(1 << 20);
    if let Ok(result) = read::read_archive_with_options(hybrid.archive(), options) {
        for entry in result.map.iter() {
            let _ = entry.path();
            let _ = entry.is_dir();
            let _ = entry.metadata().modified;
        }
        assert!(result.map.len() <= result.records.len());
    }

    let patcher = Patcher::new(PatchOptions::new().read_options(options));
    if let Ok(outcome) = patcher.patch_bytes(data) {
        if let Some(output) = outcome.output {
            // The stub is carried over untouched
            assert!(output.starts_with(hybrid.prefix()));
        }
    }
});
