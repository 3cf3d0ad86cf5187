//! Fuzz target for ArchivePath validation with arbitrary string input.
//!
//! Entry names come straight from the central directory and are later
//! joined onto the extract directory, so validation must never accept a
//! name that escapes it.
//!
//! Run with: cargo +nightly fuzz run archive_path

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The signature scan accepts any bytes
    let offset = lovepatch::find_signature(data);
    assert!(offset == 0 || offset + 4 <= data.len());

    if let Ok(name) = std::str::from_utf8(data) {
        if let Ok(path) = lovepatch::ArchivePath::from_entry_name(name) {
            let normalized = path.as_str();

            assert!(
                !normalized.split('/').any(|c| c == ".." || c == "." || c.is_empty()),
                "Bad segment in normalized path: {:?}",
                normalized
            );
            assert!(
                !normalized.starts_with('/'),
                "Absolute path accepted: {:?}",
                normalized
            );
            assert!(
                !normalized.contains('\0') && !normalized.contains('\\'),
                "Unsafe character in normalized path: {:?}",
                normalized
            );
        }
    }
});
