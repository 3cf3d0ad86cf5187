//! Shared test utilities for integration tests.
//!
//! Archives are built with `zip::ZipWriter` directly so the tests do not
//! depend on the crate's own writer to produce their inputs.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Offset of the file name length field in a local file header.
const LOCAL_HEADER_NAME_LEN: usize = 26;
/// Fixed size of a local file header.
const LOCAL_HEADER_SIZE: usize = 30;

/// A `main.lua` that defines `love.run`.
pub const MAIN_LUA: &[u8] = b"-- entry point\nlocal x = 1\nfunction love.run()\n  return function() end\nend\n";

/// Length of the lines of [`MAIN_LUA`] before `function love.run(`.
pub const MAIN_LUA_HEAD_LEN: usize = 27;

/// [`MAIN_LUA`] with the debugger bootstrap inserted.
pub fn patched_main_lua() -> Vec<u8> {
    let (head, tail) = MAIN_LUA.split_at(MAIN_LUA_HEAD_LEN);
    [head, lovepatch::edit::BOOTSTRAP, tail].concat()
}

/// A `conf.lua` without the marker.
pub const CONF_LUA: &[u8] = b"function love.conf(t)\n  t.window.title = \"test\"\nend\n";

/// Creates an in-memory ZIP archive with deflated entries.
///
/// Names ending in `/` become directory entries.
pub fn create_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    create_zip_with(entries, CompressionMethod::Deflated)
}

/// Creates an in-memory ZIP archive with stored entries.
pub fn create_stored_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    create_zip_with(entries, CompressionMethod::Stored)
}

fn create_zip_with(entries: &[(&str, &[u8])], method: CompressionMethod) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(method);

    for (name, data) in entries {
        if let Some(dir) = name.strip_suffix('/') {
            writer.add_directory(dir, options).expect("add directory");
        } else {
            writer.start_file(*name, options).expect("start file");
            writer.write_all(data).expect("write entry");
        }
    }

    writer.finish().expect("finish archive").into_inner()
}

/// Creates a minimal fake PE stub of `len` bytes (at least 68).
///
/// The filler never contains a `PK` byte pair, so the archive that follows
/// is the first signature in the file.
pub fn create_fake_pe_stub(len: usize) -> Vec<u8> {
    let mut stub = vec![0x90u8; len.max(68)];
    // MZ signature
    stub[0] = b'M';
    stub[1] = b'Z';
    // PE header offset at 0x3C
    stub[0x3C] = 64;
    stub[0x3D] = 0;
    stub[0x3E] = 0;
    stub[0x3F] = 0;
    // PE signature at offset 64
    stub[64] = b'P';
    stub[65] = b'E';
    stub[66] = 0;
    stub[67] = 0;
    stub
}

/// Creates a minimal fake ELF stub.
pub fn create_fake_elf_stub() -> Vec<u8> {
    let mut stub = vec![0u8; 64];
    // ELF magic
    stub[0..4].copy_from_slice(b"\x7FELF");
    stub[4] = 2; // 64-bit
    stub[5] = 1; // Little endian
    stub[16] = 2; // Executable type
    stub
}

/// Appends an archive built from `entries` to `stub`.
pub fn create_fused(stub: &[u8], entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut fused = stub.to_vec();
    fused.extend_from_slice(&create_zip(entries));
    fused
}

/// Returns the offset of the data of the first entry in a stored archive.
pub fn first_entry_data_offset(archive: &[u8]) -> usize {
    let field = |at: usize| u16::from_le_bytes([archive[at], archive[at + 1]]) as usize;
    let name_len = field(LOCAL_HEADER_NAME_LEN);
    let extra_len = field(LOCAL_HEADER_NAME_LEN + 2);
    LOCAL_HEADER_SIZE + name_len + extra_len
}

/// Renames an entry in place by rewriting its name in both the local header
/// and the central directory. Both names must have the same length.
pub fn rename_entry(archive: &mut [u8], from: &str, to: &str) {
    assert_eq!(from.len(), to.len(), "names must have equal length");
    let (from, to) = (from.as_bytes(), to.as_bytes());
    let mut renamed = 0;
    let mut at = 0;
    while at + from.len() <= archive.len() {
        if &archive[at..at + from.len()] == from {
            archive[at..at + to.len()].copy_from_slice(to);
            renamed += 1;
            at += from.len();
        } else {
            at += 1;
        }
    }
    assert_eq!(renamed, 2, "expected one local and one central name");
}

/// Reads every entry of a ZIP archive with the zip crate as `(name, data)`.
pub fn zip_contents(archive: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).expect("open archive");
    (0..zip.len())
        .map(|i| {
            let mut file = zip.by_index(i).expect("entry");
            let mut data = Vec::new();
            std::io::copy(&mut file, &mut data).expect("read entry");
            (file.name().to_string(), data)
        })
        .collect()
}
