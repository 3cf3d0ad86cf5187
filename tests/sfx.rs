//! Integration tests for hybrid (stub + archive) files.
//!
//! These tests verify signature scanning, splitting and reassembly of fused
//! executables using the public API.

mod common;

use lovepatch::format::detect::SignatureScan;
use lovepatch::sfx::{HybridFile, StubFormat, assemble, split};
use lovepatch::{PatchOptions, Patcher, find_signature, read_archive, scan_signature};

const PREFIX_LEN: usize = 1024;

#[test]
fn test_pure_archive_has_no_prefix() {
    let archive = common::create_zip(&[("main.lua", common::MAIN_LUA)]);
    let hybrid = HybridFile::parse(&archive);

    assert_eq!(hybrid.scan(), SignatureScan::Found(0));
    assert!(hybrid.prefix().is_empty());
    assert_eq!(hybrid.archive(), archive.as_slice());
    assert_eq!(hybrid.stub_format(), None);
}

#[test]
fn test_fused_pe_split() {
    let stub = common::create_fake_pe_stub(PREFIX_LEN);
    let fused = common::create_fused(&stub, &[("main.lua", common::MAIN_LUA)]);

    let hybrid = HybridFile::parse(&fused);
    assert_eq!(hybrid.offset(), PREFIX_LEN);
    assert!(hybrid.scan().has_prefix());
    assert_eq!(hybrid.prefix(), stub.as_slice());
    assert_eq!(hybrid.stub_format(), Some(StubFormat::WindowsPe));

    let read = read_archive(hybrid.archive()).unwrap();
    assert_eq!(read.map.get("main.lua").unwrap().content(), common::MAIN_LUA);
}

#[test]
fn test_fused_elf_split() {
    let stub = common::create_fake_elf_stub();
    let fused = common::create_fused(&stub, &[("main.lua", common::MAIN_LUA)]);

    let hybrid = HybridFile::parse(&fused);
    assert_eq!(hybrid.offset(), stub.len());
    assert_eq!(hybrid.stub_format(), Some(StubFormat::LinuxElf));
}

#[test]
fn test_no_signature_is_whole_buffer() {
    let data = b"MZ just an executable, no archive here";
    assert_eq!(scan_signature(data), SignatureScan::NotFound);
    assert_eq!(find_signature(data), 0);

    let hybrid = HybridFile::parse(data);
    assert!(hybrid.prefix().is_empty());
    assert_eq!(hybrid.archive(), data);
}

#[test]
fn test_first_signature_wins() {
    // A stub that happens to embed a signature ends early
    let mut stub = common::create_fake_pe_stub(256);
    stub[100..104].copy_from_slice(b"PK\x03\x04");
    let fused = common::create_fused(&stub, &[("main.lua", common::MAIN_LUA)]);

    assert_eq!(find_signature(&fused), 100);
}

#[test]
fn test_split_and_assemble_is_identity() {
    let stub = common::create_fake_pe_stub(PREFIX_LEN);
    let fused = common::create_fused(&stub, &[("conf.lua", common::CONF_LUA)]);

    let (prefix, blob) = split(&fused, find_signature(&fused));
    assert_eq!(prefix.len(), PREFIX_LEN);
    assert_eq!(assemble(prefix, blob), fused);
}

/// A 1024-byte stub is carried over verbatim and the rest is a valid,
/// patched archive.
#[test]
fn test_patched_hybrid_keeps_stub() {
    let stub = common::create_fake_pe_stub(PREFIX_LEN);
    let fused = common::create_fused(
        &stub,
        &[("conf.lua", common::CONF_LUA), ("main.lua", common::MAIN_LUA)],
    );

    let outcome = Patcher::new(PatchOptions::default()).patch_bytes(&fused).unwrap();
    assert!(outcome.changed());
    let output = outcome.output.unwrap();

    assert_eq!(&output[..PREFIX_LEN], &fused[..PREFIX_LEN]);
    let tail = &output[PREFIX_LEN..];
    assert_eq!(find_signature(tail), 0);

    let read = read_archive(tail).unwrap();
    let main = read.map.get("main.lua").unwrap().content();
    assert_eq!(main, common::patched_main_lua());
    assert_eq!(read.map.get("conf.lua").unwrap().content(), common::CONF_LUA);

    // The output is itself a valid hybrid file
    let again = HybridFile::parse(&output);
    assert_eq!(again.offset(), PREFIX_LEN);
    assert_eq!(again.stub_format(), Some(StubFormat::WindowsPe));
}

#[test]
fn test_zip_crate_opens_fused_output() {
    let stub = common::create_fake_pe_stub(PREFIX_LEN);
    let fused = common::create_fused(&stub, &[("main.lua", common::MAIN_LUA)]);
    let output = Patcher::new(PatchOptions::default())
        .patch_bytes(&fused)
        .unwrap()
        .output
        .unwrap();

    // Readers that handle prepended data see the patched archive too
    let contents = common::zip_contents(&output);
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].1, common::patched_main_lua());
}
