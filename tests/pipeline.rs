//! End-to-end tests for `Patcher::patch_path` against files on disk.

mod common;

use std::fs;
use std::path::Path;

use lovepatch::read::read_archive;
use lovepatch::{Artifact, Error, PatchOptions, Patcher};
use tempfile::TempDir;

const STUB_LEN: usize = 1024;

fn write_input(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn fused_game() -> Vec<u8> {
    common::create_fused(
        &common::create_fake_pe_stub(STUB_LEN),
        &[
            ("conf.lua", common::CONF_LUA),
            ("main.lua", common::MAIN_LUA),
            ("resources/", b""),
            ("resources/sounds/click.ogg", b"OggS fake audio"),
        ],
    )
}

#[test]
fn test_fused_game_writes_every_artifact() {
    let dir = TempDir::new().unwrap();
    let original = fused_game();
    let input = write_input(&dir, "Balatro.exe", &original);

    let report = Patcher::new(PatchOptions::default()).patch_path(&input).unwrap();
    assert!(report.changed());
    assert_eq!(report.offset(), STUB_LEN);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    assert_eq!(report.entries_read, 4);

    let kinds: Vec<&str> = report.artifacts.iter().map(Artifact::kind).collect();
    assert_eq!(kinds, ["launcher", "patched", "game-tree", "launch-config"]);

    // Input untouched
    assert_eq!(fs::read(&input).unwrap(), original);

    // Launcher is the stub alone
    let launcher = dir.path().join("Balatro.love.exe");
    assert_eq!(fs::read(&launcher).unwrap(), &original[..STUB_LEN]);

    // Patched file keeps the stub and carries the patched script
    let patched = fs::read(dir.path().join("Balatro.patched.exe")).unwrap();
    assert_eq!(report.output_size, Some(patched.len() as u64));
    assert_eq!(&patched[..STUB_LEN], &original[..STUB_LEN]);
    let read = read_archive(&patched[STUB_LEN..]).unwrap();
    assert_eq!(read.map.get("main.lua").unwrap().content(), common::patched_main_lua());

    // Game tree holds the patched sources
    let game = dir.path().join("game");
    assert_eq!(fs::read(game.join("main.lua")).unwrap(), common::patched_main_lua());
    assert_eq!(fs::read(game.join("conf.lua")).unwrap(), common::CONF_LUA);
    assert_eq!(
        fs::read(game.join("resources/sounds/click.ogg")).unwrap(),
        b"OggS fake audio"
    );
    let materialized = report.materialized.as_ref().unwrap();
    assert_eq!(materialized.files_written, 3);
    assert!(materialized.is_ok());
}

#[test]
fn test_launch_config_contents() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Balatro.exe", &fused_game());

    let _ = Patcher::new(PatchOptions::default()).patch_path(&input).unwrap();

    let text = fs::read_to_string(dir.path().join(".vscode/launch.json")).unwrap();
    let config: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(config["version"], "0.2.0");

    let profiles = config["configurations"].as_array().unwrap();
    assert_eq!(profiles.len(), 2);
    assert_eq!(profiles[0]["type"], "lua-local");
    assert_eq!(profiles[0]["request"], "launch");

    let patched = profiles[0]["program"]["command"].as_str().unwrap();
    assert!(patched.ends_with("Balatro.patched.exe"));
    let launcher = profiles[1]["program"]["command"].as_str().unwrap();
    assert!(launcher.ends_with("Balatro.love.exe"));
    assert_eq!(profiles[1]["args"][0], "game");
    assert_eq!(profiles[1]["scriptRoots"][0], "game");
}

#[test]
fn test_pure_love_archive() {
    let dir = TempDir::new().unwrap();
    let archive = common::create_zip(&[("main.lua", common::MAIN_LUA)]);
    let input = write_input(&dir, "game.love", &archive);

    let report = Patcher::new(PatchOptions::default().extract(false))
        .patch_path(&input)
        .unwrap();
    assert!(report.changed());
    assert_eq!(report.offset(), 0);
    assert!(!report.has_launcher());

    assert!(!dir.path().join("game.love.love").exists());
    assert!(!dir.path().join("game").exists());

    let patched = fs::read(dir.path().join("game.patched.love")).unwrap();
    assert!(patched.starts_with(b"PK\x03\x04"));

    // Both profiles run the patched file when there is no launcher
    let text = fs::read_to_string(dir.path().join(".vscode/launch.json")).unwrap();
    let config: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        config["configurations"][0]["program"]["command"],
        config["configurations"][1]["program"]["command"]
    );
}

#[test]
fn test_nothing_to_patch_writes_only_launcher() {
    let dir = TempDir::new().unwrap();
    let fused = common::create_fused(
        &common::create_fake_pe_stub(STUB_LEN),
        &[("conf.lua", common::CONF_LUA)],
    );
    let input = write_input(&dir, "Balatro.exe", &fused);

    let report = Patcher::new(PatchOptions::default()).patch_path(&input).unwrap();
    assert!(!report.changed());
    assert!(report.archive_size.is_none());

    // The stub is saved whether or not anything was patched
    assert!(dir.path().join("Balatro.love.exe").exists());
    assert!(!dir.path().join("Balatro.patched.exe").exists());
    assert!(!dir.path().join("game").exists());
    assert!(!dir.path().join(".vscode").exists());
}

#[test]
fn test_disabled_outputs() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Balatro.exe", &fused_game());

    let options = PatchOptions::new()
        .extract(false)
        .launch_config(false)
        .launcher(false);
    let report = Patcher::new(options).patch_path(&input).unwrap();

    let kinds: Vec<&str> = report.artifacts.iter().map(Artifact::kind).collect();
    assert_eq!(kinds, ["patched"]);
    assert!(!dir.path().join("Balatro.love.exe").exists());
    assert!(!dir.path().join(".vscode").exists());
}

#[test]
fn test_custom_extract_dir() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Balatro.exe", &fused_game());

    let report = Patcher::new(PatchOptions::new().extract_dir_name("src"))
        .patch_path(&input)
        .unwrap();
    assert_eq!(report.paths.extract_dir, dir.path().join("src"));
    assert!(dir.path().join("src/main.lua").is_file());

    let text = fs::read_to_string(dir.path().join(".vscode/launch.json")).unwrap();
    assert!(text.contains("\"src\""));
}

#[test]
fn test_rerun_overwrites_outputs() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Balatro.exe", &fused_game());
    let patcher = Patcher::new(PatchOptions::default());

    let _ = patcher.patch_path(&input).unwrap();
    let first = fs::read(dir.path().join("Balatro.patched.exe")).unwrap();
    let _ = patcher.patch_path(&input).unwrap();
    let second = fs::read(dir.path().join("Balatro.patched.exe")).unwrap();

    let a = read_archive(&first[STUB_LEN..]).unwrap();
    let b = read_archive(&second[STUB_LEN..]).unwrap();
    assert_eq!(
        a.map.get("main.lua").unwrap().content(),
        b.map.get("main.lua").unwrap().content()
    );
}

#[cfg(unix)]
#[test]
fn test_executables_are_marked_executable() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Balatro", &fused_game());
    let _ = Patcher::new(PatchOptions::default()).patch_path(&input).unwrap();

    for name in ["Balatro.love", "Balatro.patched"] {
        let mode = fs::metadata(dir.path().join(name)).unwrap().permissions().mode();
        assert_ne!(mode & 0o111, 0, "{} is not executable", name);
    }
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Patcher::new(PatchOptions::default())
        .patch_path(dir.path().join("missing.exe"))
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "Balatro.exe", &fused_game());
    // A directory where the patched file should go
    fs::create_dir(dir.path().join("Balatro.patched.exe")).unwrap();

    let result = Patcher::new(PatchOptions::default()).patch_path(&input);
    assert!(matches!(result, Err(Error::Io(_))));
    assert!(!Path::new(&dir.path().join(".vscode")).exists());
    // Nothing is unpacked for a patch that was never written
    assert!(!dir.path().join("game").exists());

    // No temporary file is left behind
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["Balatro.exe", "Balatro.love.exe", "Balatro.patched.exe"]);
}
