//! Names of the artifacts written next to the input.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default name of the directory the game tree is unpacked into.
pub const DEFAULT_EXTRACT_DIR: &str = "game";

/// Infix of the patched hybrid file name.
pub const PATCHED_INFIX: &str = "patched";

/// Infix of the launcher (stub-only) file name.
pub const LAUNCHER_INFIX: &str = "love";

/// Every output path derived from one input file.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use lovepatch::patch::OutputPaths;
///
/// let paths = OutputPaths::for_input("mods/Balatro.exe")?;
/// assert_eq!(paths.patched, Path::new("mods/Balatro.patched.exe"));
/// assert_eq!(paths.launcher, Path::new("mods/Balatro.love.exe"));
/// assert_eq!(paths.extract_dir, Path::new("mods/game"));
/// assert_eq!(paths.launch_config, Path::new("mods/.vscode/launch.json"));
/// # Ok::<(), lovepatch::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// The input file.
    pub input: PathBuf,
    /// `<stem>.patched.<ext>`: the rewritten hybrid file.
    pub patched: PathBuf,
    /// `<stem>.love.<ext>`: the executable stub on its own.
    pub launcher: PathBuf,
    /// Directory receiving the unpacked game tree.
    pub extract_dir: PathBuf,
    /// `.vscode/launch.json` next to the input.
    pub launch_config: PathBuf,
}

impl OutputPaths {
    /// Derives output paths using the default extract directory name.
    pub fn for_input(input: impl AsRef<Path>) -> Result<Self> {
        Self::with_extract_dir(input, DEFAULT_EXTRACT_DIR)
    }

    /// Derives output paths with a custom extract directory name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInputPath`] when the input has no file name
    /// (for example `/` or `..`) or the extract directory name is empty.
    pub fn with_extract_dir(input: impl AsRef<Path>, extract_dir: &str) -> Result<Self> {
        let input = input.as_ref();
        let stem = input.file_stem().ok_or_else(|| {
            Error::InvalidInputPath(format!("'{}' has no file name", input.display()))
        })?;
        if extract_dir.is_empty() {
            return Err(Error::InvalidInputPath(
                "extract directory name is empty".into(),
            ));
        }

        let dir = input.parent().unwrap_or_else(|| Path::new(""));
        let ext = input.extension();

        Ok(Self {
            input: input.to_path_buf(),
            patched: dir.join(infixed(stem, PATCHED_INFIX, ext)),
            launcher: dir.join(infixed(stem, LAUNCHER_INFIX, ext)),
            extract_dir: dir.join(extract_dir),
            launch_config: dir.join(".vscode").join("launch.json"),
        })
    }

    /// Returns the extract directory's final component.
    pub fn extract_dir_name(&self) -> String {
        self.extract_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_EXTRACT_DIR.to_string())
    }
}

/// Builds `stem.infix.ext`, or `stem.infix` without an extension.
fn infixed(stem: &OsStr, infix: &str, ext: Option<&OsStr>) -> OsString {
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(infix);
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_extension() {
        let paths = OutputPaths::for_input("dir/name.ext").unwrap();
        assert_eq!(paths.input, Path::new("dir/name.ext"));
        assert_eq!(paths.patched, Path::new("dir/name.patched.ext"));
        assert_eq!(paths.launcher, Path::new("dir/name.love.ext"));
        assert_eq!(paths.extract_dir, Path::new("dir/game"));
        assert_eq!(paths.launch_config, Path::new("dir/.vscode/launch.json"));
    }

    #[test]
    fn test_without_extension() {
        let paths = OutputPaths::for_input("bin/balatro").unwrap();
        assert_eq!(paths.patched, Path::new("bin/balatro.patched"));
        assert_eq!(paths.launcher, Path::new("bin/balatro.love"));
    }

    #[test]
    fn test_bare_file_name() {
        let paths = OutputPaths::for_input("game.exe").unwrap();
        assert_eq!(paths.patched, Path::new("game.patched.exe"));
        assert_eq!(paths.extract_dir, Path::new("game"));
        assert_eq!(paths.launch_config, Path::new(".vscode/launch.json"));
    }

    #[test]
    fn test_multiple_dots_keep_last_extension() {
        let paths = OutputPaths::for_input("a/my.game.v2.exe").unwrap();
        assert_eq!(paths.patched, Path::new("a/my.game.v2.patched.exe"));
    }

    #[test]
    fn test_custom_extract_dir() {
        let paths = OutputPaths::with_extract_dir("x/app.exe", "src").unwrap();
        assert_eq!(paths.extract_dir, Path::new("x/src"));
        assert_eq!(paths.extract_dir_name(), "src");
        assert!(OutputPaths::with_extract_dir("x/app.exe", "").is_err());
    }

    #[test]
    fn test_no_file_name_is_error() {
        for input in ["", "/", ".."] {
            let err = OutputPaths::for_input(input).unwrap_err();
            assert!(matches!(err, Error::InvalidInputPath(_)), "{input:?}");
        }
    }
}
