//! VS Code launch configuration for the Local Lua Debugger.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use super::paths::OutputPaths;
use crate::Result;

/// Launch configuration schema version understood by VS Code.
pub const LAUNCH_VERSION: &str = "0.2.0";

/// Debugger type contributed by the Local Lua Debugger extension.
pub const DEBUGGER_TYPE: &str = "lua-local";

/// The two debug profiles written to `.vscode/launch.json`.
///
/// - `Debug Love` runs the patched hybrid file directly.
/// - `Debug Balatro Love` runs the bare stub against the unpacked game
///   directory, so breakpoints resolve to the extracted sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Program for the `Debug Love` profile.
    pub patched: PathBuf,
    /// Program for the `Debug Balatro Love` profile.
    pub launcher: PathBuf,
    /// Game directory passed to the launcher and used as script root.
    pub extract_dir_name: String,
}

impl LaunchConfig {
    /// Builds the configuration for a set of output paths.
    ///
    /// When the input had no stub there is no launcher; both profiles then
    /// run the patched file.
    pub fn from_paths(paths: &OutputPaths, has_launcher: bool) -> Self {
        let launcher = if has_launcher {
            paths.launcher.clone()
        } else {
            paths.patched.clone()
        };
        Self {
            patched: paths.patched.clone(),
            launcher,
            extract_dir_name: paths.extract_dir_name(),
        }
    }

    /// Renders the configuration as a JSON value.
    pub fn render(&self) -> Value {
        json!({
            "version": LAUNCH_VERSION,
            "configurations": [
                {
                    "name": "Debug Love",
                    "type": DEBUGGER_TYPE,
                    "request": "launch",
                    "program": { "command": path_string(&self.patched) },
                    "args": ["--disable-console"]
                },
                {
                    "name": "Debug Balatro Love",
                    "type": DEBUGGER_TYPE,
                    "request": "launch",
                    "program": { "command": path_string(&self.launcher) },
                    "args": [self.extract_dir_name, "--disable-console"],
                    "scriptRoots": [self.extract_dir_name]
                }
            ]
        })
    }

    /// Renders the configuration as pretty-printed JSON with a final newline.
    pub fn to_json_string(&self) -> Result<String> {
        let mut text =
            serde_json::to_string_pretty(&self.render()).map_err(std::io::Error::from)?;
        text.push('\n');
        Ok(text)
    }

    /// Writes the configuration to `path`, creating parent directories.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        crate::fs::ensure_parent_dirs(path)?;
        std::fs::write(path, self.to_json_string()?)?;
        log::info!("wrote launch configuration '{}'", path.display());
        Ok(())
    }
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
