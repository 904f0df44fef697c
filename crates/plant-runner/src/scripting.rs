//! AutoCAD batch script generation.
//!
//! The script loads the add-in, runs its single command, then quits and
//! answers `Y` to the save prompt. The command name is fixed by the add-in.

use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

use crate::error::RunError;

/// File name of the generated script inside the working directory.
pub const SCRIPT_FILE_NAME: &str = "run_rev2.scr";

/// Command registered by the MetadataApplier add-in.
pub const APPLY_COMMAND: &str = "_.P3D_APPLY_JSON_METADATA_XML";

/// Generates and writes AutoCAD `.scr` scripts.
pub struct ScriptingEngine;

impl ScriptingEngine {
    /// Location of the script for a working directory.
    pub fn script_path(workdir: &Path) -> PathBuf {
        workdir.join(SCRIPT_FILE_NAME)
    }

    /// Render the script for an add-in path. Ends with a single newline.
    pub fn render(plugin_dll: &str) -> String {
        let lines = [
            "_.NETLOAD".to_string(),
            format!("\"{plugin_dll}\""),
            APPLY_COMMAND.to_string(),
            "_.QUIT".to_string(),
            "Y".to_string(),
        ];
        let mut script = lines.join("\n");
        script.push('\n');
        script
    }

    /// Render the script for the add-in at `plugin_dll`.
    ///
    /// The path is embedded as text, so it must be valid UTF-8.
    pub fn render_for(plugin_dll: &Path) -> Result<String, RunError> {
        let plugin = plugin_dll
            .to_str()
            .ok_or_else(|| RunError::InvalidUtf8Path {
                path: plugin_dll.to_path_buf(),
            })?;
        Ok(Self::render(plugin))
    }

    /// Write `content` to `path`, replacing any previous script.
    pub async fn write_script(path: &Path, content: &str) -> Result<(), RunError> {
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
