//! Pre-flight existence checks for the files a run depends on.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RunError;
use crate::models::RunConfig;

/// The inputs that must exist before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredInput {
    /// `acad.exe`.
    AcadExe,
    /// `Project.xml`.
    ProjectXml,
    /// Metadata JSON bundle.
    JsonIn,
    /// Add-in assembly.
    PluginDll,
}

impl RequiredInput {
    /// Checked in this order; the first missing one is reported.
    pub const ORDER: [RequiredInput; 4] = [
        RequiredInput::AcadExe,
        RequiredInput::ProjectXml,
        RequiredInput::JsonIn,
        RequiredInput::PluginDll,
    ];

    /// The configured path for this input.
    pub fn path_in(self, config: &RunConfig) -> &Path {
        match self {
            Self::AcadExe => &config.acad_exe,
            Self::ProjectXml => &config.project_xml,
            Self::JsonIn => &config.json_in,
            Self::PluginDll => &config.plugin_dll,
        }
    }
}

impl fmt::Display for RequiredInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AcadExe => write!(f, "AutoCAD executable"),
            Self::ProjectXml => write!(f, "Project descriptor"),
            Self::JsonIn => write!(f, "Metadata JSON"),
            Self::PluginDll => write!(f, "Plugin module"),
        }
    }
}

/// Fail on the first required input that does not exist.
pub fn ensure_inputs_exist(config: &RunConfig) -> Result<(), RunError> {
    for input in RequiredInput::ORDER {
        let path = input.path_in(config);
        if !path.exists() {
            return Err(RunError::MissingInput {
                input,
                path: path.to_path_buf(),
            });
        }
        debug!(input = %input, path = %path.display(), "Input present");
    }
    Ok(())
}
