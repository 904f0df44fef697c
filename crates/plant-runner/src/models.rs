//! Core data models: the run configuration and the launch plan derived from it.

use std::ffi::OsString;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Product switch passed to `acad.exe` to start the Plant 3D vertical.
pub const PRODUCT: &str = "PLNT3D";

/// Everything a single run needs. Built once at the entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// AutoCAD executable.
    pub acad_exe: PathBuf,
    /// Plant 3D project descriptor (`Project.xml`).
    pub project_xml: PathBuf,
    /// Metadata JSON bundle.
    pub json_in: PathBuf,
    /// Add-in assembly loaded by `NETLOAD`.
    pub plugin_dll: PathBuf,
    /// Working directory for the script, the log and the child process.
    pub workdir: PathBuf,
    /// Whether the add-in should save modified drawings.
    pub save_changes: bool,
}

/// A fully resolved invocation of the CAD host.
///
/// Producing a plan has no side effects; the orchestrator writes the script
/// and spawns the process from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Executable to run.
    pub program: PathBuf,
    /// Directory to create and use as the child's working directory.
    pub workdir: PathBuf,
    /// Where the batch script is written.
    pub script_path: PathBuf,
    /// Batch script content.
    pub script: String,
    /// Run log announced to the add-in.
    pub log_path: PathBuf,
    /// Variables overlaid on the inherited environment, in key order.
    pub env_overlay: Vec<(String, OsString)>,
}

impl LaunchPlan {
    /// Command-line arguments for the host, in order.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from("/product"),
            OsString::from(PRODUCT),
            OsString::from("/b"),
            self.script_path.clone().into_os_string(),
        ]
    }
}
