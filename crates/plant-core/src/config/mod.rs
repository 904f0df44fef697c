//! Application configuration schema.
//!
//! [`AppConfig`] is deserialized from an optional TOML file overlaid with
//! `PLANT_`-prefixed environment variables via the `config` crate. This is
//! the only place the runner reads ambient configuration; everything
//! downstream receives an explicit value.

pub mod logging;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use self::logging::LoggingConfig;
use crate::result::AppResult;

/// Prefix shared by every environment variable the runner reads.
pub const ENV_PREFIX: &str = "PLANT";

/// Default configuration file, resolved relative to the current directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/plant.toml";

/// Demo project used when no project descriptor is configured.
const DEFAULT_PROJECT_XML: &str =
    r"C:\Users\aleja\Downloads\NIRAS P3D Demo Project\P3D-FBUK Example Project\Project.xml";

/// Default working directory for generated scripts and run logs.
const DEFAULT_WORKDIR: &str = r"C:\PlantAutomationRun";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Plant 3D project descriptor (`Project.xml`).
    #[serde(default = "default_project_xml")]
    #[validate(custom(function = "validate_non_empty_path"))]
    pub project_xml: PathBuf,
    /// Metadata JSON applied by the add-in.
    #[serde(default = "default_json_in")]
    pub json_in: PathBuf,
    /// Compiled add-in loaded by `NETLOAD`.
    #[serde(default = "default_plugin_dll")]
    pub plugin_dll: PathBuf,
    /// AutoCAD executable. Empty or unset means auto-discover.
    #[serde(default)]
    pub acad_exe: Option<PathBuf>,
    /// Directory receiving the generated script and run log.
    #[serde(default = "default_workdir")]
    pub workdir: PathBuf,
    /// Whether the add-in should save the drawings it touches.
    #[serde(default = "default_true")]
    pub save_changes: bool,
    /// Logging settings.
    #[serde(default)]
    #[validate(nested)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `path` (optional on disk) and the process
    /// environment.
    pub fn load(path: &Path) -> AppResult<Self> {
        Self::load_from(path, None)
    }

    /// Load configuration from `path` and an explicit variable map.
    ///
    /// `None` reads the process environment.
    pub fn load_from(
        path: &Path,
        env: Option<HashMap<String, String>>,
    ) -> AppResult<Self> {
        tracing::debug!(path = %path.display(), "Loading runner configuration");

        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env.map(|vars| vars.into_iter().collect())),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// The configured AutoCAD executable, treating an empty value as unset.
    pub fn explicit_acad_exe(&self) -> Option<&Path> {
        self.acad_exe
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

fn default_project_xml() -> PathBuf {
    PathBuf::from(DEFAULT_PROJECT_XML)
}

fn default_json_in() -> PathBuf {
    current_dir().join("sample").join("metadata.json")
}

fn default_plugin_dll() -> PathBuf {
    current_dir()
        .join("addin")
        .join("bin")
        .join("Release")
        .join("net8.0-windows")
        .join("MetadataApplier.dll")
}

fn default_workdir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKDIR)
}

fn default_true() -> bool {
    true
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_default()
}

fn validate_non_empty_path(path: &Path) -> Result<(), ValidationError> {
    if path.as_os_str().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}
