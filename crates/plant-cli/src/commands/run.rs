//! The `run` command and the flag overrides it shares with `plan`.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use plant_core::{AppConfig, AppResult};
use plant_runner::{AcadDiscovery, AcadInstallation, Orchestrator, RunConfig};

/// Per-invocation overrides layered on top of the loaded configuration
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Plant 3D project descriptor (Project.xml)
    #[arg(long)]
    pub project_xml: Option<PathBuf>,

    /// Metadata JSON to apply
    #[arg(long)]
    pub json_in: Option<PathBuf>,

    /// MetadataApplier add-in assembly
    #[arg(long)]
    pub plugin_dll: Option<PathBuf>,

    /// AutoCAD executable (skips discovery)
    #[arg(long)]
    pub acad_exe: Option<PathBuf>,

    /// Working directory for the script and run log
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Save modified drawings
    #[arg(long, conflicts_with = "no_save")]
    pub save: bool,

    /// Leave drawings unsaved
    #[arg(long)]
    pub no_save: bool,
}

impl RunArgs {
    /// Apply command-line overrides to the loaded configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(p) = &self.project_xml {
            config.project_xml = p.clone();
        }
        if let Some(p) = &self.json_in {
            config.json_in = p.clone();
        }
        if let Some(p) = &self.plugin_dll {
            config.plugin_dll = p.clone();
        }
        if let Some(p) = &self.acad_exe {
            config.acad_exe = Some(p.clone());
        }
        if let Some(p) = &self.workdir {
            config.workdir = p.clone();
        }
        if self.save {
            config.save_changes = true;
        }
        if self.no_save {
            config.save_changes = false;
        }
        config
    }
}

/// Build the run configuration, resolving the AutoCAD executable.
pub fn to_run_config(config: &AppConfig) -> (RunConfig, AcadInstallation) {
    let installation = AcadDiscovery::resolve(config.explicit_acad_exe());
    let run_config = RunConfig {
        acad_exe: installation.executable.clone(),
        project_xml: config.project_xml.clone(),
        json_in: config.json_in.clone(),
        plugin_dll: config.plugin_dll.clone(),
        workdir: config.workdir.clone(),
        save_changes: config.save_changes,
    };
    (run_config, installation)
}

/// Execute a run and return AutoCAD's exit code
pub async fn execute(args: &RunArgs, app_config: AppConfig) -> AppResult<i32> {
    let config = args.apply(app_config);
    let (run_config, installation) = to_run_config(&config);

    info!(acad = %installation.summary(), "Resolved AutoCAD");

    let code = Orchestrator::new().run(&run_config).await?;
    info!(exit_code = code, "Run finished");
    Ok(code)
}
