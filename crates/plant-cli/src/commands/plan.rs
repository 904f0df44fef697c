//! The `plan` command: a dry run that prints the resolved invocation.

use chrono::Local;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use plant_core::{AppConfig, AppResult};
use plant_runner::inputs::RequiredInput;
use plant_runner::{AcadInstallation, LaunchPlan, Orchestrator, RunConfig};

use super::run::{self, RunArgs};

/// One required input and whether it is present
#[derive(Debug, Serialize, Tabled)]
pub struct InputRow {
    /// Input name
    pub input: String,
    /// Configured path
    pub path: String,
    /// Whether the path exists right now
    pub exists: bool,
}

/// One overlaid environment variable
#[derive(Debug, Serialize, Tabled)]
pub struct EnvRow {
    /// Variable name
    pub key: String,
    /// Value handed to AutoCAD
    pub value: String,
}

/// Everything `plan` reports, for JSON output
#[derive(Debug, Serialize)]
pub struct PlanReport {
    /// Resolved AutoCAD installation
    pub installation: AcadInstallation,
    /// Input checks
    pub inputs: Vec<InputRow>,
    /// Executable to launch
    pub program: String,
    /// Arguments passed to AutoCAD
    pub args: Vec<String>,
    /// Child working directory
    pub workdir: String,
    /// Script location
    pub script_path: String,
    /// Script content
    pub script: String,
    /// Run log announced to the add-in
    pub log_path: String,
    /// Overlaid environment
    pub env: Vec<EnvRow>,
}

/// Build the input check rows for a run configuration
pub fn input_rows(config: &RunConfig) -> Vec<InputRow> {
    RequiredInput::ORDER
        .into_iter()
        .map(|input| {
            let path = input.path_in(config);
            InputRow {
                input: input.to_string(),
                path: path.display().to_string(),
                exists: path.exists(),
            }
        })
        .collect()
}

/// Display form of the host arguments
pub fn display_args(plan: &LaunchPlan) -> Vec<String> {
    plan.args()
        .iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

/// Display form of the environment overlay
pub fn env_rows(plan: &LaunchPlan) -> Vec<EnvRow> {
    plan.env_overlay
        .iter()
        .map(|(key, value)| EnvRow {
            key: key.clone(),
            value: value.to_string_lossy().into_owned(),
        })
        .collect()
}

/// Execute the dry run
pub fn execute(args: &RunArgs, app_config: AppConfig, format: OutputFormat) -> AppResult<()> {
    let config = args.apply(app_config);
    let (run_config, installation) = run::to_run_config(&config);
    let plan = Orchestrator::plan(&run_config, Local::now().naive_local())?;
    let inputs = input_rows(&run_config);

    match format {
        OutputFormat::Json => {
            let report = PlanReport {
                installation,
                inputs,
                program: plan.program.display().to_string(),
                args: display_args(&plan),
                workdir: plan.workdir.display().to_string(),
                script_path: plan.script_path.display().to_string(),
                script: plan.script.clone(),
                log_path: plan.log_path.display().to_string(),
                env: env_rows(&plan),
            };
            output::print_json(&report);
        }
        OutputFormat::Table => {
            println!("Launch:");
            output::print_kv("AutoCAD", &installation.summary());
            output::print_kv("Arguments", &display_args(&plan).join(" "));
            output::print_kv("Working directory", &plan.workdir.display().to_string());
            output::print_kv("Script", &plan.script_path.display().to_string());
            output::print_kv("Run log", &plan.log_path.display().to_string());

            println!("\nInputs:");
            output::print_table(&inputs);
            for row in inputs.iter().filter(|r| !r.exists) {
                output::print_warning(&format!("{} not found: {}", row.input, row.path));
            }

            println!("\nEnvironment overlay:");
            output::print_table(&env_rows(&plan));

            println!("\nScript:");
            print!("{}", plan.script);
        }
    }

    Ok(())
}
