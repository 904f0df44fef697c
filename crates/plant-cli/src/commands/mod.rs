//! CLI command definitions and dispatch.

pub mod config;
pub mod discover;
pub mod plan;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use plant_core::config::{AppConfig, DEFAULT_CONFIG_PATH};
use plant_core::AppResult;

/// Plant Runner: apply JSON metadata to AutoCAD Plant 3D projects
#[derive(Debug, Parser)]
#[command(name = "plant-runner", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (optional on disk)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Launch AutoCAD Plant 3D and apply the metadata bundle
    Run(run::RunArgs),
    /// Show what a run would do without writing or launching anything
    Plan(run::RunArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Report the AutoCAD installation a run would use
    Discover,
}

impl Cli {
    /// Load the layered configuration named by `--config`.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        AppConfig::load(&self.config)
    }

    /// Execute the CLI command. Returns the process exit code.
    pub async fn execute(&self, app_config: AppConfig) -> AppResult<i32> {
        match &self.command {
            None => run::execute(&run::RunArgs::default(), app_config).await,
            Some(Commands::Run(args)) => run::execute(args, app_config).await,
            Some(Commands::Plan(args)) => plan::execute(args, app_config, self.format).map(|()| 0),
            Some(Commands::Config(args)) => {
                config::execute(args, &app_config, self.format).map(|()| 0)
            }
            Some(Commands::Discover) => discover::execute(&app_config, self.format).map(|()| 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_run() {
        let cli = Cli::try_parse_from(["plant-runner"]).expect("parse");
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(cli.format, OutputFormat::Table);
    }

    #[test]
    fn test_plan_with_overrides() {
        let cli = Cli::try_parse_from([
            "plant-runner",
            "--format",
            "json",
            "plan",
            "--project-xml",
            "/p/Project.xml",
            "--no-save",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Some(Commands::Plan(args)) => {
                assert_eq!(args.project_xml, Some(PathBuf::from("/p/Project.xml")));
                assert!(args.no_save);
            }
            other => panic!("expected plan, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_no_save_conflict() {
        let result = Cli::try_parse_from(["plant-runner", "run", "--save", "--no-save"]);
        assert!(result.is_err());
    }
}
