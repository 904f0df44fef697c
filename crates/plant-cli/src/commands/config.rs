//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use plant_core::{AppConfig, AppResult};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration (file, environment, defaults)
    Show,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Json => output::print_item(config, format),
            OutputFormat::Table => {
                println!("Configuration:");
                output::print_kv("Project XML", &config.project_xml.display().to_string());
                output::print_kv("Metadata JSON", &config.json_in.display().to_string());
                output::print_kv("Plugin DLL", &config.plugin_dll.display().to_string());
                output::print_kv(
                    "AutoCAD",
                    &config
                        .explicit_acad_exe()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(auto-discover)".to_string()),
                );
                output::print_kv("Working directory", &config.workdir.display().to_string());
                output::print_kv("Save changes", &config.save_changes.to_string());
                output::print_kv("Log level", &config.logging.level);
                output::print_kv("Log format", &config.logging.format);
            }
        },
    }

    Ok(())
}
