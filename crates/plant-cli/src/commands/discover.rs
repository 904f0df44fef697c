//! The `discover` command.

use crate::output::{self, OutputFormat};
use plant_core::{AppConfig, AppResult};
use plant_runner::AcadDiscovery;

/// Report the AutoCAD installation a run would use
pub fn execute(config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let installation = AcadDiscovery::resolve(config.explicit_acad_exe());

    match format {
        OutputFormat::Json => output::print_item(&installation, format),
        OutputFormat::Table => {
            if installation.executable.exists() {
                output::print_success(&installation.summary());
            } else {
                output::print_warning(&format!(
                    "{} (executable does not exist)",
                    installation.summary()
                ));
            }
            output::print_kv(
                "Install directory",
                &installation.install_dir.display().to_string(),
            );
            if let Some(product) = &installation.product_name {
                output::print_kv("Product", product);
            }
        }
    }

    Ok(())
}
