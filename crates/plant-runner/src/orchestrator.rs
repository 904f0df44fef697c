//! Run orchestration: validate, plan, write the script, launch.

use chrono::{Local, NaiveDateTime};
use tracing::{info, instrument};

use crate::environment;
use crate::error::RunError;
use crate::executor::AcadExecutor;
use crate::inputs;
use crate::models::{LaunchPlan, RunConfig};
use crate::scripting::ScriptingEngine;

/// Drives one AutoCAD batch run per call.
///
/// Runs sharing a working directory must not overlap: the script file name
/// is fixed.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    executor: AcadExecutor,
}

impl Orchestrator {
    /// Create a new orchestrator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve everything a run needs without touching the filesystem.
    pub fn plan(config: &RunConfig, started_at: NaiveDateTime) -> Result<LaunchPlan, RunError> {
        let script_path = ScriptingEngine::script_path(&config.workdir);
        let log_path = environment::log_path(&config.workdir, started_at);
        let script = ScriptingEngine::render_for(&config.plugin_dll)?;
        let env_overlay = environment::compose_overlay(config, &log_path);

        Ok(LaunchPlan {
            program: config.acad_exe.clone(),
            workdir: config.workdir.clone(),
            script_path,
            script,
            log_path,
            env_overlay,
        })
    }

    /// Run AutoCAD against `config` and return its exit code.
    pub async fn run(&self, config: &RunConfig) -> Result<i32, RunError> {
        self.run_at(config, Local::now().naive_local()).await
    }

    /// Same as [`Orchestrator::run`] with an explicit start time, which
    /// names the run log.
    #[instrument(skip(self, config), fields(workdir = %config.workdir.display()))]
    pub async fn run_at(
        &self,
        config: &RunConfig,
        started_at: NaiveDateTime,
    ) -> Result<i32, RunError> {
        inputs::ensure_inputs_exist(config)?;
        let plan = Self::plan(config, started_at)?;
        info!("Inputs validated");

        self.prepare(&plan).await?;
        self.executor.execute(&plan).await
    }

    /// Create the working directory and write the script.
    pub async fn prepare(&self, plan: &LaunchPlan) -> Result<(), RunError> {
        tokio::fs::create_dir_all(&plan.workdir).await?;
        ScriptingEngine::write_script(&plan.script_path, &plan.script).await?;
        info!(
            script = %plan.script_path.display(),
            log = %plan.log_path.display(),
            "Batch script written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{ENV_LOG_PATH, ENV_SAVE_CHANGES};
    use crate::inputs::RequiredInput;
    use chrono::NaiveDate;
    use std::ffi::OsStr;
    use std::path::{Path, PathBuf};

    fn started() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 15)
            .and_then(|d| d.and_hms_opt(14, 30, 5))
            .expect("valid timestamp")
    }

    fn env_of<'a>(plan: &'a LaunchPlan, key: &str) -> Option<&'a OsStr> {
        plan.env_overlay
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    fn config_in(dir: &Path) -> RunConfig {
        RunConfig {
            acad_exe: dir.join("acad.exe"),
            project_xml: dir.join("proj.xml"),
            json_in: dir.join("meta.json"),
            plugin_dll: dir.join("plugin.so"),
            workdir: dir.join("run"),
            save_changes: true,
        }
    }

    #[test]
    fn test_plan_is_pure() {
        let config = config_in(Path::new("/nonexistent"));
        let plan = Orchestrator::plan(&config, started()).expect("plan");

        assert_eq!(plan.program, PathBuf::from("/nonexistent/acad.exe"));
        assert_eq!(plan.script_path, PathBuf::from("/nonexistent/run/run_rev2.scr"));
        assert_eq!(
            plan.log_path,
            PathBuf::from("/nonexistent/run/plant_run_20261015_143005.jsonl")
        );
        assert_eq!(env_of(&plan, ENV_SAVE_CHANGES), Some(OsStr::new("1")));
        assert_eq!(
            plan.args(),
            vec!["/product", "PLNT3D", "/b", "/nonexistent/run/run_rev2.scr"]
        );
        assert!(plan.script.contains("\"/nonexistent/plugin.so\""));
        assert!(!Path::new("/nonexistent/run").exists());
    }

    #[test]
    fn test_log_path_inside_workdir() {
        let config = config_in(Path::new("/srv/plant"));
        let plan = Orchestrator::plan(&config, started()).expect("plan");
        let log = PathBuf::from(env_of(&plan, ENV_LOG_PATH).expect("log path set"));

        assert_eq!(log.parent(), Some(config.workdir.as_path()));
        let name = log
            .file_name()
            .and_then(|n| n.to_str())
            .expect("utf-8 file name");
        let stamp = name
            .strip_prefix("plant_run_")
            .and_then(|s| s.strip_suffix(".jsonl"))
            .expect("prefix and suffix");
        let (date, time) = stamp.split_once('_').expect("date_time");
        assert_eq!(date.len(), 8);
        assert_eq!(time.len(), 6);
        assert!(date.chars().chain(time.chars()).all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_missing_input_has_no_side_effects() {
        for missing in RequiredInput::ORDER {
            let temp = tempfile::tempdir().expect("tempdir");
            let config = config_in(temp.path());
            for input in RequiredInput::ORDER {
                if input != missing {
                    std::fs::write(input.path_in(&config), b"").expect("touch");
                }
            }

            let result = Orchestrator::new().run_at(&config, started()).await;

            assert!(
                matches!(result, Err(RunError::MissingInput { input, .. }) if input == missing)
            );
            assert!(!config.workdir.exists(), "workdir created for {missing}");
        }
    }

    #[tokio::test]
    async fn test_prepare_is_idempotent() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = config_in(temp.path());
        std::fs::create_dir_all(&config.workdir).expect("mkdir");
        std::fs::write(config.workdir.join("keep.txt"), b"keep").expect("write");

        let orchestrator = Orchestrator::new();
        let plan = Orchestrator::plan(&config, started()).expect("plan");
        orchestrator.prepare(&plan).await.expect("first prepare");
        orchestrator.prepare(&plan).await.expect("second prepare");

        let script = std::fs::read_to_string(&plan.script_path).expect("read script");
        assert_eq!(script, plan.script);
        assert!(config.workdir.join("keep.txt").exists());
    }
}
