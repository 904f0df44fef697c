//! Host process execution.
//!
//! Runs `acad.exe` with inherited stdio and waits for it. No timeout is
//! applied; the host exits on its own after `_.QUIT`.

use std::process::ExitStatus;
use std::time::Instant;

use tokio::process::Command;
use tracing::{info, warn};

use crate::error::RunError;
use crate::models::LaunchPlan;

/// Exit code reported when the host ends without one and no signal is known.
const UNKNOWN_EXIT_CODE: i32 = -1;

/// Starts the CAD host for a launch plan.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcadExecutor;

impl AcadExecutor {
    /// Spawn the host and wait for it to exit. Returns its exit code.
    ///
    /// Spawn failures propagate as [`RunError::Spawn`].
    pub async fn execute(&self, plan: &LaunchPlan) -> Result<i32, RunError> {
        let start = Instant::now();
        let args = plan.args();

        info!(
            program = %plan.program.display(),
            args = ?args,
            workdir = %plan.workdir.display(),
            "Launching AutoCAD"
        );

        let status = Command::new(&plan.program)
            .args(&args)
            .current_dir(&plan.workdir)
            .envs(plan.env_overlay.iter().map(|(k, v)| (k, v)))
            .status()
            .await
            .map_err(|source| RunError::Spawn {
                program: plan.program.clone(),
                source,
            })?;

        let code = exit_code(status);
        info!(
            exit_code = code,
            duration_ms = start.elapsed().as_millis() as u64,
            "AutoCAD exited"
        );
        Ok(code)
    }
}

/// Map an exit status to a process exit code.
///
/// A host killed by a signal on Unix reports the negated signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            warn!(signal, "AutoCAD terminated by signal");
            return -signal;
        }
    }

    warn!("AutoCAD exited without a status code");
    UNKNOWN_EXIT_CODE
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    #[test]
    fn test_exit_code_passthrough() {
        // Raw wait status: exit code in the high byte.
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(1 << 8)), 1);
        assert_eq!(exit_code(ExitStatus::from_raw(42 << 8)), 42);
    }

    #[test]
    fn test_signal_is_negated() {
        // SIGKILL, SIGTERM
        assert_eq!(exit_code(ExitStatus::from_raw(9)), -9);
        assert_eq!(exit_code(ExitStatus::from_raw(15)), -15);
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let plan = LaunchPlan {
            program: temp.path().join("no-such-acad"),
            workdir: temp.path().to_path_buf(),
            script_path: temp.path().join("run_rev2.scr"),
            script: String::new(),
            log_path: temp.path().join("plant_run_20260101_000000.jsonl"),
            env_overlay: Vec::new(),
        };
        let result = AcadExecutor.execute(&plan).await;
        assert!(matches!(result, Err(RunError::Spawn { .. })));
    }
}
