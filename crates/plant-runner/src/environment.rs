//! Environment variables handed to the add-in.
//!
//! The child inherits the runner's environment; these keys are overlaid on
//! top. The log path is only announced here. The add-in writes it.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::models::RunConfig;

/// Project descriptor the add-in opens.
pub const ENV_PROJECT_XML: &str = "PLANT_PROJECT_XML";
/// Metadata JSON the add-in applies.
pub const ENV_JSON_IN: &str = "PLANT_JSON_IN";
/// `"1"` to save modified drawings, `"0"` to discard.
pub const ENV_SAVE_CHANGES: &str = "PLANT_SAVE_CHANGES";
/// JSON-lines log the add-in appends to.
pub const ENV_LOG_PATH: &str = "PLANT_LOG_PATH";

/// Timestamp layout embedded in run log names.
const LOG_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Log file for a run started at `started_at`.
pub fn log_path(workdir: &Path, started_at: NaiveDateTime) -> PathBuf {
    workdir.join(format!(
        "plant_run_{}.jsonl",
        started_at.format(LOG_TIMESTAMP_FORMAT)
    ))
}

/// Build the overlay for `config`, sorted by key. Paths are passed through
/// as OS strings.
pub fn compose_overlay(config: &RunConfig, log_path: &Path) -> Vec<(String, OsString)> {
    let save_flag = if config.save_changes { "1" } else { "0" };

    vec![
        (ENV_JSON_IN.to_string(), config.json_in.clone().into_os_string()),
        (ENV_LOG_PATH.to_string(), log_path.as_os_str().to_os_string()),
        (
            ENV_PROJECT_XML.to_string(),
            config.project_xml.clone().into_os_string(),
        ),
        (ENV_SAVE_CHANGES.to_string(), OsString::from(save_flag)),
    ]
}
