//! Error type for a runner invocation.
//!
//! A non-zero exit from AutoCAD is not an error here; it is returned as the
//! run's exit code. `RunError` only covers failures that happen before or
//! while starting the host.

use plant_core::error::{AppError, ErrorKind};
use std::path::PathBuf;
use thiserror::Error;

use crate::inputs::RequiredInput;

/// Errors raised by the orchestrator.
#[derive(Debug, Error)]
pub enum RunError {
    /// A required input does not exist on disk.
    #[error("{input} not found: {path}")]
    MissingInput {
        /// Which input was missing.
        input: RequiredInput,
        /// The configured path.
        path: PathBuf,
    },

    /// The add-in path cannot be written into the script as text.
    #[error("Plugin path is not valid UTF-8: {path}")]
    InvalidUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// The host executable could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Executable that failed to start.
        program: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
    },

    /// Filesystem error while preparing the working directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RunError> for AppError {
    fn from(err: RunError) -> Self {
        let message = err.to_string();
        match err {
            RunError::MissingInput { .. } => AppError::not_found(message),
            RunError::InvalidUtf8Path { .. } => AppError::validation(message),
            RunError::Spawn { source, .. } => {
                AppError::with_source(ErrorKind::ExternalProcess, message, source)
            }
            RunError::Io(e) => AppError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let missing = RunError::MissingInput {
            input: RequiredInput::JsonIn,
            path: PathBuf::from("/data/meta.json"),
        };
        assert_eq!(AppError::from(missing).kind, ErrorKind::NotFound);

        let spawn = RunError::Spawn {
            program: PathBuf::from("/opt/acad/acad.exe"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let err = AppError::from(spawn);
        assert_eq!(err.kind, ErrorKind::ExternalProcess);
        assert!(err.message.contains("/opt/acad/acad.exe"));

        let io = RunError::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(AppError::from(io).kind, ErrorKind::Io);
    }
}
