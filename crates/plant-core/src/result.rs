//! Convenience result type alias.

use crate::error::AppError;

/// A specialized `Result` type for runner operations surfaced at the CLI.
pub type AppResult<T> = Result<T, AppError>;
