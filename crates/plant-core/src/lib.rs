//! # plant-core
//!
//! Core crate for the Plant 3D metadata runner. Contains the layered
//! configuration schema and the unified error type used at the CLI boundary.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;

pub use config::AppConfig;
pub use error::AppError;
pub use result::AppResult;
