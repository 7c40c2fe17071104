// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::exec::RunError;

#[derive(Error, Debug)]
pub enum GazeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A behaviour `type` outside of `command`, `logfile` and `web`.
    #[error("Unrecognized behaviour type '{0}' (expected one of command, logfile, web)")]
    UnrecognizedSinkKind(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Failed during run and report: {0}")]
    Run(#[from] RunError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, GazeError>;
