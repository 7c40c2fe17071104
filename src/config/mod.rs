// src/config/mod.rs

//! Configuration loading and validation for gaze.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Turn loosely typed behaviour settings into typed sinks (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{EXAMPLE_CONFIG, default_config_path, load_and_validate, load_for_run, load_from_path};
pub use model::{
    CommandSettings, ConfigFile, LogfileSettings, RawBehaviour, RawConfigFile, SinkConfig,
    SinkKind, SinkSet, WebSettings,
};
