// src/config/loader.rs

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** validate
/// behaviour settings. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_with(&RealFileSystem, path.as_ref())
}

/// Load a configuration file from path and validate every behaviour.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Rejects unknown behaviour types and bad settings.
/// - Fills defaults (`when`, `method`, `headers`, `args`).
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// Resolve and load the config for a run.
///
/// - An explicit path must exist.
/// - Without one, [`default_config_path`] is tried, and a missing file there
///   just means "no behaviours configured".
pub fn load_for_run(fs: &dyn FileSystem, explicit: Option<&Path>) -> Result<ConfigFile> {
    let raw = match explicit {
        Some(path) => load_with(fs, path)?,
        None => {
            let path = default_config_path();
            match fs.read_to_string(&path) {
                Ok(contents) => toml::from_str(&contents)?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!(path = ?path, "no default config present; running without behaviours");
                    RawConfigFile::default()
                }
                Err(e) => return Err(e.into()),
            }
        }
    };
    ConfigFile::try_from(raw)
}

fn load_with(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    let contents = fs.read_to_string(path)?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// `$HOME/.config/gaze.toml`, or `gaze.toml` in the working directory when
/// `HOME` is unset.
pub fn default_config_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config").join("gaze.toml"),
        None => PathBuf::from("gaze.toml"),
    }
}

/// Printed by `--example-config`.
pub const EXAMPLE_CONFIG: &str = r#"# Tags copied into every report.
tags = ["example"]

# Append a human readable block for every run.
[behaviour.audit]
type = "logfile"
when = "always"

[behaviour.audit.settings]
directory = "/var/log/gaze"
filename = "runs.log"
format = "human"

# Post the JSON report when the command fails.
[behaviour.alert]
type = "web"
when = "failures"

[behaviour.alert.settings]
url = "http://127.0.0.1:8080/"
method = "POST"
headers = { Authorization = "Bearer changeme" }

# Pipe the JSON report into another program when the command succeeds.
[behaviour.archive]
type = "command"
when = "successes"

[behaviour.archive.settings]
command = "tee"
args = ["-a", "/tmp/gaze-successes.jsonl"]
"#;
