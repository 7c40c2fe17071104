// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{HttpMethod, LogFormat, WhenPolicy};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// tags = ["nightly"]
///
/// [behaviour.audit]
/// type = "logfile"
/// when = "always"
///
/// [behaviour.audit.settings]
/// directory = "/var/log/gaze"
/// filename = "runs.log"
/// format = "human"
/// ```
///
/// Settings stay loosely typed here; [`ConfigFile`] is the validated form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Tags copied into every report.
    #[serde(default)]
    pub tags: Vec<String>,

    /// All behaviours from `[behaviour.<name>]`, keyed by name.
    #[serde(default)]
    pub behaviour: BTreeMap<String, RawBehaviour>,
}

/// `[behaviour.<name>]` section before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBehaviour {
    /// `"command"`, `"logfile"` or `"web"`.
    #[serde(rename = "type")]
    pub kind: String,

    /// `"always"` (default), `"failures"` or `"successes"`.
    #[serde(default)]
    pub when: Option<String>,

    /// Kind-specific keys.
    #[serde(default)]
    pub settings: toml::Table,
}

/// Behaviours keyed by their unique name.
pub type SinkSet = BTreeMap<String, SinkConfig>;

/// Validated configuration.
///
/// Can only be built through `TryFrom<RawConfigFile>` (or
/// [`ConfigFile::new_unchecked`] from already-typed parts), so every sink in
/// it has a known kind and complete settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub tags: Vec<String>,
    pub behaviours: SinkSet,
}

impl ConfigFile {
    pub fn new_unchecked(tags: Vec<String>, behaviours: SinkSet) -> Self {
        Self { tags, behaviours }
    }
}

/// One configured behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    pub when: WhenPolicy,
    pub kind: SinkKind,
}

impl SinkConfig {
    pub fn new(when: WhenPolicy, kind: SinkKind) -> Self {
        Self { when, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkKind {
    Command(CommandSettings),
    Logfile(LogfileSettings),
    Web(WebSettings),
}

impl SinkKind {
    /// The `type` string this kind is configured with.
    pub fn type_name(&self) -> &'static str {
        match self {
            SinkKind::Command(_) => "command",
            SinkKind::Logfile(_) => "logfile",
            SinkKind::Web(_) => "web",
        }
    }
}

/// Pipe the JSON report into `command args...`.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandSettings {
    pub command: String,
    pub args: Vec<String>,
}

/// Append a record to `directory/filename`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogfileSettings {
    pub directory: PathBuf,
    pub filename: String,
    pub format: LogFormat,
}

impl LogfileSettings {
    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Send the JSON report to `url`.
#[derive(Debug, Clone, PartialEq)]
pub struct WebSettings {
    pub url: String,
    pub method: HttpMethod,
    pub headers: BTreeMap<String, String>,
}
