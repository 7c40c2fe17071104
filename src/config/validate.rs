// src/config/validate.rs

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::model::{
    CommandSettings, ConfigFile, LogfileSettings, RawBehaviour, RawConfigFile, SinkConfig,
    SinkKind, SinkSet, WebSettings,
};
use crate::errors::{GazeError, Result};
use crate::types::{HttpMethod, LogFormat, WhenPolicy};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::GazeError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let mut behaviours = SinkSet::new();
        for (name, behaviour) in raw.behaviour.iter() {
            behaviours.insert(name.clone(), validate_behaviour(name, behaviour)?);
        }
        Ok(ConfigFile::new_unchecked(raw.tags, behaviours))
    }
}

fn validate_behaviour(name: &str, raw: &RawBehaviour) -> Result<SinkConfig> {
    let when = match raw.when.as_deref() {
        None | Some("") => WhenPolicy::default(),
        Some(s) => WhenPolicy::from_str(s).map_err(|_| {
            GazeError::ConfigError(format!(
                "behaviour '{name}' 'when' must be one of [always, failures, successes] (got '{s}')"
            ))
        })?,
    };

    let settings = Settings {
        name,
        kind: raw.kind.as_str(),
        table: &raw.settings,
    };

    let kind = match raw.kind.as_str() {
        "command" => SinkKind::Command(validate_command(&settings)?),
        "logfile" => SinkKind::Logfile(validate_logfile(&settings)?),
        "web" => SinkKind::Web(validate_web(&settings)?),
        other => return Err(GazeError::UnrecognizedSinkKind(other.to_string())),
    };

    Ok(SinkConfig::new(when, kind))
}

fn validate_command(settings: &Settings<'_>) -> Result<CommandSettings> {
    Ok(CommandSettings {
        command: settings.required_str("command")?,
        args: settings.string_list("args")?,
    })
}

fn validate_logfile(settings: &Settings<'_>) -> Result<LogfileSettings> {
    let directory = settings.required_str("directory")?;
    let filename = settings.required_str("filename")?;
    let format = settings.required_str("format")?;
    let format = LogFormat::from_str(&format)
        .map_err(|_| settings.not_allowed("format", &format, "[human, machine]"))?;

    Ok(LogfileSettings {
        directory: PathBuf::from(directory),
        filename,
        format,
    })
}

fn validate_web(settings: &Settings<'_>) -> Result<WebSettings> {
    let url = settings.required_str("url")?;
    let method = match settings.optional_str("method")? {
        None => HttpMethod::default(),
        Some(m) => HttpMethod::from_str(&m)
            .map_err(|_| settings.not_allowed("method", &m, "[POST, PUT]"))?,
    };
    let headers = settings.string_map("headers")?;

    Ok(WebSettings {
        url,
        method,
        headers,
    })
}

/// Typed accessors over one behaviour's `settings` table.
struct Settings<'a> {
    name: &'a str,
    kind: &'a str,
    table: &'a toml::Table,
}

impl Settings<'_> {
    fn required_str(&self, key: &str) -> Result<String> {
        self.optional_str(key)?
            .ok_or_else(|| self.must_have_string(key))
    }

    fn optional_str(&self, key: &str) -> Result<Option<String>> {
        match self.table.get(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.must_have_string(key)),
        }
    }

    fn string_list(&self, key: &str) -> Result<Vec<String>> {
        let Some(value) = self.table.get(key) else {
            return Ok(Vec::new());
        };
        let err = || {
            GazeError::ConfigError(format!(
                "behaviour '{}' of type '{}' setting '{key}' must be a list of strings",
                self.name, self.kind
            ))
        };
        let items = value.as_array().ok_or_else(err)?;
        items
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(err))
            .collect()
    }

    fn string_map(&self, key: &str) -> Result<BTreeMap<String, String>> {
        let Some(value) = self.table.get(key) else {
            return Ok(BTreeMap::new());
        };
        let err = || {
            GazeError::ConfigError(format!(
                "behaviour '{}' of type '{}' {key} must be string-string key-values",
                self.name, self.kind
            ))
        };
        let table = value.as_table().ok_or_else(err)?;
        table
            .iter()
            .map(|(k, v)| {
                v.as_str()
                    .map(|s| (k.clone(), s.to_string()))
                    .ok_or_else(err)
            })
            .collect()
    }

    fn must_have_string(&self, key: &str) -> GazeError {
        GazeError::ConfigError(format!(
            "behaviour '{}' of type '{}' must have a '{key}' string",
            self.name, self.kind
        ))
    }

    fn not_allowed(&self, key: &str, got: &str, allowed: &str) -> GazeError {
        GazeError::ConfigError(format!(
            "behaviour '{}' of type '{}' setting '{key}' must be one of {allowed} (got '{got}')",
            self.name, self.kind
        ))
    }
}
