#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Local, TimeZone};
use gaze::config::{CommandSettings, LogfileSettings, SinkConfig, SinkKind, SinkSet, WebSettings};
use gaze::report::{ExitClassification, Report, ReportBuilder};
use gaze::types::{HttpMethod, LogFormat, WhenPolicy};

/// Builder for `SinkSet` to simplify test setup.
pub struct SinkSetBuilder {
    sinks: SinkSet,
}

impl SinkSetBuilder {
    pub fn new() -> Self {
        Self {
            sinks: SinkSet::new(),
        }
    }

    pub fn with_sink(mut self, name: &str, when: WhenPolicy, kind: SinkKind) -> Self {
        self.sinks.insert(name.to_string(), SinkConfig::new(when, kind));
        self
    }

    /// A command sink; handy when the backend is faked and the kind is
    /// irrelevant.
    pub fn with_command(self, name: &str, when: WhenPolicy, command: &str) -> Self {
        self.with_sink(name, when, command_sink(command, &[]))
    }

    pub fn build(self) -> SinkSet {
        self.sinks
    }
}

impl Default for SinkSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn command_sink(command: &str, args: &[&str]) -> SinkKind {
    SinkKind::Command(CommandSettings {
        command: command.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    })
}

pub fn logfile_sink(directory: &Path, filename: &str, format: LogFormat) -> SinkKind {
    SinkKind::Logfile(LogfileSettings {
        directory: directory.to_path_buf(),
        filename: filename.to_string(),
        format,
    })
}

pub fn web_sink(url: &str, method: HttpMethod, headers: &[(&str, &str)]) -> SinkKind {
    SinkKind::Web(WebSettings {
        url: url.to_string(),
        method,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    })
}

/// A finished report with the given exit code and fixed timing.
pub fn report_with_exit(code: i32) -> Report {
    let outcome = if code == 0 {
        ExitClassification::success()
    } else {
        ExitClassification::failed(code)
    };
    let start = Local
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .single()
        .expect("fixed timestamp is unambiguous");
    ReportBuilder::start("fixture", vec!["fixture".to_string()])
        .with_hostname("test-host")
        .with_start_time(start)
        .finish_at(start + chrono::Duration::seconds(2), outcome, "captured\n".to_string())
}
