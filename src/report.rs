// src/report.rs

//! The record produced by one wrapped command execution.
//!
//! A [`Report`] is assembled once by [`ReportBuilder::finish`] and only read
//! afterwards: behaviours receive it by shared reference.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Exit code recorded when the command could not be started.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Exit code recorded when gaze itself failed around the child (pipes, reads).
pub const INTERNAL_FAILURE_CODE: i32 = -1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    pub command: Vec<String>,

    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub elapsed_seconds: f64,

    pub exit_code: i32,
    pub exit_description: String,

    pub captured_output: String,

    pub hostname: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl Report {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// Compact single-line JSON, as posted to web hooks and piped to commands.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Fixed-field block written by the `human` log format.
    ///
    /// Captured output is written verbatim, so multi-line output spans
    /// several lines; the separator line starts every record.
    pub fn to_human_block(&self) -> String {
        format!(
            "---- ---- ---- ----\n\
             Start Time:       {}\n\
             End Time:         {}\n\
             Exit Code:        {}\n\
             Exit Description: {}\n\
             Captured Output:  {}\n",
            self.start_time,
            self.end_time,
            self.exit_code,
            self.exit_description,
            self.captured_output,
        )
    }
}

/// How a run ended, as decided by the runner's terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitClassification {
    pub code: i32,
    pub description: String,
}

impl ExitClassification {
    pub fn success() -> Self {
        Self {
            code: 0,
            description: "Execution finished with no error".to_string(),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            code,
            description: format!("Execution failed with code {code}"),
        }
    }

    /// Terminated by a signal: no exit status exists, so the code is `-1`
    /// and the signal number goes into the description.
    pub fn killed_by_signal(signal: i32) -> Self {
        Self {
            code: INTERNAL_FAILURE_CODE,
            description: format!(
                "Execution failed with code {INTERNAL_FAILURE_CODE} (killed by signal {signal})"
            ),
        }
    }

    pub fn spawn_failed(cause: impl std::fmt::Display) -> Self {
        Self {
            code: SPAWN_FAILURE_CODE,
            description: cause.to_string(),
        }
    }

    pub fn unexpected(cause: impl std::fmt::Display) -> Self {
        Self {
            code: SPAWN_FAILURE_CODE,
            description: format!("Unexpected error: {cause}"),
        }
    }

    pub fn pipe_bind_failed(cause: impl std::fmt::Display) -> Self {
        Self {
            code: INTERNAL_FAILURE_CODE,
            description: format!("Failed to bind stdout/stderr pipe: {cause}"),
        }
    }

    pub fn read_failed(cause: impl std::fmt::Display) -> Self {
        Self {
            code: INTERNAL_FAILURE_CODE,
            description: format!("Failed to read output: {cause}"),
        }
    }

    pub fn no_command() -> Self {
        Self {
            code: INTERNAL_FAILURE_CODE,
            description: "No command given".to_string(),
        }
    }
}

/// Collects identity fields up front and stamps timing/outcome at the end.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    name: String,
    command: Vec<String>,
    hostname: String,
    tags: Vec<String>,
    start_time: DateTime<Local>,
}

impl ReportBuilder {
    /// Start a report now, resolving the local hostname.
    pub fn start(name: impl Into<String>, command: Vec<String>) -> Self {
        Self {
            name: name.into(),
            command,
            hostname: resolve_hostname(),
            tags: Vec::new(),
            start_time: Local::now(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = hostname.into();
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Local>) -> Self {
        self.start_time = start_time;
        self
    }

    pub fn start_time(&self) -> DateTime<Local> {
        self.start_time
    }

    /// Finish the report with the current time as the end time.
    pub fn finish(self, outcome: ExitClassification, captured_output: String) -> Report {
        self.finish_at(Local::now(), outcome, captured_output)
    }

    /// Finish the report with an explicit end time.
    ///
    /// An end time earlier than the start (wall clock stepped back) is
    /// clamped to the start so `elapsed_seconds` never goes negative.
    pub fn finish_at(
        self,
        end_time: DateTime<Local>,
        outcome: ExitClassification,
        captured_output: String,
    ) -> Report {
        let end_time = end_time.max(self.start_time);
        let elapsed = end_time - self.start_time;
        let elapsed_seconds = elapsed.num_nanoseconds().unwrap_or(i64::MAX) as f64 / 1e9;

        Report {
            name: self.name,
            command: self.command,
            start_time: self.start_time,
            end_time,
            elapsed_seconds,
            exit_code: outcome.code,
            exit_description: outcome.description,
            captured_output,
            hostname: self.hostname,
            tags: self.tags,
        }
    }
}

/// Local hostname, or an empty string if it cannot be resolved.
pub fn resolve_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn builder() -> ReportBuilder {
        ReportBuilder::start("backup", vec!["tar".into(), "-c".into()]).with_hostname("box")
    }

    #[test]
    fn elapsed_matches_end_minus_start() {
        let b = builder();
        let end = b.start_time() + Duration::milliseconds(1500);
        let report = b.finish_at(end, ExitClassification::success(), String::new());

        assert_eq!(report.end_time - report.start_time, Duration::milliseconds(1500));
        assert!((report.elapsed_seconds - 1.5).abs() < 1e-9);
        assert_eq!(report.exit_code, 0);
        assert_eq!(report.exit_description, "Execution finished with no error");
    }

    #[test]
    fn end_before_start_is_clamped() {
        let b = builder();
        let end = b.start_time() - Duration::seconds(5);
        let report = b.finish_at(end, ExitClassification::failed(2), String::new());

        assert_eq!(report.end_time, report.start_time);
        assert_eq!(report.elapsed_seconds, 0.0);
        assert_eq!(report.exit_description, "Execution failed with code 2");
    }

    #[test]
    fn json_uses_snake_case_fields() {
        let report = builder()
            .with_tags(vec!["nightly".into()])
            .finish(ExitClassification::spawn_failed("no such file"), "out".into());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["name"], "backup");
        assert_eq!(value["command"][1], "-c");
        assert_eq!(value["exit_code"], 127);
        assert_eq!(value["exit_description"], "no such file");
        assert_eq!(value["captured_output"], "out");
        assert_eq!(value["hostname"], "box");
        assert_eq!(value["tags"][0], "nightly");
        assert!(value["start_time"].is_string());
        assert!(value["elapsed_seconds"].is_number());
    }

    #[test]
    fn human_block_has_fixed_fields() {
        let report = builder().finish(ExitClassification::failed(1), "boom\n".into());
        let block = report.to_human_block();
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "---- ---- ---- ----");
        assert!(lines[1].starts_with("Start Time:       "));
        assert!(lines[2].starts_with("End Time:         "));
        assert_eq!(lines[3], "Exit Code:        1");
        assert_eq!(lines[4], "Exit Description: Execution failed with code 1");
        assert_eq!(lines[5], "Captured Output:  boom");
        assert!(block.ends_with("boom\n\n"));
    }

    #[test]
    fn signal_death_is_distinct_from_a_plain_exit() {
        let killed = ExitClassification::killed_by_signal(15);
        let exited = ExitClassification::failed(143);

        assert_eq!(killed.code, -1);
        assert_eq!(
            killed.description,
            "Execution failed with code -1 (killed by signal 15)"
        );
        assert_ne!(killed, exited);
    }
}
