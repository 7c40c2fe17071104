// src/behaviour/logfile.rs

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};

use crate::config::LogfileSettings;
use crate::fs::{EntryKind, FileSystem};
use crate::observe::{self, SharedObserver};
use crate::report::Report;
use crate::types::LogFormat;

use super::backend::{Notifier, NotifyFuture};

/// Appends one record per run to `directory/filename`.
///
/// The directory must already exist; the file is created on first use.
#[derive(Debug)]
pub struct LogfileSink<'s> {
    settings: &'s LogfileSettings,
    fs: Arc<dyn FileSystem>,
    observer: SharedObserver,
}

impl<'s> LogfileSink<'s> {
    pub fn new(settings: &'s LogfileSettings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings,
            fs,
            observer: observe::noop(),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn append_report(&self, report: &Report) -> Result<()> {
        check_log_directory(self.fs.as_ref(), &self.settings.directory)?;

        let path = self.settings.path();
        let record = match self.settings.format {
            LogFormat::Machine => {
                let mut line = report.to_json().context("serializing report")?;
                line.push('\n');
                line
            }
            LogFormat::Human => report.to_human_block(),
        };

        self.observer
            .info(&format!("appending report to {}", path.display()));
        self.fs.append(&path, record.as_bytes())
    }
}

fn check_log_directory(fs: &dyn FileSystem, dir: &Path) -> Result<()> {
    match fs.kind(dir) {
        Ok(EntryKind::Dir) => Ok(()),
        Ok(EntryKind::File) => Err(anyhow!(
            "Path '{}' is a file, we cannot create a logfile",
            dir.display()
        )),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(anyhow!("Directory '{}' does not exist!", dir.display()))
        }
        Err(e) => Err(anyhow!("Could not read directory '{}': {e}", dir.display())),
    }
}

impl Notifier for LogfileSink<'_> {
    fn notify<'a>(&'a self, report: &'a Report) -> NotifyFuture<'a> {
        Box::pin(async move { self.append_report(report) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::report::{ExitClassification, ReportBuilder};

    fn settings(format: LogFormat) -> LogfileSettings {
        LogfileSettings {
            directory: "/var/log/gaze".into(),
            filename: "runs.log".into(),
            format,
        }
    }

    fn report(code: i32) -> Report {
        let outcome = if code == 0 {
            ExitClassification::success()
        } else {
            ExitClassification::failed(code)
        };
        ReportBuilder::start("job", vec!["job".into()])
            .with_hostname("box")
            .finish(outcome, "some output".into())
    }

    #[tokio::test]
    async fn machine_format_appends_json_lines() {
        let fs = MockFileSystem::new();
        fs.add_dir("/var/log/gaze");
        let settings = settings(LogFormat::Machine);
        let sink = LogfileSink::new(&settings, Arc::new(fs.clone()));

        sink.notify(&report(0)).await.unwrap();
        sink.notify(&report(4)).await.unwrap();

        let contents = String::from_utf8(fs.contents("/var/log/gaze/runs.log").unwrap()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let second: Report = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second.exit_code, 4);
        assert!(contents.ends_with('\n'));
    }

    #[tokio::test]
    async fn human_format_appends_block() {
        let fs = MockFileSystem::new();
        fs.add_dir("/var/log/gaze");
        let settings = settings(LogFormat::Human);
        let sink = LogfileSink::new(&settings, Arc::new(fs.clone()));

        sink.notify(&report(1)).await.unwrap();

        let contents = String::from_utf8(fs.contents("/var/log/gaze/runs.log").unwrap()).unwrap();
        assert!(contents.starts_with("---- ---- ---- ----\n"));
        assert!(contents.contains("Exit Code:        1\n"));
        assert!(contents.contains("Captured Output:  some output\n"));
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let fs = MockFileSystem::new();
        let settings = settings(LogFormat::Human);
        let sink = LogfileSink::new(&settings, Arc::new(fs.clone()));

        let err = sink.notify(&report(0)).await.unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(fs.contents("/var/log/gaze/runs.log").is_none());
    }

    #[tokio::test]
    async fn file_in_place_of_directory_is_an_error() {
        let fs = MockFileSystem::new();
        fs.add_file("/var/log/gaze", "not a dir");
        let settings = settings(LogFormat::Machine);
        let sink = LogfileSink::new(&settings, Arc::new(fs));

        let err = sink.notify(&report(0)).await.unwrap_err();
        assert!(err.to_string().contains("is a file"));
    }
}
