// src/behaviour/command.rs

use std::io;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::CommandSettings;
use crate::exec::decode_exit_status;
use crate::observe::{self, SharedObserver};
use crate::report::Report;

use super::backend::{Notifier, NotifyFuture};

/// Spawns `command args...` and writes the JSON report to its stdin.
///
/// The child's own stdout/stderr are discarded.
#[derive(Debug)]
pub struct CommandSink<'s> {
    settings: &'s CommandSettings,
    observer: SharedObserver,
}

impl<'s> CommandSink<'s> {
    pub fn new(settings: &'s CommandSettings) -> Self {
        Self {
            settings,
            observer: observe::noop(),
        }
    }

    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }

    pub async fn pipe_report(&self, report: &Report) -> Result<()> {
        let program = &self.settings.command;
        let payload = report.to_json().context("serializing report")?;

        self.observer
            .info(&format!("piping report to behaviour command '{program}'"));

        let mut child = Command::new(program)
            .args(&self.settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("spawning behaviour command '{program}'"))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload.as_bytes()).await {
                Ok(()) => {}
                // The child may legitimately exit without reading its input.
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    self.observer
                        .info(&format!("behaviour command '{program}' closed stdin early"));
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("writing report to '{program}'"));
                }
            }
            // Dropping stdin sends EOF.
        }

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for behaviour command '{program}'"))?;

        if !status.success() {
            bail!(
                "behaviour command '{program}' exited with code {}",
                decode_exit_status(status)
            );
        }
        Ok(())
    }
}

impl Notifier for CommandSink<'_> {
    fn notify<'a>(&'a self, report: &'a Report) -> NotifyFuture<'a> {
        Box::pin(self.pipe_report(report))
    }
}
