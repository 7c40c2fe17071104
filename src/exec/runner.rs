// src/exec/runner.rs

//! Runs the wrapped command and classifies how it ended.
//!
//! Lifecycle of one run:
//!
//! 1. spawn with stdin inherited and stdout/stderr piped
//!    (spawn failure is *reported*, exit code 127)
//! 2. take both pipes (failure: exit code -1, error returned)
//! 3. drain both pipes concurrently to end-of-stream
//!    (failure: exit code -1, error returned)
//! 4. wait for the child, then decode its exit status
//!    (death by signal: exit code -1, signal named in the description)
//!
//! When step 2 or 3 fails the child is killed and reaped before the run
//! is abandoned.
//!
//! Draining always completes before waiting, so a chatty child can never
//! block on a full pipe while we sit in `wait()`. There is no timeout: a
//! child that never exits keeps gaze waiting too.

use std::io;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::{Child, Command};

use crate::exec::capture::drain_child_pipes;
use crate::observe::{self, Observer, SharedObserver};
use crate::report::{ExitClassification, INTERNAL_FAILURE_CODE, Report, ReportBuilder};

/// A run that could not proceed far enough to be meaningful.
///
/// Every variant still carries the best-available [`Report`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no command given")]
    EmptyCommand { report: Box<Report> },

    #[error("Failed to bind stdout/stderr pipe: {source}")]
    PipeBind {
        report: Box<Report>,
        source: io::Error,
    },

    #[error("Failed to read output: {source}")]
    Drain {
        report: Box<Report>,
        source: io::Error,
    },
}

impl RunError {
    pub fn report(&self) -> &Report {
        match self {
            RunError::EmptyCommand { report }
            | RunError::PipeBind { report, .. }
            | RunError::Drain { report, .. } => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            RunError::EmptyCommand { report }
            | RunError::PipeBind { report, .. }
            | RunError::Drain { report, .. } => *report,
        }
    }
}

/// Why `execute` stopped early, before the report exists.
enum Abort {
    EmptyCommand,
    PipeBind(io::Error),
    Drain(io::Error),
}

impl Abort {
    fn with_report(self, report: Report) -> RunError {
        let report = Box::new(report);
        match self {
            Abort::EmptyCommand => RunError::EmptyCommand { report },
            Abort::PipeBind(source) => RunError::PipeBind { report, source },
            Abort::Drain(source) => RunError::Drain { report, source },
        }
    }
}

struct Execution {
    outcome: ExitClassification,
    captured: Vec<u8>,
    abort: Option<Abort>,
}

impl Execution {
    fn reported(outcome: ExitClassification, captured: Vec<u8>) -> Self {
        Self {
            outcome,
            captured,
            abort: None,
        }
    }

    fn aborted(outcome: ExitClassification, abort: Abort) -> Self {
        Self {
            outcome,
            captured: Vec::new(),
            abort: Some(abort),
        }
    }
}

/// Spawns one command per call and turns it into a [`Report`].
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    forward_output: bool,
    tags: Vec<String>,
    observer: SharedObserver,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(observe::noop())
    }
}

impl ProcessRunner {
    pub fn new(observer: SharedObserver) -> Self {
        Self {
            forward_output: false,
            tags: Vec::new(),
            observer,
        }
    }

    /// Tee the child's stdout/stderr to our own while capturing.
    pub fn forward_output(mut self, forward: bool) -> Self {
        self.forward_output = forward;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Run `argv` (`argv[0]` is the program) and build its report.
    ///
    /// Spawn failures and non-zero exits are `Ok`: they are encoded in the
    /// report. `Err` means gaze itself could not follow the run; the error
    /// still holds a report.
    pub async fn run(&self, name: &str, argv: &[String]) -> Result<Report, RunError> {
        let builder = ReportBuilder::start(name, argv.to_vec()).with_tags(self.tags.clone());

        let execution = self.execute(argv).await;

        // The only place the end time is stamped, whatever path `execute` took.
        let captured = String::from_utf8_lossy(&execution.captured).into_owned();
        let report = builder.finish(execution.outcome, captured);

        match execution.abort {
            None => Ok(report),
            Some(abort) => Err(abort.with_report(report)),
        }
    }

    async fn execute(&self, argv: &[String]) -> Execution {
        let Some((program, args)) = argv.split_first() else {
            self.observer.error("refusing to run an empty command line");
            return Execution::aborted(ExitClassification::no_command(), Abort::EmptyCommand);
        };

        self.observer.info(&format!("Running {argv:?}.."));

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                self.observer.warn(&format!("failed to start '{program}': {e}"));
                return Execution::reported(ExitClassification::spawn_failed(&e), Vec::new());
            }
        };

        let (stdout, stderr) = match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => (out, err),
            _ => {
                let e = io::Error::new(io::ErrorKind::BrokenPipe, "child pipes were not created");
                self.observer.error(&format!("failed to bind pipes: {e}"));
                abandon_child(&mut child, self.observer.as_ref()).await;
                return Execution::aborted(
                    ExitClassification::pipe_bind_failed(&e),
                    Abort::PipeBind(e),
                );
            }
        };

        let captured = match drain_child_pipes(stdout, stderr, self.forward_output).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.observer.error(&format!("failed to read output: {e}"));
                abandon_child(&mut child, self.observer.as_ref()).await;
                return Execution::aborted(ExitClassification::read_failed(&e), Abort::Drain(e));
            }
        };

        let outcome = match child.wait().await {
            Ok(status) => classify_exit_status(status),
            Err(e) => {
                self.observer.warn(&format!("waiting for child failed: {e}"));
                ExitClassification::unexpected(&e)
            }
        };

        self.observer.info(&format!("Command exited with code {}", outcome.code));
        Execution::reported(outcome, captured)
    }
}

/// Kill a child we stopped following and reap it.
///
/// A child that already exited cannot be killed; that is only worth a warning.
async fn abandon_child(child: &mut Child, observer: &dyn Observer) {
    if let Err(e) = child.kill().await {
        observer.warn(&format!("could not kill abandoned child: {e}"));
    }
}

/// Map an exit status onto a single integer code.
///
/// Normal exits keep their status. Anything without one (on Unix, death by
/// a signal) is `-1`.
pub fn decode_exit_status(status: ExitStatus) -> i32 {
    status.code().unwrap_or(INTERNAL_FAILURE_CODE)
}

/// The report outcome for a child that was waited on successfully.
pub fn classify_exit_status(status: ExitStatus) -> ExitClassification {
    if status.success() {
        return ExitClassification::success();
    }
    if let Some(code) = status.code() {
        return ExitClassification::failed(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return ExitClassification::killed_by_signal(signal);
        }
    }

    ExitClassification::failed(INTERNAL_FAILURE_CODE)
}
