use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use gaze::behaviour::{NotifyFuture, SinkBackend};
use gaze::config::SinkKind;
use gaze::observe::Observer;
use gaze::report::Report;

/// A fake sink backend that:
/// - records the name of every sink it was asked to notify
/// - fails for the sink names it was told to fail, succeeds otherwise.
#[derive(Debug, Clone, Default)]
pub struct RecordingSinkBackend {
    invoked: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
}

impl RecordingSinkBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    /// Sink names in invocation order.
    pub fn invoked(&self) -> Vec<String> {
        self.invoked.lock().unwrap().clone()
    }

    pub fn was_invoked(&self, name: &str) -> bool {
        self.invoked.lock().unwrap().iter().any(|n| n == name)
    }
}

impl SinkBackend for RecordingSinkBackend {
    fn notify<'a>(
        &'a self,
        name: &'a str,
        _sink: &'a SinkKind,
        _report: &'a Report,
    ) -> NotifyFuture<'a> {
        let invoked = Arc::clone(&self.invoked);
        let fail = self.failing.contains(name);

        Box::pin(async move {
            invoked.lock().unwrap().push(name.to_string());
            if fail {
                Err(anyhow!("sink '{name}' was told to fail"))
            } else {
                Ok(())
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Observer that keeps every message for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    messages: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(lvl, _)| *lvl == Level::Error)
            .map(|(_, msg)| msg)
            .collect()
    }

    fn push(&self, level: Level, msg: &str) {
        self.messages.lock().unwrap().push((level, msg.to_string()));
    }
}

impl Observer for RecordingObserver {
    fn info(&self, msg: &str) {
        self.push(Level::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.push(Level::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.push(Level::Error, msg);
    }
}
