// src/behaviour/backend.rs

//! Pluggable sink backend abstraction.
//!
//! The router talks to a `SinkBackend` instead of calling the adapters
//! directly. This makes it easy to swap in a recording backend in tests
//! while production goes through [`RealSinkBackend`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::SinkKind;
use crate::fs::{FileSystem, RealFileSystem};
use crate::observe::{self, SharedObserver};
use crate::report::Report;

use super::command::CommandSink;
use super::logfile::LogfileSink;
use super::web::WebSink;

/// Future returned by every notification call.
pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// The capability every sink adapter provides: consume a report, report
/// success or failure.
pub trait Notifier {
    fn notify<'a>(&'a self, report: &'a Report) -> NotifyFuture<'a>;
}

/// Trait abstracting how a configured sink is invoked.
///
/// Production code uses [`RealSinkBackend`]; tests can provide their own
/// implementation that records calls instead of touching disk or network.
pub trait SinkBackend: Send + Sync {
    fn notify<'a>(&'a self, name: &'a str, sink: &'a SinkKind, report: &'a Report)
    -> NotifyFuture<'a>;
}

/// Backend that runs the real command / logfile / web adapters.
#[derive(Debug, Clone)]
pub struct RealSinkBackend {
    fs: Arc<dyn FileSystem>,
    client: reqwest::Client,
    observer: SharedObserver,
}

impl RealSinkBackend {
    pub fn new() -> Result<Self> {
        Self::with_filesystem(Arc::new(RealFileSystem))
    }

    /// Use the given filesystem for `logfile` sinks.
    pub fn with_filesystem(fs: Arc<dyn FileSystem>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("building HTTP client for web behaviours")?;
        Ok(Self {
            fs,
            client,
            observer: observe::noop(),
        })
    }

    /// Route adapter progress messages to `observer`.
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observer = observer;
        self
    }
}

impl SinkBackend for RealSinkBackend {
    fn notify<'a>(
        &'a self,
        _name: &'a str,
        sink: &'a SinkKind,
        report: &'a Report,
    ) -> NotifyFuture<'a> {
        let observer = Arc::clone(&self.observer);
        Box::pin(async move {
            match sink {
                SinkKind::Command(settings) => {
                    CommandSink::new(settings)
                        .with_observer(observer)
                        .notify(report)
                        .await
                }
                SinkKind::Logfile(settings) => {
                    LogfileSink::new(settings, Arc::clone(&self.fs))
                        .with_observer(observer)
                        .notify(report)
                        .await
                }
                SinkKind::Web(settings) => {
                    WebSink::new(settings, self.client.clone())
                        .with_observer(observer)
                        .notify(report)
                        .await
                }
            }
        })
    }
}
