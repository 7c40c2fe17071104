// src/observe.rs

//! Progress/failure reporting channel handed to the runner and the router.
//!
//! The core never talks to a global logger; it reports through an
//! [`Observer`] it was constructed with. Production wiring uses
//! [`TracingObserver`], and [`NoopObserver`] is the default when nothing
//! cares about the messages.

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{error, info, warn};

pub trait Observer: Send + Sync + Debug {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Shared handle used throughout the crate.
pub type SharedObserver = Arc<dyn Observer>;

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Forwards messages to `tracing` under the `gaze` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn info(&self, msg: &str) {
        info!(target: "gaze", "{msg}");
    }

    fn warn(&self, msg: &str) {
        warn!(target: "gaze", "{msg}");
    }

    fn error(&self, msg: &str) {
        error!(target: "gaze", "{msg}");
    }
}

pub fn noop() -> SharedObserver {
    Arc::new(NoopObserver)
}
