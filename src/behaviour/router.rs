// src/behaviour/router.rs

use crate::config::SinkSet;
use crate::observe::{self, SharedObserver};
use crate::report::Report;

use super::backend::SinkBackend;

/// What happened to one sink during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStatus {
    /// The when-policy did not match the report's exit code.
    Skipped,
    Succeeded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOutcome {
    pub name: String,
    pub kind: &'static str,
    pub status: SinkStatus,
}

/// Routes a finished report to every configured sink whose when-policy
/// matches.
///
/// A failing sink is reported to the observer and never stops the others;
/// `dispatch` itself cannot fail.
#[derive(Debug)]
pub struct BehaviourRouter<B: SinkBackend> {
    backend: B,
    observer: SharedObserver,
}

impl<B: SinkBackend> BehaviourRouter<B> {
    pub fn new(backend: B) -> Self {
        Self::with_observer(backend, observe::noop())
    }

    pub fn with_observer(backend: B, observer: SharedObserver) -> Self {
        Self { backend, observer }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run every matching sink once, in map order, and return per-sink
    /// outcomes. Callers must not rely on that order.
    pub async fn dispatch(&self, report: &Report, sinks: &SinkSet) -> Vec<SinkOutcome> {
        let mut outcomes = Vec::with_capacity(sinks.len());

        for (name, sink) in sinks.iter() {
            let kind = sink.kind.type_name();
            self.observer
                .info(&format!("Running behaviour '{name}' of type {kind}.."));

            let status = if !sink.when.allows(report.exit_code) {
                self.observer.info(&format!(
                    "Skipping '{name}' because it only runs on {}",
                    sink.when
                ));
                SinkStatus::Skipped
            } else {
                match self.backend.notify(name, &sink.kind, report).await {
                    Ok(()) => {
                        self.observer.info(&format!("Behaviour '{name}' completed."));
                        SinkStatus::Succeeded
                    }
                    Err(err) => {
                        let msg = format!("{err:#}");
                        self.observer
                            .error(&format!("Behaviour '{name}' ({kind}) failed!: {msg}"));
                        SinkStatus::Failed(msg)
                    }
                }
            };

            outcomes.push(SinkOutcome {
                name: name.clone(),
                kind,
                status,
            });
        }

        outcomes
    }
}
