// src/behaviour/mod.rs

//! Post-run behaviours ("sinks").
//!
//! - [`router`] applies each sink's when-policy and isolates failures.
//! - [`backend`] is the seam between the router and the adapters.
//! - [`command`], [`logfile`] and [`web`] are the three adapters.

pub mod backend;
pub mod command;
pub mod logfile;
pub mod router;
pub mod web;

pub use backend::{Notifier, NotifyFuture, RealSinkBackend, SinkBackend};
pub use router::{BehaviourRouter, SinkOutcome, SinkStatus};
