// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`capture`] drains child pipes into buffers, optionally teeing them to
//!   the console.
//! - [`runner`] owns the spawn / drain / wait lifecycle and produces the
//!   [`Report`](crate::report::Report) for a run.

pub mod capture;
pub mod runner;

pub use runner::{ProcessRunner, RunError, classify_exit_status, decode_exit_status};
