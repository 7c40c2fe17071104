#![allow(dead_code)]

pub use gaze_test_utils::init_tracing;

/// Owned argv from string literals.
pub fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
