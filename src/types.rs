use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// When a configured behaviour fires, relative to the command's exit code.
///
/// - `Always`: every run (default).
/// - `Failures`: only when the exit code is non-zero.
/// - `Successes`: only when the exit code is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WhenPolicy {
    #[default]
    Always,
    Failures,
    Successes,
}

impl WhenPolicy {
    /// The single gating rule applied by the router.
    pub fn allows(self, exit_code: i32) -> bool {
        match self {
            WhenPolicy::Always => true,
            WhenPolicy::Failures => exit_code != 0,
            WhenPolicy::Successes => exit_code == 0,
        }
    }
}

impl FromStr for WhenPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(WhenPolicy::Always),
            "failures" => Ok(WhenPolicy::Failures),
            "successes" => Ok(WhenPolicy::Successes),
            other => Err(format!(
                "invalid when: {other} (expected \"always\", \"failures\" or \"successes\")"
            )),
        }
    }
}

impl fmt::Display for WhenPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WhenPolicy::Always => "always",
            WhenPolicy::Failures => "failures",
            WhenPolicy::Successes => "successes",
        };
        f.write_str(s)
    }
}

/// Record layout used by the `logfile` behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Fixed-field text block per run.
    Human,
    /// One JSON object per line.
    Machine,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(LogFormat::Human),
            "machine" => Ok(LogFormat::Machine),
            other => Err(format!(
                "invalid format: {other} (expected \"human\" or \"machine\")"
            )),
        }
    }
}

/// HTTP verb used by the `web` behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum HttpMethod {
    #[default]
    #[serde(rename = "POST")]
    Post,
    #[serde(rename = "PUT")]
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            other => Err(format!(
                "invalid method: {other} (expected \"POST\" or \"PUT\")"
            )),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_policy_gates_on_exit_code() {
        assert!(WhenPolicy::Always.allows(0));
        assert!(WhenPolicy::Always.allows(3));
        assert!(WhenPolicy::Failures.allows(1));
        assert!(WhenPolicy::Failures.allows(-1));
        assert!(!WhenPolicy::Failures.allows(0));
        assert!(WhenPolicy::Successes.allows(0));
        assert!(!WhenPolicy::Successes.allows(127));
    }

    #[test]
    fn method_parsing_is_case_sensitive() {
        assert_eq!("PUT".parse::<HttpMethod>(), Ok(HttpMethod::Put));
        assert!("put".parse::<HttpMethod>().is_err());
        assert_eq!(HttpMethod::default(), HttpMethod::Post);
    }
}
