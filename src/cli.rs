// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;
use std::sync::LazyLock;

use clap::{Parser, ValueEnum};
use regex::Regex;

/// Command-line arguments for `gaze`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "gaze",
    about = "Run a command, capture how it went, and report it to configured behaviours.",
    long_about = None,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `$HOME/.config/gaze.toml`, which may be absent.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Don't forward command output or run behaviours; print the JSON report
    /// on stdout instead.
    #[arg(long, conflicts_with = "debug")]
    pub json: bool,

    /// Print debug logs (on stderr).
    #[arg(long)]
    pub debug: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`, `GAZE_LOG` or silence is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Override the name derived from the command line.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Comma-separated tags added to the report.
    #[arg(long, value_name = "TAGS")]
    pub extra_tags: Option<String>,

    /// Print an example config file and exit.
    #[arg(long)]
    pub example_config: bool,

    /// Print the version and exit.
    #[arg(short = 'V', long)]
    pub version: bool,

    /// The command to run, followed by its arguments.
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

static NAME_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w[\w\-\.]*$").expect("name pattern is valid"));

/// Build a report name from the word-like parts of the command line.
///
/// `["tar", "-czf", "backup.tgz", "/home"]` becomes `"tar.backup.tgz"`.
/// Returns `None` when no part qualifies.
pub fn derive_name(command: &[String]) -> Option<String> {
    let parts: Vec<&str> = command
        .iter()
        .map(String::as_str)
        .filter(|a| NAME_PART.is_match(a))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

/// Split `--extra-tags`, trimming and dropping empty entries.
pub fn parse_extra_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn name_keeps_word_like_parts() {
        assert_eq!(
            derive_name(&argv(&["tar", "-czf", "backup.tgz", "/home"])),
            Some("tar.backup.tgz".to_string())
        );
        assert_eq!(derive_name(&argv(&["/usr/bin/env", "--", "-x"])), None);
    }

    #[test]
    fn extra_tags_are_trimmed() {
        assert_eq!(
            parse_extra_tags(Some(" a, ,b ,")),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(parse_extra_tags(None).is_empty());
    }

    #[test]
    fn command_keeps_its_own_flags() {
        let args = CliArgs::try_parse_from(["gaze", "--name", "x", "ls", "-la", "--color"]).unwrap();
        assert_eq!(args.name.as_deref(), Some("x"));
        assert_eq!(args.command, argv(&["ls", "-la", "--color"]));
    }

    #[test]
    fn json_and_debug_conflict() {
        assert!(CliArgs::try_parse_from(["gaze", "--json", "--debug", "true"]).is_err());
    }
}
