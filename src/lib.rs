// src/lib.rs

pub mod behaviour;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod observe;
pub mod report;
pub mod types;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::CommandFactory;
use tracing::{debug, info};

use crate::behaviour::{BehaviourRouter, RealSinkBackend};
use crate::cli::{CliArgs, derive_name, parse_extra_tags};
use crate::config::{EXAMPLE_CONFIG, load_for_run};
use crate::errors::GazeError;
use crate::exec::ProcessRunner;
use crate::fs::RealFileSystem;
use crate::observe::{SharedObserver, TracingObserver};

const BANNER: &str = r#"
      _______________
  ==c(___(o(______(_()
          \=\
           )=\
          //|\\
         //|| \\
        // ||  \\
"#;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the process runner
/// - JSON output (`--json`) or the behaviour router
pub async fn run(args: CliArgs) -> Result<()> {
    if args.version {
        println!("Version: {}", env!("CARGO_PKG_VERSION"));
        println!("{BANNER}");
        return Ok(());
    }

    if args.example_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    if args.command.is_empty() {
        CliArgs::command().print_help()?;
        return Ok(());
    }

    let observer: SharedObserver = Arc::new(TracingObserver);

    let cfg = load_for_run(&RealFileSystem, args.config.as_deref())
        .context("Failed to load config")?;
    debug!(behaviours = cfg.behaviours.len(), tags = ?cfg.tags, "config loaded");

    let mut tags = cfg.tags.clone();
    tags.extend(parse_extra_tags(args.extra_tags.as_deref()));

    let name = match args.name {
        Some(name) => name,
        None => derive_name(&args.command).ok_or_else(|| {
            anyhow!("Could not build command name from supplied args, please provide --name")
        })?,
    };
    info!(%name, "using command name");

    let runner = ProcessRunner::new(Arc::clone(&observer))
        .forward_output(!args.json)
        .with_tags(tags);

    let report = runner
        .run(&name, &args.command)
        .await
        .map_err(GazeError::from)?;

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let backend = RealSinkBackend::new()?.with_observer(Arc::clone(&observer));
    let router = BehaviourRouter::with_observer(backend, observer);
    let outcomes = router.dispatch(&report, &cfg.behaviours).await;
    debug!(?outcomes, "behaviours finished");

    Ok(())
}
