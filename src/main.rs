//! Fiber Reconciler - replay CLI

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fiber_reconciler::replay::{run_script, Script};
use fiber_reconciler::util::config::load_default_config;
use fiber_reconciler::util::logger::{self, LogLevel};
use fiber_reconciler::{NAME, VERSION};

/// Replay an update-queue script and print every render pass
#[derive(Parser, Debug)]
#[command(name = "fiber-replay")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    /// Script to replay (JSON)
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Configuration file (defaults to fiber-reconciler.toml or $FIBER_RECONCILER_CONFIG)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_default_config(args.config.as_deref()).context("Failed to load config")?;

    match args.log_level.as_deref() {
        Some(name) => {
            let level = LogLevel::parse(name)
                .with_context(|| format!("Unknown log level: {}", name))?;
            logger::init_with_level(level);
        }
        None => logger::init_from_config(&config.diagnostics),
    }

    let script = Script::load(&args.script)
        .with_context(|| format!("Failed to read script: {}", args.script.display()))?;
    let reports = run_script(&script, &config)
        .with_context(|| format!("Failed to replay: {}", args.script.display()))?;

    for report in &reports {
        println!("{}", report);
    }
    Ok(())
}
