//! voxwalk - deterministic character movement on a voxel grid
//!
//! Headless runner: builds a demo terrain, spawns a character and drives it
//! from a scripted input file, optionally writing a JSONL tick trace.

mod config;
mod headless;
mod scripted_input;
mod terrain;

use anyhow::Result;
use clap::Parser;
use config::SimConfig;
use headless::HeadlessConfig;
use std::path::PathBuf;
use tracing::info;
use voxwalk_core::DEFAULT_SPAWN_SEED;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless voxel character movement runner", long_about = None)]
struct Args {
    /// TOML configuration file (defaults to config/voxwalk.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON script of held keys, one step per tick range
    #[arg(long)]
    script: Option<PathBuf>,

    /// Number of ticks to run (overrides [run] ticks)
    #[arg(long)]
    ticks: Option<u64>,

    /// Spawn seed
    #[arg(long, default_value_t = DEFAULT_SPAWN_SEED)]
    seed: u64,

    /// Write one JSON line per tick to this path
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    // WARN by default, RUST_LOG overrides. Logs go to stderr; stdout carries the run summary.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting voxwalk v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let mut sim = match args.config.as_deref() {
        Some(path) => SimConfig::load_from_path(path),
        None => SimConfig::load(),
    };
    if let Some(ticks) = args.ticks {
        sim.run.ticks = ticks;
    }

    if let Some(path) = args.save_config.as_deref() {
        sim.save_to_path(path)?;
        info!(path = %path.display(), "configuration written");
        return Ok(());
    }

    let summary = headless::run(HeadlessConfig {
        sim,
        scripted_input: args.script,
        trace: args.trace,
        spawn_seed: args.seed,
    })?;
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
