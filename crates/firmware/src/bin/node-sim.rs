//! Desktop simulator for the sensor display node
//!
//! Runs one wake cycle per telemetry file against a headless recording
//! surface and a directory-backed state store, logging every decision.
//!
//! ```text
//! RUST_LOG=debug node-sim --state-dir /tmp/node cycle1.json cycle2.json
//! ```
//!
//! A path of `-` stands for a failed fetch.

// Desktop tooling crate: printing a summary to stdout is the point.
#![allow(clippy::print_stdout)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use firmware::{NodeApp, NodeConfig};
use platform::mocks::{FixedWidthText, MockPower, MockSensor, RecordingSurface};
use platform::storage_local::LocalFileStorage;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "node-sim")]
#[command(about = "Replay telemetry through the display node's refresh pipeline", long_about = None)]
#[command(version)]
struct Cli {
    /// Telemetry JSON files, one per wake cycle (`-` simulates a failed fetch)
    #[arg(required = true)]
    telemetry: Vec<PathBuf>,

    /// JSON config file; every key is optional
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for persisted state (overrides the config file and NODE_STATE_DIR)
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Surface width in pixels
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Free heap reported to the sleep decision
    #[arg(long)]
    free_heap: Option<usize>,

    /// Simulate a failed local sensor
    #[arg(long)]
    sensor_failed: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => NodeConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => NodeConfig::default(),
    };

    let storage = match cli.state_dir.as_ref().or(config.state_dir.as_ref()) {
        Some(dir) => LocalFileStorage::new(dir),
        None => LocalFileStorage::from_env()
            .context("no state directory: pass --state-dir, set state_dir in the config or NODE_STATE_DIR")?,
    };

    let power = match cli.free_heap {
        Some(bytes) => MockPower::with_free_heap(bytes),
        None => MockPower::default(),
    };
    let sensor = if cli.sensor_failed {
        MockSensor::failed()
    } else {
        MockSensor::healthy()
    };

    let surface = RecordingSurface::new(cli.width, cli.height);
    let mut app = NodeApp::new(config, storage, surface, FixedWidthText, power).with_local_sensor(sensor);

    for (cycle, path) in cli.telemetry.iter().enumerate() {
        let body = if path.as_os_str() == "-" {
            None
        } else {
            Some(std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?)
        };

        let report = app.run_cycle(body.as_deref());
        let refresh = report
            .render
            .as_ref()
            .and_then(|r| r.refresh)
            .map_or("none", |m| m.name());
        let zones: Vec<&str> = report
            .render
            .as_ref()
            .map(|r| r.zones.iter().map(|z| z.name()).collect())
            .unwrap_or_default();
        println!(
            "cycle {}: {} valid={} refresh={} zones=[{}] sleep={}",
            cycle + 1,
            path.display(),
            report.telemetry_valid,
            refresh,
            zones.join(","),
            report.sleep.name(),
        );
    }

    app.shutdown();
    Ok(())
}
