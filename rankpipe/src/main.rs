/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use rankpipe::config::{PipelineConfig, SerialTarget};
use rankpipe::hal::sim::{TracedLine, WriterSerial};
use rankpipe::hal::SerialPort;
use rankpipe::pipeline::{Hardware, Pipeline};
use rankpipe::tasks::RandomSource;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Sample-rank pipeline (host build).
///
/// Example:
///   rankpipe -c config/pipeline.yaml --seed 42 --serial ranks.log
#[derive(Debug, Parser)]
#[command(
    name = "rankpipe",
    about = "Periodic sample-rank pipeline over bounded blocking queues",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML pipeline configuration.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Fixed sampler seed (overrides the configuration file).
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Serial output: `stdout`, `stderr` or a file path (overrides the
    /// configuration file).
    #[arg(long = "serial")]
    serial: Option<SerialTarget>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    // Logs go to stderr so stdout carries only the serial channel.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    info!("rankpipe starting up...");

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load_from_file(path)?,
        None => {
            warn!("No configuration file provided, using default timing");
            PipelineConfig::default()
        }
    };
    if let Some(seed) = cli.seed {
        config.sampler.seed = Some(seed);
    }
    if let Some(target) = cli.serial {
        config.serial.output = target;
    }

    let source = match config.sampler.seed {
        Some(seed) => RandomSource::seeded(seed, config.sampler.upper_bound),
        None => RandomSource::from_clock(config.sampler.upper_bound),
    };

    info!(
        blink_on_ms = config.blinker.on_ms,
        blink_period_ms = config.blinker.period_ms,
        sampler_period_ms = config.sampler.period_ms,
        ranker_period_ms = config.ranker.period_ms,
        reporter_period_ms = config.reporter.period_ms,
        upper_bound = config.sampler.upper_bound,
        seed = source.seed(),
        serial = %config.serial.output,
        "Configuration"
    );

    let serial = open_serial(&config.serial.output)?;
    let hardware = Hardware {
        out0: TracedLine::new("OUT0"),
        rank_lines: [
            TracedLine::new("L0"),
            TracedLine::new("L1"),
            TracedLine::new("L2"),
        ],
        serial,
    };

    let handle = Pipeline::start(&config, hardware, source)?;
    handle.wait()?;
    Ok(())
}

fn open_serial(target: &SerialTarget) -> Result<Box<dyn SerialPort>> {
    Ok(match target {
        SerialTarget::Stdout => Box::new(WriterSerial::new(io::stdout())),
        SerialTarget::Stderr => Box::new(WriterSerial::new(io::stderr())),
        SerialTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot open serial output: {}", path.display()))?;
            Box::new(WriterSerial::new(file))
        }
    })
}
