// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

mod config;
mod input;
mod output;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use sharkos_app::{init_logging, ConfigFile};
use sharkos_core::DynResult;
use sharkos_protocol::{decode, Payload};
use sharkos_signal_log::SignalLoggers;

use config::{InputSource, MonitorConfig};
use output::{render, LineHandler};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - SharkOS telemetry monitor");

#[derive(Debug, Default, Parser)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = PKG_DESCRIPTION,
)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
    /// Read from a serial port (e.g. /dev/ttyACM0)
    #[arg(short = 's', long = "serial", value_name = "PORT", conflicts_with = "file")]
    serial: Option<String>,
    /// Serial baud rate
    #[arg(short = 'b', long = "baud")]
    baud: Option<u32>,
    /// Read lines from a capture file
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: Option<String>,
    /// Decode a single payload, print it and exit
    #[arg(short = 'd', long = "decode", value_name = "PAYLOAD")]
    decode: Option<String>,
    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log-level")]
    log_level: Option<String>,
}

/// CLI flags take precedence over the config file.
fn apply_cli(cfg: &mut MonitorConfig, cli: &Cli) {
    if let Some(ref port) = cli.serial {
        cfg.input.source = InputSource::Serial;
        cfg.input.port = Some(port.clone());
    }
    if let Some(ref path) = cli.file {
        cfg.input.source = InputSource::File;
        cfg.input.path = Some(path.clone());
    }
    if let Some(baud) = cli.baud {
        cfg.input.baud = baud;
    }
    if let Some(ref level) = cli.log_level {
        cfg.general.log_level = Some(level.clone());
    }
}

fn decode_once(payload: &str) -> DynResult<()> {
    let decoded = decode(Payload::from(payload))?;
    println!("{}", render(&decoded));
    Ok(())
}

async fn run(cfg: &MonitorConfig) -> DynResult<()> {
    let sink = SignalLoggers::from_config(&cfg.signal_log)?;
    if sink.is_some() {
        info!("Recording signals under {}", cfg.signal_log.dir);
    }
    let mut handler = LineHandler::new(cfg.output.clone(), sink);
    let reader = input::open(&cfg.input).await?;

    let stdout = std::io::stdout();
    let lines = input::for_each_line(reader, |line| {
        if let Some(json) = handler.handle(line) {
            let mut out = stdout.lock();
            if writeln!(out, "{}", json).and_then(|_| out.flush()).is_err() {
                error!("stdout write failed");
            }
        }
    });

    tokio::select! {
        res = lines => {
            let count = res?;
            info!("Input closed after {} lines", count);
        }
        _ = signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
        }
    }

    let stats = handler.stats();
    info!(
        "Decoded {} status, {} radio, {} generic; {} empty, {} malformed",
        stats.status, stats.radio, stats.generic, stats.empty, stats.malformed
    );
    Ok(())
}

#[tokio::main]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", MonitorConfig::example_combined_toml());
        return Ok(());
    }

    let (mut cfg, config_path) = MonitorConfig::load(cli.config.as_deref())?;
    apply_cli(&mut cfg, &cli);
    cfg.validate()
        .map_err(|e| format!("Invalid monitor configuration: {}", e))?;

    init_logging(cfg.general.log_level.as_deref());

    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    if let Some(ref payload) = cli.decode {
        return decode_once(payload);
    }

    run(&cfg).await
}
