#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, Command, Config};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry(config.log_format)?;
    log_startup_info(&config);

    let mut out = std::io::BufWriter::new(std::io::stdout().lock());
    match config.command {
        Command::Generate {
            count,
            threads,
            strategy,
            monotonic,
        } => {
            let ids = commands::generate(
                config.node,
                config.epoch,
                count,
                threads,
                strategy,
                monotonic,
            )?;
            commands::write_ids(&mut out, &ids)?;
            tracing::info!(generated = ids.len(), "done");
        }
        Command::Decode { ref ids, json } => {
            let decoded = commands::decode(ids, config.epoch)?;
            commands::write_decoded(&mut out, &decoded, json)?;
        }
    }

    Ok(())
}

fn log_startup_info(config: &Config) {
    if cfg!(debug_assertions) {
        tracing::debug!("Starting snowdrift with full config: {:#?}", config);
    } else {
        tracing::debug!(node = %config.node, "Starting snowdrift");
    }
}
