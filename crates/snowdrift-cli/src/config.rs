use core::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use snowdrift::{DEFAULT_EPOCH, NodeId, SystemClock, TimeSource};

/// Command-line configuration for the `snowdrift` binary.
///
/// The node identity and epoch can come from flags, environment variables or
/// a `.env` file. Every running generator must be given a distinct
/// `(partition id, worker id)` pair; nothing here coordinates that.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowdrift",
    version,
    about = "Generate and decode time-ordered 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Partition (data-center / region) id, 0 through 31.
    ///
    /// Environment variable: `PARTITION_ID`
    #[arg(
        long,
        env = "PARTITION_ID",
        default_value_t = 1,
        allow_negative_numbers = true,
        global = true
    )]
    pub partition_id: i64,

    /// Worker id within the partition, 0 through 31.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(
        long,
        env = "WORKER_ID",
        default_value_t = 1,
        allow_negative_numbers = true,
        global = true
    )]
    pub worker_id: i64,

    /// Epoch in milliseconds since 1970-01-01 UTC. IDs store the time elapsed
    /// since this instant, so every producer and consumer must agree on it.
    ///
    /// Environment variable: `EPOCH_MILLIS`
    #[arg(
        long,
        env = "EPOCH_MILLIS",
        default_value_t = DEFAULT_EPOCH.as_millis() as u64,
        global = true
    )]
    pub epoch_millis: u64,

    /// Log output format, written to stderr.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        global = true
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print newly generated IDs, one per line, in ascending order.
    Generate {
        /// Number of IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Number of threads sharing one generator.
        #[arg(short, long, default_value_t = 1)]
        threads: usize,

        /// Generator implementation.
        #[arg(long, value_enum, default_value_t = Strategy::Lock)]
        strategy: Strategy,

        /// Use a monotonic clock anchored at startup instead of the system
        /// wall clock. Backward clock steps are then never observed.
        #[arg(long, default_value_t = false)]
        monotonic: bool,
    },
    /// Print the fields encoded in one or more IDs.
    Decode {
        /// Decimal IDs to decode.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Emit one JSON object per line instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Mutex-guarded generator.
    Lock,
    /// Compare-and-swap generator.
    Atomic,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub node: NodeId,
    pub epoch: Duration,
    pub log_format: LogFormat,
    pub command: Command,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let node = NodeId::new(args.partition_id, args.worker_id)
            .context("PARTITION_ID and WORKER_ID must each be in 0..=31")?;

        if let Command::Generate { count, threads, .. } = &args.command {
            if *threads == 0 {
                bail!("--threads must be greater than 0");
            }
            if *count == 0 {
                bail!("--count must be greater than 0");
            }
            // The epoch only matters when minting new IDs.
            let now = SystemClock.current_millis();
            if args.epoch_millis > now {
                bail!(
                    "EPOCH_MILLIS ({}) is in the future (now = {})",
                    args.epoch_millis,
                    now
                );
            }
        }

        Ok(Self {
            node,
            epoch: Duration::from_millis(args.epoch_millis),
            log_format: args.log_format,
            command: args.command,
        })
    }
}
