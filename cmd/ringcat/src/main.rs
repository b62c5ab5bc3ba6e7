//! ringcat - pipe bursts of bytes through a ring buffer to stdout.

mod config;
mod pump;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Overrides, PipeConfig};

/// Pipe bursts of bytes through a blocking ring buffer to stdout.
///
/// The main thread writes a burst of `--burst` bytes every cycle while a drain
/// thread copies the buffer to stdout. Bursts larger than `--capacity` block
/// until the drain thread catches up.
///
/// Diagnostics go to stderr; stdout carries only the payload.
#[derive(Parser, Debug)]
#[command(name = "ringcat")]
#[command(about = "Pipe bursts of bytes through a blocking ring buffer to stdout")]
#[command(version)]
struct Args {
    /// Config file (YAML); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ring buffer capacity in bytes (default 4096)
    #[arg(long)]
    capacity: Option<usize>,

    /// Bytes written per burst (default 4097)
    #[arg(short, long)]
    burst: Option<usize>,

    /// Character repeated to fill each burst (default 'a')
    #[arg(long)]
    fill: Option<char>,

    /// Milliseconds to sleep before each burst (default 1000)
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Milliseconds to sleep after each burst (default 5000)
    #[arg(long)]
    pause_ms: Option<u64>,

    /// Number of bursts (default: run until killed)
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Log a buffer dump after every burst
    #[arg(long)]
    dump: bool,

    /// Verbose output (buffer trace events with -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            capacity: self.capacity,
            burst: self.burst,
            fill: self.fill,
            delay_ms: self.delay_ms,
            pause_ms: self.pause_ms,
            count: self.count,
            dump: self.dump,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "debug,ringpipe_buffer=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let cfg = match &args.config {
        Some(path) => PipeConfig::load(path)?,
        None => PipeConfig::default(),
    }
    .apply(&args.overrides());
    cfg.validate()?;

    tracing::info!(
        capacity = cfg.capacity,
        burst = cfg.burst,
        count = ?cfg.count,
        "starting ringcat"
    );

    let summary = pump::run(&cfg, io::stdout())?;

    tracing::info!(
        bursts = summary.bursts,
        written = summary.written,
        drained = summary.drained,
        "done"
    );
    Ok(())
}
