use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use readcap::sampling::{DEFAULT_COVERAGE, DEFAULT_READ_LENGTH, DEFAULT_WINDOW_SIZE};
use readcap::{
    downsample, open_bam_sink, BamSource, CoverageProfile, CoverageTarget, DownsampleConfig,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "readcap",
    about = "Downsample reads at regions with too high coverage",
    long_about = "Caps the coverage of a BAM file by reservoir sampling reads per window.\n\n\
                  The input BAM must be sorted by coordinate; the output is not sorted anymore."
)]
struct Cli {
    /// Seed for the random generator (default: derived from the clock).
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// Input BAM file (`-` or `stdin` for standard input).
    #[arg(short, long, default_value = "stdin")]
    input: String,
    /// Output BAM file (`-` or `stdout` for standard output).
    #[arg(short, long, default_value = "stdout")]
    output: String,
    /// Read length used to turn coverage into a read count.
    #[arg(short = 'l', long = "length", default_value_t = DEFAULT_READ_LENGTH)]
    read_length: u32,
    /// Size of the coverage windows.
    #[arg(short, long = "window", default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: u32,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Cap coverage at a constant target.
    Cap {
        #[command(flatten)]
        stream: StreamArgs,
        /// Maximum desired output coverage.
        #[arg(short, long, default_value_t = DEFAULT_COVERAGE)]
        coverage: u32,
    },
    /// Cap coverage following a per-position target profile.
    Varcap {
        #[command(flatten)]
        stream: StreamArgs,
        /// Tab-separated profile: chromosome, start, end, desired coverage.
        #[arg(short, long)]
        coverage: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(clock_seed);

    match cli.command {
        Commands::Cap { stream, coverage } => {
            run_downsample(stream, CoverageTarget::Fixed(coverage), seed)?
        }
        Commands::Varcap { stream, coverage } => {
            let profile = CoverageProfile::from_path(&coverage).with_context(|| {
                format!("failed to load coverage profile {}", coverage.display())
            })?;
            run_downsample(stream, CoverageTarget::Profile(Arc::new(profile)), seed)?
        }
    }

    Ok(())
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

fn run_downsample(stream: StreamArgs, target: CoverageTarget, seed: u64) -> Result<()> {
    let config = DownsampleConfig::new(stream.read_length, stream.window_size, target, seed)
        .context("invalid downsampling parameters")?;
    info!(
        seed,
        read_length = config.read_length,
        window_size = config.window_size,
        "starting downsampling"
    );

    let mut source = BamSource::open(&stream.input)
        .with_context(|| format!("failed to open input BAM {}", stream.input))?;
    let mut sink = open_bam_sink(&stream.output, source.header())
        .with_context(|| format!("failed to open output BAM {}", stream.output))?;

    let summary = downsample(&mut source, &mut sink, config)
        .with_context(|| format!("downsampling {} failed", stream.input))?;

    info!(
        written = summary.records_written,
        read = summary.records_read,
        "wrote {}",
        stream.output
    );
    Ok(())
}
