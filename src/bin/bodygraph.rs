//! bodygraph CLI
//!
//! Thin wrapper over the library: parse arguments, pick an ephemeris
//! source, compute, render. All chart logic lives in `bodygraph::core`.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use bodygraph::core::bodygraph::gate_center;
use bodygraph::core::{gate_name, BirthData, GateLineResolver};
use bodygraph::formats::{self, OutputFormat};
use bodygraph::{
    compute_chart, ChartConfig, EphemerisAdapter, LinearEphemeris, TabulatedEphemeris,
};

/// Human Design bodygraph charts from a birth instant and place.
#[derive(Parser, Debug)]
#[command(name = "bodygraph")]
#[command(version = bodygraph::VERSION)]
#[command(about = "Compute Human Design bodygraph charts")]
#[command(after_help = "EXAMPLES:
  # Chart from a precomputed ephemeris table
  bodygraph chart --birth 1991-08-13T13:31:00Z --lat 12.9716 --lon 77.5946 --ephemeris eph.json

  # Quick demo with a mean-motion Sun
  bodygraph chart --birth 1991-08-13T13:31:00Z --lat 12.9716 --lon 77.5946 --linear-sun 140.0935

  # Gate and line for one longitude
  bodygraph gate 302.5
")]
struct Cli {
    /// Debug logging to stderr (overrides RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a full chart
    Chart(ChartArgs),

    /// Resolve one ecliptic longitude to gate and line
    Gate {
        /// Longitude in degrees (any finite value)
        #[arg(allow_negative_numbers = true)]
        longitude: f64,

        /// Rotation applied before resolution
        #[arg(long = "wheel-offset", default_value_t = 0.0, allow_negative_numbers = true)]
        wheel_offset: f64,
    },
}

#[derive(clap::Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["ephemeris", "linear_sun"])))]
struct ChartArgs {
    /// Birth instant, RFC 3339 with explicit offset
    #[arg(long = "birth", value_name = "INSTANT")]
    birth: String,

    /// Latitude in decimal degrees
    #[arg(long = "lat", allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in decimal degrees
    #[arg(long = "lon", allow_negative_numbers = true)]
    lon: f64,

    /// JSON ephemeris table
    #[arg(long = "ephemeris", value_name = "FILE")]
    ephemeris: Option<PathBuf>,

    /// Mean-motion ephemeris with every body at this longitude at birth
    #[arg(long = "linear-sun", value_name = "DEG", allow_negative_numbers = true)]
    linear_sun: Option<f64>,

    /// Config file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    format: FormatArg,

    /// Wall-clock budget in milliseconds (overrides config)
    #[arg(long = "timeout-ms", value_name = "MS")]
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum FormatArg {
    #[default]
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("bodygraph=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bodygraph=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_chart(args: ChartArgs) -> Result<()> {
    let birth = BirthData::parse(&args.birth, args.lat, args.lon)?;

    let mut config = ChartConfig::discover(args.config.as_deref()).context("loading config")?;
    if let Some(ms) = args.timeout_ms {
        config.timeout_ms = Some(ms);
    }

    let adapter: Box<dyn EphemerisAdapter> = match (&args.ephemeris, args.linear_sun) {
        (Some(path), _) => Box::new(TabulatedEphemeris::load_from_file(path)?),
        (None, Some(sun)) => Box::new(LinearEphemeris::conjunct(birth.instant, sun)),
        (None, None) => bail!("an ephemeris source is required (--ephemeris or --linear-sun)"),
    };

    let cancel = config.cancellation();
    let chart = compute_chart(birth.instant, birth.location, adapter.as_ref(), &config, &cancel)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    formats::write_chart(&chart, args.format.into(), &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_gate(longitude: f64, wheel_offset: f64) -> Result<()> {
    if !longitude.is_finite() || !wheel_offset.is_finite() {
        bail!("longitude and wheel offset must be finite");
    }
    let resolver = GateLineResolver::with_wheel_offset(wheel_offset);
    let (gate, line) = resolver.resolve_degrees(longitude);
    let center = gate_center(gate).map(|c| c.name()).unwrap_or("?");
    println!(
        "{}.{}  {}  ({})",
        gate,
        line,
        gate_name(gate).unwrap_or(""),
        center
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Chart(args) => run_chart(args),
        Command::Gate {
            longitude,
            wheel_offset,
        } => run_gate(longitude, wheel_offset),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
