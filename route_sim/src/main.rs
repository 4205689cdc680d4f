//! # Route Simulator Binary
//!
//! Drives the route planner without hardware.
//!
//! # Usage
//!
//! ```bash
//! # Scripted single-axis run
//! route_sim run --config config/sim.toml
//!
//! # Multi-axis slew-and-track trace as JSON lines
//! route_sim track --config config/track.toml --format json
//!
//! # One path solve
//! route_sim solve --amax 2 --dist 10 --unknowns v2 total
//! ```

use std::io::{self, BufWriter, Write};
use std::path::{Path as FsPath, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

use route_planner::error::RouteStatus;
use route_planner::path::Path;
use route_planner::path::solver::{Unknown, Unknowns, find_path};
use route_planner::path::vmax::find_path_with_vmax;
use route_sim::config::{ConfigLoader, LogLevel, SimConfig, TrackConfig};
use route_sim::error::SimError;
use route_sim::script::run_script;
use route_sim::track::run_track;

/// Route Simulator - scripted axis runs, tracking traces and path solves
#[derive(Parser, Debug)]
#[command(name = "route_sim")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Simulated axis and tracking harness for the route planner")]
#[command(long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a command script against one simulated axis
    Run {
        #[arg(short, long, default_value = "config/sim.toml")]
        config: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Slew onto and track moving targets with several axes
    Track {
        #[arg(short, long, default_value = "config/track.toml")]
        config: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Solve a single path and report the distance error
    Solve(SolveArgs),
}

#[derive(clap::Args, Debug)]
struct SolveArgs {
    /// Ramp acceleration magnitude
    #[arg(long)]
    amax: f64,

    /// Cap |v2| (requires unknowns `v2` and `total` or `tail`)
    #[arg(long)]
    vmax: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    dist: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    vi: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    vf: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    v2: f64,

    #[arg(long, default_value_t = 0.0)]
    t2: f64,

    #[arg(long, default_value_t = 0.0)]
    t4: f64,

    #[arg(long, default_value_t = 0.0)]
    total: f64,

    /// The two quantities to solve for
    #[arg(long, value_enum, num_args = 2, required = true)]
    unknowns: Vec<UnknownArg>,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum UnknownArg {
    V2,
    Total,
    Cruise,
    Tail,
}

impl From<UnknownArg> for Unknown {
    fn from(arg: UnknownArg) -> Self {
        match arg {
            UnknownArg::V2 => Unknown::V2,
            UnknownArg::Total => Unknown::Total,
            UnknownArg::Cruise => Unknown::Cruise,
            UnknownArg::Tail => Unknown::Tail,
        }
    }
}

#[derive(Serialize)]
struct SolveReport {
    path: Path,
    status: RouteStatus,
    distance: f64,
    distance_error: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("route_sim failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: &Args) -> Result<(), SimError> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match &args.command {
        Command::Run { config, format } => {
            let config: SimConfig = load_config(args, config, |c: &SimConfig| c.shared.log_level)?;
            config.validate()?;
            info!("Route simulator v{} starting...", env!("CARGO_PKG_VERSION"));

            for status in run_script(&config)? {
                match format {
                    Format::Json => serde_json::to_writer(&mut out, &status)?,
                    Format::Text => write!(
                        out,
                        "{:.3} {:.6} {:.6} done={} hls={} lls={} home={}",
                        status.time,
                        status.position,
                        status.velocity,
                        u8::from(status.done),
                        u8::from(status.high_limit),
                        u8::from(status.low_limit),
                        u8::from(status.at_home),
                    )?,
                }
                writeln!(out)?;
            }
        }
        Command::Track { config, format } => {
            let config: TrackConfig =
                load_config(args, config, |c: &TrackConfig| c.shared.log_level)?;
            config.validate()?;
            info!("Route tracking harness v{} starting...", env!("CARGO_PKG_VERSION"));

            for record in run_track(&config)? {
                match format {
                    Format::Json => serde_json::to_writer(&mut out, &record)?,
                    Format::Text => {
                        write!(out, "{:.3}", record.time)?;
                        for s in &record.demand {
                            write!(out, " {:.9} {:.9}", s.position, s.velocity)?;
                        }
                        write!(out, " {:.3}", record.target_time)?;
                        for s in &record.target {
                            write!(out, " {:.9} {:.9}", s.position, s.velocity)?;
                        }
                        write!(out, " {} {}", u8::from(record.slewing), record.status)?;
                    }
                }
                writeln!(out)?;
            }
        }
        Command::Solve(solve) => {
            setup_tracing(args, None);
            let report = solve_path(solve)?;
            match solve.format {
                Format::Json => serde_json::to_writer_pretty(&mut out, &report)?,
                Format::Text => {
                    let p = &report.path;
                    writeln!(out, "dist {:.12} vi {:.12} vf {:.12} v2 {:.12}", p.dist, p.vi, p.vf, p.v2)?;
                    writeln!(
                        out,
                        "t1 {:.12} t2 {:.12} t3 {:.12} t4 {:.12} T {:.12}",
                        p.t1, p.t2, p.t3, p.t4, p.total
                    )?;
                    writeln!(out, "status         = {}", report.status)?;
                    writeln!(out, "distance       = {:.12}", report.distance)?;
                    write!(out, "distance error = {:.12}", report.distance_error)?;
                }
            }
            writeln!(out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn solve_path(args: &SolveArgs) -> Result<SolveReport, SimError> {
    let (a, b) = match args.unknowns.as_slice() {
        &[a, b] => (Unknown::from(a), Unknown::from(b)),
        _ => return Err(SimError::Usage("exactly two unknowns required".to_string())),
    };

    let mut path = Path {
        v2: args.v2,
        t2: args.t2,
        t4: args.t4,
        total: args.total,
        ..Path::new(args.dist, args.vi, args.vf)
    };

    let unknowns = Unknowns::pair(a, b)?;
    let status = match args.vmax {
        None => find_path(&mut path, args.amax, unknowns)?,
        Some(vmax) if unknowns.contains(Unknown::V2) => {
            // V2 pairs list V2 first.
            let (_, free) = unknowns.members();
            find_path_with_vmax(&mut path, args.amax, vmax, free)?
        }
        Some(_) => {
            return Err(SimError::Usage(
                "--vmax needs v2 as one of the unknowns".to_string(),
            ));
        }
    };

    let distance = path.displacement();
    Ok(SolveReport {
        path,
        status,
        distance,
        distance_error: distance - path.dist,
    })
}

/// Load a config file, then start tracing at the configured level.
///
/// Tracing is initialised even when loading fails so the error is logged.
fn load_config<T: ConfigLoader>(
    args: &Args,
    path: &FsPath,
    level: impl Fn(&T) -> LogLevel,
) -> Result<T, SimError> {
    let loaded = T::load(path);
    setup_tracing(args, loaded.as_ref().ok().map(level));
    Ok(loaded?)
}

/// Setup tracing subscriber based on CLI arguments and the config level.
fn setup_tracing(args: &Args, configured: Option<LogLevel>) {
    let filter = if args.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        let level = configured.unwrap_or_default();
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()))
    };

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}
