use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_runner::{load_settings, FlockRunner, RunOptions};
use flock_shared::{FlockSettings, UpdatePolicySetting};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Sequential,
    Snapshot,
}

impl From<Policy> for UpdatePolicySetting {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Sequential => UpdatePolicySetting::Sequential,
            Policy::Snapshot => UpdatePolicySetting::Snapshot,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flock runner", long_about = None)]
struct Args {
    /// JSON settings file; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of boids (at least 2)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Seed for initial positions
    #[arg(short, long)]
    seed: Option<u64>,

    /// Whether later boids in a tick see earlier boids' new state
    #[arg(short, long, value_enum)]
    policy: Option<Policy>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seconds advanced per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Write a snapshot every N ticks
    #[arg(long, default_value_t = 1)]
    snapshot_every: u64,

    /// Snapshot output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pace ticks to wall-clock time
    #[arg(long)]
    realtime: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> Result<FlockSettings> {
        let mut settings = match &self.config {
            Some(path) => load_settings(path)?,
            None => FlockSettings::default(),
        };

        if let Some(count) = self.count {
            settings.count = count;
        }
        if let Some(seed) = self.seed {
            settings.seed = Some(seed);
        }
        if let Some(policy) = self.policy {
            settings.update_policy = policy.into();
        }

        Ok(settings)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Flock runner starting...");

    let settings = args.settings()?;
    log::info!(
        "Running {} frames of {}s with {} boids",
        args.frames,
        args.dt,
        settings.count
    );

    let mut runner = FlockRunner::from_settings(&settings)?;

    let options = RunOptions {
        frames: args.frames,
        delta_time: args.dt,
        snapshot_every: args.snapshot_every,
        realtime: args.realtime,
    };

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let summary = runner.run(&options, &mut out).context("Run failed")?;

    log::info!(
        "Done: {} ticks, {:.2}s simulated, {} snapshots, centroid ({:.3}, {:.3}), max speed {:.3}",
        summary.ticks,
        summary.elapsed,
        summary.snapshots,
        summary.centroid.x,
        summary.centroid.y,
        summary.max_speed
    );

    Ok(())
}
