//! Headless host for the flock core: builds a flock from settings, drives it
//! one tick per frame and streams frame snapshots as JSON lines.

use anyhow::{ensure, Context, Result};
use flock_core::{Bounds, FlockConfig, FlockSimulation, UpdatePolicy, Vector2D};
use flock_shared::{BoundsSettings, FlockSettings, FrameSnapshot, Position, UpdatePolicySetting};
use rand::{rngs::StdRng, SeedableRng};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

pub fn load_settings(path: &Path) -> Result<FlockSettings> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    FlockSettings::from_json(&json)
        .with_context(|| format!("Failed to parse settings in {}", path.display()))
}

pub fn bounds_from_settings(settings: &BoundsSettings) -> Bounds {
    Bounds::new(
        Vector2D::new(settings.center.x, settings.center.y),
        Vector2D::new(settings.half_extent.x, settings.half_extent.y),
    )
}

pub fn bounds_to_settings(bounds: &Bounds) -> BoundsSettings {
    BoundsSettings {
        center: Position::new(bounds.center.x, bounds.center.y),
        half_extent: Position::new(bounds.half_extent.x, bounds.half_extent.y),
    }
}

pub fn config_from_settings(settings: &FlockSettings) -> FlockConfig {
    let policy = match settings.update_policy {
        UpdatePolicySetting::Sequential => UpdatePolicy::Sequential,
        UpdatePolicySetting::Snapshot => UpdatePolicy::Snapshot,
    };

    FlockConfig::default()
        .with_speed_limit(settings.speed_limit)
        .with_cohesion_divisor(settings.cohesion_divisor)
        .with_alignment_divisor(settings.alignment_divisor)
        .with_separation_radius(settings.separation_radius)
        .with_bounds_correction(settings.bounds_correction)
        .with_update_policy(policy)
}

/// How a run is paced and recorded
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub frames: u64,
    pub delta_time: f32,
    /// Write a snapshot every this many ticks.
    pub snapshot_every: u64,
    /// Sleep so that each frame takes at least `delta_time` of wall time.
    pub realtime: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 600,
            delta_time: 1.0 / 60.0,
            snapshot_every: 1,
            realtime: false,
        }
    }
}

/// End-of-run statistics
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub snapshots: u64,
    pub centroid: Position,
    pub max_speed: f32,
}

pub struct FlockRunner {
    simulation: FlockSimulation,
    elapsed: f64,
}

impl FlockRunner {
    /// Places `settings.count` boids at random inside the configured bounds.
    pub fn from_settings(settings: &FlockSettings) -> Result<Self> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let simulation = FlockSimulation::random(
            bounds_from_settings(&settings.bounds),
            settings.count,
            config_from_settings(settings),
            &mut rng,
        )
        .context("Failed to initialize flock")?;

        log::info!(
            "Flock of {} boids ready (seed {}, {:?} updates)",
            simulation.len(),
            seed,
            simulation.config().update_policy
        );

        Ok(Self {
            simulation,
            elapsed: 0.0,
        })
    }

    pub fn simulation(&self) -> &FlockSimulation {
        &self.simulation
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.simulation.ticks(),
            elapsed: self.elapsed,
            bounds: bounds_to_settings(&self.simulation.bounds()),
            positions: self
                .simulation
                .positions()
                .map(|p| Position::new(p.x, p.y))
                .collect(),
        }
    }

    pub fn step(&mut self, delta_time: f32) -> Result<()> {
        self.simulation
            .tick(delta_time)
            .with_context(|| format!("Tick {} failed", self.simulation.ticks() + 1))?;
        self.elapsed += f64::from(delta_time);
        Ok(())
    }

    /// Runs `options.frames` ticks, writing the initial frame and then every
    /// `options.snapshot_every`-th frame to `out`.
    pub fn run<W: Write>(&mut self, options: &RunOptions, out: &mut W) -> Result<RunSummary> {
        ensure!(options.snapshot_every > 0, "snapshot interval must be at least 1");
        ensure!(
            options.delta_time.is_finite() && options.delta_time >= 0.0,
            "time step must be finite and non-negative, got {}",
            options.delta_time
        );

        let frame_budget = Duration::from_secs_f32(options.delta_time.max(0.0));
        let progress_every = (options.frames / 10).max(1);
        let mut snapshots = 0;

        self.write_snapshot(out)?;
        snapshots += 1;

        for frame in 1..=options.frames {
            let started = Instant::now();

            self.step(options.delta_time)?;

            if frame % options.snapshot_every == 0 {
                self.write_snapshot(out)?;
                snapshots += 1;
            }

            if frame % progress_every == 0 {
                let centroid = self.simulation.centroid();
                log::info!(
                    "Frame {}/{}: centroid ({:.3}, {:.3}), max speed {:.3}",
                    frame,
                    options.frames,
                    centroid.x,
                    centroid.y,
                    self.simulation.max_speed()
                );
            }

            if options.realtime {
                if let Some(rest) = frame_budget.checked_sub(started.elapsed()) {
                    std::thread::sleep(rest);
                }
            }
        }

        out.flush().context("Failed to flush snapshots")?;

        let centroid = self.simulation.centroid();
        Ok(RunSummary {
            ticks: self.simulation.ticks(),
            elapsed: self.elapsed,
            snapshots,
            centroid: Position::new(centroid.x, centroid.y),
            max_speed: self.simulation.max_speed(),
        })
    }

    fn write_snapshot<W: Write>(&self, out: &mut W) -> Result<()> {
        let line = self
            .snapshot()
            .to_json_line()
            .context("Failed to serialize snapshot")?;
        writeln!(out, "{}", line).context("Failed to write snapshot")?;
        Ok(())
    }
}
