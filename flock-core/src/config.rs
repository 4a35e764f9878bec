use crate::error::{ConfigurationError, FlockResult};

/// How a tick exposes already-updated boids to the ones that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Each boid is moved as soon as its forces are known, so boid `i + 1`
    /// steers against the new state of boids `0..=i`. Results depend on
    /// slot order.
    #[default]
    Sequential,
    /// Forces for every boid are computed against the pre-tick state, then
    /// applied together. Results do not depend on slot order.
    Snapshot,
}

/// Tuning constants for the simulation, fixed once a flock is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockConfig {
    /// Maximum velocity magnitude after every tick.
    pub speed_limit: f32,
    /// Offset to the perceived center is divided by this.
    pub cohesion_divisor: f32,
    /// Offset to the perceived velocity is divided by this.
    pub alignment_divisor: f32,
    /// Neighbors strictly closer than this push the boid away.
    pub separation_radius: f32,
    /// Per-axis nudge applied when a boid is outside the bounds.
    pub bounds_correction: f32,
    pub update_policy: UpdatePolicy,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            speed_limit: 5.0,
            cohesion_divisor: 50.0,
            alignment_divisor: 16.0,
            separation_radius: 0.4,
            bounds_correction: 2.0,
            update_policy: UpdatePolicy::Sequential,
        }
    }
}

impl FlockConfig {
    pub fn with_speed_limit(mut self, speed_limit: f32) -> Self {
        self.speed_limit = speed_limit;
        self
    }

    pub fn with_cohesion_divisor(mut self, divisor: f32) -> Self {
        self.cohesion_divisor = divisor;
        self
    }

    pub fn with_alignment_divisor(mut self, divisor: f32) -> Self {
        self.alignment_divisor = divisor;
        self
    }

    pub fn with_separation_radius(mut self, radius: f32) -> Self {
        self.separation_radius = radius;
        self
    }

    pub fn with_bounds_correction(mut self, correction: f32) -> Self {
        self.bounds_correction = correction;
        self
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = policy;
        self
    }

    pub fn validate(&self) -> FlockResult<()> {
        check("speed_limit", self.speed_limit, |v| v >= 0.0)?;
        check("cohesion_divisor", self.cohesion_divisor, |v| v > 0.0)?;
        check("alignment_divisor", self.alignment_divisor, |v| v > 0.0)?;
        check("separation_radius", self.separation_radius, |v| v >= 0.0)?;
        check("bounds_correction", self.bounds_correction, |v| v >= 0.0)?;
        Ok(())
    }
}

fn check(field: &'static str, value: f32, in_range: impl Fn(f32) -> bool) -> FlockResult<()> {
    if value.is_finite() && in_range(value) {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange { field, value }.into())
    }
}
