//! Steering rules.
//!
//! Every rule reads the flock as it is at the moment of the call and returns a
//! velocity correction for the boid in slot `index`. The boid itself is
//! excluded from every neighbor sum by slot, never by value.

use crate::boid::{Boid, Bounds};
use crate::config::FlockConfig;
use crate::vector::Vector2D;

/// Steers toward the mean position of every other boid.
///
/// Requires at least two boids; flock constructors reject smaller flocks.
pub fn cohesion(boids: &[Boid], index: usize, config: &FlockConfig) -> Vector2D {
    debug_assert!(boids.len() >= 2, "cohesion needs at least two boids");

    let boid = &boids[index];
    let mut center = Vector2D::zero();
    for (slot, other) in boids.iter().enumerate() {
        if slot != index {
            center += other.position;
        }
    }
    center = center / (boids.len() - 1) as f32;

    (center - boid.position) / config.cohesion_divisor
}

/// Pushes away from every boid strictly closer than the separation radius.
///
/// The raw offsets are summed without normalization, so closer and more
/// numerous neighbors push harder.
pub fn separation(boids: &[Boid], index: usize, config: &FlockConfig) -> Vector2D {
    let boid = &boids[index];
    let mut displacement = Vector2D::zero();
    for (slot, other) in boids.iter().enumerate() {
        if slot == index {
            continue;
        }
        let offset = boid.position - other.position;
        if offset.magnitude() < config.separation_radius {
            displacement += offset;
        }
    }

    displacement
}

/// Steers toward the mean velocity of every other boid.
///
/// Requires at least two boids, like [`cohesion`].
pub fn alignment(boids: &[Boid], index: usize, config: &FlockConfig) -> Vector2D {
    debug_assert!(boids.len() >= 2, "alignment needs at least two boids");

    let boid = &boids[index];
    let mut perceived = Vector2D::zero();
    for (slot, other) in boids.iter().enumerate() {
        if slot != index {
            perceived += other.velocity;
        }
    }
    perceived = perceived / (boids.len() - 1) as f32;

    (perceived - boid.velocity) / config.alignment_divisor
}

/// Fixed per-axis nudge back toward the bounds.
///
/// Each axis is checked on its own against the open interval, so a boid
/// sitting exactly on an edge gets no correction on that axis.
pub fn bounds_avoidance(
    boids: &[Boid],
    index: usize,
    bounds: &Bounds,
    config: &FlockConfig,
) -> Vector2D {
    let position = boids[index].position;
    let (min, max) = (bounds.min(), bounds.max());

    Vector2D::new(
        axis_correction(position.x, min.x, max.x, config.bounds_correction),
        axis_correction(position.y, min.y, max.y, config.bounds_correction),
    )
}

fn axis_correction(value: f32, min: f32, max: f32, correction: f32) -> f32 {
    if value < min {
        correction
    } else if value > max {
        -correction
    } else {
        0.0
    }
}

/// Clamps a velocity to `speed_limit`, keeping its direction.
pub fn limit_velocity(velocity: Vector2D, speed_limit: f32) -> Vector2D {
    velocity.limit(speed_limit)
}

/// Sum of the four rules for the boid in slot `index`.
pub fn steering(boids: &[Boid], index: usize, bounds: &Bounds, config: &FlockConfig) -> Vector2D {
    let v1 = cohesion(boids, index, config);
    let v2 = separation(boids, index, config);
    let v3 = alignment(boids, index, config);
    let v4 = bounds_avoidance(boids, index, bounds, config);

    v1 + v2 + v3 + v4
}
