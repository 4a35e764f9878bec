use crate::error::{ConfigurationError, FlockResult};
use crate::vector::Vector2D;

#[cfg(feature = "std")]
use rand::Rng;

/// A single boid entity
///
/// Boids carry no identity of their own: two boids may share a position and
/// velocity and are still distinct because they occupy different slots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boid {
    pub position: Vector2D,
    pub velocity: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// A boid at rest at `position`.
    pub fn at(position: Vector2D) -> Self {
        Self::new(position, Vector2D::zero())
    }

    /// Adds `steering` to the velocity, clamps it to `speed_limit` and moves
    /// the boid by `velocity * delta_time`.
    pub fn update(&mut self, steering: Vector2D, speed_limit: f32, delta_time: f32) {
        self.velocity += steering;
        self.velocity = crate::rules::limit_velocity(self.velocity, speed_limit);
        self.position += self.velocity * delta_time;
    }
}

/// Axis-aligned containment region described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vector2D,
    pub half_extent: Vector2D,
}

impl Bounds {
    pub fn new(center: Vector2D, half_extent: Vector2D) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    pub fn min(&self) -> Vector2D {
        self.center - self.half_extent
    }

    pub fn max(&self) -> Vector2D {
        self.center + self.half_extent
    }

    /// Closed-interval containment test; points on an edge are inside.
    pub fn contains(&self, point: Vector2D) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Zero extent along either axis. Legal, but bounds avoidance then fires
    /// for almost every position on that axis.
    pub fn is_degenerate(&self) -> bool {
        self.half_extent.x == 0.0 || self.half_extent.y == 0.0
    }

    pub fn validate(&self) -> FlockResult<()> {
        // Edges and the full span must be representable too, or sampling
        // and the edge tests overflow.
        if !self.center.is_finite()
            || !self.half_extent.is_finite()
            || !(self.half_extent * 2.0).is_finite()
            || !self.min().is_finite()
            || !self.max().is_finite()
        {
            return Err(ConfigurationError::NonFiniteBounds.into());
        }
        if self.half_extent.x < 0.0 || self.half_extent.y < 0.0 {
            return Err(ConfigurationError::NegativeExtent {
                x: self.half_extent.x,
                y: self.half_extent.y,
            }
            .into());
        }
        Ok(())
    }

    /// Uniformly samples a point inside the bounds.
    #[cfg(feature = "std")]
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector2D {
        let (ex, ey) = (self.half_extent.x, self.half_extent.y);
        Vector2D::new(
            self.center.x + rng.gen_range(-ex..=ex),
            self.center.y + rng.gen_range(-ey..=ey),
        )
    }
}
