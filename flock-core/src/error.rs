use thiserror::Error;

/// Reasons a flock cannot be set up.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("flock needs at least 2 boids, got {count}")]
    TooFewBoids { count: usize },

    #[error("flock capacity of {capacity} boids exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("bounds must have a finite center and extent")]
    NonFiniteBounds,

    #[error("bounds extent must not be negative, got ({x}, {y})")]
    NegativeExtent { x: f32, y: f32 },

    #[error("initial position of boid {index} is not finite")]
    NonFinitePosition { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlockError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),

    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f32),
}

pub type FlockResult<T> = Result<T, FlockError>;
