#![cfg_attr(not(feature = "std"), no_std)]

//! Boid flocking core: four steering rules, a speed clamp and a tick that
//! integrates them for a fixed population inside soft rectangular bounds.

pub mod boid;
pub mod config;
pub mod error;
pub mod rules;
pub mod simulation;
pub mod vector;

pub use boid::{Boid, Bounds};
pub use config::{FlockConfig, UpdatePolicy};
pub use error::{ConfigurationError, FlockError, FlockResult};
pub use simulation::{FixedFlockSimulation, Simulation};
pub use vector::Vector2D;

#[cfg(feature = "std")]
pub use simulation::FlockSimulation;
