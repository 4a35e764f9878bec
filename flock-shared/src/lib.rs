#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// A 2D point or extent in world units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Containment region as center plus half extents
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoundsSettings {
    pub center: Position,
    pub half_extent: Position,
}

impl Default for BoundsSettings {
    fn default() -> Self {
        Self {
            center: Position::new(0.0, 0.0),
            half_extent: Position::new(8.0, 5.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicySetting {
    #[default]
    Sequential,
    Snapshot,
}

/// Flock configuration as read from a settings file. Missing fields take
/// their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub count: usize,
    pub bounds: BoundsSettings,
    pub speed_limit: f32,
    pub cohesion_divisor: f32,
    pub alignment_divisor: f32,
    pub separation_radius: f32,
    pub bounds_correction: f32,
    pub update_policy: UpdatePolicySetting,
    /// Seed for initial positions; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            count: 10,
            bounds: BoundsSettings::default(),
            speed_limit: 5.0,
            cohesion_divisor: 50.0,
            alignment_divisor: 16.0,
            separation_radius: 0.4,
            bounds_correction: 2.0,
            update_policy: UpdatePolicySetting::Sequential,
            seed: None,
        }
    }
}

/// Read-only view of one frame, for renderers and recorders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    /// Simulated seconds since the first tick.
    pub elapsed: f64,
    pub bounds: BoundsSettings,
    pub positions: Vec<Position>,
}

#[cfg(feature = "std")]
impl FlockSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    /// Serializes the frame as a single line of JSON.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
