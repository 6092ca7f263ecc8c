//! Fundamental geometric and simulation types.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// 2D position in world units. The playfield spans roughly [-6, 6] x [-4, 4].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// 2D velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Opaque identifier for a transient entity (asteroid or projectile).
///
/// Handles are generational: once the entity they name has been flushed from the
/// registry, the same value never names a different entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Handle(u64);

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of simulated ticks (only advances while the simulation runs).
    pub tick: u64,
    /// Elapsed simulated time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn distance_to(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

impl Handle {
    /// Wrap raw identifier bits. Only the entity registry mints meaningful values.
    pub const fn from_raw(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "H{:x}", self.0)
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += f64::from(dt);
    }
}
