//! Simulation snapshot: the complete visible state handed out after each tick.
//!
//! Snapshots are immutable copies; a renderer on another thread may hold them freely.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::SimEvent;
use crate::types::{Handle, Position, SimTime, Velocity};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    pub state: GameState,
    pub ship: ShipView,
    pub asteroids: Vec<AsteroidView>,
    pub projectiles: Vec<ProjectileView>,
    pub events: Vec<SimEvent>,
}

/// Ship status for the HUD and renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipView {
    pub position: Position,
    pub velocity: Velocity,
    /// Radians, 0 = +y.
    pub heading: f32,
    pub shield: f32,
    pub shield_max: f32,
    pub armor: f32,
}

/// Render state of one asteroid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidView {
    pub handle: Handle,
    pub kind: AsteroidKind,
    pub size: AsteroidSize,
    pub health: f32,
    pub position: Position,
    /// Transform scale for the sprite.
    pub scale: f32,
    pub sprite_index: u32,
}

/// Render state of one projectile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub handle: Handle,
    pub weapon_type: WeaponType,
    pub position: Position,
    pub velocity: Velocity,
}
