//! Plain data components for asteroids, projectiles and the ship aggregate.
//!
//! Components carry no game logic; damage, recharge and firing rules live in the
//! simulation crate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;

/// A minable asteroid. Health starts at `ASTEROID_START_HEALTH` regardless of size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub kind: AsteroidKind,
    pub size: AsteroidSize,
    pub health: f32,
}

/// A fired projectile or beam segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f32,
    pub weapon_type: WeaponType,
    /// Seconds since spawn.
    pub age_secs: f32,
    /// Slot that fired it.
    pub slot: usize,
}

/// Shield and armor state of a ship. Copied on every update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipDefenses {
    pub shield_strength: f32,
    pub shield_max: f32,
    /// Shield units regained per second once recharge resumes.
    pub shield_recharge: f32,
    /// Seconds after the last hit before recharge resumes.
    pub shield_delay: f32,
    pub armor_strength: f32,
    pub damage_resistance: f32,
    /// Seconds since the last damage event.
    #[serde(default)]
    pub recharge_delay_elapsed: f32,
}

/// Static description of a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponDefinition {
    pub damage: f32,
    /// Seconds between shots before modifiers.
    pub rate_of_fire: f32,
    pub speed: f32,
    pub recoil: f32,
    pub weapon_type: WeaponType,
}

/// One firing position on the ship hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlot {
    /// Mount offset in ship-local space.
    pub position_offset: Vec2,
    /// Firing direction relative to the ship heading (radians).
    pub rotation_offset: f32,
    pub status: SlotStatus,
    pub weapon: WeaponDefinition,
    #[serde(default)]
    pub cooldown_remaining: f32,
}

/// Ordered, index-addressed weapon slots plus ship-wide modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipWeaponry {
    pub slots: Vec<WeaponSlot>,
    /// Number of slots the hull declares. Must equal `slots.len()`.
    pub weapon_count: usize,
    /// Divides every slot's reload time.
    pub rate_modifier: f32,
    /// Multiplies every slot's damage.
    pub damage_modifier: f32,
}

/// Collision shape of the ship hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum ColliderForm {
    Circle { radius: f32 },
    Box { half_extents: Vec2 },
}

impl Asteroid {
    pub fn new(kind: AsteroidKind, size: AsteroidSize) -> Self {
        Self {
            kind,
            size,
            health: ASTEROID_START_HEALTH,
        }
    }
}

impl Projectile {
    pub fn new(damage: f32, weapon_type: WeaponType, slot: usize) -> Self {
        Self {
            damage,
            weapon_type,
            age_secs: 0.0,
            slot,
        }
    }
}

impl Default for ShipDefenses {
    fn default() -> Self {
        Self {
            shield_strength: DEFAULT_SHIELD_MAX,
            shield_max: DEFAULT_SHIELD_MAX,
            shield_recharge: DEFAULT_SHIELD_RECHARGE,
            shield_delay: DEFAULT_SHIELD_DELAY,
            armor_strength: DEFAULT_ARMOR,
            damage_resistance: 0.0,
            recharge_delay_elapsed: 0.0,
        }
    }
}

impl Default for WeaponDefinition {
    fn default() -> Self {
        Self {
            damage: DEFAULT_WEAPON_DAMAGE,
            rate_of_fire: DEFAULT_RATE_OF_FIRE,
            speed: DEFAULT_PROJECTILE_SPEED,
            recoil: DEFAULT_WEAPON_RECOIL,
            weapon_type: WeaponType::Projectile,
        }
    }
}

impl WeaponSlot {
    pub fn new(position_offset: Vec2, rotation_offset: f32, weapon: WeaponDefinition) -> Self {
        Self {
            position_offset,
            rotation_offset,
            status: SlotStatus::Enabled,
            weapon,
            cooldown_remaining: 0.0,
        }
    }
}

impl ShipWeaponry {
    /// Weaponry with the given slots and neutral modifiers.
    pub fn with_slots(slots: Vec<WeaponSlot>) -> Self {
        Self {
            weapon_count: slots.len(),
            slots,
            rate_modifier: 1.0,
            damage_modifier: 1.0,
        }
    }
}

impl Default for ShipWeaponry {
    /// Twin forward-firing cannons.
    fn default() -> Self {
        Self::with_slots(vec![
            WeaponSlot::new(Vec2::new(-0.15, 0.2), 0.0, WeaponDefinition::default()),
            WeaponSlot::new(Vec2::new(0.15, 0.2), 0.0, WeaponDefinition::default()),
        ])
    }
}

impl ColliderForm {
    /// Radius of the smallest circle containing the shape.
    pub fn bounding_radius(&self) -> f32 {
        match self {
            ColliderForm::Circle { radius } => *radius,
            ColliderForm::Box { half_extents } => half_extents.length(),
        }
    }
}

impl Default for ColliderForm {
    fn default() -> Self {
        ColliderForm::Circle {
            radius: DEFAULT_SHIP_RADIUS,
        }
    }
}
