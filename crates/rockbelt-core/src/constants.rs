//! Simulation constants and tuning parameters.

use std::ops::Range;

// --- Asteroids ---

/// Health every asteroid starts with, independent of size.
pub const ASTEROID_START_HEALTH: f32 = 10.0;

/// Collision radius of a small asteroid; scaled by `AsteroidSize::scale`.
pub const ASTEROID_BASE_RADIUS: f32 = 0.1;

/// Damage dealt to both parties when the ship rams an asteroid (times asteroid scale for the ship).
pub const ASTEROID_RAM_DAMAGE: f32 = 5.0;

/// Child count drawn uniformly from this range when a non-small asteroid splits.
pub const SPLIT_CHILD_RANGE: Range<u32> = 2..5;

// --- Initial wave placement ---

/// Asteroids spawned when a fresh game starts.
pub const INITIAL_WAVE_COUNT: usize = 10;

/// Number of size ordinals drawn from (small, medium, large).
pub const ASTEROID_SIZE_ORDINALS: u32 = 3;

/// Sampling bounds for initial positions (inclusive).
pub const SPAWN_X_MIN: f32 = -6.0;
pub const SPAWN_X_MAX: f32 = 6.0;
pub const SPAWN_Y_MIN: f32 = -4.0;
pub const SPAWN_Y_MAX: f32 = 4.0;

/// Half-width of the open bands around each axis where nothing may spawn.
/// A sample is rejected if x OR y lies strictly inside (-band, band).
pub const SPAWN_EXCLUSION_HALF_WIDTH: f32 = 1.0;

/// Each velocity axis is drawn uniformly from [-max, max].
pub const SPAWN_MAX_AXIS_SPEED: f32 = 0.025;

// --- Projectiles ---

/// Projectile time to live in seconds.
pub const PROJECTILE_TTL: f32 = 3.0;

/// Projectile collision radius.
pub const PROJECTILE_RADIUS: f32 = 0.02;

// --- Ship defaults ---

pub const DEFAULT_SHIELD_MAX: f32 = 15.0;
pub const DEFAULT_SHIELD_RECHARGE: f32 = 1.0;
pub const DEFAULT_SHIELD_DELAY: f32 = 5.0;
pub const DEFAULT_ARMOR: f32 = 50.0;
pub const DEFAULT_SHIP_RADIUS: f32 = 0.25;
pub const DEFAULT_SHIP_MASS: f32 = 1.0;

// --- Weapon defaults ---

pub const DEFAULT_WEAPON_DAMAGE: f32 = 5.0;
/// Seconds between shots.
pub const DEFAULT_RATE_OF_FIRE: f32 = 0.35;
pub const DEFAULT_PROJECTILE_SPEED: f32 = 4.0;
pub const DEFAULT_WEAPON_RECOIL: f32 = 0.05;

// --- HUD ---

/// Decimal places used for HUD value text.
pub const HUD_DECIMALS: usize = 2;
