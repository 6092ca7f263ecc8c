//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Asteroid material. Determines the sprite and what mining yields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidKind {
    #[default]
    Rock,
    Ice,
    Iron,
    Gold,
}

/// Asteroid size category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AsteroidSize {
    #[default]
    Small,
    Medium,
    Large,
}

/// Transient entity category tracked by the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Asteroid,
    Projectile,
}

/// Weapon slot condition. Only `Enabled` slots can fire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotStatus {
    Disabled,
    Damaged,
    #[default]
    Enabled,
}

/// How a weapon delivers damage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponType {
    #[default]
    Projectile,
    Beam,
}

/// Top-level game state. Only `Play` runs the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    Main,
    Settings,
    Play,
    Pause,
    Death,
    /// Weaponry editing mode; never simulates.
    ShipDesigner,
}

/// HUD element receiving value notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HudElement {
    Armor,
    Shield,
}

/// What touched what in a reported contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContactKind {
    ProjectileAsteroid,
    ShipAsteroid,
}

/// Size given to the children of a split asteroid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitPolicy {
    /// Children keep the parent's size category.
    #[default]
    InheritSize,
    /// Children are one category smaller than the parent.
    Decrement,
}

impl AsteroidKind {
    pub const ALL: [AsteroidKind; 4] = [
        AsteroidKind::Rock,
        AsteroidKind::Ice,
        AsteroidKind::Iron,
        AsteroidKind::Gold,
    ];

    /// Sprite sheet index handed to the presentation layer.
    pub fn sprite_index(self) -> u32 {
        match self {
            AsteroidKind::Rock => 0,
            AsteroidKind::Ice => 1,
            AsteroidKind::Iron => 2,
            AsteroidKind::Gold => 3,
        }
    }
}

impl AsteroidSize {
    /// Map an ordinal in [0, 3) to a size. Out-of-range ordinals saturate to `Large`.
    pub fn from_ordinal(ordinal: u32) -> Self {
        match ordinal {
            0 => AsteroidSize::Small,
            1 => AsteroidSize::Medium,
            _ => AsteroidSize::Large,
        }
    }

    /// Render scale: small 1x, medium 2x, large 4x.
    pub fn scale(self) -> f32 {
        match self {
            AsteroidSize::Small => 1.0,
            AsteroidSize::Medium => 2.0,
            AsteroidSize::Large => 4.0,
        }
    }

    /// The next smaller category, or `None` for small.
    pub fn smaller(self) -> Option<Self> {
        match self {
            AsteroidSize::Small => None,
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Large => Some(AsteroidSize::Medium),
        }
    }
}

impl SplitPolicy {
    /// Size of each child spawned from a parent of `parent` size.
    pub fn child_size(self, parent: AsteroidSize) -> AsteroidSize {
        match self {
            SplitPolicy::InheritSize => parent,
            SplitPolicy::Decrement => parent.smaller().unwrap_or(AsteroidSize::Small),
        }
    }
}

impl GameState {
    /// Whether ship and entity ticking runs in this state.
    pub fn is_simulating(self) -> bool {
        self == GameState::Play
    }
}
