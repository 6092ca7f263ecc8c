//! The player ship aggregate: defenses, weaponry, hull and rigid-body state.
//!
//! Defenses are mutated only by the combat resolver; weaponry only by the
//! ship-designer commands and the weapon cooldown timers.

use glam::Vec2;

use rockbelt_core::components::{
    ColliderForm, ShipDefenses, ShipWeaponry, WeaponDefinition,
};
use rockbelt_core::config::{
    check_recoil_compensation, check_slot_index, validate_weapon, ShipConfig,
};
use rockbelt_core::constants::DEFAULT_SHIP_MASS;
use rockbelt_core::enums::SlotStatus;
use rockbelt_core::error::ConfigError;
use rockbelt_core::types::{Position, Velocity};

/// Motion state integrated by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipBody {
    pub position: Position,
    pub velocity: Velocity,
    /// Radians counter-clockwise from +y.
    pub heading: f32,
    pub mass: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    /// Baseline restored on respawn.
    pub stats: ShipDefenses,
    pub defenses: ShipDefenses,
    pub weaponry: ShipWeaponry,
    pub collider: ColliderForm,
    pub recoil_compensation: f32,
    pub body: ShipBody,
}

impl Default for ShipBody {
    fn default() -> Self {
        Self {
            position: Position::default(),
            velocity: Velocity::default(),
            heading: 0.0,
            mass: DEFAULT_SHIP_MASS,
        }
    }
}

impl ShipBody {
    /// Unit vector along the heading.
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading).rotate(Vec2::Y)
    }

    /// Transform a ship-local offset into world space.
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.position.0 + Vec2::from_angle(self.heading).rotate(local)
    }
}

impl Ship {
    /// Build a ship from a validated configuration.
    pub fn from_config(config: &ShipConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            stats: config.stats,
            defenses: config.stats,
            weaponry: config.weaponry.clone(),
            collider: config.collider,
            recoil_compensation: config.recoil_compensation,
            body: ShipBody::default(),
        })
    }

    /// The aggregate handed back to the persistence layer.
    pub fn to_config(&self) -> ShipConfig {
        let mut weaponry = self.weaponry.clone();
        for slot in &mut weaponry.slots {
            slot.cooldown_remaining = 0.0;
        }
        ShipConfig {
            stats: self.stats,
            weaponry,
            collider: self.collider,
            recoil_compensation: self.recoil_compensation,
        }
    }

    /// Respawn: defenses back to baseline, body at rest at the origin.
    /// Weapon definitions and slot statuses are kept.
    pub fn reset(&mut self) {
        self.defenses = self.stats;
        self.body = ShipBody {
            mass: self.body.mass,
            ..ShipBody::default()
        };
        for slot in &mut self.weaponry.slots {
            slot.cooldown_remaining = 0.0;
        }
    }

    pub fn radius(&self) -> f32 {
        self.collider.bounding_radius()
    }

    pub fn set_slot_status(&mut self, slot: usize, status: SlotStatus) -> Result<(), ConfigError> {
        check_slot_index(&self.weaponry, slot)?;
        self.weaponry.slots[slot].status = status;
        Ok(())
    }

    pub fn install_weapon(
        &mut self,
        slot: usize,
        weapon: WeaponDefinition,
    ) -> Result<(), ConfigError> {
        check_slot_index(&self.weaponry, slot)?;
        validate_weapon(slot, &weapon)?;
        let target = &mut self.weaponry.slots[slot];
        target.weapon = weapon;
        target.cooldown_remaining = 0.0;
        Ok(())
    }

    pub fn set_recoil_compensation(&mut self, value: f32) -> Result<(), ConfigError> {
        check_recoil_compensation(value)?;
        self.recoil_compensation = value;
        Ok(())
    }
}
