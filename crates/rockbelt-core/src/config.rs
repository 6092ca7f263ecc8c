//! Ship configuration aggregate exchanged with the persistence layer.
//!
//! The persistence collaborator hands a `ShipConfig` in at startup and receives the
//! mutated aggregate back on save. Only JSON text crosses this boundary; reading and
//! writing files is the collaborator's job.

use serde::{Deserialize, Serialize};

use crate::components::{ColliderForm, ShipDefenses, ShipWeaponry, WeaponDefinition};
use crate::error::ConfigError;

/// Everything needed to build the player ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipConfig {
    /// Baseline defenses the ship is reset to on respawn.
    pub stats: ShipDefenses,
    pub weaponry: ShipWeaponry,
    pub collider: ColliderForm,
    /// Fraction of weapon recoil cancelled out, in [0, 1].
    pub recoil_compensation: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            stats: ShipDefenses::default(),
            weaponry: ShipWeaponry::default(),
            collider: ColliderForm::default(),
            recoil_compensation: 0.0,
        }
    }
}

impl ShipConfig {
    /// Parse and validate a config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ShipConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject malformed data instead of clamping it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_defenses(&self.stats)?;
        validate_weaponry(&self.weaponry)?;
        check_recoil_compensation(self.recoil_compensation)?;
        let radius = self.collider.bounding_radius();
        if radius.is_nan() || radius <= 0.0 {
            return Err(ConfigError::InvalidCollider(format!(
                "bounding radius must be positive, got {radius}"
            )));
        }
        Ok(())
    }
}

/// Fail unless `value` lies in [0, 1].
pub fn check_recoil_compensation(value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RecoilCompensationOutOfRange(value))
    }
}

/// Fail unless `index` addresses one of the configured slots.
pub fn check_slot_index(weaponry: &ShipWeaponry, index: usize) -> Result<(), ConfigError> {
    if index < weaponry.weapon_count && index < weaponry.slots.len() {
        Ok(())
    } else {
        Err(ConfigError::SlotIndexOutOfRange {
            index,
            count: weaponry.weapon_count,
        })
    }
}

pub fn validate_defenses(defenses: &ShipDefenses) -> Result<(), ConfigError> {
    let fields = [
        ("shield_strength", defenses.shield_strength),
        ("shield_max", defenses.shield_max),
        ("shield_recharge", defenses.shield_recharge),
        ("shield_delay", defenses.shield_delay),
        ("armor_strength", defenses.armor_strength),
        ("damage_resistance", defenses.damage_resistance),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidDefenses(format!(
                "{name} must be finite and non-negative, got {value}"
            )));
        }
    }
    Ok(())
}

pub fn validate_weaponry(weaponry: &ShipWeaponry) -> Result<(), ConfigError> {
    if weaponry.weapon_count != weaponry.slots.len() {
        return Err(ConfigError::WeaponCountMismatch {
            declared: weaponry.weapon_count,
            actual: weaponry.slots.len(),
        });
    }
    if weaponry.rate_modifier.is_nan() || weaponry.rate_modifier <= 0.0 {
        return Err(ConfigError::NonPositiveModifier {
            name: "rate",
            value: weaponry.rate_modifier,
        });
    }
    if weaponry.damage_modifier.is_nan() || weaponry.damage_modifier < 0.0 {
        return Err(ConfigError::NonPositiveModifier {
            name: "damage",
            value: weaponry.damage_modifier,
        });
    }
    for (slot, s) in weaponry.slots.iter().enumerate() {
        validate_weapon(slot, &s.weapon)?;
    }
    Ok(())
}

pub fn validate_weapon(slot: usize, weapon: &WeaponDefinition) -> Result<(), ConfigError> {
    let fields = [
        ("damage", weapon.damage),
        ("rate_of_fire", weapon.rate_of_fire),
        ("speed", weapon.speed),
        ("recoil", weapon.recoil),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidWeapon {
                slot,
                reason: format!("{name} must be finite and non-negative, got {value}"),
            });
        }
    }
    Ok(())
}
