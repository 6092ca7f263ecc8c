//! Configuration errors.
//!
//! These are programmer/data errors. They abort the offending operation instead of
//! being clamped into range.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("weapon slot {index} out of range (weapon count {count})")]
    SlotIndexOutOfRange { index: usize, count: usize },

    #[error("weapon count {declared} does not match {actual} configured slots")]
    WeaponCountMismatch { declared: usize, actual: usize },

    #[error("recoil compensation {0} outside [0, 1]")]
    RecoilCompensationOutOfRange(f32),

    #[error("{name} modifier must be positive, got {value}")]
    NonPositiveModifier { name: &'static str, value: f32 },

    #[error("weapon in slot {slot} is invalid: {reason}")]
    InvalidWeapon { slot: usize, reason: String },

    #[error("invalid ship defenses: {0}")]
    InvalidDefenses(String),

    #[error("invalid collider: {0}")]
    InvalidCollider(String),

    #[error("failed to parse ship config: {0}")]
    Parse(#[from] serde_json::Error),
}
