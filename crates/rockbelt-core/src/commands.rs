//! Player commands delivered by the input layer.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::components::WeaponDefinition;
use crate::enums::*;

/// All possible player actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Game flow ---
    /// Move the game state machine.
    EnterState { state: GameState },

    // --- Flight (ignored unless playing) ---
    /// Fire one weapon slot.
    Fire { slot: usize },
    /// Push the ship along its heading.
    Thrust { amount: f32 },
    /// Rotate the ship heading.
    Turn { radians: f32 },

    // --- Ship designer (accepted in any state) ---
    /// Change a slot's condition.
    SetSlotStatus { slot: usize, status: SlotStatus },
    /// Mount a different weapon in a slot.
    InstallWeapon {
        slot: usize,
        weapon: WeaponDefinition,
    },
    /// Set the fraction of recoil cancelled, in [0, 1].
    SetRecoilCompensation { value: f32 },
}
