//! Events emitted by the simulation for the HUD, presentation and audio layers.

use serde::{Deserialize, Serialize};

use crate::constants::HUD_DECIMALS;
use crate::enums::*;
use crate::types::Handle;

/// Notifications collected during a tick and handed out with its snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A HUD value changed. `content` is already formatted.
    Hud { element: HudElement, content: String },
    /// An entity entered the live set.
    EntitySpawned { handle: Handle, kind: EntityKind },
    /// An entity was flushed from the live set.
    EntityRemoved { handle: Handle, kind: EntityKind },
    /// An asteroid's health reached zero.
    AsteroidDestroyed {
        handle: Handle,
        kind: AsteroidKind,
        size: AsteroidSize,
        children: u32,
    },
    /// A weapon slot fired.
    WeaponFired { slot: usize, handle: Handle },
    /// Ship armor reached zero.
    ShipDestroyed,
    /// The game state machine moved.
    StateChanged { from: GameState, to: GameState },
}

impl SimEvent {
    /// HUD notification with the value rendered to two decimal places.
    pub fn hud(element: HudElement, value: f32) -> Self {
        SimEvent::Hud {
            element,
            content: format_hud_value(value),
        }
    }
}

/// Render a HUD value as decimal text with `HUD_DECIMALS` places.
pub fn format_hud_value(value: f32) -> String {
    format!("{value:.prec$}", prec = HUD_DECIMALS)
}
