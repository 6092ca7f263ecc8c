//! Game state machine.
//!
//! The coordinator only decides what a transition implies; the engine carries out the
//! returned effects against the registry and ship. Whether systems tick is read from
//! `is_simulating`, not from an effect.

use log::info;

use rockbelt_core::enums::GameState;

/// Work the engine must do as a consequence of a transition, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Drop every entity left over from a previous game.
    ClearEntities,
    /// Restore ship defenses to baseline; weaponry is kept.
    ResetShip,
    SpawnInitialWave,
}

#[derive(Debug, Clone, Default)]
pub struct GameStateCoordinator {
    state: GameState,
}

impl GameStateCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_simulating(&self) -> bool {
        self.state.is_simulating()
    }

    /// Move to `to` and return the effects the move implies.
    ///
    /// Entering `Play` from `Pause` resumes frozen entities as they were. Entering `Play`
    /// from anywhere else starts a fresh game. Every other target implies no work:
    /// ticking stops and entities already in the registry stay frozen.
    pub fn enter(&mut self, to: GameState) -> Vec<TransitionEffect> {
        let from = self.state;
        self.state = to;
        info!("game state {from:?} -> {to:?}");

        match (from, to) {
            (GameState::Pause, GameState::Play) => Vec::new(),
            (_, GameState::Play) => vec![
                TransitionEffect::ClearEntities,
                TransitionEffect::ResetShip,
                TransitionEffect::SpawnInitialWave,
            ],
            _ => Vec::new(),
        }
    }
}
