//! Simulation engine: the per-tick driver.
//!
//! `SimulationEngine` owns the entity registry, the ship, the physics collaborator and
//! the game state machine. It processes player commands at the tick boundary, runs the
//! systems in a fixed order while the game is in `Play`, and hands out a `SimSnapshot`
//! after every tick. Completely headless; `dt` comes from the caller's frame clock.

use std::collections::VecDeque;

use log::{debug, info, trace, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use rockbelt_core::commands::PlayerCommand;
use rockbelt_core::config::{check_slot_index, ShipConfig};
use rockbelt_core::constants::INITIAL_WAVE_COUNT;
use rockbelt_core::enums::{GameState, HudElement, SplitPolicy};
use rockbelt_core::events::SimEvent;
use rockbelt_core::state::SimSnapshot;
use rockbelt_core::types::SimTime;

use crate::combat;
use crate::coordinator::{GameStateCoordinator, TransitionEffect};
use crate::error::SimError;
use crate::physics::{KinematicPhysics, Physics};
use crate::registry::EntityRegistry;
use crate::ship::Ship;
use crate::systems;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and commands = same simulation.
    pub seed: u64,
    /// Asteroids spawned when a fresh game starts.
    pub initial_wave_count: usize,
    pub split_policy: SplitPolicy,
    pub ship: ShipConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            initial_wave_count: INITIAL_WAVE_COUNT,
            split_policy: SplitPolicy::default(),
            ship: ShipConfig::default(),
        }
    }
}

/// The simulation engine. Owns all sim state.
pub struct SimulationEngine {
    registry: EntityRegistry,
    ship: Ship,
    physics: Box<dyn Physics>,
    coordinator: GameStateCoordinator,
    time: SimTime,
    rng: ChaCha8Rng,
    split_policy: SplitPolicy,
    initial_wave_count: usize,
    command_queue: VecDeque<PlayerCommand>,
    /// Slots to fire during the next simulated tick.
    fire_intents: Vec<usize>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create an engine with the built-in kinematic physics.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Self::with_physics(config, KinematicPhysics::new())
    }

    /// Create an engine driving a custom physics collaborator.
    pub fn with_physics(
        config: SimConfig,
        physics: impl Physics + 'static,
    ) -> Result<Self, SimError> {
        let ship = Ship::from_config(&config.ship)?;
        Ok(Self {
            registry: EntityRegistry::new(),
            ship,
            physics: Box::new(physics),
            coordinator: GameStateCoordinator::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            split_policy: config.split_policy,
            initial_wave_count: config.initial_wave_count,
            command_queue: VecDeque::new(),
            fire_intents: Vec::new(),
            events: Vec::new(),
        })
    }

    /// Queue a player command for processing at the next tick boundary.
    /// Rejected commands are logged and dropped.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Apply a command now instead of at the next tick boundary, reporting rejection.
    pub fn try_command(&mut self, command: PlayerCommand) -> Result<(), SimError> {
        self.handle_command(command)
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    pub fn tick(&mut self, dt: f32) -> SimSnapshot {
        self.process_commands();

        if self.coordinator.is_simulating() {
            self.run_systems(dt);
            self.time.advance(dt);
        }
        self.fire_intents.clear();

        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.registry,
            &self.ship,
            &self.time,
            self.coordinator.state(),
            events,
        )
    }

    pub fn state(&self) -> GameState {
        self.coordinator.state()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Read-only view of the live entities.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn ship(&self) -> &Ship {
        &self.ship
    }

    /// The ship aggregate as it should be persisted.
    pub fn ship_config(&self) -> ShipConfig {
        self.ship.to_config()
    }

    /// Replace the ship with a loaded configuration. Position and motion are kept.
    pub fn load_ship(&mut self, config: &ShipConfig) -> Result<(), SimError> {
        let mut ship = Ship::from_config(config)?;
        ship.body = self.ship.body;
        self.ship = ship;
        info!("ship configuration loaded ({} slots)", config.weaponry.slots.len());
        Ok(())
    }

    /// Spawn an asteroid directly into the live set (for testing).
    #[cfg(test)]
    pub fn spawn_test_asteroid(
        &mut self,
        asteroid: rockbelt_core::components::Asteroid,
        position: rockbelt_core::types::Position,
        velocity: rockbelt_core::types::Velocity,
    ) -> rockbelt_core::types::Handle {
        self.registry.spawn(crate::registry::EntityData::asteroid(
            asteroid, position, velocity,
        ))
    }

    /// Mutable ship access (for testing).
    #[cfg(test)]
    pub fn ship_mut(&mut self) -> &mut Ship {
        &mut self.ship
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!("command rejected: {err}");
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), SimError> {
        match command {
            PlayerCommand::EnterState { state } => self.transition(state),
            PlayerCommand::Fire { slot } => {
                check_slot_index(&self.ship.weaponry, slot)?;
                if self.coordinator.is_simulating() {
                    self.fire_intents.push(slot);
                } else {
                    trace!("fire on slot {slot} ignored outside play");
                }
            }
            PlayerCommand::Thrust { amount } => {
                if self.coordinator.is_simulating() {
                    let impulse = self.ship.body.forward() * amount;
                    self.physics.apply_impulse(&mut self.ship.body, impulse);
                }
            }
            PlayerCommand::Turn { radians } => {
                if self.coordinator.is_simulating() {
                    self.ship.body.heading += radians;
                }
            }
            PlayerCommand::SetSlotStatus { slot, status } => {
                self.ship.set_slot_status(slot, status)?;
                debug!("slot {slot} set to {status:?}");
            }
            PlayerCommand::InstallWeapon { slot, weapon } => {
                self.ship.install_weapon(slot, weapon)?;
                debug!("slot {slot} fitted with {:?}", weapon.weapon_type);
            }
            PlayerCommand::SetRecoilCompensation { value } => {
                self.ship.set_recoil_compensation(value)?;
            }
        }
        Ok(())
    }

    /// Move the state machine and carry out what the move implies.
    fn transition(&mut self, to: GameState) {
        let from = self.coordinator.state();
        let effects = self.coordinator.enter(to);
        self.events.push(SimEvent::StateChanged { from, to });

        for effect in effects {
            match effect {
                TransitionEffect::ClearEntities => {
                    let removed = self.registry.clear();
                    self.fire_intents.clear();
                    self.events.extend(
                        removed
                            .into_iter()
                            .map(|(handle, kind)| SimEvent::EntityRemoved { handle, kind }),
                    );
                }
                TransitionEffect::ResetShip => {
                    self.ship.reset();
                    self.events.push(SimEvent::hud(
                        HudElement::Shield,
                        self.ship.defenses.shield_strength,
                    ));
                    self.events.push(SimEvent::hud(
                        HudElement::Armor,
                        self.ship.defenses.armor_strength,
                    ));
                }
                TransitionEffect::SpawnInitialWave => {
                    systems::spawner::spawn_initial_wave(
                        &mut self.registry,
                        &mut self.rng,
                        self.initial_wave_count,
                        &mut self.events,
                    );
                }
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f32) {
        // 1. Weapon timers and fire intents
        let intents = std::mem::take(&mut self.fire_intents);
        systems::weapons::run(
            &mut self.ship,
            &intents,
            dt,
            &mut self.registry,
            self.physics.as_mut(),
            &mut self.events,
        );
        // 2. Motion integration
        self.physics
            .integrate(&mut self.registry, &mut self.ship.body, dt);
        // 3. Contact detection
        let contacts =
            self.physics
                .contacts(&self.registry, &self.ship.body, self.ship.radius());
        // 4. Damage, destruction and splits
        let outcome = combat::resolve_contacts(
            &contacts,
            &mut self.registry,
            &mut self.ship,
            self.split_policy,
            &mut self.rng,
            &mut self.events,
        );
        // 5. Projectile expiry
        systems::lifetime::run(&mut self.registry, dt);
        // 6. Flush marked entities, then realize queued children
        let report = self.registry.flush();
        if !report.removed.is_empty() || !report.spawned.is_empty() {
            debug!(
                "flush: {} removed, {} spawned",
                report.removed.len(),
                report.spawned.len()
            );
        }
        self.events.extend(
            report
                .removed
                .into_iter()
                .map(|(handle, kind)| SimEvent::EntityRemoved { handle, kind }),
        );
        self.events.extend(
            report
                .spawned
                .into_iter()
                .map(|(handle, kind)| SimEvent::EntitySpawned { handle, kind }),
        );
        // 7. Shield recharge
        self.ship.defenses =
            combat::tick_shield_recharge(self.ship.defenses, dt, &mut self.events);

        if outcome.ship_destroyed {
            self.transition(GameState::Death);
        }
    }
}
