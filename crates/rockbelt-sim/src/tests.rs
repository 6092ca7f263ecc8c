//! Tests for the simulation engine: tick ordering, state transitions, commands and
//! determinism.

use std::collections::HashSet;

use approx::assert_abs_diff_eq;

use rockbelt_core::commands::PlayerCommand;
use rockbelt_core::components::{Asteroid, WeaponDefinition};
use rockbelt_core::config::ShipConfig;
use rockbelt_core::enums::*;
use rockbelt_core::error::ConfigError;
use rockbelt_core::events::SimEvent;
use rockbelt_core::state::SimSnapshot;
use rockbelt_core::types::{Handle, Position, Velocity};

use crate::engine::{SimConfig, SimulationEngine};
use crate::error::SimError;
use crate::systems::spawner;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn engine_with(seed: u64, initial_wave_count: usize) -> SimulationEngine {
    init_logging();
    SimulationEngine::new(SimConfig {
        seed,
        initial_wave_count,
        ..Default::default()
    })
    .unwrap()
}

/// Engine already in `Play` with no asteroids.
fn empty_play() -> SimulationEngine {
    let mut engine = engine_with(42, 0);
    engine
        .try_command(PlayerCommand::EnterState {
            state: GameState::Play,
        })
        .unwrap();
    engine
}

fn play() -> PlayerCommand {
    PlayerCommand::EnterState {
        state: GameState::Play,
    }
}

fn enter(state: GameState) -> PlayerCommand {
    PlayerCommand::EnterState { state }
}

fn asteroid_handles(snapshot: &SimSnapshot) -> HashSet<Handle> {
    snapshot.asteroids.iter().map(|a| a.handle).collect()
}

fn fired(snapshot: &SimSnapshot) -> Vec<Handle> {
    snapshot
        .events
        .iter()
        .filter_map(|e| match e {
            SimEvent::WeaponFired { handle, .. } => Some(*handle),
            _ => None,
        })
        .collect()
}

fn removed(snapshot: &SimSnapshot, target: Handle) -> usize {
    snapshot
        .events
        .iter()
        .filter(|e| matches!(e, SimEvent::EntityRemoved { handle, .. } if *handle == target))
        .count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = engine_with(12345, 10);
    let mut engine_b = engine_with(12345, 10);

    engine_a.queue_command(play());
    engine_b.queue_command(play());

    for tick in 0..300 {
        let commands = [
            PlayerCommand::Fire { slot: tick % 2 },
            PlayerCommand::Turn { radians: 0.05 },
        ];
        engine_a.queue_commands(commands.clone());
        engine_b.queue_commands(commands);

        let json_a = serde_json::to_string(&engine_a.tick(1.0 / 60.0)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(1.0 / 60.0)).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with(111, 10);
    let mut engine_b = engine_with(222, 10);

    engine_a.queue_command(play());
    engine_b.queue_command(play());

    let json_a = serde_json::to_string(&engine_a.tick(1.0 / 60.0)).unwrap();
    let json_b = serde_json::to_string(&engine_b.tick(1.0 / 60.0)).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should place the wave differently");
}

// ---- State transitions ----

#[test]
fn test_main_menu_does_not_simulate() {
    let mut engine = engine_with(1, 10);
    for _ in 0..10 {
        let snapshot = engine.tick(0.1);
        assert_eq!(snapshot.state, GameState::Main);
        assert!(snapshot.asteroids.is_empty());
    }
    assert_eq!(engine.time().tick, 0);
}

#[test]
fn test_fresh_play_spawns_initial_wave() {
    let mut engine = engine_with(5, 10);
    engine.queue_command(play());
    let snapshot = engine.tick(0.0);

    assert_eq!(snapshot.state, GameState::Play);
    assert_eq!(snapshot.asteroids.len(), 10);
    for asteroid in &snapshot.asteroids {
        assert!(!spawner::is_excluded(asteroid.position.0));
        assert_eq!(asteroid.health, 10.0);
        assert_eq!(asteroid.scale, asteroid.size.scale());
    }
    assert!(snapshot.events.contains(&SimEvent::StateChanged {
        from: GameState::Main,
        to: GameState::Play
    }));
    assert!(snapshot.events.contains(&SimEvent::Hud {
        element: HudElement::Shield,
        content: "15.00".into()
    }));
}

#[test]
fn test_pause_freezes_entities() {
    let mut engine = engine_with(9, 10);
    engine.queue_command(play());
    engine.tick(0.5);

    engine.queue_command(enter(GameState::Pause));
    let frozen = engine.tick(0.5);
    let frozen_time = engine.time();

    for _ in 0..20 {
        let snapshot = engine.tick(0.5);
        assert_eq!(snapshot.state, GameState::Pause);
        for (a, b) in frozen.asteroids.iter().zip(&snapshot.asteroids) {
            assert_eq!(a.handle, b.handle);
            assert_eq!(a.position, b.position);
        }
    }
    assert_eq!(engine.time().tick, frozen_time.tick);
}

#[test]
fn test_resume_from_pause_keeps_entities() {
    let mut engine = engine_with(9, 10);
    engine.queue_command(play());
    let before = engine.tick(0.5);

    engine.queue_command(enter(GameState::Pause));
    engine.tick(0.5);
    engine.queue_command(play());
    let after = engine.tick(0.5);

    assert_eq!(asteroid_handles(&before), asteroid_handles(&after));
    assert!(!after
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::EntitySpawned { .. })));
}

#[test]
fn test_main_then_play_starts_fresh_game() {
    let mut engine = engine_with(9, 10);
    engine.queue_command(play());
    let first = engine.tick(0.1);

    engine.queue_commands([enter(GameState::Pause), enter(GameState::Main)]);
    let frozen = engine.tick(0.1);
    assert_eq!(frozen.state, GameState::Main);
    assert_eq!(
        asteroid_handles(&frozen),
        asteroid_handles(&first),
        "main menu freezes, it does not destroy"
    );

    engine.queue_command(play());
    let fresh = engine.tick(0.1);
    assert_eq!(fresh.asteroids.len(), 10);
    assert!(asteroid_handles(&fresh).is_disjoint(&asteroid_handles(&first)));
    for old in asteroid_handles(&first) {
        assert!(!engine.registry().is_live(old));
    }
}

// ---- Weapons ----

#[test]
fn test_fire_rate_limited_by_rate_of_fire() {
    let mut engine = empty_play();

    let mut shots = Vec::new();
    for tick in 0..10 {
        engine.queue_command(PlayerCommand::Fire { slot: 0 });
        if !fired(&engine.tick(0.1)).is_empty() {
            shots.push(tick);
        }
    }
    // 0.35 s reload at 0.1 s per tick.
    assert_eq!(shots, vec![0, 4, 8]);
}

#[test]
fn test_fire_ignored_outside_play() {
    let mut engine = engine_with(1, 0);
    engine.queue_command(PlayerCommand::Fire { slot: 0 });
    let snapshot = engine.tick(0.1);
    assert!(fired(&snapshot).is_empty());
    assert!(snapshot.projectiles.is_empty());
}

#[test]
fn test_disabled_slot_does_not_fire() {
    let mut engine = empty_play();
    engine
        .try_command(PlayerCommand::SetSlotStatus {
            slot: 0,
            status: SlotStatus::Disabled,
        })
        .unwrap();

    engine.queue_command(PlayerCommand::Fire { slot: 0 });
    let snapshot = engine.tick(0.1);
    assert!(fired(&snapshot).is_empty());
    assert!(snapshot.projectiles.is_empty());
    assert_eq!(snapshot.ship.velocity, Velocity::default());
}

#[test]
fn test_recoil_compensation() {
    let mut free = empty_play();
    free.queue_command(PlayerCommand::Fire { slot: 0 });
    let snapshot = free.tick(0.0);
    assert_abs_diff_eq!(snapshot.ship.velocity.0.y, -0.05, epsilon = 1e-6);

    let mut locked = empty_play();
    locked
        .try_command(PlayerCommand::SetRecoilCompensation { value: 1.0 })
        .unwrap();
    locked.queue_command(PlayerCommand::Fire { slot: 0 });
    let snapshot = locked.tick(0.0);
    assert_eq!(fired(&snapshot).len(), 1);
    assert_abs_diff_eq!(snapshot.ship.velocity.0.length(), 0.0, epsilon = 1e-6);
}

#[test]
fn test_bad_slot_rejected() {
    let mut engine = empty_play();
    let err = engine
        .try_command(PlayerCommand::Fire { slot: 7 })
        .unwrap_err();
    assert!(matches!(
        err,
        SimError::Config(ConfigError::SlotIndexOutOfRange { index: 7, count: 2 })
    ));

    // Queued, the same command is dropped without disturbing the tick.
    engine.queue_command(PlayerCommand::Fire { slot: 7 });
    engine.queue_command(PlayerCommand::Fire { slot: 1 });
    let snapshot = engine.tick(0.1);
    assert_eq!(fired(&snapshot).len(), 1);
}

// ---- Projectile lifetime ----

#[test]
fn test_projectile_expires_once_at_ttl() {
    let mut engine = empty_play();
    engine.queue_command(PlayerCommand::Fire { slot: 0 });

    let mut projectile = None;
    let mut removals = Vec::new();
    for tick in 0..20 {
        let snapshot = engine.tick(0.25);
        if let Some(handle) = fired(&snapshot).first() {
            projectile = Some(*handle);
        }
        if let Some(handle) = projectile {
            for _ in 0..removed(&snapshot, handle) {
                removals.push(tick);
            }
        }
    }
    // ceil(3.0 / 0.25)
    assert_eq!(removals, vec![12]);
}

#[test]
fn test_contact_and_expiry_in_same_tick_remove_once() {
    let mut engine = empty_play();
    // Slot 0 fires from (-0.15, 0.2) straight up at 4 u/s; at dt = 0.25 the shot
    // reaches y = 13.2 on the tick it also expires.
    let rock = engine.spawn_test_asteroid(
        Asteroid::new(AsteroidKind::Rock, AsteroidSize::Small),
        Position::new(-0.15, 13.2),
        Velocity::default(),
    );
    engine.queue_command(PlayerCommand::Fire { slot: 0 });

    let mut projectile = None;
    let mut removals = Vec::new();
    for tick in 0..20 {
        let snapshot = engine.tick(0.25);
        if let Some(handle) = fired(&snapshot).first() {
            projectile = Some(*handle);
        }
        if let Some(handle) = projectile {
            for _ in 0..removed(&snapshot, handle) {
                removals.push(tick);
            }
        }
    }
    assert_eq!(removals, vec![12]);

    let snapshot = engine.tick(0.25);
    let hit = snapshot
        .asteroids
        .iter()
        .find(|a| a.handle == rock)
        .unwrap();
    assert_abs_diff_eq!(hit.health, 5.0);
}

// ---- Combat through the engine ----

#[test]
fn test_split_children_skip_the_killing_pass() {
    let mut engine = empty_play();
    let mut parent = Asteroid::new(AsteroidKind::Iron, AsteroidSize::Medium);
    parent.health = 5.0;
    let rock = engine.spawn_test_asteroid(parent, Position::default(), Velocity::default());

    let snapshot = engine.tick(0.01);

    // Rammed once: 5 * 2 off the shield, and the ram killed the parent.
    assert_abs_diff_eq!(snapshot.ship.shield, 5.0);
    assert_eq!(snapshot.ship.armor, 50.0);
    assert!(!engine.registry().is_live(rock));
    let children = snapshot.asteroids.len();
    assert!((2..=4).contains(&children));
    assert!(snapshot.asteroids.iter().all(|a| a.size == AsteroidSize::Medium));
    assert!(snapshot.events.contains(&SimEvent::AsteroidDestroyed {
        handle: rock,
        kind: AsteroidKind::Iron,
        size: AsteroidSize::Medium,
        children: children as u32,
    }));

    // The children overlap the ship and hit it on the following tick.
    let snapshot = engine.tick(0.01);
    assert_eq!(snapshot.ship.shield, 0.0);
    assert_abs_diff_eq!(snapshot.ship.armor, 50.0 - 10.0 * (children as f32 - 1.0));
}

#[test]
fn test_parked_asteroid_rams_once_at_any_frame_rate() {
    for (dt, ticks) in [(0.1, 10), (1.0 / 60.0, 60)] {
        let mut engine = empty_play();
        engine.ship_mut().defenses.shield_strength = 0.0;
        let rock = engine.spawn_test_asteroid(
            Asteroid::new(AsteroidKind::Iron, AsteroidSize::Small),
            Position::new(0.1, 0.0),
            Velocity::default(),
        );

        let mut snapshot = engine.tick(dt);
        for _ in 1..ticks {
            snapshot = engine.tick(dt);
        }

        assert_eq!(snapshot.state, GameState::Play);
        assert_abs_diff_eq!(snapshot.ship.armor, 45.0);
        let view = snapshot.asteroids.iter().find(|a| a.handle == rock).unwrap();
        assert_abs_diff_eq!(view.health, 5.0);
    }
}

#[test]
fn test_ship_destruction_enters_death() {
    let mut engine = empty_play();
    engine.ship_mut().defenses.shield_strength = 0.0;
    engine.ship_mut().defenses.armor_strength = 1.0;
    engine.spawn_test_asteroid(
        Asteroid::new(AsteroidKind::Gold, AsteroidSize::Large),
        Position::new(0.1, 0.0),
        Velocity::default(),
    );

    let snapshot = engine.tick(0.1);
    assert_eq!(snapshot.state, GameState::Death);
    assert!(snapshot.events.contains(&SimEvent::ShipDestroyed));
    assert!(snapshot.events.contains(&SimEvent::StateChanged {
        from: GameState::Play,
        to: GameState::Death
    }));
    assert!(snapshot.events.contains(&SimEvent::Hud {
        element: HudElement::Armor,
        content: "-19.00".into()
    }));

    let frozen = engine.time();
    engine.tick(0.1);
    assert_eq!(engine.time().tick, frozen.tick);

    // Playing again restores the ship.
    engine.queue_command(play());
    let snapshot = engine.tick(0.0);
    assert_eq!(snapshot.ship.armor, 50.0);
    assert_eq!(snapshot.ship.shield, 15.0);
}

#[test]
fn test_shield_recharges_after_delay() {
    let mut engine = empty_play();
    engine.ship_mut().defenses.shield_strength = 5.0;

    // Delay of 5 s at 1 s per tick, then 1 unit per second.
    let mut shields = Vec::new();
    for _ in 0..8 {
        shields.push(engine.tick(1.0).ship.shield);
    }
    assert_eq!(shields, vec![5.0, 5.0, 5.0, 5.0, 5.0, 6.0, 7.0, 8.0]);
}

// ---- Ship designer ----

#[test]
fn test_designer_edits_in_ship_designer_state() {
    let mut engine = engine_with(1, 10);
    engine.queue_commands([
        enter(GameState::ShipDesigner),
        PlayerCommand::InstallWeapon {
            slot: 1,
            weapon: WeaponDefinition {
                weapon_type: WeaponType::Beam,
                damage: 2.0,
                ..WeaponDefinition::default()
            },
        },
        PlayerCommand::SetSlotStatus {
            slot: 0,
            status: SlotStatus::Damaged,
        },
        PlayerCommand::SetRecoilCompensation { value: 0.5 },
    ]);
    let snapshot = engine.tick(0.1);

    assert_eq!(snapshot.state, GameState::ShipDesigner);
    assert_eq!(
        snapshot.events,
        vec![SimEvent::StateChanged {
            from: GameState::Main,
            to: GameState::ShipDesigner
        }]
    );

    let config = engine.ship_config();
    assert_eq!(config.weaponry.slots[1].weapon.weapon_type, WeaponType::Beam);
    assert_eq!(config.weaponry.slots[0].status, SlotStatus::Damaged);
    assert_eq!(config.recoil_compensation, 0.5);
}

#[test]
fn test_invalid_designer_edit_keeps_ship() {
    let mut engine = engine_with(1, 0);
    let before = engine.ship().clone();

    assert!(engine
        .try_command(PlayerCommand::SetRecoilCompensation { value: -0.1 })
        .is_err());
    assert!(engine
        .try_command(PlayerCommand::InstallWeapon {
            slot: 0,
            weapon: WeaponDefinition {
                rate_of_fire: -1.0,
                ..WeaponDefinition::default()
            },
        })
        .is_err());
    assert_eq!(engine.ship(), &before);
}

#[test]
fn test_flight_controls_ignored_outside_play() {
    let mut engine = engine_with(1, 0);
    engine.queue_commands([
        PlayerCommand::Thrust { amount: 1.0 },
        PlayerCommand::Turn { radians: 1.0 },
    ]);
    let snapshot = engine.tick(0.1);
    assert_eq!(snapshot.ship.velocity, Velocity::default());
    assert_eq!(snapshot.ship.heading, 0.0);

    let mut engine = empty_play();
    engine.queue_commands([
        PlayerCommand::Turn {
            radians: std::f32::consts::FRAC_PI_2,
        },
        PlayerCommand::Thrust { amount: 2.0 },
    ]);
    let snapshot = engine.tick(0.0);
    assert_abs_diff_eq!(snapshot.ship.velocity.0.x, -2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(snapshot.ship.velocity.0.y, 0.0, epsilon = 1e-6);
}

// ---- Configuration ----

#[test]
fn test_invalid_ship_config_rejected() {
    init_logging();
    let mut config = SimConfig::default();
    config.ship.weaponry.weapon_count = 3;
    assert!(matches!(
        SimulationEngine::new(config),
        Err(SimError::Config(ConfigError::WeaponCountMismatch { .. }))
    ));
}

#[test]
fn test_load_ship_keeps_motion() {
    let mut engine = empty_play();
    engine.queue_command(PlayerCommand::Thrust { amount: 1.0 });
    engine.tick(0.0);

    let mut config = ShipConfig::default();
    config.stats.armor_strength = 80.0;
    engine.load_ship(&config).unwrap();
    assert_eq!(engine.ship().defenses.armor_strength, 80.0);
    assert_abs_diff_eq!(engine.ship().body.velocity.0.y, 1.0, epsilon = 1e-6);

    config.recoil_compensation = 3.0;
    assert!(engine.load_ship(&config).is_err());
    assert_eq!(engine.ship().defenses.armor_strength, 80.0);
}

#[test]
fn test_sim_config_json_round_trip() {
    let config = SimConfig {
        seed: 7,
        split_policy: SplitPolicy::Decrement,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: SimConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back.seed, 7);
    assert_eq!(back.split_policy, SplitPolicy::Decrement);
    assert_eq!(back.ship, config.ship);
}
