//! Snapshot system: reads the registry and ship and builds a complete SimSnapshot.
//!
//! This system is read-only.

use rockbelt_core::enums::{EntityKind, GameState};
use rockbelt_core::events::SimEvent;
use rockbelt_core::state::*;
use rockbelt_core::types::SimTime;

use crate::registry::{EntityBody, EntityRegistry};
use crate::ship::Ship;

/// Build the snapshot handed out at the end of a tick.
pub fn build_snapshot(
    registry: &EntityRegistry,
    ship: &Ship,
    time: &SimTime,
    state: GameState,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        state,
        ship: build_ship(ship),
        asteroids: build_asteroids(registry),
        projectiles: build_projectiles(registry),
        events,
    }
}

fn build_ship(ship: &Ship) -> ShipView {
    ShipView {
        position: ship.body.position,
        velocity: ship.body.velocity,
        heading: ship.body.heading,
        shield: ship.defenses.shield_strength,
        shield_max: ship.defenses.shield_max,
        armor: ship.defenses.armor_strength,
    }
}

/// Asteroid views sorted by handle so output order does not depend on archetype layout.
fn build_asteroids(registry: &EntityRegistry) -> Vec<AsteroidView> {
    let mut asteroids: Vec<AsteroidView> = registry
        .query(EntityKind::Asteroid)
        .into_iter()
        .filter_map(|(handle, data)| match data.body {
            EntityBody::Asteroid(asteroid) => Some(AsteroidView {
                handle,
                kind: asteroid.kind,
                size: asteroid.size,
                health: asteroid.health,
                position: data.position,
                scale: asteroid.size.scale(),
                sprite_index: asteroid.kind.sprite_index(),
            }),
            EntityBody::Projectile(_) => None,
        })
        .collect();
    asteroids.sort_by_key(|a| a.handle);
    asteroids
}

fn build_projectiles(registry: &EntityRegistry) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = registry
        .query(EntityKind::Projectile)
        .into_iter()
        .filter_map(|(handle, data)| match data.body {
            EntityBody::Projectile(projectile) => Some(ProjectileView {
                handle,
                weapon_type: projectile.weapon_type,
                position: data.position,
                velocity: data.velocity,
            }),
            EntityBody::Asteroid(_) => None,
        })
        .collect();
    projectiles.sort_by_key(|p| p.handle);
    projectiles
}
