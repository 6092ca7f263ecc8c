//! Asteroid spawning: the initial wave and the children of split asteroids.

use glam::Vec2;
use log::{debug, info};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rockbelt_core::components::Asteroid;
use rockbelt_core::constants::*;
use rockbelt_core::enums::{AsteroidKind, AsteroidSize, EntityKind};
use rockbelt_core::events::SimEvent;
use rockbelt_core::types::{Handle, Position, Velocity};

use crate::registry::{EntityData, EntityRegistry};

/// One asteroid to be created by a split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: AsteroidKind,
    pub size: AsteroidSize,
    pub position: Position,
    pub velocity: Velocity,
}

/// Spawn `count` asteroids scattered around the playfield, away from the axes.
/// They join the live set immediately.
pub fn spawn_initial_wave(
    registry: &mut EntityRegistry,
    rng: &mut ChaCha8Rng,
    count: usize,
    events: &mut Vec<SimEvent>,
) -> Vec<Handle> {
    let mut handles = Vec::with_capacity(count);
    for _ in 0..count {
        let kind = AsteroidKind::ALL[rng.gen_range(0..AsteroidKind::ALL.len())];
        let size = AsteroidSize::from_ordinal(rng.gen_range(0..ASTEROID_SIZE_ORDINALS));
        let velocity = Velocity::new(
            rng.gen_range(-SPAWN_MAX_AXIS_SPEED..=SPAWN_MAX_AXIS_SPEED),
            rng.gen_range(-SPAWN_MAX_AXIS_SPEED..=SPAWN_MAX_AXIS_SPEED),
        );
        let position = Position(sample_position(rng));

        let handle = registry.spawn(EntityData::asteroid(
            Asteroid::new(kind, size),
            position,
            velocity,
        ));
        events.push(SimEvent::EntitySpawned {
            handle,
            kind: EntityKind::Asteroid,
        });
        handles.push(handle);
    }
    info!("spawned initial wave of {count} asteroids");
    handles
}

/// Draw a spawn position by rejection sampling until it lies outside the
/// excluded cross around the origin.
pub fn sample_position(rng: &mut ChaCha8Rng) -> Vec2 {
    loop {
        let candidate = Vec2::new(
            rng.gen_range(SPAWN_X_MIN..=SPAWN_X_MAX),
            rng.gen_range(SPAWN_Y_MIN..=SPAWN_Y_MAX),
        );
        if !is_excluded(candidate) {
            return candidate;
        }
    }
}

/// True if `x` OR `y` lies strictly inside the exclusion band. The excluded region
/// is a cross along both axes, not a square around the origin.
pub fn is_excluded(point: Vec2) -> bool {
    let band = SPAWN_EXCLUSION_HALF_WIDTH;
    (point.x > -band && point.x < band) || (point.y > -band && point.y < band)
}

/// Queue the children of a split. They appear at the next registry flush.
pub fn spawn_split_children(registry: &mut EntityRegistry, requests: &[SpawnRequest]) {
    for request in requests {
        registry.queue_spawn(EntityData::asteroid(
            Asteroid::new(request.kind, request.size),
            request.position,
            request.velocity,
        ));
    }
    if !requests.is_empty() {
        debug!("queued {} split children", requests.len());
    }
}
