//! Combat resolution: ship shield/armor absorption, shield recharge, asteroid damage
//! and splitting, and the per-tick contact pass that ties them together.
//!
//! Destruction goes through the registry's mark/flush discipline. Damage to a handle
//! that is already marked this tick (or was flushed earlier) is skipped, so an asteroid
//! hit by two projectiles in one tick is destroyed and split exactly once. Both
//! projectiles are still spent.

use log::{debug, trace};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use rockbelt_core::components::{Asteroid, ShipDefenses};
use rockbelt_core::constants::{ASTEROID_RAM_DAMAGE, SPLIT_CHILD_RANGE};
use rockbelt_core::enums::{AsteroidSize, ContactKind, HudElement, SplitPolicy};
use rockbelt_core::events::SimEvent;
use rockbelt_core::types::{Handle, Position, Velocity};

use crate::physics::Contact;
use crate::registry::{EntityBody, EntityRegistry};
use crate::ship::Ship;
use crate::systems::spawner::{self, SpawnRequest};

/// What one contact pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactOutcome {
    /// Armor reached zero during this pass.
    pub ship_destroyed: bool,
    pub asteroids_destroyed: Vec<Handle>,
}

/// Apply `amount` to the ship's defenses.
///
/// A live shield absorbs the whole hit, collapsing to zero if the hit exceeds it; the
/// excess never reaches the armor. Armor is only touched once the shield is down, and
/// may go negative. Every hit restarts the recharge delay.
pub fn apply_ship_damage(defenses: ShipDefenses, amount: f32) -> (ShipDefenses, bool) {
    let mut next = defenses;
    if next.shield_strength > 0.0 {
        if amount >= next.shield_strength {
            next.shield_strength = 0.0;
        } else {
            next.shield_strength -= amount;
        }
    } else {
        next.armor_strength -= amount;
    }
    next.recharge_delay_elapsed = 0.0;
    let destroyed = next.armor_strength <= 0.0;
    (next, destroyed)
}

/// Advance the shield recharge state machine by `dt` seconds.
///
/// Pushes a shield HUD event whenever the shield value changes.
pub fn tick_shield_recharge(
    defenses: ShipDefenses,
    dt: f32,
    events: &mut Vec<SimEvent>,
) -> ShipDefenses {
    let mut next = defenses;
    if next.shield_strength < next.shield_max {
        if next.recharge_delay_elapsed < next.shield_delay {
            next.recharge_delay_elapsed += dt;
        } else {
            next.shield_strength =
                (next.shield_strength + next.shield_recharge * dt).min(next.shield_max);
        }
    } else if next.shield_strength > next.shield_max {
        next.shield_strength = next.shield_max;
    }

    if next.shield_strength != defenses.shield_strength {
        events.push(SimEvent::hud(HudElement::Shield, next.shield_strength));
    }
    next
}

/// Flat health subtraction. Returns true once health is at or below zero.
pub fn apply_asteroid_damage(asteroid: &mut Asteroid, amount: f32) -> bool {
    asteroid.health -= amount;
    asteroid.health <= 0.0
}

/// Children produced by destroying `asteroid`. Small asteroids leave nothing behind;
/// anything larger breaks into 2 to 4 pieces sharing its kind, position and velocity.
pub fn split(
    asteroid: &Asteroid,
    position: Position,
    velocity: Velocity,
    policy: SplitPolicy,
    rng: &mut ChaCha8Rng,
) -> Vec<SpawnRequest> {
    if asteroid.size == AsteroidSize::Small {
        return Vec::new();
    }
    let count = rng.gen_range(SPLIT_CHILD_RANGE);
    let request = SpawnRequest {
        kind: asteroid.kind,
        size: policy.child_size(asteroid.size),
        position,
        velocity,
    };
    vec![request; count as usize]
}

/// Resolve every contact reported for this tick.
pub fn resolve_contacts(
    contacts: &[Contact],
    registry: &mut EntityRegistry,
    ship: &mut Ship,
    policy: SplitPolicy,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
) -> ContactOutcome {
    let mut outcome = ContactOutcome::default();

    for contact in contacts {
        let Some(asteroid) = contact.second.entity() else {
            continue;
        };
        match contact.kind {
            ContactKind::ProjectileAsteroid => {
                let Some(projectile) = contact.first.entity() else {
                    continue;
                };
                let Some(shot) = registry.projectile(projectile) else {
                    trace!("contact with stale projectile {projectile} skipped");
                    continue;
                };
                // A shot is spent on contact even if its target died earlier this tick.
                registry.request_destroy(projectile);
                if !registry.is_live(asteroid) {
                    trace!("hit on stale asteroid {asteroid} skipped");
                    continue;
                }
                damage_asteroid(asteroid, shot.damage, registry, policy, rng, events, &mut outcome);
            }
            ContactKind::ShipAsteroid => {
                let Some(data) = registry.get(asteroid) else {
                    trace!("ram by stale asteroid {asteroid} skipped");
                    continue;
                };
                let EntityBody::Asteroid(rock) = data.body else {
                    continue;
                };
                if !outcome.ship_destroyed {
                    damage_ship(ship, ASTEROID_RAM_DAMAGE * rock.size.scale(), events, &mut outcome);
                }
                damage_asteroid(
                    asteroid,
                    ASTEROID_RAM_DAMAGE,
                    registry,
                    policy,
                    rng,
                    events,
                    &mut outcome,
                );
            }
        }
    }

    outcome
}

fn damage_ship(ship: &mut Ship, amount: f32, events: &mut Vec<SimEvent>, outcome: &mut ContactOutcome) {
    let before = ship.defenses;
    let (after, destroyed) = apply_ship_damage(before, amount);
    ship.defenses = after;

    if after.shield_strength != before.shield_strength {
        events.push(SimEvent::hud(HudElement::Shield, after.shield_strength));
    }
    if after.armor_strength != before.armor_strength {
        events.push(SimEvent::hud(HudElement::Armor, after.armor_strength));
    }
    if destroyed {
        debug!("ship destroyed (armor {:.2})", after.armor_strength);
        events.push(SimEvent::ShipDestroyed);
        outcome.ship_destroyed = true;
    }
}

fn damage_asteroid(
    handle: Handle,
    amount: f32,
    registry: &mut EntityRegistry,
    policy: SplitPolicy,
    rng: &mut ChaCha8Rng,
    events: &mut Vec<SimEvent>,
    outcome: &mut ContactOutcome,
) {
    let Some(asteroid) = registry.asteroid_mut(handle) else {
        return;
    };
    if !apply_asteroid_damage(asteroid, amount) {
        return;
    }
    let parent = *asteroid;
    let Some(data) = registry.get(handle) else {
        return;
    };

    registry.request_destroy(handle);
    let children = split(&parent, data.position, data.velocity, policy, rng);
    spawner::spawn_split_children(registry, &children);

    debug!(
        "asteroid {handle} ({:?} {:?}) destroyed, {} children",
        parent.kind,
        parent.size,
        children.len()
    );
    events.push(SimEvent::AsteroidDestroyed {
        handle,
        kind: parent.kind,
        size: parent.size,
        children: children.len() as u32,
    });
    outcome.asteroids_destroyed.push(handle);
}
