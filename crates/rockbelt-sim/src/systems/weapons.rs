//! Weapon fire controller: per-slot cooldown timers and fire intents.

use glam::Vec2;
use log::{debug, warn};

use rockbelt_core::components::{Projectile, ShipWeaponry};
use rockbelt_core::config::check_slot_index;
use rockbelt_core::enums::{EntityKind, SlotStatus};
use rockbelt_core::events::SimEvent;
use rockbelt_core::types::{Handle, Position, Velocity};

use crate::error::SimError;
use crate::physics::Physics;
use crate::registry::{EntityData, EntityRegistry};
use crate::ship::Ship;

/// Count every slot's cooldown down by `dt`, stopping at zero.
pub fn tick_cooldowns(weaponry: &mut ShipWeaponry, dt: f32) {
    for slot in &mut weaponry.slots {
        slot.cooldown_remaining = (slot.cooldown_remaining - dt).max(0.0);
    }
}

/// Try to fire one slot.
///
/// Returns the spawned projectile, or `None` when the slot is not enabled or still
/// cooling down. Only an out-of-range slot index is an error.
pub fn fire(
    slot: usize,
    ship: &mut Ship,
    registry: &mut EntityRegistry,
    physics: &mut dyn Physics,
    events: &mut Vec<SimEvent>,
) -> Result<Option<Handle>, SimError> {
    check_slot_index(&ship.weaponry, slot)?;

    let mount = ship.weaponry.slots[slot];
    if mount.status != SlotStatus::Enabled || mount.cooldown_remaining > 0.0 {
        return Ok(None);
    }

    let weapon = mount.weapon;
    let direction =
        Vec2::from_angle(ship.body.heading + mount.rotation_offset).rotate(Vec2::Y);
    let origin = ship.body.to_world(mount.position_offset);
    let damage = weapon.damage * ship.weaponry.damage_modifier;

    let handle = registry.spawn(EntityData::projectile(
        Projectile::new(damage, weapon.weapon_type, slot),
        Position(origin),
        Velocity(direction * weapon.speed),
    ));

    let recoil = weapon.recoil * (1.0 - ship.recoil_compensation);
    physics.apply_impulse(&mut ship.body, -direction * recoil);

    ship.weaponry.slots[slot].cooldown_remaining =
        weapon.rate_of_fire / ship.weaponry.rate_modifier;

    debug!("slot {slot} fired {handle} ({damage:.2} dmg)");
    events.push(SimEvent::EntitySpawned {
        handle,
        kind: EntityKind::Projectile,
    });
    events.push(SimEvent::WeaponFired { slot, handle });
    Ok(Some(handle))
}

/// Advance cooldowns, then service this tick's fire intents in order.
pub fn run(
    ship: &mut Ship,
    intents: &[usize],
    dt: f32,
    registry: &mut EntityRegistry,
    physics: &mut dyn Physics,
    events: &mut Vec<SimEvent>,
) -> Vec<Handle> {
    tick_cooldowns(&mut ship.weaponry, dt);

    let mut fired = Vec::new();
    for &slot in intents {
        match fire(slot, ship, registry, physics, events) {
            Ok(Some(handle)) => fired.push(handle),
            Ok(None) => {}
            Err(err) => warn!("fire intent dropped: {err}"),
        }
    }
    fired
}
