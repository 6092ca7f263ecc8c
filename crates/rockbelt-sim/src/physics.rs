//! Physics and collision collaborator.
//!
//! The engine does not own rigid-body dynamics. It hands positions to a `Physics`
//! implementation, which integrates motion, reports contacts and absorbs impulses.
//! `KinematicPhysics` is the built-in implementation: constant-velocity motion and
//! circle-overlap contacts. A contact is reported on the tick the overlap begins, not
//! on every tick it persists, so damage per overlap does not depend on the frame rate.

use std::collections::HashSet;

use glam::Vec2;

use rockbelt_core::constants::{ASTEROID_BASE_RADIUS, PROJECTILE_RADIUS};
use rockbelt_core::enums::{ContactKind, EntityKind};
use rockbelt_core::types::Handle;

use crate::registry::{EntityBody, EntityRegistry};
use crate::ship::ShipBody;

/// One side of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Ship,
    Entity(Handle),
}

/// A contact reported for the current tick.
///
/// For `ProjectileAsteroid`, `first` is the projectile and `second` the asteroid.
/// For `ShipAsteroid`, `first` is the ship and `second` the asteroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub first: Body,
    pub second: Body,
    pub kind: ContactKind,
}

pub trait Physics {
    /// Advance all motion by `dt` seconds.
    fn integrate(&mut self, registry: &mut EntityRegistry, ship: &mut ShipBody, dt: f32);

    /// Contacts that began this tick between live bodies, in a deterministic order.
    fn contacts(&mut self, registry: &EntityRegistry, ship: &ShipBody, ship_radius: f32)
        -> Vec<Contact>;

    /// Apply an instantaneous impulse to the ship.
    fn apply_impulse(&mut self, ship: &mut ShipBody, impulse: Vec2);
}

impl Body {
    pub fn entity(self) -> Option<Handle> {
        match self {
            Body::Entity(handle) => Some(handle),
            Body::Ship => None,
        }
    }
}

impl Contact {
    pub fn projectile_asteroid(projectile: Handle, asteroid: Handle) -> Self {
        Self {
            first: Body::Entity(projectile),
            second: Body::Entity(asteroid),
            kind: ContactKind::ProjectileAsteroid,
        }
    }

    pub fn ship_asteroid(asteroid: Handle) -> Self {
        Self {
            first: Body::Ship,
            second: Body::Entity(asteroid),
            kind: ContactKind::ShipAsteroid,
        }
    }
}

/// Collision radius of a registry body.
pub fn body_radius(body: &EntityBody) -> f32 {
    match body {
        EntityBody::Asteroid(asteroid) => ASTEROID_BASE_RADIUS * asteroid.size.scale(),
        EntityBody::Projectile(_) => PROJECTILE_RADIUS,
    }
}

/// Explicit Euler integration with circle-overlap contact detection.
#[derive(Debug, Default, Clone)]
pub struct KinematicPhysics {
    /// Pairs overlapping at the end of the previous `contacts` call.
    touching: HashSet<(Body, Body)>,
}

impl KinematicPhysics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Physics for KinematicPhysics {
    fn integrate(&mut self, registry: &mut EntityRegistry, ship: &mut ShipBody, dt: f32) {
        registry.for_each_motion_mut(|_, pos, vel| {
            pos.0 += vel.0 * dt;
        });
        ship.position.0 += ship.velocity.0 * dt;
    }

    fn contacts(
        &mut self,
        registry: &EntityRegistry,
        ship: &ShipBody,
        ship_radius: f32,
    ) -> Vec<Contact> {
        let asteroids = registry.query(EntityKind::Asteroid);
        let projectiles = registry.query(EntityKind::Projectile);
        let mut overlaps = Vec::new();

        for (p_handle, p) in &projectiles {
            for (a_handle, a) in &asteroids {
                let reach = PROJECTILE_RADIUS + body_radius(&a.body);
                if p.position.distance_to(&a.position) <= reach {
                    overlaps.push(Contact::projectile_asteroid(*p_handle, *a_handle));
                }
            }
        }

        for (a_handle, a) in &asteroids {
            let reach = ship_radius + body_radius(&a.body);
            if ship.position.distance_to(&a.position) <= reach {
                overlaps.push(Contact::ship_asteroid(*a_handle));
            }
        }

        let previous = std::mem::take(&mut self.touching);
        let mut contacts = Vec::new();
        for contact in overlaps {
            let pair = (contact.first, contact.second);
            if !previous.contains(&pair) {
                contacts.push(contact);
            }
            self.touching.insert(pair);
        }
        contacts
    }

    fn apply_impulse(&mut self, ship: &mut ShipBody, impulse: Vec2) {
        if ship.mass > 0.0 {
            ship.velocity.0 += impulse / ship.mass;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use rockbelt_core::components::{Asteroid, Projectile};
    use rockbelt_core::enums::{AsteroidKind, AsteroidSize, WeaponType};
    use rockbelt_core::types::{Position, Velocity};

    use super::*;
    use crate::registry::EntityData;

    #[test]
    fn integrate_moves_entities_and_ship() {
        let mut registry = EntityRegistry::new();
        let h = registry.spawn(EntityData::asteroid(
            Asteroid::new(AsteroidKind::Ice, AsteroidSize::Small),
            Position::new(2.0, 2.0),
            Velocity::new(0.5, -0.25),
        ));
        let mut ship = ShipBody {
            velocity: Velocity::new(1.0, 0.0),
            ..ShipBody::default()
        };

        let mut physics = KinematicPhysics::new();
        for _ in 0..4 {
            physics.integrate(&mut registry, &mut ship, 0.5);
        }

        let pos = registry.get(h).unwrap().position;
        assert_abs_diff_eq!(pos.0.x, 3.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pos.0.y, 1.5, epsilon = 1e-6);
        assert_abs_diff_eq!(ship.position.0.x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn overlap_reports_projectile_then_ship_contacts() {
        let mut registry = EntityRegistry::new();
        let rock = registry.spawn(EntityData::asteroid(
            Asteroid::new(AsteroidKind::Rock, AsteroidSize::Large),
            Position::new(0.0, 0.5),
            Velocity::default(),
        ));
        let shot = registry.spawn(EntityData::projectile(
            Projectile::new(5.0, WeaponType::Projectile, 0),
            Position::new(0.0, 0.3),
            Velocity::default(),
        ));
        registry.spawn(EntityData::projectile(
            Projectile::new(5.0, WeaponType::Projectile, 1),
            Position::new(3.0, 3.0),
            Velocity::default(),
        ));

        let contacts = KinematicPhysics::new().contacts(&registry, &ShipBody::default(), 0.25);
        assert_eq!(
            contacts,
            vec![
                Contact::projectile_asteroid(shot, rock),
                Contact::ship_asteroid(rock)
            ]
        );
    }

    #[test]
    fn impulse_divides_by_mass() {
        let mut ship = ShipBody {
            mass: 2.0,
            ..ShipBody::default()
        };
        KinematicPhysics::new().apply_impulse(&mut ship, Vec2::new(0.0, -1.0));
        assert_abs_diff_eq!(ship.velocity.0.y, -0.5);
    }

    #[test]
    fn persistent_overlap_reports_once() {
        let mut registry = EntityRegistry::new();
        let rock = registry.spawn(EntityData::asteroid(
            Asteroid::new(AsteroidKind::Iron, AsteroidSize::Small),
            Position::new(0.1, 0.0),
            Velocity::default(),
        ));
        let mut ship = ShipBody::default();
        let mut physics = KinematicPhysics::new();

        assert_eq!(
            physics.contacts(&registry, &ship, 0.25),
            vec![Contact::ship_asteroid(rock)]
        );
        for _ in 0..5 {
            assert!(physics.contacts(&registry, &ship, 0.25).is_empty());
        }

        // Separate, then touch again: a new contact.
        ship.position = Position::new(3.0, 3.0);
        assert!(physics.contacts(&registry, &ship, 0.25).is_empty());
        ship.position = Position::default();
        assert_eq!(
            physics.contacts(&registry, &ship, 0.25),
            vec![Contact::ship_asteroid(rock)]
        );
    }
}
