//! Entity registry: owns every live asteroid and projectile.
//!
//! Entities live in a `hecs::World` and are referred to everywhere else by `Handle`.
//! Destruction is two-phase: `request_destroy` only marks, and `flush` removes all
//! marked entities in one pass before materializing the spawns queued during the
//! tick. Marked entities are invisible to every read path, so a collision callback
//! never observes a half-destroyed sibling, and queued children never take part in
//! the collision pass that created them.

use std::collections::HashSet;

use hecs::{Entity, World};
use log::trace;

use rockbelt_core::components::{Asteroid, Projectile};
use rockbelt_core::enums::EntityKind;
use rockbelt_core::types::{Handle, Position, Velocity};

/// What an entity is, independent of where it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntityBody {
    Asteroid(Asteroid),
    Projectile(Projectile),
}

/// Full description of one entity, used both to spawn and to read back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityData {
    pub position: Position,
    pub velocity: Velocity,
    pub body: EntityBody,
}

/// Result of one `flush`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlushReport {
    pub removed: Vec<(Handle, EntityKind)>,
    pub spawned: Vec<(Handle, EntityKind)>,
}

#[derive(Default)]
pub struct EntityRegistry {
    world: World,
    /// Marked for removal at the next flush, in request order.
    despawn_buffer: Vec<Entity>,
    marked: HashSet<Entity>,
    pending_spawns: Vec<EntityData>,
}

impl EntityBody {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityBody::Asteroid(_) => EntityKind::Asteroid,
            EntityBody::Projectile(_) => EntityKind::Projectile,
        }
    }
}

impl EntityData {
    pub fn asteroid(asteroid: Asteroid, position: Position, velocity: Velocity) -> Self {
        Self {
            position,
            velocity,
            body: EntityBody::Asteroid(asteroid),
        }
    }

    pub fn projectile(projectile: Projectile, position: Position, velocity: Velocity) -> Self {
        Self {
            position,
            velocity,
            body: EntityBody::Projectile(projectile),
        }
    }
}

fn to_handle(entity: Entity) -> Handle {
    Handle::from_raw(entity.to_bits().get())
}

fn to_entity(handle: Handle) -> Option<Entity> {
    Entity::from_bits(handle.to_raw())
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity into the live set immediately.
    pub fn spawn(&mut self, data: EntityData) -> Handle {
        let entity = match data.body {
            EntityBody::Asteroid(asteroid) => {
                self.world.spawn((data.position, data.velocity, asteroid))
            }
            EntityBody::Projectile(projectile) => {
                self.world.spawn((data.position, data.velocity, projectile))
            }
        };
        to_handle(entity)
    }

    /// Queue an entity to be spawned by the next `flush`.
    pub fn queue_spawn(&mut self, data: EntityData) {
        self.pending_spawns.push(data);
    }

    /// Mark an entity for removal at the next flush.
    /// Unknown or already-marked handles are ignored.
    pub fn request_destroy(&mut self, handle: Handle) {
        let Some(entity) = self.resolve(handle) else {
            trace!("destroy of stale handle {handle} ignored");
            return;
        };
        if self.marked.insert(entity) {
            self.despawn_buffer.push(entity);
        }
    }

    /// Remove every marked entity, then realize every queued spawn.
    pub fn flush(&mut self) -> FlushReport {
        let mut report = FlushReport::default();

        for entity in self.despawn_buffer.drain(..) {
            let kind = kind_of(&self.world, entity);
            if self.world.despawn(entity).is_ok() {
                if let Some(kind) = kind {
                    report.removed.push((to_handle(entity), kind));
                }
            }
        }
        self.marked.clear();

        let pending = std::mem::take(&mut self.pending_spawns);
        for data in pending {
            let kind = data.body.kind();
            let handle = self.spawn(data);
            report.spawned.push((handle, kind));
        }

        report
    }

    /// Read-only snapshot of every live, unmarked entity of `kind`.
    pub fn query(&self, kind: EntityKind) -> Vec<(Handle, EntityData)> {
        match kind {
            EntityKind::Asteroid => self
                .world
                .query::<(&Position, &Velocity, &Asteroid)>()
                .iter()
                .filter(|(entity, _)| !self.marked.contains(entity))
                .map(|(entity, (pos, vel, asteroid))| {
                    (to_handle(entity), EntityData::asteroid(*asteroid, *pos, *vel))
                })
                .collect(),
            EntityKind::Projectile => self
                .world
                .query::<(&Position, &Velocity, &Projectile)>()
                .iter()
                .filter(|(entity, _)| !self.marked.contains(entity))
                .map(|(entity, (pos, vel, projectile))| {
                    (
                        to_handle(entity),
                        EntityData::projectile(*projectile, *pos, *vel),
                    )
                })
                .collect(),
        }
    }

    /// Copy of one live, unmarked entity.
    pub fn get(&self, handle: Handle) -> Option<EntityData> {
        let entity = self.resolve(handle)?;
        if self.marked.contains(&entity) {
            return None;
        }
        let pos = *self.world.get::<&Position>(entity).ok()?;
        let vel = *self.world.get::<&Velocity>(entity).ok()?;
        if let Ok(asteroid) = self.world.get::<&Asteroid>(entity) {
            return Some(EntityData::asteroid(*asteroid, pos, vel));
        }
        let projectile = *self.world.get::<&Projectile>(entity).ok()?;
        Some(EntityData::projectile(projectile, pos, vel))
    }

    pub fn asteroid_mut(&mut self, handle: Handle) -> Option<&mut Asteroid> {
        let entity = self.live_entity(handle)?;
        self.world.query_one_mut::<&mut Asteroid>(entity).ok()
    }

    pub fn projectile(&self, handle: Handle) -> Option<Projectile> {
        let entity = self.live_entity(handle)?;
        self.world.get::<&Projectile>(entity).ok().map(|p| *p)
    }

    /// Apply `f` to the motion state of every unmarked entity.
    pub fn for_each_motion_mut(&mut self, mut f: impl FnMut(Handle, &mut Position, &mut Velocity)) {
        let marked = &self.marked;
        for (entity, (pos, vel)) in self.world.query_mut::<(&mut Position, &mut Velocity)>() {
            if !marked.contains(&entity) {
                f(to_handle(entity), pos, vel);
            }
        }
    }

    /// Apply `f` to every unmarked projectile.
    pub fn for_each_projectile_mut(&mut self, mut f: impl FnMut(Handle, &mut Projectile)) {
        let marked = &self.marked;
        for (entity, projectile) in self.world.query_mut::<&mut Projectile>() {
            if !marked.contains(&entity) {
                f(to_handle(entity), projectile);
            }
        }
    }

    /// Live and not marked for destruction.
    pub fn is_live(&self, handle: Handle) -> bool {
        self.live_entity(handle).is_some()
    }

    pub fn is_marked(&self, handle: Handle) -> bool {
        to_entity(handle).is_some_and(|e| self.marked.contains(&e))
    }

    /// Number of entities in the world, marked ones included.
    pub fn len(&self) -> usize {
        self.world.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.world.len() == 0
    }

    pub fn pending_spawn_count(&self) -> usize {
        self.pending_spawns.len()
    }

    /// Despawn everything, including marked and queued entities. Returns removed handles.
    ///
    /// Entities are despawned one by one so their generations advance and old handles
    /// stay stale.
    pub fn clear(&mut self) -> Vec<(Handle, EntityKind)> {
        let entities: Vec<Entity> = self.world.iter().map(|e| e.entity()).collect();
        let mut removed = Vec::with_capacity(entities.len());
        for entity in entities {
            let kind = kind_of(&self.world, entity);
            if self.world.despawn(entity).is_ok() {
                if let Some(kind) = kind {
                    removed.push((to_handle(entity), kind));
                }
            }
        }
        self.despawn_buffer.clear();
        self.marked.clear();
        self.pending_spawns.clear();
        removed
    }

    fn resolve(&self, handle: Handle) -> Option<Entity> {
        to_entity(handle).filter(|e| self.world.contains(*e))
    }

    fn live_entity(&self, handle: Handle) -> Option<Entity> {
        self.resolve(handle).filter(|e| !self.marked.contains(e))
    }
}

fn kind_of(world: &World, entity: Entity) -> Option<EntityKind> {
    let entity_ref = world.entity(entity).ok()?;
    if entity_ref.has::<Asteroid>() {
        Some(EntityKind::Asteroid)
    } else if entity_ref.has::<Projectile>() {
        Some(EntityKind::Projectile)
    } else {
        None
    }
}
