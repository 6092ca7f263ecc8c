//! Projectile lifetime: age every live projectile and expire it after its TTL.

use rockbelt_core::constants::PROJECTILE_TTL;
use rockbelt_core::types::Handle;

use crate::registry::EntityRegistry;

/// Age live projectiles by `dt` and mark those older than `PROJECTILE_TTL`.
///
/// Projectiles already marked this tick (by a contact) are neither aged nor marked
/// again. Returns the handles expired by age.
pub fn run(registry: &mut EntityRegistry, dt: f32) -> Vec<Handle> {
    let mut expired = Vec::new();
    registry.for_each_projectile_mut(|handle, projectile| {
        projectile.age_secs += dt;
        if projectile.age_secs > PROJECTILE_TTL {
            expired.push(handle);
        }
    });
    for &handle in &expired {
        registry.request_destroy(handle);
    }
    expired
}
