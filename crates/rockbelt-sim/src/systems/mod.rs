//! Systems run by the engine each tick.
//!
//! Systems are free functions over the registry and ship. They own no state.

pub mod lifetime;
pub mod snapshot;
pub mod spawner;
pub mod weapons;
