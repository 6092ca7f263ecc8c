//! Simulation engine for rockbelt.
//!
//! Owns the entity registry, the ship and the game state machine, advances them one
//! caller-clocked tick at a time, and produces `SimSnapshot`s for the presentation layer.

pub mod combat;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod physics;
pub mod registry;
pub mod ship;
pub mod systems;

pub use engine::{SimConfig, SimulationEngine};
pub use error::SimError;
pub use rockbelt_core as core;

#[cfg(test)]
mod tests;
