//! Core types and definitions for the rockbelt simulation.
//!
//! This crate defines the vocabulary shared by the engine and its collaborators:
//! components, commands, snapshots, events, ship configuration and constants.
//! It has no dependency on the ECS or on any presentation layer.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
