//! Simulation engine for BROADSIDE.
//!
//! Owns the hecs ECS world, resolves gunnery and damage each tick,
//! and produces SimSnapshots for rendering and audio collaborators.

pub mod ballistics;
pub mod damage;
pub mod engine;
pub mod roster;
pub mod systems;
pub mod world_setup;

pub use broadside_core as core;
pub use engine::{SimConfig, SimulationEngine};
pub use world_setup::SpawnRequest;

#[cfg(test)]
mod tests;
