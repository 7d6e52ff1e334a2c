//! Terrain for BROADSIDE.
//!
//! A packed land/sea mask over the battle area. Shells query it to
//! decide whether they are flying over solid ground.

pub use broadside_core as core;

pub mod grid;

pub use grid::{LandMask, MaskHeader};
