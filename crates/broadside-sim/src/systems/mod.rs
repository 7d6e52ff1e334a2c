//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` (or `&World` for read-only).
//! Per-vessel state lives in components; formations, control state and
//! repair teams are owned by the engine and passed in.

pub mod aim;
pub mod effects;
pub mod fire_control;
pub mod fleet;
pub mod hazards;
pub mod movement;
pub mod projectile;
pub mod repair;
pub mod snapshot;
pub mod targeting;
