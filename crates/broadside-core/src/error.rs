//! Lookup failures shared by every resolve helper.
//!
//! These never escape the simulation's public API; call sites turn them
//! into "nothing happens" after logging.

use thiserror::Error;

use crate::types::VesselId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("vessel {0} does not exist")]
    VesselNotFound(VesselId),
    #[error("vessel {0} has sunk")]
    VesselSunk(VesselId),
    #[error("vessel {vessel} has no compartment named {name:?}")]
    CompartmentNotFound { vessel: VesselId, name: String },
    #[error("vessel {vessel} has no turret {turret}")]
    TurretNotFound { vessel: VesselId, turret: u8 },
}
