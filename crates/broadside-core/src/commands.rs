//! Commands sent from UI/targeting collaborators to the simulation.
//!
//! Commands are queued and applied at the next tick boundary. Every command
//! names the vessel it commands explicitly; there is no implicit selection.

use serde::{Deserialize, Serialize};

use crate::components::TargetSpec;
use crate::types::VesselId;

/// All possible inputs from the outer shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FleetCommand {
    // --- Fire control ---
    /// Aim a vessel's turret group at a point or vessel, or clear the target.
    SetTarget {
        group: VesselId,
        target: Option<TargetSpec>,
    },
    /// Allow or forbid a turret group to fire.
    SetFireEnabled { group: VesselId, enabled: bool },

    // --- Damage control ---
    /// Send a repair team to a compartment. `None` recalls the team.
    AssignRepairTeam {
        team: u8,
        vessel: VesselId,
        compartment: Option<String>,
    },

    // --- Helm ---
    /// Set desired heading (degrees) and throttle (knots).
    SetHelm {
        vessel: VesselId,
        heading: f64,
        speed_kts: f64,
    },

    // --- Selection / lifecycle ---
    /// Highlight a vessel in the HUD.
    Select { vessel: Option<VesselId> },
    /// Remove a vessel immediately.
    DespawnVessel { vessel: VesselId },
}
