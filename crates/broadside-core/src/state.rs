//! Simulation snapshot: the visible state handed to rendering/HUD each tick.

use serde::{Deserialize, Serialize};

use crate::components::CombatEffects;
use crate::enums::{ShellOwner, VesselRole};
use crate::events::EffectRequest;
use crate::types::{Position, SimTime, VesselId};

/// Complete state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time: SimTime,
    /// Vessel under player control, if any remains.
    pub player: Option<VesselId>,
    /// Vessel highlighted in the HUD.
    pub selected: Option<VesselId>,
    pub vessels: Vec<VesselView>,
    pub shells: Vec<ShellView>,
    /// Effects requested during this tick.
    pub effects: Vec<EffectRequest>,
}

/// Per-compartment damage status for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompartmentStatus {
    pub name: String,
    pub damage_percent: u8,
    pub on_fire: bool,
    pub destroyed: bool,
    pub floodable: bool,
}

/// Where a turret's muzzle is and where it points, in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurretMuzzle {
    pub x: f64,
    pub y: f64,
    /// World aim angle in degrees (0 = up).
    pub world_aim_angle: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurretView {
    pub id: u8,
    pub muzzle: TurretMuzzle,
    pub destroyed: bool,
    pub reloading: bool,
}

/// A vessel as seen by the HUD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VesselView {
    pub id: VesselId,
    /// Display name, with the sunk suffix when sunk.
    pub name: String,
    pub type_label: String,
    pub role: VesselRole,
    pub position: Position,
    pub heading: f64,
    pub speed_kts: f64,
    pub sunk: bool,
    pub fleet_leader: bool,
    pub compartments: Vec<CompartmentStatus>,
    pub turrets: Vec<TurretView>,
    pub effects: CombatEffects,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellView {
    pub position: Position,
    pub owner: ShellOwner,
}
