//! ECS components for hecs entities.
//!
//! Components are plain data structs. Game logic lives in the sim
//! crate's systems and damage module, not here.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{ForbiddenArc, Position, Velocity, VesselId};

/// Helm and identity data for a vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hull {
    pub id: VesselId,
    /// Display name. Gains the sunk suffix once on sinking.
    pub name: String,
    /// Class label the vessel was spawned from ("battleship", "destroyer", ...).
    pub type_label: String,
    /// Current heading in degrees (0 = up).
    pub heading: f64,
    /// Heading the helm is turning toward.
    pub desired_heading: f64,
    /// Current speed in knots (negative = astern).
    pub speed_kts: f64,
    /// Throttle setting in knots.
    pub target_speed_kts: f64,
    /// Undamaged top speed in knots.
    pub max_speed_kts: f64,
    /// Undamaged turn rate in degrees per second.
    pub turn_rate: f64,
    /// Base gunnery accuracy of this class (0.0 - 1.0).
    pub base_accuracy: f64,
    /// Maximum engagement range in world units.
    pub max_range: f64,
}

/// Muzzle position in hull-local coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MuzzleOffset {
    /// Distance toward the bow (world units).
    pub forward: f64,
    /// Distance toward starboard (world units).
    pub starboard: f64,
}

/// A gun turret mounted on a hull.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turret {
    pub id: u8,
    /// Name of the compartment that acts as this turret's hitbox.
    pub compartment: String,
    /// Angle relative to hull heading (degrees, 0 = bow).
    pub angle: f64,
    /// Dead zone the turret may never point into.
    pub forbidden: Option<ForbiddenArc>,
    pub mount: TurretMount,
    pub offset: MuzzleOffset,
    /// Barrel length; the muzzle sits this far along the aim line from the mount.
    pub barrel_length: f64,
    /// Seconds until this turret may fire again.
    pub cooldown_secs: f64,
    /// Desired relative angle computed this tick (None when no target).
    pub desired_angle: Option<f64>,
}

/// Ordered turret list of a vessel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Turrets(pub Vec<Turret>);

/// A named, independently damageable region of a vessel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Compartment {
    pub name: String,
    pub max_hp: f64,
    pub current_hp: f64,
    /// `round(100 * (1 - current_hp / max_hp))`, kept in sync by the damage model.
    pub damage_percent: u8,
    pub floodable: bool,
    pub on_fire: bool,
    pub destroyed: bool,
    /// Catastrophic detonation at full damage, regardless of name.
    #[serde(default)]
    pub detonates: bool,
    /// Water taken on (0.0 - 1.0). Only floodable compartments flood.
    #[serde(default)]
    pub flood_level: f64,
}

/// Authoritative per-vessel compartment ledger.
///
/// Mutated only through the sim crate's damage module.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageLedger {
    pub compartments: Vec<Compartment>,
    /// Compartments whose fire contribution is locked at its maximum.
    pub fire_locks: Vec<String>,
    pub sunk: bool,
}

/// Aggregate capability multipliers derived from the ledger.
/// 1.0 means undamaged for every factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatEffects {
    /// Fraction of max speed still available.
    pub speed_cap: f64,
    pub acceleration_factor: f64,
    pub turn_rate_factor: f64,
    pub rudder_effectiveness: f64,
    pub targeting_effectiveness: f64,
    /// Overall flood level (0 - 100).
    pub flooding_percent: f64,
    /// Overall fire level (0 - 100).
    pub fire_percent: f64,
    pub damage_control_efficiency: f64,
}

impl Default for CombatEffects {
    fn default() -> Self {
        Self {
            speed_cap: 1.0,
            acceleration_factor: 1.0,
            turn_rate_factor: 1.0,
            rudder_effectiveness: 1.0,
            targeting_effectiveness: 1.0,
            flooding_percent: 0.0,
            fire_percent: 0.0,
            damage_control_efficiency: 1.0,
        }
    }
}

/// What a turret group is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TargetSpec {
    Point { position: Position },
    Vessel { vessel: VesselId },
}

/// Fire-control state of a vessel's turret group.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FireControl {
    pub target: Option<TargetSpec>,
    pub fire_enabled: bool,
    /// AI picks its own targets when true.
    pub auto_engage: bool,
}

/// Velocity estimated from recent position deltas, as seen by enemy gunners.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MotionEstimate {
    pub last_position: Position,
    pub velocity: Velocity,
    pub primed: bool,
}

/// Stable formation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FleetId(pub u32);

/// Formation membership marker on a vessel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FleetMember {
    pub fleet: FleetId,
}

/// A shell in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shell {
    pub origin: Position,
    /// Fixed aim point, already including deliberate deviation.
    pub target_point: Option<Position>,
    /// Seconds left before the shell falls into the sea.
    pub ttl_secs: f64,
    pub owner: ShellOwner,
    pub shooter: VesselId,
    pub turret: u8,
    /// Distance the shell may still travel over land.
    pub penetration_budget: f64,
    pub damage: f64,
}

/// Damage-control team assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairAssignment {
    pub team: RepairTeam,
    pub vessel: VesselId,
    pub compartment: String,
}
