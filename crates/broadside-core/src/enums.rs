//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Which side of the engagement a vessel fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Friendly,
    Enemy,
}

impl Side {
    pub fn opposing(self) -> Side {
        match self {
            Side::Friendly => Side::Enemy,
            Side::Enemy => Side::Friendly,
        }
    }
}

/// Who is commanding a vessel. Carries the side implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VesselRole {
    /// The vessel under direct player control.
    Player,
    /// AI-controlled vessel on the player's side.
    Friendly,
    /// AI-controlled hostile vessel.
    Enemy,
}

impl VesselRole {
    pub fn side(self) -> Side {
        match self {
            VesselRole::Player | VesselRole::Friendly => Side::Friendly,
            VesselRole::Enemy => Side::Enemy,
        }
    }

    /// Default role for an AI vessel spawned on `side`.
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Friendly => VesselRole::Friendly,
            Side::Enemy => VesselRole::Enemy,
        }
    }
}

/// Owner classification stamped on a shell when it is fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellOwner {
    Player,
    Friendly,
    Enemy,
}

impl ShellOwner {
    pub fn side(self) -> Side {
        match self {
            ShellOwner::Player | ShellOwner::Friendly => Side::Friendly,
            ShellOwner::Enemy => Side::Enemy,
        }
    }
}

impl From<VesselRole> for ShellOwner {
    fn from(role: VesselRole) -> Self {
        match role {
            VesselRole::Player => ShellOwner::Player,
            VesselRole::Friendly => ShellOwner::Friendly,
            VesselRole::Enemy => ShellOwner::Enemy,
        }
    }
}

/// Where on the hull a turret sits. Decides tie-breaks when the
/// desired bearing falls inside the forbidden arc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretMount {
    /// Forward/top mount: takes the boundary nearer the bow on a tie.
    #[default]
    Forward,
    /// Aft/bottom mount: holds position on a tie.
    Aft,
}

/// Vessel lifecycle. Advances one way only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Sink transition handled; entity is removed once `despawn_at` passes.
    Sinking { despawn_at: f64 },
    Despawned,
}

/// Terminal outcome of a shell. Every shell resolves to exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellOutcome {
    /// Penetration budget exhausted over land.
    TerrainExplosion,
    /// Struck a hull.
    HullExplosion,
    /// Fell into the water with no hit.
    Splash,
}

/// Damage-control team slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepairTeam {
    One,
    Two,
}

impl RepairTeam {
    /// Team numbers exposed to the UI are 1 and 2.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(RepairTeam::One),
            2 => Some(RepairTeam::Two),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            RepairTeam::One => 0,
            RepairTeam::Two => 1,
        }
    }
}
