//! Snapshot system: queries the ECS world and builds a complete SimSnapshot.
//!
//! Read-only. Vessels are reported in spawn order so consumers can diff
//! successive frames.

use hecs::World;

use broadside_core::components::*;
use broadside_core::enums::VesselRole;
use broadside_core::events::EffectRequest;
use broadside_core::state::*;
use broadside_core::types::{Position, SimTime};

use crate::damage;
use crate::roster::Roster;
use crate::systems::aim;
use crate::systems::fleet::{ControlState, Fleets};

/// Build a complete SimSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    roster: &Roster,
    fleets: &Fleets,
    control: &ControlState,
    time: &SimTime,
    effects: Vec<EffectRequest>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        player: control.player,
        selected: control.selected,
        vessels: build_vessels(world, roster, fleets),
        shells: build_shells(world),
        effects,
    }
}

/// Vessels in spawn order.
fn build_vessels(world: &World, roster: &Roster, fleets: &Fleets) -> Vec<VesselView> {
    roster
        .ids()
        .iter()
        .filter_map(|id| {
            let entity = roster.resolve(*id).ok()?;
            let mut query = world
                .query_one::<(&Hull, &Position, &VesselRole, &DamageLedger, &Turrets, &CombatEffects)>(
                    entity,
                )
                .ok()?;
            let (hull, pos, role, ledger, turrets, fx) = query.get()?;
            Some(VesselView {
                id: *id,
                name: hull.name.clone(),
                type_label: hull.type_label.clone(),
                role: *role,
                position: *pos,
                heading: hull.heading,
                speed_kts: hull.speed_kts,
                sunk: ledger.sunk,
                fleet_leader: fleets.is_leader(*id),
                compartments: damage::compartment_status(ledger),
                turrets: build_turrets(pos, hull.heading, ledger, turrets),
                effects: *fx,
            })
        })
        .collect()
}

fn build_turrets(
    pos: &Position,
    heading: f64,
    ledger: &DamageLedger,
    turrets: &Turrets,
) -> Vec<TurretView> {
    turrets
        .0
        .iter()
        .map(|t| TurretView {
            id: t.id,
            muzzle: aim::turret_muzzle(pos, heading, t),
            destroyed: damage::turret_destroyed(ledger, &t.compartment),
            reloading: t.cooldown_secs > 0.0,
        })
        .collect()
}

fn build_shells(world: &World) -> Vec<ShellView> {
    world
        .query::<(&Position, &Shell)>()
        .iter()
        .map(|(_, (pos, shell))| ShellView {
            position: *pos,
            owner: shell.owner,
        })
        .collect()
}
