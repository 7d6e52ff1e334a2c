//! Damage-control teams: turn standing assignments into gradual repair.

use hecs::World;
use tracing::debug;

use broadside_core::components::{CombatEffects, DamageLedger, RepairAssignment};
use broadside_core::config::RepairConfig;
use broadside_core::enums::RepairTeam;
use broadside_core::error::LookupError;
use broadside_core::types::VesselId;

use crate::damage;
use crate::roster::Roster;

/// The two damage-control teams and where each is working.
#[derive(Debug, Clone, Default)]
pub struct RepairTeams {
    slots: [Option<RepairAssignment>; 2],
}

impl RepairTeams {
    /// Send `team` to a compartment, or recall it with `None`.
    pub fn assign(&mut self, team: RepairTeam, vessel: VesselId, compartment: Option<String>) {
        self.slots[team.index()] = compartment.map(|compartment| RepairAssignment {
            team,
            vessel,
            compartment,
        });
    }

    pub fn get(&self, team: RepairTeam) -> Option<&RepairAssignment> {
        self.slots[team.index()].as_ref()
    }

    /// Recall every team working on `vessel`.
    pub fn clear_vessel(&mut self, vessel: VesselId) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|a| a.vessel == vessel) {
                *slot = None;
            }
        }
    }

    pub fn active(&self) -> impl Iterator<Item = &RepairAssignment> {
        self.slots.iter().flatten()
    }
}

fn repair_one(
    world: &mut World,
    roster: &Roster,
    assignment: &RepairAssignment,
    config: &RepairConfig,
    dt: f64,
) -> Result<(), LookupError> {
    let entity = roster.resolve_afloat(world, assignment.vessel)?;
    let (ledger, fx) = world
        .query_one_mut::<(&mut DamageLedger, &CombatEffects)>(entity)
        .map_err(|_| LookupError::VesselNotFound(assignment.vessel))?;
    let index = damage::resolve_compartment(ledger, assignment.vessel, &assignment.compartment)?;

    let rate = config.rate_per_sec * fx.damage_control_efficiency.max(config.min_efficiency);
    let hp = ledger.compartments[index].max_hp * rate * dt;
    damage::apply_repair(ledger, &assignment.compartment, hp);
    Ok(())
}

/// Apply one tick of repair for every active assignment.
///
/// Assignments that no longer resolve are skipped and kept; they pick up
/// again if their vessel and compartment reappear.
pub fn run(world: &mut World, roster: &Roster, teams: &RepairTeams, config: &RepairConfig, dt: f64) {
    for assignment in teams.active() {
        if let Err(err) = repair_one(world, roster, assignment, config, dt) {
            debug!(team = ?assignment.team, %err, "repair assignment idle");
        }
    }
}
