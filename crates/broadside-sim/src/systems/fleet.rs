//! Fleet continuity: the one-time sink transition, delayed despawn,
//! formation leadership succession and player hand-off.
//!
//! Formations and control state live in the engine, NOT as ECS
//! components; members are referenced by `VesselId` only.

use hecs::World;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use broadside_core::components::{DamageLedger, FireControl, FleetId, FleetMember, Hull, TargetSpec};
use broadside_core::config::FleetConfig;
use broadside_core::constants::{LARGE_EXPLOSION_RADIUS, SUNK_SUFFIX};
use broadside_core::enums::{Lifecycle, VesselRole};
use broadside_core::events::EffectRequest;
use broadside_core::types::{Position, VesselId};

use crate::damage;
use crate::roster::Roster;
use crate::systems::repair::RepairTeams;

/// Heading and throttle a formation steers by.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelmOrder {
    pub heading: f64,
    pub speed_kts: f64,
}

#[derive(Debug, Clone)]
pub struct Formation {
    pub id: FleetId,
    /// Members in formation order.
    pub members: Vec<VesselId>,
    pub leader: Option<VesselId>,
    /// Last order taken from a leader. Followers keep it when leaderless.
    pub last_order: Option<HelmOrder>,
}

#[derive(Debug, Default)]
pub struct Fleets {
    formations: Vec<Formation>,
    next_id: u32,
}

impl Fleets {
    pub fn create(&mut self) -> FleetId {
        self.next_id += 1;
        let id = FleetId(self.next_id);
        self.formations.push(Formation {
            id,
            members: Vec::new(),
            leader: None,
            last_order: None,
        });
        id
    }

    /// Append a vessel to a formation. The first member to join leads.
    pub fn join(&mut self, fleet: FleetId, vessel: VesselId) -> bool {
        let Some(formation) = self.formations.iter_mut().find(|f| f.id == fleet) else {
            return false;
        };
        if !formation.members.contains(&vessel) {
            formation.members.push(vessel);
        }
        if formation.leader.is_none() {
            formation.leader = Some(vessel);
        }
        true
    }

    pub fn get(&self, fleet: FleetId) -> Option<&Formation> {
        self.formations.iter().find(|f| f.id == fleet)
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn formations_mut(&mut self) -> &mut [Formation] {
        &mut self.formations
    }

    pub fn is_leader(&self, vessel: VesselId) -> bool {
        self.formations.iter().any(|f| f.leader == Some(vessel))
    }

    /// Replace `lost` as leader wherever it led: the first member in
    /// formation order that `is_afloat` accepts takes over, or nobody.
    /// Returns the formations whose leadership changed.
    pub fn promote_after_loss(
        &mut self,
        lost: VesselId,
        is_afloat: impl Fn(VesselId) -> bool,
    ) -> Vec<(FleetId, Option<VesselId>)> {
        let mut changed = Vec::new();
        for formation in self.formations.iter_mut() {
            if formation.leader != Some(lost) {
                continue;
            }
            formation.leader = formation
                .members
                .iter()
                .copied()
                .find(|m| *m != lost && is_afloat(*m));
            changed.push((formation.id, formation.leader));
        }
        changed
    }

    pub fn remove_member(&mut self, vessel: VesselId) {
        for formation in self.formations.iter_mut() {
            formation.members.retain(|m| *m != vessel);
        }
    }
}

/// Who the player commands and what the HUD highlights.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub player: Option<VesselId>,
    pub selected: Option<VesselId>,
}

fn is_afloat(world: &World, roster: &Roster, id: VesselId) -> bool {
    roster
        .resolve_afloat(world, id)
        .ok()
        .and_then(|e| world.get::<&Lifecycle>(e).ok().map(|l| *l == Lifecycle::Alive))
        .unwrap_or(false)
}

/// Drop every fire-control lock on `id` and hold those groups' fire.
fn release_target(world: &mut World, id: VesselId) {
    for (_entity, fc) in world.query_mut::<&mut FireControl>() {
        if fc.target == Some(TargetSpec::Vessel { vessel: id }) {
            fc.target = None;
            fc.fire_enabled = false;
        }
    }
}

/// Promote leaders that replace `lost`, with logging.
fn succeed_leadership(world: &World, roster: &Roster, fleets: &mut Fleets, lost: VesselId) {
    for (fleet, leader) in fleets.promote_after_loss(lost, |v| is_afloat(world, roster, v)) {
        match leader {
            Some(leader) => info!(fleet = fleet.0, vessel = %leader, "formation leader promoted"),
            None => info!(fleet = fleet.0, "formation has no leader left"),
        }
    }
}

/// Give player control to the nearest afloat friendly.
///
/// The new flagship inherits the old one's fire-control target and fire
/// state. Returns the new player vessel, if any.
fn hand_off_player(
    world: &mut World,
    roster: &Roster,
    control: &mut ControlState,
    lost: VesselId,
    from: Position,
    inherited: FireControl,
) -> Option<VesselId> {
    let view: &World = world;
    let successor = roster
        .ids()
        .iter()
        .copied()
        .filter(|id| *id != lost && is_afloat(view, roster, *id))
        .filter_map(|id| {
            let entity = roster.resolve(id).ok()?;
            let role = *view.get::<&VesselRole>(entity).ok()?;
            let pos = *view.get::<&Position>(entity).ok()?;
            (role == VesselRole::Friendly).then_some((id, entity, from.range_to(&pos)))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2));

    if let Ok(old) = roster.resolve(lost) {
        if let Ok(mut role) = world.get::<&mut VesselRole>(old) {
            *role = VesselRole::Friendly;
        }
    }

    match successor {
        Some((id, entity, _)) => {
            if let Ok((role, fc)) = world.query_one_mut::<(&mut VesselRole, &mut FireControl)>(entity) {
                *role = VesselRole::Player;
                fc.target = inherited.target;
                fc.fire_enabled = inherited.fire_enabled;
                fc.auto_engage = false;
            }
            info!(from = %lost, to = %id, "player control handed off");
            control.player = Some(id);
        }
        None => {
            info!(vessel = %lost, "no friendly vessel left to take command");
            control.player = None;
        }
    }
    control.player
}

/// Run the sink transition for `id`. Returns false if it already ran or
/// the vessel does not exist, leaving all state untouched.
#[allow(clippy::too_many_arguments)]
pub fn handle_sunk(
    world: &mut World,
    roster: &Roster,
    fleets: &mut Fleets,
    control: &mut ControlState,
    teams: &mut RepairTeams,
    config: &FleetConfig,
    now: f64,
    effects: &mut Vec<EffectRequest>,
    id: VesselId,
) -> bool {
    let Ok(entity) = roster.resolve(id) else {
        return false;
    };
    let Ok((hull, pos, ledger, fc, lifecycle)) = world.query_one_mut::<(
        &mut Hull,
        &Position,
        &mut DamageLedger,
        &mut FireControl,
        &mut Lifecycle,
    )>(entity) else {
        return false;
    };
    if *lifecycle != Lifecycle::Alive {
        debug!(vessel = %id, "sink transition already handled");
        return false;
    }

    *lifecycle = Lifecycle::Sinking {
        despawn_at: now + config.sink_despawn_delay_secs,
    };
    damage::mark_sunk(ledger);
    if !hull.name.ends_with(SUNK_SUFFIX) {
        hull.name.push_str(SUNK_SUFFIX);
    }
    hull.target_speed_kts = 0.0;
    let position = *pos;
    let inherited = *fc;
    *fc = FireControl::default();
    info!(vessel = %id, name = %hull.name, "vessel sunk");

    if control.selected == Some(id) {
        control.selected = None;
    }
    release_target(world, id);
    teams.clear_vessel(id);
    effects.push(EffectRequest::Explosion {
        position,
        radius: LARGE_EXPLOSION_RADIUS,
    });
    effects.push(EffectRequest::SinkingAudio { vessel: id });

    succeed_leadership(world, roster, fleets, id);
    if control.player == Some(id) {
        hand_off_player(world, roster, control, id, position, inherited);
    }
    true
}

/// Remove a vessel from the world right away.
///
/// References to it are released as if it had sunk, except that repair
/// assignments are kept and simply go idle.
pub fn despawn(
    world: &mut World,
    roster: &mut Roster,
    fleets: &mut Fleets,
    control: &mut ControlState,
    id: VesselId,
) -> bool {
    let Ok(entity) = roster.resolve(id) else {
        return false;
    };
    let sank = world
        .get::<&DamageLedger>(entity)
        .map(|l| l.sunk)
        .unwrap_or(false);
    let position = world.get::<&Position>(entity).map(|p| *p).unwrap_or_default();
    let inherited = world.get::<&FireControl>(entity).map(|f| *f).unwrap_or_default();

    if control.selected == Some(id) {
        control.selected = None;
    }
    release_target(world, id);
    succeed_leadership(world, roster, fleets, id);
    if control.player == Some(id) {
        hand_off_player(world, roster, control, id, position, inherited);
    }
    fleets.remove_member(id);
    roster.retire(id, sank);
    let _ = world.despawn(entity);
    info!(vessel = %id, "vessel despawned");
    true
}

/// Detect new sinkings, run their transition once, and remove vessels
/// whose sinking delay has passed.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    roster: &mut Roster,
    fleets: &mut Fleets,
    control: &mut ControlState,
    teams: &mut RepairTeams,
    config: &FleetConfig,
    now: f64,
    effects: &mut Vec<EffectRequest>,
) {
    let mut newly_sunk = Vec::new();
    let mut due = Vec::new();
    for id in roster.ids().iter().copied() {
        let Ok(entity) = roster.resolve(id) else {
            continue;
        };
        let Ok(mut query) = world.query_one::<(&DamageLedger, &Lifecycle)>(entity) else {
            continue;
        };
        match query.get() {
            Some((ledger, Lifecycle::Alive)) if ledger.sunk => newly_sunk.push(id),
            Some((_, Lifecycle::Sinking { despawn_at })) if now >= *despawn_at => due.push(id),
            _ => {}
        }
    }

    for id in newly_sunk {
        handle_sunk(world, roster, fleets, control, teams, config, now, effects, id);
    }

    for id in due {
        let Ok(entity) = roster.resolve(id) else {
            continue;
        };
        fleets.remove_member(id);
        roster.retire(id, true);
        let _ = world.despawn(entity);
        debug!(vessel = %id, "sunk vessel removed");
    }
}

/// Formation id a vessel belongs to, if any.
pub fn membership(world: &World, roster: &Roster, id: VesselId) -> Option<FleetId> {
    let entity = roster.resolve(id).ok()?;
    let member = world.get::<&FleetMember>(entity).ok()?;
    Some(member.fleet)
}
