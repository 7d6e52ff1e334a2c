//! Simulation engine: the owner of every vessel, shell and formation.
//!
//! `SimulationEngine` owns the hecs ECS world, processes fleet commands,
//! runs all systems, and produces `SimSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use broadside_core::commands::FleetCommand;
use broadside_core::components::*;
use broadside_core::config::{ConfigError, Tuning};
use broadside_core::constants::{LARGE_EXPLOSION_RADIUS, MAX_DT};
use broadside_core::enums::{Lifecycle, RepairTeam, Side, VesselRole};
use broadside_core::error::LookupError;
use broadside_core::events::EffectRequest;
use broadside_core::state::{CompartmentStatus, SimSnapshot, TurretMuzzle};
use broadside_core::types::{normalize_deg, Position, SimTime, VesselId};
use broadside_terrain::LandMask;

use crate::damage::{self, DamageOutcome};
use crate::roster::Roster;
use crate::systems;
use crate::systems::fleet::{ControlState, Fleets};
use crate::systems::repair::RepairTeams;
use crate::world_setup::{self, SpawnRequest};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    #[serde(flatten)]
    pub tuning: Tuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: Tuning::default(),
        }
    }
}

impl SimConfig {
    /// Parse a seed plus (possibly partial) tuning overrides.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.tuning.validate()?;
        Ok(config)
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    tuning: Tuning,
    mask: LandMask,
    roster: Roster,
    fleets: Fleets,
    control: ControlState,
    repair_teams: RepairTeams,
    command_queue: VecDeque<FleetCommand>,
    effects: Vec<EffectRequest>,
}

impl SimulationEngine {
    /// Create a new simulation engine on open water.
    pub fn new(config: SimConfig) -> Self {
        Self::with_terrain(config, LandMask::open_sea())
    }

    /// Create a new simulation engine over the given land mask.
    pub fn with_terrain(config: SimConfig, mask: LandMask) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tuning: config.tuning,
            mask,
            roster: Roster::default(),
            fleets: Fleets::default(),
            control: ControlState::default(),
            repair_teams: RepairTeams::default(),
            command_queue: VecDeque::new(),
            effects: Vec::new(),
        }
    }

    // ---- Commands ----

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: FleetCommand) {
        self.command_queue.push_back(command);
    }

    /// Aim `group`'s turrets at a point or vessel, or clear its target.
    ///
    /// A vessel target that no longer resolves clears the target and holds
    /// fire instead.
    pub fn set_target(&mut self, group: VesselId, target: Option<TargetSpec>) {
        let Ok(entity) = self.roster.resolve_afloat(&self.world, group) else {
            debug!(vessel = %group, "set_target on unknown or sunk vessel");
            return;
        };
        let invalid = match target {
            Some(TargetSpec::Vessel { vessel }) => {
                self.roster.resolve_afloat(&self.world, vessel).err()
            }
            _ => None,
        };
        let Ok(mut fc) = self.world.get::<&mut FireControl>(entity) else {
            return;
        };
        match invalid {
            Some(err) => {
                debug!(vessel = %group, %err, "invalid target");
                fc.target = None;
                fc.fire_enabled = false;
            }
            None => fc.target = target,
        }
    }

    pub fn set_fire_enabled(&mut self, group: VesselId, enabled: bool) {
        let Ok(entity) = self.roster.resolve_afloat(&self.world, group) else {
            debug!(vessel = %group, "set_fire_enabled on unknown or sunk vessel");
            return;
        };
        if let Ok(mut fc) = self.world.get::<&mut FireControl>(entity) {
            fc.fire_enabled = enabled;
        }
    }

    /// Send team 1 or 2 to a compartment; `None` recalls the team.
    pub fn assign_repair_team(&mut self, team: u8, vessel: VesselId, compartment: Option<String>) {
        let Some(team) = RepairTeam::from_number(team) else {
            debug!(team, "no such repair team");
            return;
        };
        self.repair_teams.assign(team, vessel, compartment);
    }

    pub fn set_helm(&mut self, vessel: VesselId, heading: f64, speed_kts: f64) {
        let Ok(entity) = self.roster.resolve_afloat(&self.world, vessel) else {
            debug!(vessel = %vessel, "helm order for unknown or sunk vessel");
            return;
        };
        if let Ok(mut hull) = self.world.get::<&mut Hull>(entity) {
            hull.desired_heading = normalize_deg(heading);
            hull.target_speed_kts = speed_kts.clamp(-hull.max_speed_kts, hull.max_speed_kts);
        }
    }

    /// Highlight a vessel. Selecting a vessel that is gone clears the selection.
    pub fn select(&mut self, vessel: Option<VesselId>) {
        self.control.selected = vessel.filter(|id| self.roster.resolve_afloat(&self.world, *id).is_ok());
    }

    // ---- Vessel lifecycle ----

    /// Put a new vessel in the water and return its id.
    ///
    /// A player-controlled friendly takes over as the player vessel; the
    /// previous one is handed back to the AI.
    pub fn spawn_vessel(&mut self, mut request: SpawnRequest) -> VesselId {
        let id = self.roster.allocate();
        let role = if request.player_controlled && request.side == Side::Friendly {
            VesselRole::Player
        } else {
            VesselRole::for_side(request.side)
        };
        if let Some(fleet) = request.fleet {
            if self.fleets.get(fleet).is_none() {
                debug!(vessel = %id, fleet = fleet.0, "no such fleet; spawning unattached");
                request.fleet = None;
            }
        }

        let entity = world_setup::spawn_vessel(&mut self.world, id, &request, role);
        self.roster.insert(id, entity);
        if let Some(fleet) = request.fleet {
            self.fleets.join(fleet, id);
        }

        if role == VesselRole::Player {
            if let Some(previous) = self.control.player.replace(id) {
                self.demote(previous);
            }
        }
        id
    }

    /// Hand a former player vessel back to the AI.
    fn demote(&mut self, id: VesselId) {
        let Ok(entity) = self.roster.resolve(id) else {
            return;
        };
        if let Ok((role, fc)) = self
            .world
            .query_one_mut::<(&mut VesselRole, &mut FireControl)>(entity)
        {
            *role = VesselRole::Friendly;
            fc.auto_engage = true;
        }
        info!(vessel = %id, "player control released");
    }

    /// Remove a vessel immediately, sunk or not.
    pub fn despawn_vessel(&mut self, id: VesselId) -> bool {
        systems::fleet::despawn(
            &mut self.world,
            &mut self.roster,
            &mut self.fleets,
            &mut self.control,
            id,
        )
    }

    /// Sink a vessel outright. The sink transition runs on the next tick.
    pub fn scuttle(&mut self, id: VesselId) -> bool {
        let Ok(entity) = self.roster.resolve(id) else {
            return false;
        };
        match self.world.get::<&mut DamageLedger>(entity) {
            Ok(mut ledger) => damage::mark_sunk(&mut ledger),
            Err(_) => false,
        }
    }

    /// Scripted damage routed through the damage model.
    ///
    /// `None` picks a random compartment (or none) as a shell hit would.
    pub fn apply_damage(
        &mut self,
        id: VesselId,
        compartment: Option<&str>,
        amount: f64,
    ) -> Option<DamageOutcome> {
        let entity = self.roster.resolve(id).ok()?;
        let position = self.world.get::<&Position>(entity).ok().map(|p| *p)?;
        let mut ledger = self.world.get::<&mut DamageLedger>(entity).ok()?;
        let outcome = damage::apply_damage(
            &mut ledger,
            compartment,
            amount,
            &self.tuning.damage,
            &mut self.rng,
        );
        if outcome.detonated {
            self.effects.push(EffectRequest::Explosion {
                position,
                radius: LARGE_EXPLOSION_RADIUS,
            });
        }
        Some(outcome)
    }

    // ---- Fleets ----

    pub fn new_fleet(&mut self) -> FleetId {
        self.fleets.create()
    }

    pub fn fleet_of(&self, id: VesselId) -> Option<FleetId> {
        systems::fleet::membership(&self.world, &self.roster, id)
    }

    pub fn fleet_leader(&self, fleet: FleetId) -> Option<VesselId> {
        self.fleets.get(fleet).and_then(|f| f.leader)
    }

    // ---- Queries ----

    pub fn compartment_status(&self, id: VesselId) -> Option<Vec<CompartmentStatus>> {
        let entity = self.roster.resolve(id).ok()?;
        let ledger = self.world.get::<&DamageLedger>(entity).ok()?;
        Some(damage::compartment_status(&ledger))
    }

    /// True for sunk vessels, including ones already removed after sinking.
    pub fn is_sunk(&self, id: VesselId) -> bool {
        match self.roster.resolve(id) {
            Ok(entity) => self
                .world
                .get::<&DamageLedger>(entity)
                .map(|l| l.sunk)
                .unwrap_or(false),
            Err(_) => self.roster.retired(id).unwrap_or(false),
        }
    }

    /// Display name, with the sunk suffix once the vessel has gone down.
    pub fn display_name(&self, id: VesselId) -> Option<String> {
        let entity = self.roster.resolve(id).ok()?;
        let hull = self.world.get::<&Hull>(entity).ok()?;
        Some(hull.name.clone())
    }

    /// Percent chance (0-100) that `shooter` hits something at `point`.
    pub fn hit_probability(&self, shooter: VesselId, point: Position) -> Option<u8> {
        let entity = self.roster.resolve_afloat(&self.world, shooter).ok()?;
        let mut query = self
            .world
            .query_one::<(&Hull, &Position, &DamageLedger, &Turrets, &CombatEffects)>(entity)
            .ok()?;
        let (hull, pos, ledger, turrets, fx) = query.get()?;
        let operational = damage::operational_turret_fraction(ledger, turrets);
        let p = damage::hit_probability(pos.range_to(&point), hull, operational, fx);
        Some((p * 100.0).round().clamp(0.0, 100.0) as u8)
    }

    /// World position of a turret's muzzle and its world aim angle.
    pub fn turret_muzzle(&self, id: VesselId, turret: u8) -> Option<TurretMuzzle> {
        let entity = self.roster.resolve(id).ok()?;
        let mut query = self
            .world
            .query_one::<(&Hull, &Position, &Turrets)>(entity)
            .ok()?;
        let (hull, pos, turrets) = query.get()?;
        let muzzle = turrets
            .0
            .iter()
            .find(|t| t.id == turret)
            .map(|t| systems::aim::turret_muzzle(pos, hull.heading, t));
        if muzzle.is_none() {
            let err = LookupError::TurretNotFound { vessel: id, turret };
            debug!(%err, "muzzle query");
        }
        muzzle
    }

    pub fn fire_control(&self, id: VesselId) -> Option<FireControl> {
        let entity = self.roster.resolve(id).ok()?;
        let fc = self.world.get::<&FireControl>(entity).ok()?;
        Some(*fc)
    }

    pub fn repair_assignment(&self, team: u8) -> Option<&RepairAssignment> {
        self.repair_teams.get(RepairTeam::from_number(team)?)
    }

    /// Lifecycle state; removed vessels report `Despawned`.
    pub fn lifecycle(&self, id: VesselId) -> Option<Lifecycle> {
        match self.roster.resolve(id) {
            Ok(entity) => self.world.get::<&Lifecycle>(entity).ok().map(|l| *l),
            Err(_) => self.roster.retired(id).map(|_| Lifecycle::Despawned),
        }
    }

    /// The vessel under player control.
    pub fn player(&self) -> Option<VesselId> {
        self.control.player
    }

    pub fn selected(&self) -> Option<VesselId> {
        self.control.selected
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current state without advancing time. Pending effects stay queued.
    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.roster,
            &self.fleets,
            &self.control,
            &self.time,
            Vec::new(),
        )
    }

    /// Run the sink transition directly (for idempotence tests).
    #[cfg(test)]
    pub fn run_sink_transition(&mut self, id: VesselId) -> bool {
        systems::fleet::handle_sunk(
            &mut self.world,
            &self.roster,
            &mut self.fleets,
            &mut self.control,
            &mut self.repair_teams,
            &self.tuning.fleet,
            self.time.elapsed_secs,
            &mut self.effects,
            id,
        )
    }

    // ---- Tick ----

    /// Advance the simulation by `dt` seconds (clamped to `[0, MAX_DT]`)
    /// and return the resulting snapshot.
    pub fn tick(&mut self, dt: f64) -> SimSnapshot {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 };

        self.process_commands();
        self.run_systems(dt);
        self.time.advance(dt);

        let effects = std::mem::take(&mut self.effects);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.roster,
            &self.fleets,
            &self.control,
            &self.time,
            effects,
        )
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single fleet command.
    fn handle_command(&mut self, command: FleetCommand) {
        match command {
            FleetCommand::SetTarget { group, target } => self.set_target(group, target),
            FleetCommand::SetFireEnabled { group, enabled } => {
                self.set_fire_enabled(group, enabled)
            }
            FleetCommand::AssignRepairTeam {
                team,
                vessel,
                compartment,
            } => self.assign_repair_team(team, vessel, compartment),
            FleetCommand::SetHelm {
                vessel,
                heading,
                speed_kts,
            } => self.set_helm(vessel, heading, speed_kts),
            FleetCommand::Select { vessel } => self.select(vessel),
            FleetCommand::DespawnVessel { vessel } => {
                self.despawn_vessel(vessel);
            }
        }
    }

    /// Run all systems in order.
    fn run_systems(&mut self, dt: f64) {
        // 1. Targeting (invalid targets, AI target pick)
        systems::targeting::run(&mut self.world, &self.roster);
        // 2. Helm, formation following, kinematics
        systems::movement::run(&mut self.world, &self.roster, &mut self.fleets, dt);
        // 3. Turret traverse
        systems::aim::run(&mut self.world, &self.roster, &self.tuning.gunnery, dt);
        // 4. Reload and fire
        systems::fire_control::run(
            &mut self.world,
            &self.roster,
            &self.tuning.gunnery,
            &mut self.rng,
            &mut self.effects,
            dt,
        );
        // 5. Shell flight and impacts
        systems::projectile::run(
            &mut self.world,
            &self.mask,
            &self.tuning.gunnery,
            &self.tuning.damage,
            &mut self.rng,
            &mut self.effects,
            dt,
        );
        // 6. Fire and flooding
        systems::hazards::run(
            &mut self.world,
            &self.tuning.damage,
            &mut self.rng,
            &mut self.effects,
            dt,
        );
        // 7. Damage control
        systems::repair::run(
            &mut self.world,
            &self.roster,
            &self.repair_teams,
            &self.tuning.repair,
            dt,
        );
        // 8. Derived combat effects
        systems::effects::run(&mut self.world);
        // 9. Sinking, despawn, leadership, player hand-off
        systems::fleet::run(
            &mut self.world,
            &mut self.roster,
            &mut self.fleets,
            &mut self.control,
            &mut self.repair_teams,
            &self.tuning.fleet,
            self.time.elapsed_secs,
            &mut self.effects,
        );
    }
}
