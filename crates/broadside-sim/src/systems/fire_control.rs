//! Fire control system: reload timers, readiness checks and shell launch.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use broadside_core::components::*;
use broadside_core::config::GunneryConfig;
use broadside_core::constants::{MAX_SHELL_TTL_SECS, SHELL_TTL_GRACE_SECS};
use broadside_core::enums::{Lifecycle, ShellOwner, VesselRole};
use broadside_core::events::EffectRequest;
use broadside_core::types::{direction, Position, Velocity, VesselId};

use crate::ballistics::lateral;
use crate::damage;
use crate::roster::Roster;
use crate::systems::aim;

/// Everything needed to launch one shell.
#[derive(Debug, Clone)]
pub struct ShotRequest {
    pub muzzle: Position,
    /// World aim angle of the barrel (degrees).
    pub aim_angle: f64,
    pub target_point: Option<Position>,
    pub owner: ShellOwner,
    pub shooter: VesselId,
    pub turret: u8,
    /// Firing vessel's targeting effectiveness; below 1.0 widens the spread.
    pub targeting_effectiveness: f64,
}

/// A shell ready to be spawned plus the turret's new reload timer.
#[derive(Debug, Clone)]
pub struct FiredShell {
    pub position: Position,
    pub velocity: Velocity,
    pub shell: Shell,
    pub cooldown_secs: f64,
}

/// Launch a shell.
///
/// With a target point the shell flies at a laterally deviated copy of it
/// and lives `d/s` plus a short grace. The miss is drawn uniformly from a
/// spread of 3-5 % of range either side, widened by poor targeting.
/// Without one it flies along the barrel until `MAX_SHELL_TTL_SECS`.
pub fn fire<R: Rng + ?Sized>(shot: &ShotRequest, gunnery: &GunneryConfig, rng: &mut R) -> FiredShell {
    let speed = gunnery.shell_speed.max(0.0);

    let (velocity, target_point, ttl_secs) = match shot.target_point {
        Some(point) => {
            let range = shot.muzzle.range_to(&point);
            let fraction = rng.gen_range(gunnery.deviation_min_fraction..=gunnery.deviation_max_fraction);
            let widen = 2.0 - shot.targeting_effectiveness.clamp(0.0, 1.0);
            let spread = range * fraction * widen;
            let offset = lateral(&shot.muzzle, &point) * rng.gen_range(-spread..=spread);
            let deviated = Position::from_dvec2(point.to_dvec2() + offset);

            let line = deviated.to_dvec2() - shot.muzzle.to_dvec2();
            let heading = line.try_normalize().unwrap_or_else(|| direction(shot.aim_angle));
            let flight = if speed > 0.0 {
                shot.muzzle.range_to(&deviated) / speed
            } else {
                0.0
            };
            (
                Velocity::from_dvec2(heading * speed),
                Some(deviated),
                (flight + SHELL_TTL_GRACE_SECS).min(MAX_SHELL_TTL_SECS),
            )
        }
        None => (
            Velocity::from_heading(shot.aim_angle, speed),
            None,
            MAX_SHELL_TTL_SECS,
        ),
    };

    let jitter = rng.gen_range(0.0..=gunnery.reload_jitter_secs);

    FiredShell {
        position: shot.muzzle,
        velocity,
        shell: Shell {
            origin: shot.muzzle,
            target_point,
            ttl_secs,
            owner: shot.owner,
            shooter: shot.shooter,
            turret: shot.turret,
            penetration_budget: gunnery.penetration_budget,
            damage: gunnery.shell_damage,
        },
        cooldown_secs: gunnery.reload_secs + jitter,
    }
}

/// Tick reload timers and fire every ready turret.
pub fn run(
    world: &mut World,
    roster: &Roster,
    gunnery: &GunneryConfig,
    rng: &mut ChaCha8Rng,
    effects: &mut Vec<EffectRequest>,
    dt: f64,
) {
    // Resolve firing solutions against a read-only world first.
    let mut solutions: Vec<(Entity, Option<Position>)> = Vec::new();
    for (entity, (hull, pos, fc, lifecycle)) in world
        .query::<(&Hull, &Position, &FireControl, &Lifecycle)>()
        .iter()
    {
        if *lifecycle != Lifecycle::Alive || !fc.fire_enabled {
            solutions.push((entity, None));
            continue;
        }
        let aim = match aim::resolve_aim_point(world, roster, pos, fc, gunnery.shell_speed) {
            Some(Ok(point)) => Some(point),
            Some(Err(err)) => {
                debug!(vessel = %hull.id, %err, "no firing solution");
                None
            }
            None => None,
        };
        let aim = aim.filter(|point| {
            let in_range = pos.range_to(point) <= hull.max_range;
            if !in_range {
                debug!(vessel = %hull.id, "target beyond engagement range; holding fire");
            }
            in_range
        });
        solutions.push((entity, aim));
    }

    let mut spawned: Vec<FiredShell> = Vec::new();
    for (entity, aim) in solutions {
        let Ok((hull, pos, role, ledger, fx, turrets)) = world.query_one_mut::<(
            &Hull,
            &Position,
            &VesselRole,
            &DamageLedger,
            &CombatEffects,
            &mut Turrets,
        )>(entity) else {
            continue;
        };
        for turret in turrets.0.iter_mut() {
            turret.cooldown_secs = (turret.cooldown_secs - dt).max(0.0);
            let Some(point) = aim else {
                continue;
            };
            if ledger.sunk || turret.cooldown_secs > 0.0 {
                continue;
            }
            let destroyed = damage::turret_destroyed(ledger, &turret.compartment);
            if !aim::can_fire(turret, destroyed, turret.desired_angle, gunnery.aim_tolerance_deg) {
                continue;
            }

            let muzzle = aim::turret_muzzle(pos, hull.heading, turret);
            let shot = ShotRequest {
                muzzle: Position::new(muzzle.x, muzzle.y),
                aim_angle: muzzle.world_aim_angle,
                target_point: Some(point),
                owner: ShellOwner::from(*role),
                shooter: hull.id,
                turret: turret.id,
                targeting_effectiveness: fx.targeting_effectiveness,
            };
            let fired = fire(&shot, gunnery, rng);
            turret.cooldown_secs = fired.cooldown_secs;
            debug!(vessel = %hull.id, turret = turret.id, "gun fired");
            effects.push(EffectRequest::GunFired {
                vessel: hull.id,
                turret: turret.id,
                position: shot.muzzle,
                angle: shot.aim_angle,
            });
            spawned.push(fired);
        }
    }

    for fired in spawned {
        world.spawn((fired.position, fired.velocity, fired.shell));
    }
}
