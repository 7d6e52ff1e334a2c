//! Helm and kinematics.
//!
//! Turns each hull toward its desired heading, eases speed toward the
//! throttle setting within damage limits, then integrates position.
//! Also keeps the position-delta velocity estimate that gunners lead with.

use hecs::World;

use broadside_core::components::{CombatEffects, DamageLedger, Hull, MotionEstimate};
use broadside_core::constants::{HELM_ACCELERATION_KTS, UNITS_PER_KNOT};
use broadside_core::types::{angle_diff, direction, normalize_deg, Position, Velocity};

use crate::roster::Roster;
use crate::systems::fleet::{Fleets, HelmOrder};

/// Apply one tick of helm response to a hull.
///
/// A sunk hull no longer answers the helm and coasts to a stop.
pub fn steer(hull: &mut Hull, fx: &CombatEffects, sunk: bool, dt: f64) {
    let cap = hull.max_speed_kts * fx.speed_cap;
    let target = if sunk {
        0.0
    } else {
        hull.target_speed_kts.clamp(-cap, cap)
    };
    let accel = HELM_ACCELERATION_KTS * fx.acceleration_factor * dt;
    hull.speed_kts += (target - hull.speed_kts).clamp(-accel, accel);

    if sunk {
        return;
    }
    hull.speed_kts = hull.speed_kts.clamp(-cap, cap);

    let max_turn = hull.turn_rate * fx.turn_rate_factor * fx.rudder_effectiveness * dt;
    let turn = angle_diff(hull.heading, hull.desired_heading).clamp(-max_turn, max_turn);
    hull.heading = normalize_deg(hull.heading + turn);
}

/// Copy each formation leader's order onto its followers.
fn follow_leaders(world: &World, roster: &Roster, fleets: &mut Fleets) {
    for formation in fleets.formations_mut() {
        if let Some(leader) = formation.leader {
            if let Ok(entity) = roster.resolve_afloat(world, leader) {
                if let Ok(hull) = world.get::<&Hull>(entity) {
                    formation.last_order = Some(HelmOrder {
                        heading: hull.desired_heading,
                        speed_kts: hull.target_speed_kts,
                    });
                }
            }
        }
        let Some(order) = formation.last_order else {
            continue;
        };
        for member in formation.members.iter() {
            if Some(*member) == formation.leader {
                continue;
            }
            let Ok(entity) = roster.resolve_afloat(world, *member) else {
                continue;
            };
            if let Ok(mut hull) = world.get::<&mut Hull>(entity) {
                hull.desired_heading = order.heading;
                hull.target_speed_kts = order.speed_kts;
            }
        }
    }
}

pub fn run(world: &mut World, roster: &Roster, fleets: &mut Fleets, dt: f64) {
    follow_leaders(world, roster, fleets);

    for (_entity, (hull, pos, fx, ledger, motion)) in world.query_mut::<(
        &mut Hull,
        &mut Position,
        &CombatEffects,
        &DamageLedger,
        &mut MotionEstimate,
    )>() {
        steer(hull, fx, ledger.sunk, dt);

        let step = direction(hull.heading) * hull.speed_kts * UNITS_PER_KNOT * dt;
        *pos = Position::from_dvec2(pos.to_dvec2() + step);

        if dt > 0.0 {
            motion.velocity =
                Velocity::from_dvec2((pos.to_dvec2() - motion.last_position.to_dvec2()) / dt);
            motion.primed = true;
        }
        motion.last_position = *pos;
    }
}
