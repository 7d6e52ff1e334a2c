//! Turret traverse: steer each turret toward its firing solution without
//! ever swinging through the forbidden arc.
//!
//! The pure helpers (`clamp_desired`, `step_turret`, `can_fire`) hold the
//! angular rules; `run` feeds them lead points from the intercept solver.

use hecs::{Entity, World};

use broadside_core::components::{
    DamageLedger, FireControl, Hull, MotionEstimate, TargetSpec, Turret, Turrets,
};
use broadside_core::config::GunneryConfig;
use broadside_core::constants::ARC_EPSILON_DEG;
use broadside_core::enums::{Lifecycle, TurretMount};
use broadside_core::error::LookupError;
use broadside_core::state::TurretMuzzle;
use broadside_core::types::{angle_diff, direction, normalize_deg, Position, Velocity};

use crate::ballistics::predict_intercept;
use crate::damage;
use crate::roster::Roster;

/// Turret angle relative to the hull for a world bearing.
pub fn desired_relative_angle(world_angle: f64, hull_heading: f64) -> f64 {
    normalize_deg(world_angle - hull_heading)
}

/// Replace a desired angle that falls strictly inside the forbidden arc
/// with the arc boundary closer to where the turret points now.
///
/// On a tie a forward mount takes the boundary nearer the bow and an aft
/// mount holds its current angle.
pub fn clamp_desired(turret: &Turret, desired: f64) -> f64 {
    let desired = normalize_deg(desired);
    let Some(arc) = turret.forbidden else {
        return desired;
    };
    if !arc.contains_strict(desired) {
        return desired;
    }
    if let Some(boundary) = arc.nearer_boundary(turret.angle) {
        return boundary;
    }
    match turret.mount {
        TurretMount::Forward => {
            if angle_diff(0.0, arc.end).abs() < angle_diff(0.0, arc.start).abs() {
                arc.end
            } else {
                arc.start
            }
        }
        TurretMount::Aft => normalize_deg(turret.angle),
    }
}

/// Advance a turret at most `max_rate * dt` degrees toward `desired`.
///
/// The rotation direction is the one that keeps clear of the arc interior.
/// If both directions are blocked, or both are clear, the shorter wins.
pub fn step_turret(turret: &mut Turret, desired: f64, max_rate: f64, dt: f64) {
    let target = clamp_desired(turret, desired);
    let current = normalize_deg(turret.angle);

    let short = angle_diff(current, target);
    if short.abs() <= ARC_EPSILON_DEG {
        turret.angle = target;
        return;
    }
    let long = if short > 0.0 { short - 360.0 } else { short + 360.0 };

    let delta = match turret.forbidden {
        None => short,
        Some(arc) => {
            let short_blocked = arc.sweeps_interior(current, short);
            let long_blocked = arc.sweeps_interior(current, long);
            if short_blocked && !long_blocked {
                long
            } else {
                short
            }
        }
    };

    let max_step = (max_rate * dt).max(0.0);
    let mut next = normalize_deg(current + delta.clamp(-max_step, max_step));

    if let Some(arc) = turret.forbidden {
        if arc.contains_strict(next) {
            next = arc.nearer_boundary(next).unwrap_or(arc.start);
        }
    }
    turret.angle = next;
}

/// Whether a turret is ready to shoot at its desired angle.
pub fn can_fire(turret: &Turret, destroyed: bool, desired: Option<f64>, tolerance_deg: f64) -> bool {
    if destroyed {
        return false;
    }
    let Some(desired) = desired else {
        return false;
    };
    if let Some(arc) = turret.forbidden {
        if arc.contains_strict(desired) {
            return false;
        }
    }
    angle_diff(turret.angle, desired).abs() <= tolerance_deg
}

/// Turret mount point in world space.
pub fn mount_position(hull_pos: &Position, heading: f64, turret: &Turret) -> Position {
    let fwd = direction(heading) * turret.offset.forward;
    let stbd = direction(heading + 90.0) * turret.offset.starboard;
    Position::from_dvec2(hull_pos.to_dvec2() + fwd + stbd)
}

/// Muzzle tip and world aim angle of a turret.
pub fn turret_muzzle(hull_pos: &Position, heading: f64, turret: &Turret) -> TurretMuzzle {
    let world_aim_angle = normalize_deg(heading + turret.angle);
    let tip = mount_position(hull_pos, heading, turret).offset(world_aim_angle, turret.barrel_length);
    TurretMuzzle {
        x: tip.x,
        y: tip.y,
        world_aim_angle,
    }
}

/// World point a vessel's guns should aim at, leading moving targets.
pub fn resolve_aim_point(
    world: &World,
    roster: &Roster,
    shooter: &Position,
    fire_control: &FireControl,
    shell_speed: f64,
) -> Option<Result<Position, LookupError>> {
    let target = fire_control.target?;
    Some(match target {
        TargetSpec::Point { position } => Ok(position),
        TargetSpec::Vessel { vessel } => roster.resolve_afloat(world, vessel).and_then(|e| {
            let position = world
                .get::<&Position>(e)
                .map(|p| *p)
                .map_err(|_| LookupError::VesselNotFound(vessel))?;
            let velocity = world
                .get::<&MotionEstimate>(e)
                .ok()
                .filter(|m| m.primed)
                .map(|m| m.velocity)
                .unwrap_or_else(Velocity::zero);
            Ok(predict_intercept(shooter, &position, &velocity, shell_speed).aim_point)
        }),
    })
}

/// Compute each turret's desired angle and traverse toward it.
pub fn run(world: &mut World, roster: &Roster, gunnery: &GunneryConfig, dt: f64) {
    let mut solutions: Vec<(Entity, Option<Position>)> = Vec::new();
    for (entity, (pos, fc, lifecycle)) in world
        .query::<(&Position, &FireControl, &Lifecycle)>()
        .with::<&Turrets>()
        .iter()
    {
        if *lifecycle != Lifecycle::Alive {
            continue;
        }
        let aim = resolve_aim_point(world, roster, pos, fc, gunnery.shell_speed).and_then(|r| r.ok());
        solutions.push((entity, aim));
    }

    for (entity, aim) in solutions {
        let Ok((hull, pos, ledger, turrets)) =
            world.query_one_mut::<(&Hull, &Position, &DamageLedger, &mut Turrets)>(entity)
        else {
            continue;
        };
        if ledger.sunk {
            continue;
        }
        for turret in turrets.0.iter_mut() {
            if damage::turret_destroyed(ledger, &turret.compartment) {
                turret.desired_angle = None;
                continue;
            }
            let Some(point) = aim else {
                turret.desired_angle = None;
                continue;
            };
            let mount = mount_position(pos, hull.heading, turret);
            let desired = desired_relative_angle(mount.bearing_to(&point), hull.heading);
            turret.desired_angle = Some(desired);
            step_turret(turret, desired, gunnery.traverse_rate, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_core::components::MuzzleOffset;
    use broadside_core::types::ForbiddenArc;

    fn turret(angle: f64, arc: Option<(f64, f64)>, mount: TurretMount) -> Turret {
        Turret {
            id: 1,
            compartment: "turret1".into(),
            angle,
            forbidden: arc.map(|(s, e)| ForbiddenArc::new(s, e)),
            mount,
            offset: MuzzleOffset::default(),
            barrel_length: 0.0,
            cooldown_secs: 0.0,
            desired_angle: None,
        }
    }

    #[test]
    fn test_relative_angle_wraps() {
        assert_eq!(desired_relative_angle(10.0, 350.0), 20.0);
        assert_eq!(desired_relative_angle(350.0, 10.0), 340.0);
    }

    #[test]
    fn test_clamp_picks_boundary_nearer_current() {
        let t = turret(150.0, Some((145.0, 235.0)), TurretMount::Forward);
        assert_eq!(clamp_desired(&t, 200.0), 145.0);
        let t = turret(240.0, Some((145.0, 235.0)), TurretMount::Forward);
        assert_eq!(clamp_desired(&t, 160.0), 235.0);
        // Outside the arc: untouched
        assert_eq!(clamp_desired(&t, 100.0), 100.0);
        assert_eq!(clamp_desired(&t, 145.0), 145.0);
    }

    #[test]
    fn test_clamp_tie_break_by_mount() {
        // Current angle 10 sits equidistant from 325 and 55.
        let fwd = turret(10.0, Some((325.0, 55.0)), TurretMount::Forward);
        let aft = turret(10.0, Some((325.0, 55.0)), TurretMount::Aft);
        // 325 is 35 deg off the bow, 55 is 55 deg off.
        assert_eq!(clamp_desired(&fwd, 0.0), 325.0);
        assert_eq!(clamp_desired(&aft, 0.0), 10.0);
    }

    #[test]
    fn test_step_respects_rate() {
        let mut t = turret(0.0, None, TurretMount::Forward);
        step_turret(&mut t, 90.0, 30.0, 1.0);
        assert!((t.angle - 30.0).abs() < 1e-9);
        step_turret(&mut t, 90.0, 30.0, 10.0);
        assert!((t.angle - 90.0).abs() < 1e-9);
        // Shorter way round across 0
        let mut t = turret(10.0, None, TurretMount::Forward);
        step_turret(&mut t, 350.0, 5.0, 1.0);
        assert!((t.angle - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_goes_the_long_way_round_the_arc() {
        // 100 -> 250 clockwise crosses [145, 235]; must go via 0.
        let mut t = turret(100.0, Some((145.0, 235.0)), TurretMount::Forward);
        let mut previous = t.angle;
        for _ in 0..40 {
            step_turret(&mut t, 250.0, 30.0, 0.5);
            let arc = t.forbidden.unwrap();
            assert!(!arc.contains_strict(t.angle), "entered arc at {}", t.angle);
            assert!(!arc.sweeps_interior(previous, angle_diff(previous, t.angle)));
            previous = t.angle;
        }
        assert!((t.angle - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_stuck_inside_arc_routes_to_boundary_without_crossing() {
        let arc = (145.0, 235.0);
        let mut t = turret(150.0, Some(arc), TurretMount::Forward);
        for _ in 0..120 {
            step_turret(&mut t, 200.0, 30.0, 1.0 / 60.0);
            assert!(
                !(t.angle > 185.0 && t.angle < 195.0),
                "passed through the arc interior at {}",
                t.angle
            );
        }
        assert!((t.angle - 145.0).abs() < 1e-9, "ended at {}", t.angle);
    }

    #[test]
    fn test_can_fire_rules() {
        let mut t = turret(90.0, Some((145.0, 235.0)), TurretMount::Forward);
        assert!(!can_fire(&t, false, None, 1.5), "no target");
        assert!(can_fire(&t, false, Some(91.0), 1.5));
        assert!(!can_fire(&t, false, Some(95.0), 1.5), "off target");
        assert!(!can_fire(&t, true, Some(90.0), 1.5), "destroyed");
        t.angle = 145.0;
        assert!(!can_fire(&t, false, Some(146.0), 1.5), "desired inside arc");
        assert!(can_fire(&t, false, Some(145.0), 1.5), "boundary is allowed");
    }

    #[test]
    fn test_muzzle_rotates_with_heading() {
        let mut t = turret(0.0, None, TurretMount::Forward);
        t.offset = MuzzleOffset {
            forward: 10.0,
            starboard: 0.0,
        };
        t.barrel_length = 5.0;
        let m = turret_muzzle(&Position::new(0.0, 0.0), 90.0, &t);
        assert!((m.x - 15.0).abs() < 1e-9);
        assert!(m.y.abs() < 1e-9);
        assert!((m.world_aim_angle - 90.0).abs() < 1e-9);
    }
}
