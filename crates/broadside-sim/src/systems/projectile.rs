//! Shell flight and impact resolution.
//!
//! Each tick a shell moves one step and then resolves in a fixed order:
//! terrain, hull, arrival/expiry. The first check that fires ends the
//! shell; a shell never produces two outcomes.

use glam::DVec2;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use broadside_core::components::{DamageLedger, Hull, Shell};
use broadside_core::config::{DamageConfig, GunneryConfig};
use broadside_core::constants::{LARGE_EXPLOSION_RADIUS, SHELL_EXPLOSION_RADIUS};
use broadside_core::enums::{Lifecycle, ShellOutcome, ShellOwner, Side, VesselRole};
use broadside_core::events::EffectRequest;
use broadside_core::types::{Position, Velocity, VesselId};
use broadside_terrain::LandMask;

use crate::damage;

/// How one shell ended this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellResolution {
    pub outcome: ShellOutcome,
    pub position: Position,
    pub struck: Option<VesselId>,
}

/// A hull a shell might hit this tick.
struct HullTarget {
    id: VesselId,
    entity: Entity,
    position: Position,
    side: Side,
    sunk: bool,
}

/// Closest approach of `point` to segment `a`-`b`: (distance, fraction along).
fn segment_distance(a: DVec2, b: DVec2, point: DVec2) -> (f64, f64) {
    let ab = b - a;
    let len_sq = ab.length_squared();
    let t = if len_sq > 0.0 {
        ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((a + ab * t).distance(point), t)
}

/// Spacing of land samples along one shell step.
const TERRAIN_SAMPLE_STEP: f64 = 1.0;

/// Spend the penetration budget on the land crossed between `a` and `b`.
/// Returns where the budget ran out, if it did.
fn cross_terrain(mask: &LandMask, a: DVec2, b: DVec2, budget: &mut f64) -> Option<Position> {
    let ab = b - a;
    let len = ab.length();
    if len <= 0.0 {
        return None;
    }
    let samples = (len / TERRAIN_SAMPLE_STEP).ceil().max(1.0) as usize;
    let piece = len / samples as f64;
    for i in 0..samples {
        let mid = Position::from_dvec2(a + ab * ((i as f64 + 0.5) / samples as f64));
        if !mask.is_land(&mid) {
            continue;
        }
        if *budget <= piece {
            let at = (i as f64 * piece + budget.max(0.0)) / len;
            *budget = 0.0;
            return Some(Position::from_dvec2(a + ab * at));
        }
        *budget -= piece;
    }
    None
}

/// True when a friendly hull sits between the shooter and the aim point.
fn in_the_way(shell: &Shell, hull: &Position) -> bool {
    let Some(target) = shell.target_point else {
        return false;
    };
    let origin = shell.origin.to_dvec2();
    let line = target.to_dvec2() - origin;
    let len_sq = line.length_squared();
    if len_sq <= 0.0 {
        return false;
    }
    let t = (hull.to_dvec2() - origin).dot(line) / len_sq;
    t > 0.0 && t < 1.0
}

/// Whether `shell` may strike `hull`.
fn is_valid_target(shell: &Shell, hull: &HullTarget) -> bool {
    if hull.sunk || hull.id == shell.shooter {
        return false;
    }
    match shell.owner {
        ShellOwner::Enemy => hull.side == Side::Friendly,
        ShellOwner::Player | ShellOwner::Friendly => match hull.side {
            Side::Enemy => true,
            Side::Friendly => in_the_way(shell, &hull.position),
        },
    }
}

/// Advance every shell and resolve the ones that end this tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    mask: &LandMask,
    gunnery: &GunneryConfig,
    damage_config: &DamageConfig,
    rng: &mut ChaCha8Rng,
    effects: &mut Vec<EffectRequest>,
    dt: f64,
) -> Vec<ShellResolution> {
    let mut hulls: Vec<HullTarget> = world
        .query::<(&Hull, &Position, &VesselRole, &DamageLedger, &Lifecycle)>()
        .iter()
        .filter(|(_, (_, _, _, _, lifecycle))| **lifecycle == Lifecycle::Alive)
        .map(|(entity, (hull, pos, role, ledger, _))| HullTarget {
            id: hull.id,
            entity,
            position: *pos,
            side: role.side(),
            sunk: ledger.sunk,
        })
        .collect();

    let shells: Vec<(Entity, Position, Velocity, Shell)> = world
        .query::<(&Position, &Velocity, &Shell)>()
        .iter()
        .map(|(e, (p, v, s))| (e, *p, *v, s.clone()))
        .collect();

    let mut resolutions = Vec::new();
    let mut finished: Vec<Entity> = Vec::new();

    for (entity, start, velocity, mut shell) in shells {
        // --- Move ---
        let mut end = Position::from_dvec2(start.to_dvec2() + velocity.to_dvec2() * dt);
        let mut arrived = false;
        if let Some(point) = shell.target_point {
            let step = start.range_to(&end);
            if step >= start.range_to(&point) {
                end = point;
                arrived = true;
            }
        }
        shell.ttl_secs -= dt;

        // --- 1. Terrain ---
        let blocked = cross_terrain(
            mask,
            start.to_dvec2(),
            end.to_dvec2(),
            &mut shell.penetration_budget,
        );
        if let Some(at) = blocked {
            debug!(shooter = %shell.shooter, x = at.x, y = at.y, "shell hit terrain");
            effects.push(EffectRequest::Explosion {
                position: at,
                radius: SHELL_EXPLOSION_RADIUS,
            });
            resolutions.push(ShellResolution {
                outcome: ShellOutcome::TerrainExplosion,
                position: at,
                struck: None,
            });
            finished.push(entity);
            continue;
        }

        // --- 2. Hull ---
        let hit = hulls
            .iter_mut()
            .filter(|h| is_valid_target(&shell, h))
            .filter_map(|h| {
                let (dist, along) =
                    segment_distance(start.to_dvec2(), end.to_dvec2(), h.position.to_dvec2());
                (dist <= gunnery.hull_hit_radius).then_some((along, h))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, h)| h);

        if let Some(target) = hit {
            let outcome = match world.get::<&mut DamageLedger>(target.entity) {
                Ok(mut ledger) => {
                    damage::apply_damage(&mut ledger, None, shell.damage, damage_config, rng)
                }
                Err(_) => damage::DamageOutcome::default(),
            };
            debug!(
                shooter = %shell.shooter,
                vessel = %target.id,
                compartment = outcome.compartment.as_deref().unwrap_or("hull"),
                "shell hit"
            );
            effects.push(EffectRequest::Explosion {
                position: end,
                radius: SHELL_EXPLOSION_RADIUS,
            });
            if outcome.detonated {
                target.sunk = true;
                effects.push(EffectRequest::Explosion {
                    position: target.position,
                    radius: LARGE_EXPLOSION_RADIUS,
                });
            }
            resolutions.push(ShellResolution {
                outcome: ShellOutcome::HullExplosion,
                position: end,
                struck: Some(target.id),
            });
            finished.push(entity);
            continue;
        }

        // --- 3. Arrival / expiry ---
        if arrived || shell.ttl_secs <= 0.0 {
            effects.push(EffectRequest::Splash { position: end });
            resolutions.push(ShellResolution {
                outcome: ShellOutcome::Splash,
                position: end,
                struck: None,
            });
            finished.push(entity);
            continue;
        }

        if let Ok((pos, s)) = world.query_one_mut::<(&mut Position, &mut Shell)>(entity) {
            *pos = end;
            *s = shell;
        }
    }

    for entity in finished {
        let _ = world.despawn(entity);
    }
    resolutions
}
