//! Lead-point prediction for unguided shells.
//!
//! Solves for the time at which a shell fired now at constant speed meets
//! a target moving at constant velocity. Pure; callers re-run it at the
//! moment of firing because target velocity is only an estimate.

use glam::DVec2;

use broadside_core::types::{Position, Velocity};

/// A firing solution: where to aim and how long the shell will fly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    pub aim_point: Position,
    pub time_to_impact: f64,
}

/// Below this |a| the quadratic is treated as linear.
const LINEAR_EPSILON: f64 = 1e-9;

/// Predict where to aim so a shell of `projectile_speed` meets the target.
///
/// Solves `a·t² + b·t + c = 0` with `a = |v|² − s²`, `b = 2(r·v)`,
/// `c = |r|²` and takes the smallest strictly positive root. When no such
/// root exists the straight-range time `|r| / s` is used instead.
pub fn predict_intercept(
    shooter: &Position,
    target: &Position,
    target_velocity: &Velocity,
    projectile_speed: f64,
) -> Intercept {
    if projectile_speed <= 0.0 {
        return Intercept {
            aim_point: *target,
            time_to_impact: 0.0,
        };
    }

    let r = target.to_dvec2() - shooter.to_dvec2();
    let v = target_velocity.to_dvec2();
    let s = projectile_speed;

    let a = v.length_squared() - s * s;
    let b = 2.0 * r.dot(v);
    let c = r.length_squared();

    let t = smallest_positive_root(a, b, c).unwrap_or_else(|| r.length() / s);

    Intercept {
        aim_point: Position::from_dvec2(target.to_dvec2() + v * t),
        time_to_impact: t,
    }
}

/// Smallest strictly positive real root of `a·t² + b·t + c`, if any.
fn smallest_positive_root(a: f64, b: f64, c: f64) -> Option<f64> {
    if a.abs() < LINEAR_EPSILON {
        // Target as fast as the shell: b·t + c = 0.
        if b.abs() < LINEAR_EPSILON {
            return None;
        }
        let t = -c / b;
        return (t > 0.0).then_some(t);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    [t1, t2]
        .into_iter()
        .filter(|t| t.is_finite() && *t > 0.0)
        .min_by(|x, y| x.total_cmp(y))
}

/// Lateral unit vector (90° clockwise of the line of fire).
pub fn lateral(from: &Position, to: &Position) -> DVec2 {
    let line = (to.to_dvec2() - from.to_dvec2()).normalize_or_zero();
    DVec2::new(line.y, -line.x)
}
