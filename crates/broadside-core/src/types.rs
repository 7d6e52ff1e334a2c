//! Fundamental geometric and simulation types.
//!
//! World space is a flat plane: x = East, y = North (screen "up").
//! Angles are degrees, 0 = up, increasing clockwise.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// 2D position in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Stable vessel identifier. Never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VesselId(pub u32);

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.0)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Distance to another position in world units.
    pub fn range_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing to another position in degrees (0 = up, clockwise).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        normalize_deg(dx.atan2(dy).to_degrees())
    }

    /// Move `distance` units along `heading_deg`.
    pub fn offset(&self, heading_deg: f64, distance: f64) -> Position {
        let dir = direction(heading_deg);
        Position::new(self.x + dir.x * distance, self.y + dir.y * distance)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Velocity of magnitude `speed` along `heading_deg`.
    pub fn from_heading(heading_deg: f64, speed: f64) -> Self {
        let dir = direction(heading_deg) * speed;
        Self { x: dir.x, y: dir.y }
    }

    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Heading in degrees (0 = up, clockwise).
    pub fn heading(&self) -> f64 {
        normalize_deg(self.x.atan2(self.y).to_degrees())
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Unit vector for a heading in degrees (0 = +y, 90 = +x).
pub fn direction(heading_deg: f64) -> DVec2 {
    let rad = heading_deg.to_radians();
    DVec2::new(rad.sin(), rad.cos())
}

/// Wrap an angle into `[0, 360)`.
pub fn normalize_deg(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn angle_diff(from: f64, to: f64) -> f64 {
    let d = normalize_deg(to - from);
    if d > 180.0 {
        d - 360.0
    } else {
        d
    }
}

/// Angular range a turret may not aim into, measured clockwise from
/// `start` to `end` relative to the hull heading. May wrap past 360.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForbiddenArc {
    pub start: f64,
    pub end: f64,
}

impl ForbiddenArc {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start: normalize_deg(start),
            end: normalize_deg(end),
        }
    }

    /// Clockwise width of the arc in degrees.
    pub fn span(&self) -> f64 {
        normalize_deg(self.end - self.start)
    }

    /// True when `angle` lies strictly between the boundaries.
    /// Boundary values are not inside.
    pub fn contains_strict(&self, angle: f64) -> bool {
        let span = self.span();
        let offset = normalize_deg(angle - self.start);
        offset > crate::constants::ARC_EPSILON_DEG
            && offset < span - crate::constants::ARC_EPSILON_DEG
    }

    /// The boundary with the smaller angular distance to `angle`.
    /// Returns `None` on an exact tie.
    pub fn nearer_boundary(&self, angle: f64) -> Option<f64> {
        let to_start = angle_diff(angle, self.start).abs();
        let to_end = angle_diff(angle, self.end).abs();
        if (to_start - to_end).abs() <= crate::constants::ARC_EPSILON_DEG {
            None
        } else if to_start < to_end {
            Some(self.start)
        } else {
            Some(self.end)
        }
    }

    /// Whether rotating from `from` by the signed `delta` degrees passes
    /// through the arc interior. Touching a boundary does not count.
    pub fn sweeps_interior(&self, from: f64, delta: f64) -> bool {
        let span = self.span();
        if span <= crate::constants::ARC_EPSILON_DEG || delta == 0.0 {
            return false;
        }
        // Work in offsets from `start`, where the interior is (0, span) mod 360.
        let a = normalize_deg(from - self.start);
        let b = a + delta;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        (-1..=1).any(|k| {
            let base = 360.0 * k as f64;
            let overlap_lo = lo.max(base);
            let overlap_hi = hi.min(base + span);
            overlap_hi - overlap_lo > crate::constants::ARC_EPSILON_DEG
        })
    }
}
