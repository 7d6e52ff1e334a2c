//! Simulation constants and tuning defaults.
//!
//! Values the designers tune at runtime live in `config`; these are the
//! defaults those structs start from plus fixed model parameters.

/// Nominal simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Nominal seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Upper clamp on a single tick's dt (seconds). Long frames are truncated.
pub const MAX_DT: f64 = 0.1;

// --- Kinematics ---

/// World units travelled per second at one knot.
pub const UNITS_PER_KNOT: f64 = 0.5;

/// Helm acceleration (knots per second) at full acceleration factor.
pub const HELM_ACCELERATION_KTS: f64 = 2.0;

// --- Aiming ---

/// Angular error (degrees) within which a turret counts as on target.
pub const AIM_TOLERANCE_DEG: f64 = 1.5;

/// Turret traverse rate (degrees per second).
pub const TURRET_TRAVERSE_RATE: f64 = 30.0;

/// Slack (degrees) when testing whether a path touches the forbidden arc.
/// Sitting exactly on a boundary is allowed.
pub const ARC_EPSILON_DEG: f64 = 1e-6;

// --- Gunnery ---

/// Shell muzzle speed (world units per second).
pub const SHELL_SPEED: f64 = 400.0;

/// Reload interval between shots from one turret (seconds).
pub const RELOAD_SECS: f64 = 4.0;

/// Maximum random extra delay added to each reload (seconds).
pub const RELOAD_JITTER_SECS: f64 = 0.8;

/// Lateral aim deviation as a fraction of range (lower bound).
pub const DEVIATION_MIN_FRACTION: f64 = 0.03;

/// Lateral aim deviation as a fraction of range (upper bound).
pub const DEVIATION_MAX_FRACTION: f64 = 0.05;

/// Extra lifetime granted beyond the nominal flight time (seconds).
pub const SHELL_TTL_GRACE_SECS: f64 = 0.5;

/// Lifetime of a shell with no fixed target point (seconds).
pub const MAX_SHELL_TTL_SECS: f64 = 8.0;

/// Distance a shell may travel over land before detonating (world units).
pub const SHELL_PENETRATION_BUDGET: f64 = 12.0;

/// Distance from a vessel center that counts as a hull hit (world units).
pub const HULL_HIT_RADIUS: f64 = 18.0;

/// Damage dealt by one shell hit (hit points).
pub const SHELL_DAMAGE: f64 = 120.0;

/// Default maximum engagement range (world units).
pub const MAX_ENGAGEMENT_RANGE: f64 = 1_600.0;

/// Hit-probability weight of own speed (fraction lost at max speed).
pub const SPEED_PENALTY_WEIGHT: f64 = 0.5;

// --- Damage model ---

/// Chance that a generic hull impact strikes a compartment
/// instead of passing through the hull.
pub const COMPARTMENT_HIT_CHANCE: f64 = 0.5;

/// Damage percent at or below which repair extinguishes fire and pumps out flooding.
pub const REPAIR_CONTROL_THRESHOLD: u8 = 50;

/// Damage percent above which a fire-prone compartment may ignite.
pub const IGNITION_THRESHOLD: u8 = 50;

/// Chance that a damaging hit ignites a fire-prone compartment over the threshold.
pub const IGNITION_CHANCE: f64 = 0.25;

/// Hit points per second a fire burns from its compartment.
pub const FIRE_DAMAGE_PER_SEC: f64 = 4.0;

/// Flood level rise per second in a fully damaged floodable compartment.
pub const FLOOD_RATE_PER_SEC: f64 = 0.02;

/// Maximum contribution (percent) of one compartment to flooding or fire totals.
pub const HAZARD_CONTRIBUTION_PCT: f64 = 20.0;

/// Maximum targeting reduction (fraction) from each of rangefinder and bridge damage.
pub const TARGETING_REDUCTION_CAP: f64 = 0.5;

/// Hull regions that contribute to the flooding total.
pub const FLOOD_REGIONS: [&str; 5] = ["bow", "hullfore", "hullmid", "hullaft", "stern"];

/// Compartment name patterns that count as magazines.
pub const MAGAZINE_PATTERNS: [&str; 2] = ["magazine", "ammo"];

// --- Repair ---

/// Fraction of a compartment's max HP one team restores per second at full efficiency.
pub const REPAIR_RATE_PER_SEC: f64 = 0.02;

/// Floor on damage-control efficiency.
pub const MIN_DC_EFFICIENCY: f64 = 0.25;

// --- Fleet ---

/// Delay between the sink transition and removal from the world (seconds).
pub const SINK_DESPAWN_DELAY_SECS: f64 = 3.0;

/// Radius of the explosion requested on catastrophic detonation or sinking.
pub const LARGE_EXPLOSION_RADIUS: f64 = 60.0;

/// Radius of a shell explosion.
pub const SHELL_EXPLOSION_RADIUS: f64 = 10.0;

/// Marker appended once to a sunk vessel's display name.
pub const SUNK_SUFFIX: &str = " (sunk)";
