//! Compartment damage ledger operations.
//!
//! Every write to a `DamageLedger` goes through this module. Callers own
//! the ledger and pass it in; nothing here holds vessel state. Effect
//! requests (explosions, audio) are left to the caller, which reads the
//! returned `DamageOutcome`.

use rand::Rng;
use tracing::{debug, info};

use broadside_core::components::{Compartment, CombatEffects, DamageLedger, Hull, Turrets};
use broadside_core::config::DamageConfig;
use broadside_core::constants::*;
use broadside_core::error::LookupError;
use broadside_core::state::CompartmentStatus;
use broadside_core::types::VesselId;

/// What a single `apply_damage` call did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageOutcome {
    /// Compartment that took the damage, if any.
    pub compartment: Option<String>,
    /// Generic hull impact that struck no compartment.
    pub pass_through: bool,
    /// Compartment went from intact to destroyed.
    pub newly_destroyed: bool,
    /// A fire started in the struck compartment.
    pub ignited: bool,
    /// A magazine went up and the vessel sank.
    pub detonated: bool,
}

// ---- Name classification ----

/// Magazine or ammunition store.
pub fn is_magazine(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MAGAZINE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Compartments that can burn and count toward the fire total.
pub fn is_fire_prone(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("engine")
        || lower.contains("bridge")
        || lower.starts_with("turret")
        || MAGAZINE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Hull regions that count toward the flooding total.
pub fn is_flood_region(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    FLOOD_REGIONS.contains(&lower.as_str())
}

// ---- Lookup ----

pub fn find_compartment(ledger: &DamageLedger, name: &str) -> Option<usize> {
    ledger.compartments.iter().position(|c| c.name == name)
}

/// Resolve a compartment by name, or a typed `CompartmentNotFound`.
pub fn resolve_compartment(
    ledger: &DamageLedger,
    vessel: VesselId,
    name: &str,
) -> Result<usize, LookupError> {
    find_compartment(ledger, name).ok_or_else(|| LookupError::CompartmentNotFound {
        vessel,
        name: name.to_string(),
    })
}

/// Keep `damage_percent` in step with hit points.
fn sync_percent(c: &mut Compartment) {
    c.current_hp = c.current_hp.clamp(0.0, c.max_hp.max(0.0));
    let remaining = if c.max_hp > 0.0 {
        c.current_hp / c.max_hp
    } else {
        0.0
    };
    let pct = (100.0 * (1.0 - remaining)).round().clamp(0.0, 100.0);
    c.damage_percent = pct as u8;
}

// ---- Damage and repair ----

/// Damage a named compartment, or roll a generic hull impact when `None`.
///
/// A generic impact strikes a random intact compartment with probability
/// `compartment_hit_chance`; otherwise it passes through the hull doing no
/// compartment damage. Sunk vessels are untouched.
pub fn apply_damage<R: Rng + ?Sized>(
    ledger: &mut DamageLedger,
    compartment: Option<&str>,
    amount: f64,
    config: &DamageConfig,
    rng: &mut R,
) -> DamageOutcome {
    let mut outcome = DamageOutcome::default();
    if ledger.sunk {
        return outcome;
    }

    let index = match compartment {
        Some(name) => match find_compartment(ledger, name) {
            Some(i) => i,
            None => {
                debug!(compartment = name, "damage aimed at unknown compartment");
                return outcome;
            }
        },
        None => {
            let intact: Vec<usize> = ledger
                .compartments
                .iter()
                .enumerate()
                .filter(|(_, c)| !c.destroyed)
                .map(|(i, _)| i)
                .collect();
            if intact.is_empty() || !rng.gen_bool(config.compartment_hit_chance) {
                outcome.pass_through = true;
                return outcome;
            }
            intact[rng.gen_range(0..intact.len())]
        }
    };

    let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
    let c = &mut ledger.compartments[index];
    c.current_hp -= amount;
    sync_percent(c);

    let was_destroyed = c.destroyed;
    if c.damage_percent >= 100 || c.current_hp <= 0.0 {
        c.destroyed = true;
    }
    outcome.newly_destroyed = c.destroyed && !was_destroyed;

    if !c.on_fire
        && amount > 0.0
        && is_fire_prone(&c.name)
        && c.damage_percent > IGNITION_THRESHOLD
        && rng.gen_bool(config.ignition_chance)
    {
        c.on_fire = true;
        outcome.ignited = true;
    }

    let name = c.name.clone();
    if outcome.newly_destroyed
        && config.lock_destroyed_fires
        && is_fire_prone(&name)
        && !ledger.fire_locks.contains(&name)
    {
        ledger.fire_locks.push(name.clone());
    }
    outcome.compartment = Some(name);

    outcome.detonated = check_detonation(ledger);
    outcome
}

/// Sink the vessel if a magazine (or a compartment flagged to detonate)
/// is fully damaged. Returns true only on the call that sinks it.
pub fn check_detonation(ledger: &mut DamageLedger) -> bool {
    if ledger.sunk {
        return false;
    }
    let trigger = ledger
        .compartments
        .iter()
        .find(|c| (c.detonates || is_magazine(&c.name)) && c.damage_percent >= 100);
    match trigger {
        Some(c) => {
            info!(compartment = %c.name, "magazine detonation");
            ledger.sunk = true;
            true
        }
        None => false,
    }
}

/// Restore hit points to a compartment. Returns false when nothing was
/// repaired (sunk vessel or unknown compartment).
///
/// At or below the control threshold the fire goes out and the compartment
/// is pumped dry.
pub fn apply_repair(ledger: &mut DamageLedger, compartment: &str, hp: f64) -> bool {
    if ledger.sunk {
        return false;
    }
    let Some(index) = find_compartment(ledger, compartment) else {
        return false;
    };
    let hp = if hp.is_finite() { hp.max(0.0) } else { 0.0 };
    let c = &mut ledger.compartments[index];
    c.current_hp += hp;
    sync_percent(c);
    if c.damage_percent < 100 && c.current_hp > 0.0 {
        c.destroyed = false;
    }
    if c.damage_percent <= REPAIR_CONTROL_THRESHOLD {
        c.on_fire = false;
        c.flood_level = 0.0;
    }
    true
}

/// Scuttle or otherwise sink a vessel from outside the damage path.
/// Returns true if this call changed the flag.
pub fn mark_sunk(ledger: &mut DamageLedger) -> bool {
    if ledger.sunk {
        return false;
    }
    ledger.sunk = true;
    true
}

// ---- Hazards ----

/// Raise flood levels in breached floodable compartments.
///
/// Only compartments damaged past the control threshold take on water,
/// faster the worse the breach.
pub fn apply_flooding(ledger: &mut DamageLedger, dt: f64, config: &DamageConfig) {
    if ledger.sunk {
        return;
    }
    for c in ledger.compartments.iter_mut() {
        if !c.floodable || c.damage_percent <= REPAIR_CONTROL_THRESHOLD {
            continue;
        }
        let breach = c.damage_percent as f64 / 100.0;
        c.flood_level = (c.flood_level + config.flood_rate_per_sec * breach * dt).clamp(0.0, 1.0);
    }
}

/// Names of compartments currently burning.
pub fn burning(ledger: &DamageLedger) -> Vec<String> {
    ledger
        .compartments
        .iter()
        .filter(|c| c.on_fire)
        .map(|c| c.name.clone())
        .collect()
}

/// Sink the vessel once total flooding reaches 100 %.
pub fn check_foundering(ledger: &mut DamageLedger) -> bool {
    if ledger.sunk || flooding_percent(ledger) < 100.0 {
        return false;
    }
    info!("vessel foundered");
    ledger.sunk = true;
    true
}

// ---- Derived effects ----

/// Worst damage fraction among compartments whose name contains `part`.
fn part_damage(ledger: &DamageLedger, part: &str) -> f64 {
    ledger
        .compartments
        .iter()
        .filter(|c| c.name.to_ascii_lowercase().contains(part))
        .map(|c| c.damage_percent as f64 / 100.0)
        .fold(0.0, f64::max)
}

/// Overall flood level, 0 - 100.
pub fn flooding_percent(ledger: &DamageLedger) -> f64 {
    let total: f64 = ledger
        .compartments
        .iter()
        .filter(|c| is_flood_region(&c.name))
        .map(|c| {
            let damage = c.damage_percent as f64 / 100.0;
            HAZARD_CONTRIBUTION_PCT * damage.max(c.flood_level).clamp(0.0, 1.0)
        })
        .sum();
    total.min(100.0)
}

/// Overall fire level, 0 - 100. Locked compartments always count in full.
pub fn fire_percent(ledger: &DamageLedger) -> f64 {
    let total: f64 = ledger
        .compartments
        .iter()
        .filter(|c| is_fire_prone(&c.name))
        .map(|c| {
            if ledger.fire_locks.contains(&c.name) {
                HAZARD_CONTRIBUTION_PCT
            } else if c.on_fire {
                HAZARD_CONTRIBUTION_PCT * c.damage_percent as f64 / 100.0
            } else {
                0.0
            }
        })
        .sum();
    total.min(100.0)
}

/// Derive capability multipliers from the ledger.
pub fn recompute_effects(ledger: &DamageLedger) -> CombatEffects {
    let engine = part_damage(ledger, "engine");
    let rudder = part_damage(ledger, "rudder");
    let bridge = part_damage(ledger, "bridge");
    let rangefinder = part_damage(ledger, "rangefinder");
    let flooding = flooding_percent(ledger);
    let fire = fire_percent(ledger);
    let flood_frac = flooding / 100.0;

    let rangefinder_loss = (0.5 * rangefinder).min(TARGETING_REDUCTION_CAP);
    let bridge_loss = (0.5 * bridge).min(TARGETING_REDUCTION_CAP);

    CombatEffects {
        speed_cap: (1.0 - 0.7 * engine - 0.3 * flood_frac).clamp(0.1, 1.0),
        acceleration_factor: (1.0 - 0.6 * engine - 0.2 * flood_frac).clamp(0.2, 1.0),
        turn_rate_factor: (1.0 - 0.6 * rudder - 0.2 * bridge).clamp(0.2, 1.0),
        rudder_effectiveness: (1.0 - 0.8 * rudder).max(0.2),
        targeting_effectiveness: 1.0 - (rangefinder_loss + bridge_loss).min(1.0),
        flooding_percent: flooding,
        fire_percent: fire,
        damage_control_efficiency: (1.0 - 0.5 * bridge - 0.3 * fire / 100.0)
            .clamp(MIN_DC_EFFICIENCY, 1.0),
    }
}

/// Fraction of turrets whose hitbox compartment still stands.
pub fn operational_turret_fraction(ledger: &DamageLedger, turrets: &Turrets) -> f64 {
    if turrets.0.is_empty() {
        return 0.0;
    }
    let working = turrets
        .0
        .iter()
        .filter(|t| !turret_destroyed(ledger, &t.compartment))
        .count();
    working as f64 / turrets.0.len() as f64
}

pub fn turret_destroyed(ledger: &DamageLedger, compartment: &str) -> bool {
    find_compartment(ledger, compartment)
        .map(|i| ledger.compartments[i].destroyed)
        .unwrap_or(false)
}

/// Chance (0.0 - 1.0) that a shot at `range` lands.
///
/// Product of range factor, own-speed penalty, turret accuracy and
/// targeting effectiveness, each clamped to [0, 1].
pub fn hit_probability(
    range: f64,
    hull: &Hull,
    operational_fraction: f64,
    effects: &CombatEffects,
) -> f64 {
    let range_factor = if hull.max_range > 0.0 {
        (1.0 - range / hull.max_range).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let speed_penalty = if hull.max_speed_kts > 0.0 {
        (1.0 - SPEED_PENALTY_WEIGHT * hull.speed_kts.abs() / hull.max_speed_kts).clamp(0.0, 1.0)
    } else {
        1.0
    };
    let turret_accuracy = (hull.base_accuracy * operational_fraction).clamp(0.0, 1.0);
    let targeting = effects.targeting_effectiveness.clamp(0.0, 1.0);
    range_factor * speed_penalty * turret_accuracy * targeting
}

pub fn compartment_status(ledger: &DamageLedger) -> Vec<CompartmentStatus> {
    ledger
        .compartments
        .iter()
        .map(|c| CompartmentStatus {
            name: c.name.clone(),
            damage_percent: c.damage_percent,
            on_fire: c.on_fire,
            destroyed: c.destroyed,
            floodable: c.floodable,
        })
        .collect()
}
