//! Runtime tuning for gunnery, damage, repair and fleet behavior.
//!
//! Every field defaults to the matching value in `constants`, so a JSON
//! override only needs the fields it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// All tunables, grouped by subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub gunnery: GunneryConfig,
    pub damage: DamageConfig,
    pub repair: RepairConfig,
    pub fleet: FleetConfig,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.gunnery;
        if g.deviation_min_fraction > g.deviation_max_fraction {
            return Err(ConfigError::Invalid(format!(
                "deviation band is inverted ({} > {})",
                g.deviation_min_fraction, g.deviation_max_fraction
            )));
        }
        if g.reload_secs < 0.0 || g.reload_jitter_secs < 0.0 {
            return Err(ConfigError::Invalid("reload times must be >= 0".into()));
        }
        if !(0.0..=1.0).contains(&self.damage.compartment_hit_chance) {
            return Err(ConfigError::Invalid(
                "compartment_hit_chance must be within [0, 1]".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.damage.ignition_chance) {
            return Err(ConfigError::Invalid(
                "ignition_chance must be within [0, 1]".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GunneryConfig {
    pub shell_speed: f64,
    pub reload_secs: f64,
    pub reload_jitter_secs: f64,
    pub deviation_min_fraction: f64,
    pub deviation_max_fraction: f64,
    /// Degrees per second.
    pub traverse_rate: f64,
    pub aim_tolerance_deg: f64,
    pub hull_hit_radius: f64,
    pub shell_damage: f64,
    pub penetration_budget: f64,
}

impl Default for GunneryConfig {
    fn default() -> Self {
        Self {
            shell_speed: SHELL_SPEED,
            reload_secs: RELOAD_SECS,
            reload_jitter_secs: RELOAD_JITTER_SECS,
            deviation_min_fraction: DEVIATION_MIN_FRACTION,
            deviation_max_fraction: DEVIATION_MAX_FRACTION,
            traverse_rate: TURRET_TRAVERSE_RATE,
            aim_tolerance_deg: AIM_TOLERANCE_DEG,
            hull_hit_radius: HULL_HIT_RADIUS,
            shell_damage: SHELL_DAMAGE,
            penetration_budget: SHELL_PENETRATION_BUDGET,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    pub compartment_hit_chance: f64,
    pub ignition_chance: f64,
    pub fire_damage_per_sec: f64,
    pub flood_rate_per_sec: f64,
    /// Keep a compartment's fire contribution at its maximum once it has
    /// been destroyed, even if it is later repaired.
    pub lock_destroyed_fires: bool,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            compartment_hit_chance: COMPARTMENT_HIT_CHANCE,
            ignition_chance: IGNITION_CHANCE,
            fire_damage_per_sec: FIRE_DAMAGE_PER_SEC,
            flood_rate_per_sec: FLOOD_RATE_PER_SEC,
            lock_destroyed_fires: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Fraction of max HP restored per second at full efficiency.
    pub rate_per_sec: f64,
    pub min_efficiency: f64,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: REPAIR_RATE_PER_SEC,
            min_efficiency: MIN_DC_EFFICIENCY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub sink_despawn_delay_secs: f64,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            sink_despawn_delay_secs: SINK_DESPAWN_DELAY_SECS,
        }
    }
}
