//! Entity spawn factories for setting up the simulation world.
//!
//! Builds vessels from a small set of class templates: hull kinematics,
//! compartment layout and turret mounts.

use hecs::{Entity, World};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use broadside_core::components::*;
use broadside_core::constants::FLOOD_REGIONS;
use broadside_core::enums::{Lifecycle, Side, TurretMount, VesselRole};
use broadside_core::types::{normalize_deg, ForbiddenArc, Position, Velocity, VesselId};

/// Request to put a new vessel in the water.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub side: Side,
    pub position: Position,
    /// Initial heading, also used as the initial desired heading.
    pub heading: f64,
    pub speed_kts: f64,
    /// Class name, e.g. "battleship". Unknown labels fall back to a destroyer.
    pub type_label: String,
    #[serde(default)]
    pub fleet: Option<FleetId>,
    /// Only honored for friendly vessels.
    #[serde(default)]
    pub player_controlled: bool,
}

impl SpawnRequest {
    pub fn new(
        side: Side,
        type_label: impl Into<String>,
        position: Position,
        heading: f64,
        speed_kts: f64,
    ) -> Self {
        Self {
            side,
            position,
            heading,
            speed_kts,
            type_label: type_label.into(),
            fleet: None,
            player_controlled: false,
        }
    }

    pub fn in_fleet(mut self, fleet: FleetId) -> Self {
        self.fleet = Some(fleet);
        self
    }

    pub fn player(mut self) -> Self {
        self.player_controlled = true;
        self
    }
}

/// Per-class hull parameters.
struct ClassTemplate {
    label: &'static str,
    max_speed_kts: f64,
    turn_rate: f64,
    base_accuracy: f64,
    max_range: f64,
    forward_turrets: u8,
    aft_turrets: u8,
    /// Multiplier on base compartment HP.
    hp_scale: f64,
}

const BATTLESHIP: ClassTemplate = ClassTemplate {
    label: "battleship",
    max_speed_kts: 24.0,
    turn_rate: 4.0,
    base_accuracy: 0.7,
    max_range: 1_600.0,
    forward_turrets: 2,
    aft_turrets: 1,
    hp_scale: 1.5,
};

const CRUISER: ClassTemplate = ClassTemplate {
    label: "cruiser",
    max_speed_kts: 30.0,
    turn_rate: 6.0,
    base_accuracy: 0.65,
    max_range: 1_300.0,
    forward_turrets: 1,
    aft_turrets: 1,
    hp_scale: 1.0,
};

const DESTROYER: ClassTemplate = ClassTemplate {
    label: "destroyer",
    max_speed_kts: 36.0,
    turn_rate: 9.0,
    base_accuracy: 0.6,
    max_range: 1_000.0,
    forward_turrets: 1,
    aft_turrets: 1,
    hp_scale: 0.6,
};

/// (name, base HP) for every non-turret compartment, bow to stern.
const BASE_COMPARTMENTS: [(&str, f64); 10] = [
    ("bow", 400.0),
    ("hullfore", 500.0),
    ("bridge", 300.0),
    ("rangefinder", 150.0),
    ("magazine", 500.0),
    ("hullmid", 600.0),
    ("engine", 500.0),
    ("hullaft", 500.0),
    ("rudder", 200.0),
    ("stern", 400.0),
];

const TURRET_HP: f64 = 350.0;
const BARREL_LENGTH: f64 = 8.0;
const FORWARD_ARC: (f64, f64) = (145.0, 235.0);
const AFT_ARC: (f64, f64) = (325.0, 35.0);
/// Spacing between superfiring turrets on the same end of the hull.
const TURRET_SPACING: f64 = 14.0;
const MOUNT_OFFSET: f64 = 30.0;

fn template(label: &str) -> &'static ClassTemplate {
    match label.to_ascii_lowercase().as_str() {
        "battleship" => &BATTLESHIP,
        "cruiser" => &CRUISER,
        "destroyer" => &DESTROYER,
        other => {
            warn!(type_label = other, "unknown vessel class; using destroyer");
            &DESTROYER
        }
    }
}

fn compartment(name: String, max_hp: f64) -> Compartment {
    let floodable = FLOOD_REGIONS.contains(&name.as_str());
    Compartment {
        name,
        max_hp,
        current_hp: max_hp,
        damage_percent: 0,
        floodable,
        on_fire: false,
        destroyed: false,
        detonates: false,
        flood_level: 0.0,
    }
}

fn turret(id: u8, mount: TurretMount, rank: u8) -> Turret {
    let (arc, angle, forward) = match mount {
        TurretMount::Forward => (FORWARD_ARC, 0.0, MOUNT_OFFSET + TURRET_SPACING * rank as f64),
        TurretMount::Aft => (AFT_ARC, 180.0, -MOUNT_OFFSET - TURRET_SPACING * rank as f64),
    };
    Turret {
        id,
        compartment: format!("turret{id}"),
        angle,
        forbidden: Some(ForbiddenArc::new(arc.0, arc.1)),
        mount,
        offset: MuzzleOffset {
            forward,
            starboard: 0.0,
        },
        barrel_length: BARREL_LENGTH,
        cooldown_secs: 0.0,
        desired_angle: None,
    }
}

fn build_turrets(class: &ClassTemplate) -> Turrets {
    let mut turrets = Vec::new();
    let mut id = 0u8;
    for rank in 0..class.forward_turrets {
        id += 1;
        turrets.push(turret(id, TurretMount::Forward, rank));
    }
    for rank in 0..class.aft_turrets {
        id += 1;
        turrets.push(turret(id, TurretMount::Aft, rank));
    }
    Turrets(turrets)
}

fn build_ledger(class: &ClassTemplate, turrets: &Turrets) -> DamageLedger {
    let mut compartments: Vec<Compartment> = BASE_COMPARTMENTS
        .iter()
        .map(|(name, hp)| compartment(name.to_string(), hp * class.hp_scale))
        .collect();
    compartments.extend(
        turrets
            .0
            .iter()
            .map(|t| compartment(t.compartment.clone(), TURRET_HP * class.hp_scale)),
    );
    DamageLedger {
        compartments,
        ..Default::default()
    }
}

/// Capitalized class label followed by the vessel number.
fn display_name(label: &str, id: VesselId) -> String {
    let mut chars = label.chars();
    let head: String = chars
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default();
    format!("{head}{} {}", chars.as_str(), id.0)
}

/// Spawn a vessel entity with the full component bundle for its class.
pub fn spawn_vessel(world: &mut World, id: VesselId, request: &SpawnRequest, role: VesselRole) -> Entity {
    let class = template(&request.type_label);
    let turrets = build_turrets(class);
    let ledger = build_ledger(class, &turrets);
    let heading = normalize_deg(request.heading);
    let speed = request.speed_kts.clamp(-class.max_speed_kts, class.max_speed_kts);

    let hull = Hull {
        id,
        name: display_name(class.label, id),
        type_label: class.label.to_string(),
        heading,
        desired_heading: heading,
        speed_kts: speed,
        target_speed_kts: speed,
        max_speed_kts: class.max_speed_kts,
        turn_rate: class.turn_rate,
        base_accuracy: class.base_accuracy,
        max_range: class.max_range,
    };
    let fire_control = FireControl {
        target: None,
        fire_enabled: false,
        auto_engage: role != VesselRole::Player,
    };
    let motion = MotionEstimate {
        last_position: request.position,
        velocity: Velocity::zero(),
        primed: false,
    };

    info!(vessel = %id, name = %hull.name, ?role, "vessel spawned");
    let entity = world.spawn((
        hull,
        request.position,
        role,
        turrets,
        ledger,
        CombatEffects::default(),
        fire_control,
        motion,
        Lifecycle::Alive,
    ));
    if let Some(fleet) = request.fleet {
        let _ = world.insert_one(entity, FleetMember { fleet });
    }
    entity
}
