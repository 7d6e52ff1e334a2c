//! Tests for the simulation engine: determinism, sinking, fleet
//! continuity, fire control and damage control driven tick by tick.

use broadside_core::commands::FleetCommand;
use broadside_core::components::{DamageLedger, Hull, TargetSpec, Turrets};
use broadside_core::constants::*;
use broadside_core::enums::*;
use broadside_core::events::EffectRequest;
use broadside_core::types::{Position, VesselId};

use crate::engine::{SimConfig, SimulationEngine};
use crate::world_setup::SpawnRequest;

const DT_TEST: f64 = 0.05;

fn engine_with_seed(seed: u64) -> SimulationEngine {
    SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    })
}

/// Player battleship at the origin facing two enemy destroyers 800 units north.
fn skirmish(seed: u64) -> (SimulationEngine, VesselId, Vec<VesselId>) {
    let mut engine = engine_with_seed(seed);
    let player = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "battleship", Position::new(0.0, 0.0), 0.0, 10.0)
            .player(),
    );
    let enemies = vec![
        engine.spawn_vessel(SpawnRequest::new(
            Side::Enemy,
            "destroyer",
            Position::new(-60.0, 800.0),
            180.0,
            20.0,
        )),
        engine.spawn_vessel(SpawnRequest::new(
            Side::Enemy,
            "destroyer",
            Position::new(60.0, 800.0),
            180.0,
            20.0,
        )),
    ];
    engine.set_target(player, Some(TargetSpec::Vessel { vessel: enemies[0] }));
    engine.set_fire_enabled(player, true);
    (engine, player, enemies)
}

fn ledger_of(engine: &SimulationEngine, id: VesselId) -> DamageLedger {
    engine
        .world()
        .query::<(&Hull, &DamageLedger)>()
        .iter()
        .find(|(_, (hull, _))| hull.id == id)
        .map(|(_, (_, ledger))| ledger.clone())
        .expect("vessel should exist")
}

fn hull_of(engine: &SimulationEngine, id: VesselId) -> Hull {
    engine
        .world()
        .query::<&Hull>()
        .iter()
        .find(|(_, hull)| hull.id == id)
        .map(|(_, hull)| hull.clone())
        .expect("vessel should exist")
}

fn count_sinking_audio(effects: &[EffectRequest]) -> usize {
    effects
        .iter()
        .filter(|e| matches!(e, EffectRequest::SinkingAudio { .. }))
        .count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let (mut engine_a, _, _) = skirmish(12345);
    let (mut engine_b, _, _) = skirmish(12345);

    for _ in 0..300 {
        let snap_a = engine_a.tick(DT_TEST);
        let snap_b = engine_b.tick(DT_TEST);

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let (mut engine_a, _, _) = skirmish(111);
    let (mut engine_b, _, _) = skirmish(222);

    // Shell deviation and reload jitter are rolled per shot, so the
    // snapshots diverge once the first salvo is in the air.
    let mut diverged = false;
    for _ in 0..300 {
        let json_a = serde_json::to_string(&engine_a.tick(DT_TEST)).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick(DT_TEST)).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

#[test]
fn test_dt_is_clamped() {
    let mut engine = engine_with_seed(1);
    let snap = engine.tick(5.0);
    assert!((snap.time.elapsed_secs - MAX_DT).abs() < 1e-12);
    let snap = engine.tick(-1.0);
    assert!((snap.time.elapsed_secs - MAX_DT).abs() < 1e-12);
    assert_eq!(snap.time.tick, 2);
}

// ---- Gunnery ----

#[test]
fn test_skirmish_exchanges_fire() {
    let (mut engine, player, enemies) = skirmish(7);
    let mut fired = 0;
    let mut impacts = 0;
    for _ in 0..400 {
        let snap = engine.tick(DT_TEST);
        for effect in &snap.effects {
            match effect {
                EffectRequest::GunFired { .. } => fired += 1,
                EffectRequest::Explosion { .. } | EffectRequest::Splash { .. } => impacts += 1,
                _ => {}
            }
        }
    }
    assert!(fired > 0, "no guns fired");
    assert!(impacts > 0, "no shell ever resolved");

    // Enemies auto-engage the player.
    let fc = engine.fire_control(enemies[1]);
    assert!(
        engine.is_sunk(enemies[1])
            || fc.is_some_and(|fc| fc.target == Some(TargetSpec::Vessel { vessel: player }))
    );
}

#[test]
fn test_long_range_fire_strikes_hull() {
    let mut engine = engine_with_seed(11);
    let player = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "battleship", Position::new(0.0, 0.0), 0.0, 0.0)
            .player(),
    );
    let target_at = Position::new(0.0, 1_000.0);
    let enemy = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "battleship",
        target_at,
        180.0,
        0.0,
    ));
    engine.set_target(player, Some(TargetSpec::Vessel { vessel: enemy }));
    engine.set_fire_enabled(player, true);

    let mut hull_hits = 0;
    for _ in 0..1_200 {
        let snap = engine.tick(DT_TEST);
        hull_hits += snap
            .effects
            .iter()
            .filter(|e| match e {
                EffectRequest::Explosion { position, radius } => {
                    *radius == SHELL_EXPLOSION_RADIUS
                        && position.range_to(&target_at) <= HULL_HIT_RADIUS + 30.0
                }
                _ => false,
            })
            .count();
    }
    assert!(hull_hits > 0, "no shell struck the hull at 1000 units");
}

#[test]
fn test_out_of_range_holds_fire() {
    let mut engine = engine_with_seed(3);
    let player = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "cruiser", Position::default(), 0.0, 0.0).player(),
    );
    engine.set_target(
        player,
        Some(TargetSpec::Point {
            position: Position::new(0.0, 5_000.0),
        }),
    );
    engine.set_fire_enabled(player, true);

    for _ in 0..100 {
        let snap = engine.tick(DT_TEST);
        assert!(snap.shells.is_empty());
        assert!(!snap
            .effects
            .iter()
            .any(|e| matches!(e, EffectRequest::GunFired { .. })));
    }
    // The order itself stands; only the shot is suppressed.
    assert!(engine.fire_control(player).unwrap().fire_enabled);
}

#[test]
fn test_turrets_never_rest_in_forbidden_arc() {
    let (mut engine, player, enemies) = skirmish(99);
    // Swing the player around so targets sweep through every arc.
    engine.set_helm(player, 90.0, 24.0);
    engine.set_helm(enemies[0], 0.0, 30.0);

    for i in 0..800 {
        if i == 400 {
            engine.set_helm(player, 270.0, 12.0);
        }
        engine.tick(DT_TEST);
        for (_, turrets) in engine.world().query::<&Turrets>().iter() {
            for turret in &turrets.0 {
                if let Some(arc) = turret.forbidden {
                    assert!(
                        !arc.contains_strict(turret.angle),
                        "turret {} at {} inside arc [{}, {}] on tick {i}",
                        turret.id,
                        turret.angle,
                        arc.start,
                        arc.end
                    );
                }
            }
        }
    }
}

#[test]
fn test_hit_probability_and_muzzle() {
    let mut engine = engine_with_seed(5);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "battleship",
        Position::default(),
        0.0,
        0.0,
    ));

    let near = engine.hit_probability(id, Position::new(0.0, 100.0)).unwrap();
    let far = engine.hit_probability(id, Position::new(0.0, 1_500.0)).unwrap();
    assert!(near <= 100);
    assert!(far < near, "near {near}% should beat far {far}%");
    assert_eq!(engine.hit_probability(VesselId(99), Position::default()), None);

    // Forward turret 1: 30 units forward of center, 8 unit barrel, facing the bow.
    let muzzle = engine.turret_muzzle(id, 1).unwrap();
    assert!(muzzle.x.abs() < 1e-9);
    assert!((muzzle.y - 38.0).abs() < 1e-9, "muzzle y = {}", muzzle.y);
    assert!(muzzle.world_aim_angle.abs() < 1e-9);
    assert!(engine.turret_muzzle(id, 9).is_none());
}

// ---- Damage model through the engine ----

#[test]
fn test_overkill_damage_destroys_compartment() {
    let mut engine = engine_with_seed(1);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "cruiser",
        Position::default(),
        0.0,
        0.0,
    ));

    engine.apply_damage(id, Some("engine"), 600.0).unwrap();
    let ledger = ledger_of(&engine, id);
    let engine_room = ledger.compartments.iter().find(|c| c.name == "engine").unwrap();
    assert_eq!(engine_room.current_hp, 0.0);
    assert_eq!(engine_room.damage_percent, 100);
    assert!(engine_room.destroyed);

    let status = engine.compartment_status(id).unwrap();
    let engine_status = status.iter().find(|c| c.name == "engine").unwrap();
    assert!(engine_status.destroyed);
    assert_eq!(engine_status.damage_percent, 100);

    // Losing the engine room slows the ship after the next effects pass.
    let snap = engine.tick(DT_TEST);
    assert!(snap.vessels[0].effects.speed_cap < 1.0);
}

#[test]
fn test_magazine_detonation_sinks_once() {
    let mut engine = engine_with_seed(2);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "cruiser",
        Position::default(),
        0.0,
        0.0,
    ));

    engine.apply_damage(id, Some("magazine"), 495.0).unwrap();
    let magazine = engine
        .compartment_status(id)
        .unwrap()
        .into_iter()
        .find(|c| c.name == "magazine")
        .unwrap();
    assert_eq!(magazine.damage_percent, 99);
    assert!(!engine.is_sunk(id));

    let outcome = engine.apply_damage(id, Some("magazine"), 5.0).unwrap();
    assert!(outcome.detonated);
    assert!(engine.is_sunk(id));

    let first = engine.tick(DT_TEST);
    assert_eq!(count_sinking_audio(&first.effects), 1);
    let large = first
        .effects
        .iter()
        .filter(|e| matches!(e, EffectRequest::Explosion { radius, .. } if *radius == LARGE_EXPLOSION_RADIUS))
        .count();
    assert_eq!(large, 2, "detonation plus sinking explosion");
    assert_eq!(engine.display_name(id).unwrap(), format!("Cruiser {}{}", id.0, SUNK_SUFFIX));

    let second = engine.tick(DT_TEST);
    assert_eq!(count_sinking_audio(&second.effects), 0);
    assert!(second.effects.is_empty());
    assert_eq!(
        engine.display_name(id).unwrap().matches(SUNK_SUFFIX).count(),
        1
    );
}

#[test]
fn test_sunk_ledger_is_frozen() {
    let mut engine = engine_with_seed(4);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "destroyer",
        Position::default(),
        0.0,
        0.0,
    ));
    assert!(engine.scuttle(id));
    assert!(!engine.scuttle(id));
    let before = serde_json::to_string(&engine.compartment_status(id)).unwrap();
    let outcome = engine.apply_damage(id, Some("bridge"), 100.0).unwrap();
    assert_eq!(outcome, Default::default());
    let after = serde_json::to_string(&engine.compartment_status(id)).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_sink_transition_is_idempotent() {
    let mut engine = engine_with_seed(8);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "destroyer",
        Position::default(),
        0.0,
        0.0,
    ));
    engine.scuttle(id);
    engine.tick(DT_TEST);
    assert!(matches!(engine.lifecycle(id), Some(Lifecycle::Sinking { .. })));

    let once = serde_json::to_string(&engine.snapshot()).unwrap();
    assert!(!engine.run_sink_transition(id));
    let twice = serde_json::to_string(&engine.snapshot()).unwrap();
    assert_eq!(once, twice);
    assert_eq!(count_sinking_audio(&engine.tick(0.0).effects), 0);
}

#[test]
fn test_sunk_vessel_despawns_after_delay() {
    let mut engine = engine_with_seed(9);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "destroyer",
        Position::default(),
        0.0,
        0.0,
    ));
    engine.scuttle(id);

    let mut removed_at = None;
    for _ in 0..200 {
        let snap = engine.tick(MAX_DT);
        if snap.vessels.is_empty() {
            removed_at = Some(snap.time.elapsed_secs);
            break;
        }
    }
    let removed_at = removed_at.expect("sunk vessel was never removed");
    assert!(
        removed_at >= SINK_DESPAWN_DELAY_SECS,
        "removed after {removed_at}s, expected at least {SINK_DESPAWN_DELAY_SECS}s"
    );
    assert_eq!(engine.lifecycle(id), Some(Lifecycle::Despawned));
    assert!(engine.is_sunk(id));
    assert!(engine.compartment_status(id).is_none());
    assert!(engine.display_name(id).is_none());
}

// ---- Fleet continuity ----

#[test]
fn test_fleet_leadership_succession() {
    let mut engine = engine_with_seed(10);
    let fleet = engine.new_fleet();
    let members: Vec<VesselId> = (0..3)
        .map(|i| {
            engine.spawn_vessel(
                SpawnRequest::new(
                    Side::Friendly,
                    "cruiser",
                    Position::new(i as f64 * 80.0, 0.0),
                    0.0,
                    0.0,
                )
                .in_fleet(fleet),
            )
        })
        .collect();
    assert_eq!(engine.fleet_leader(fleet), Some(members[0]));
    assert_eq!(engine.fleet_of(members[2]), Some(fleet));

    // Member 2 is already down when the leader goes.
    engine.scuttle(members[1]);
    engine.tick(DT_TEST);
    assert_eq!(engine.fleet_leader(fleet), Some(members[0]));

    engine.scuttle(members[0]);
    engine.tick(DT_TEST);
    assert_eq!(engine.fleet_leader(fleet), Some(members[2]));

    engine.scuttle(members[2]);
    let snap = engine.tick(DT_TEST);
    assert_eq!(engine.fleet_leader(fleet), None);
    assert!(snap.vessels.iter().all(|v| !v.fleet_leader));
}

#[test]
fn test_leader_loss_promotes_second_member() {
    let mut engine = engine_with_seed(11);
    let fleet = engine.new_fleet();
    let members: Vec<VesselId> = (0..3)
        .map(|i| {
            engine.spawn_vessel(
                SpawnRequest::new(
                    Side::Friendly,
                    "destroyer",
                    Position::new(i as f64 * 80.0, 0.0),
                    0.0,
                    0.0,
                )
                .in_fleet(fleet),
            )
        })
        .collect();
    engine.scuttle(members[0]);
    engine.tick(DT_TEST);
    assert_eq!(engine.fleet_leader(fleet), Some(members[1]));
}

#[test]
fn test_followers_take_leader_orders() {
    let mut engine = engine_with_seed(12);
    let fleet = engine.new_fleet();
    let leader = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "cruiser", Position::default(), 0.0, 0.0)
            .in_fleet(fleet),
    );
    let follower = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "cruiser", Position::new(0.0, -80.0), 0.0, 0.0)
            .in_fleet(fleet),
    );

    engine.set_helm(leader, 90.0, 20.0);
    engine.tick(DT_TEST);
    let hull = hull_of(&engine, follower);
    assert_eq!(hull.desired_heading, 90.0);
    assert_eq!(hull.target_speed_kts, 20.0);

    // The surviving member takes over and steers the formation itself.
    engine.scuttle(leader);
    engine.tick(DT_TEST);
    engine.set_helm(follower, 45.0, 5.0);
    engine.tick(DT_TEST);
    let hull = hull_of(&engine, follower);
    assert_eq!(engine.fleet_leader(fleet), Some(follower));
    assert_eq!(hull.desired_heading, 45.0);
}

#[test]
fn test_player_handoff_inherits_targeting() {
    let mut engine = engine_with_seed(13);
    let player = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "battleship", Position::default(), 0.0, 0.0).player(),
    );
    let near = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "cruiser",
        Position::new(100.0, 0.0),
        0.0,
        0.0,
    ));
    let far = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "cruiser",
        Position::new(500.0, 0.0),
        0.0,
        0.0,
    ));
    let enemy = engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "destroyer",
        Position::new(0.0, 5_000.0),
        180.0,
        0.0,
    ));
    engine.set_target(player, Some(TargetSpec::Vessel { vessel: enemy }));
    engine.set_fire_enabled(player, true);
    engine.select(Some(player));
    assert_eq!(engine.player(), Some(player));

    engine.apply_damage(player, Some("magazine"), 10_000.0);
    let snap = engine.tick(DT_TEST);

    assert_eq!(engine.player(), Some(near));
    assert_eq!(snap.player, Some(near));
    assert_eq!(engine.selected(), None);
    let fc = engine.fire_control(near).unwrap();
    assert_eq!(fc.target, Some(TargetSpec::Vessel { vessel: enemy }));
    assert!(fc.fire_enabled);
    let roles: Vec<(VesselId, VesselRole)> = snap.vessels.iter().map(|v| (v.id, v.role)).collect();
    assert!(roles.contains(&(near, VesselRole::Player)));
    assert!(roles.contains(&(far, VesselRole::Friendly)));
    assert!(roles.contains(&(player, VesselRole::Friendly)));
}

#[test]
fn test_no_friendly_left_clears_player() {
    let mut engine = engine_with_seed(14);
    let player = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "cruiser", Position::default(), 0.0, 0.0).player(),
    );
    engine.spawn_vessel(SpawnRequest::new(
        Side::Enemy,
        "cruiser",
        Position::new(50.0, 0.0),
        0.0,
        0.0,
    ));
    engine.scuttle(player);
    engine.tick(DT_TEST);
    assert_eq!(engine.player(), None);
}

#[test]
fn test_spawning_new_player_demotes_old() {
    let mut engine = engine_with_seed(15);
    let first = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "cruiser", Position::default(), 0.0, 0.0).player(),
    );
    let second = engine.spawn_vessel(
        SpawnRequest::new(Side::Friendly, "destroyer", Position::new(80.0, 0.0), 0.0, 0.0)
            .player(),
    );
    assert_eq!(engine.player(), Some(second));
    let fc = engine.fire_control(first).unwrap();
    assert!(fc.auto_engage);
    let snap = engine.snapshot();
    assert_eq!(snap.vessels[0].role, VesselRole::Friendly);
    assert_eq!(snap.vessels[1].role, VesselRole::Player);
}

// ---- Targeting ----

#[test]
fn test_invalid_target_clears_and_holds_fire() {
    let (mut engine, player, enemies) = skirmish(20);
    engine.tick(DT_TEST);

    engine.despawn_vessel(enemies[0]);
    let fc = engine.fire_control(player).unwrap();
    assert_eq!(fc.target, None);
    assert!(!fc.fire_enabled);

    // Targeting a vessel that is gone is refused outright.
    engine.set_fire_enabled(player, true);
    engine.set_target(player, Some(TargetSpec::Vessel { vessel: enemies[0] }));
    let fc = engine.fire_control(player).unwrap();
    assert_eq!(fc.target, None);
    assert!(!fc.fire_enabled);
}

#[test]
fn test_sunk_target_released_on_tick() {
    let (mut engine, player, enemies) = skirmish(21);
    engine.scuttle(enemies[0]);
    engine.tick(DT_TEST);
    let fc = engine.fire_control(player).unwrap();
    assert_eq!(fc.target, None);
    assert!(!fc.fire_enabled);
}

// ---- Damage control ----

#[test]
fn test_repair_team_restores_hp() {
    let mut engine = engine_with_seed(30);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "cruiser",
        Position::default(),
        0.0,
        0.0,
    ));
    engine.apply_damage(id, Some("rudder"), 100.0);
    engine.assign_repair_team(1, id, Some("rudder".into()));
    // Team 3 does not exist.
    engine.assign_repair_team(3, id, Some("engine".into()));
    assert!(engine.repair_assignment(3).is_none());

    for _ in 0..20 {
        engine.tick(MAX_DT);
    }
    let rudder = ledger_of(&engine, id)
        .compartments
        .into_iter()
        .find(|c| c.name == "rudder")
        .unwrap();
    assert!(rudder.current_hp > 100.0, "rudder hp {}", rudder.current_hp);
    assert!(rudder.current_hp <= rudder.max_hp);
}

#[test]
fn test_stale_repair_assignment_idles() {
    let mut engine = engine_with_seed(31);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "cruiser",
        Position::default(),
        0.0,
        0.0,
    ));
    engine.assign_repair_team(2, id, Some("galley".into()));
    engine.tick(DT_TEST);
    assert!(engine.repair_assignment(2).is_some(), "unknown compartment keeps the team");

    engine.despawn_vessel(id);
    engine.tick(DT_TEST);
    let assignment = engine.repair_assignment(2).unwrap();
    assert_eq!(assignment.vessel, id);
}

#[test]
fn test_sinking_recalls_repair_teams() {
    let mut engine = engine_with_seed(32);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "cruiser",
        Position::default(),
        0.0,
        0.0,
    ));
    engine.assign_repair_team(1, id, Some("engine".into()));
    engine.scuttle(id);
    engine.tick(DT_TEST);
    assert!(engine.repair_assignment(1).is_none());
}

// ---- Command queue and config ----

#[test]
fn test_commands_from_json() {
    let mut engine = engine_with_seed(40);
    let id = engine.spawn_vessel(SpawnRequest::new(
        Side::Friendly,
        "destroyer",
        Position::default(),
        0.0,
        0.0,
    ));
    let json = format!(
        r#"[
            {{"type":"SetHelm","vessel":{0},"heading":450.0,"speed_kts":99.0}},
            {{"type":"Select","vessel":{0}}},
            {{"type":"AssignRepairTeam","team":1,"vessel":{0},"compartment":"bridge"}}
        ]"#,
        id.0
    );
    let commands: Vec<FleetCommand> = serde_json::from_str(&json).unwrap();
    for command in commands {
        engine.queue_command(command);
    }
    let snap = engine.tick(DT_TEST);

    let hull = hull_of(&engine, id);
    assert_eq!(hull.desired_heading, 90.0);
    assert_eq!(hull.target_speed_kts, hull.max_speed_kts);
    assert_eq!(snap.selected, Some(id));
    assert_eq!(engine.repair_assignment(1).unwrap().compartment, "bridge");

    engine.queue_command(FleetCommand::DespawnVessel { vessel: id });
    let snap = engine.tick(DT_TEST);
    assert!(snap.vessels.is_empty());
    assert_eq!(snap.selected, None);
}

#[test]
fn test_sim_config_from_json() {
    let config = SimConfig::from_json(r#"{"seed": 7, "gunnery": {"shell_speed": 500.0}}"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.tuning.gunnery.shell_speed, 500.0);
    assert_eq!(config.tuning.gunnery.reload_secs, RELOAD_SECS);

    let config = SimConfig::from_json("{}").unwrap();
    assert_eq!(config.seed, SimConfig::default().seed);

    let bad = r#"{"gunnery": {"deviation_min_fraction": 0.2, "deviation_max_fraction": 0.1}}"#;
    assert!(SimConfig::from_json(bad).is_err());
}
