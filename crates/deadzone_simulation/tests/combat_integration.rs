//! Combat integration test
//!
//! Полный цикл через CombatSimulation (physics step + frame, FlatArena):
//! - выстрел игрока → пуля → урон врагу
//! - melee удар врага с задержкой и повторной проверкой дистанции
//! - смерть / respawn игрока
//! - drop аптечки и heal lock
//! - fire rate при зажатом fire

use bevy::prelude::*;
use deadzone_simulation::deferred::DeferredQueue;
use deadzone_simulation::*;

const HZ: f32 = 60.0;

/// Helper: симуляция на плоской арене
fn create_simulation(config: SimulationConfig) -> CombatSimulation {
    CombatSimulation::new(config, FlatArena::default()).expect("valid config")
}

/// Helper: урон напрямую через damage контракт (как это делает любой источник)
fn hurt(sim: &mut CombatSimulation, target: Entity, amount: f32) {
    sim.world_mut().send_event(DamageRequest {
        target,
        amount,
        attacker: None,
        source: DamageSource::Environment,
    });
}

fn count_reports(reports: &[DisplayReport], predicate: impl Fn(&DisplayReport) -> bool) -> usize {
    reports.iter().filter(|report| predicate(report)).count()
}

/// Test: выстрел по неподвижному врагу, ровно одно попадание
#[test]
fn test_player_shot_damages_enemy_once() {
    let mut config = SimulationConfig::default();
    // Враг не реагирует на игрока (слишком далеко для погони)
    config.enemy.chase_range = 3.0;
    let mut sim = create_simulation(config);

    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    let enemy = sim.spawn_enemy(Vec3::new(0.0, 0.0, -10.0));

    // Наклоняем камеру на центр коллайдера врага
    {
        let pitch = -((1.7_f32 - 0.9) / 10.0).atan();
        let mut rig = sim.world_mut().get_mut::<CameraRig>(player).unwrap();
        rig.pitch = pitch;
        rig.target_pitch = pitch;
    }

    sim.run_for(0.1, HZ);
    sim.submit_input(PlayerInputEvent::fire());
    sim.run_for(1.0, HZ);

    assert_eq!(sim.health_of(enemy), Some(140.0));
    assert_eq!(sim.health_of(player), Some(100.0));

    let display = sim.drain_display_reports();
    let enemy_updates = count_reports(&display, |report| {
        matches!(report, DisplayReport::HealthChanged { entity, .. } if *entity == enemy)
    });
    assert_eq!(enemy_updates, 1, "Пуля должна попасть ровно один раз");

    let ammo = display.iter().rev().find_map(|report| match report {
        DisplayReport::AmmoChanged { current, .. } => Some(*current),
        _ => None,
    });
    assert_eq!(ammo, Some(29));

    // Пуля заспавнена и удалена
    let spawns = sim.drain_spawn_reports();
    let projectile = spawns.iter().find_map(|report| match report {
        SpawnReport::Spawned {
            entity,
            kind: SpawnKind::Projectile,
            ..
        } => Some(*entity),
        _ => None,
    });
    let projectile = projectile.expect("projectile spawned");
    assert!(spawns
        .iter()
        .any(|report| matches!(report, SpawnReport::Removed { entity } if *entity == projectile)));
}

/// Test: игрок рядом, melee удар после attack_delay
#[test]
fn test_enemy_melee_hits_after_delay() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    let enemy = sim.spawn_enemy(Vec3::new(0.0, 0.0, -2.0));

    sim.run_for(0.25, HZ);
    assert_eq!(sim.health_of(player), Some(100.0), "Урон не раньше attack_delay");
    assert!(matches!(
        sim.world().get::<AIState>(enemy),
        Some(AIState::Attacking { .. })
    ));

    sim.run_for(0.5, HZ);
    assert_eq!(sim.health_of(player), Some(75.0));
    assert!(!sim.world().get::<EnemyTimers>(enemy).unwrap().attacking);

    let swings = sim
        .drain_effect_requests()
        .iter()
        .filter(|request| request.entity == enemy && request.cue == EffectCue::MeleeSwing)
        .count();
    assert_eq!(swings, 1);
}

/// Test: игрок ушёл из радиуса до срабатывания удара, урона нет
#[test]
fn test_enemy_melee_rechecks_distance() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    let enemy = sim.spawn_enemy(Vec3::new(0.0, 0.0, -2.0));

    sim.run_for(1.0 / HZ, HZ);
    assert!(sim.world().get::<EnemyTimers>(enemy).unwrap().attacking);

    // Телепорт игрока далеко за attack_range
    sim.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 0.0, 5.0);

    sim.run_for(0.6, HZ);

    assert_eq!(sim.health_of(player), Some(100.0));
    assert!(!sim.world().get::<EnemyTimers>(enemy).unwrap().attacking);
}

/// Test: враг удалён во время замаха, отложенный удар тихо пропускается
#[test]
fn test_melee_strike_of_removed_enemy_is_noop() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    let enemy = sim.spawn_enemy(Vec3::new(0.0, 0.0, -2.0));

    sim.run_for(1.0 / HZ, HZ);
    assert!(sim.world().get::<EnemyTimers>(enemy).unwrap().attacking);
    assert_eq!(sim.world().resource::<DeferredQueue>().len(), 1);

    assert!(sim.remove_entity(enemy));
    assert!(!sim.remove_entity(enemy));

    sim.run_for(0.6, HZ);

    assert_eq!(sim.health_of(player), Some(100.0));
    assert!(sim.world().resource::<DeferredQueue>().is_empty());
}

/// Test: смерть игрока → PlayerDied → respawn_delay → PlayerRespawned
#[test]
fn test_player_death_and_respawn() {
    let mut sim = create_simulation(SimulationConfig::default());
    let spawn_position = Vec3::new(2.0, 0.0, 3.0);
    let player = sim.spawn_player(spawn_position, 0.5);

    sim.submit_input(PlayerInputEvent::moving(Vec2::Y));
    sim.run_for(0.5, HZ);
    assert!(sim.position_of(player).unwrap().distance(spawn_position) > 0.5);

    hurt(&mut sim, player, 500.0);
    sim.run_for(1.0 / HZ, HZ);

    assert_eq!(sim.health_of(player), Some(0.0));
    assert!(sim.world().get::<Dead>(player).is_some());

    // Мёртвый игрок стоит на месте (input игнорируется)
    let corpse = sim.position_of(player).unwrap();
    sim.submit_input(PlayerInputEvent::moving(Vec2::Y));
    sim.run_for(1.0, HZ);
    let drift = sim.position_of(player).unwrap() - corpse;
    assert!(Vec2::new(drift.x, drift.z).length() < 1e-3);

    sim.submit_input(PlayerInputEvent::default());
    sim.run_for(2.5, HZ);

    assert_eq!(sim.health_of(player), Some(100.0));
    assert!(sim.world().get::<Dead>(player).is_none());
    assert!(sim.position_of(player).unwrap().distance(spawn_position) < 1e-2);

    let display = sim.drain_display_reports();
    assert_eq!(
        count_reports(&display, |r| matches!(r, DisplayReport::PlayerDied { .. })),
        1
    );
    assert_eq!(
        count_reports(&display, |r| matches!(r, DisplayReport::PlayerRespawned { .. })),
        1
    );
}

/// Test: drop_chance 1.0, аптечка всегда, 0.0, никогда
#[test]
fn test_enemy_death_drop_chance() {
    for (drop_chance, expected) in [(1.0, 1), (0.0, 0)] {
        let mut config = SimulationConfig::default();
        config.enemy.drop_chance = drop_chance;
        let mut sim = create_simulation(config);

        let enemy = sim.spawn_enemy(Vec3::new(5.0, 0.0, 5.0));
        sim.run_for(0.1, HZ);
        sim.drain_spawn_reports();

        hurt(&mut sim, enemy, 1000.0);
        sim.run_for(1.0 / HZ, HZ);

        let spawns = sim.drain_spawn_reports();
        let drops = spawns
            .iter()
            .filter(|report| matches!(report, SpawnReport::Spawned { kind: SpawnKind::HealthPickup, .. }))
            .count();
        assert_eq!(drops, expected, "drop_chance {}", drop_chance);

        // removal_delay = 0 → враг удалён сразу
        assert!(sim.world().get_entity(enemy).is_err());
        assert!(spawns
            .iter()
            .any(|report| matches!(report, SpawnReport::Removed { entity } if *entity == enemy)));
    }
}

/// Test: removal_delay > 0, труп живёт до отложенного удаления
#[test]
fn test_enemy_corpse_removed_after_delay() {
    let mut config = SimulationConfig::default();
    config.enemy.removal_delay = 1.0;
    config.enemy.drop_chance = 0.0;
    let mut sim = create_simulation(config);

    let enemy = sim.spawn_enemy(Vec3::new(5.0, 0.0, 5.0));
    hurt(&mut sim, enemy, 1000.0);
    sim.run_for(0.5, HZ);

    assert_eq!(sim.world().get::<AIState>(enemy), Some(&AIState::Dead));

    sim.run_for(1.0, HZ);
    assert!(sim.world().get_entity(enemy).is_err());
}

/// Test: heal lock держит аптечку, после него лечение принимается
#[test]
fn test_health_pickup_respects_heal_lock() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);

    hurt(&mut sim, player, 50.0);
    sim.run_for(1.0 / HZ, HZ);
    assert_eq!(sim.health_of(player), Some(50.0));

    let pickup = sim.spawn_health_pickup(Vec3::ZERO);
    sim.run_for(0.5, HZ);

    assert_eq!(sim.health_of(player), Some(50.0));
    assert!(sim.world().get_entity(pickup).is_ok(), "Под heal lock аптечка остаётся");

    sim.run_for(1.0, HZ);

    assert_eq!(sim.health_of(player), Some(75.0));
    assert!(sim.world().get_entity(pickup).is_err());
}

/// Test: полное HP, аптечка не тратится
#[test]
fn test_health_pickup_ignored_at_full_health() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    let pickup = sim.spawn_health_pickup(Vec3::new(0.3, 0.0, 0.0));

    sim.run_for(0.5, HZ);

    assert_eq!(sim.health_of(player), Some(100.0));
    assert!(sim.world().get_entity(pickup).is_ok());
}

/// Test: зажатый fire секунду, темп ограничен fire_rate (0.15 с)
#[test]
fn test_held_fire_respects_fire_rate() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);

    for _ in 0..60 {
        sim.submit_input(PlayerInputEvent::fire());
        sim.run_for(1.0 / HZ, HZ);
    }

    let ammo = sim.world().get::<WeaponState>(player).unwrap().current_ammo();
    assert!((23..=24).contains(&ammo), "ammo {}", ammo);

    // Перезарядка возвращает полный магазин
    sim.submit_input(PlayerInputEvent::reload());
    sim.run_for(1.0 / HZ, HZ);
    assert_eq!(sim.world().get::<WeaponState>(player).unwrap().current_ammo(), 30);
}

/// Test: recoil оружия уходит в камеру, kick нарастает и плавно спадает
#[test]
fn test_weapon_recoil_drives_camera() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    sim.run_for(0.1, HZ);

    let recoil_offset = |sim: &CombatSimulation| sim.world().get::<CameraRig>(player).unwrap().recoil_offset;
    assert_eq!(recoil_offset(&sim), 0.0);

    sim.submit_input(PlayerInputEvent::fire());
    sim.run_for(1.0 / HZ, HZ);
    let first_frame = recoil_offset(&sim);
    assert!(first_frame > 0.0);

    sim.run_for(9.0 / HZ, HZ);
    let tenth_frame = recoil_offset(&sim);
    assert!(tenth_frame > first_frame, "{} <= {}", tenth_frame, first_frame);
    assert!(tenth_frame > 0.01);

    // Ещё видно спустя треть секунды
    sim.run_for(0.2, HZ);
    assert!(recoil_offset(&sim) > 0.005);

    sim.run_for(2.0, HZ);
    let rig = sim.world().get::<CameraRig>(player).unwrap();
    assert!(rig.recoil_offset.abs() < 1e-6);
    assert!(rig.target_recoil_offset.abs() < 1e-6);
    assert_eq!(sim.world().get::<WeaponState>(player).unwrap().current_recoil(), 0.0);
}

/// Test: пуля толкает dynamic body
#[test]
fn test_projectile_pushes_dynamic_body() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::ZERO, 0.0);
    let body = sim.spawn_dynamic_body(Vec3::new(0.25, 0.0, -8.0), 5.0, 1.0);

    {
        // Луч из глаз в центр сферы
        let pitch = -((1.7_f32 - 1.0) / 7.0).atan();
        let mut rig = sim.world_mut().get_mut::<CameraRig>(player).unwrap();
        rig.pitch = pitch;
        rig.target_pitch = pitch;
    }

    sim.run_for(0.1, HZ);
    let before = sim.position_of(body).unwrap();

    sim.submit_input(PlayerInputEvent::fire());
    sim.run_for(0.5, HZ);

    let after = sim.position_of(body).unwrap();
    assert!(after.z < before.z - 0.05, "body moved {:?} → {:?}", before, after);
}

/// Test: невалидный конфиг отклоняется до первого тика
#[test]
fn test_invalid_config_rejected() {
    let mut config = SimulationConfig::default();
    config.enemy.minimum_range = 5.0;

    assert!(CombatSimulation::new(config, FlatArena::default()).is_err());
}

/// Test: NaN/inf/отрицательный dt не паникуют и не двигают мир
#[test]
fn test_non_finite_step_is_ignored() {
    let mut sim = create_simulation(SimulationConfig::default());
    let player = sim.spawn_player(Vec3::new(0.0, 2.0, 0.0), 0.0);

    for dt in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, -1.0] {
        sim.advance_physics(dt);
        sim.advance_frame(dt);
    }
    sim.run_for(f32::INFINITY, HZ);
    sim.run_for(1.0, f32::NAN);

    let position = sim.world().get::<Transform>(player).unwrap().translation;
    assert_eq!(position, Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(sim.health_of(player), Some(100.0));

    // После мусора симуляция шагает как обычно
    sim.run_for(1.0, HZ);
    assert!(sim.world().get::<Transform>(player).unwrap().translation.y < 0.01);
}
