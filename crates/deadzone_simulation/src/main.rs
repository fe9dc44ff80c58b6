//! Headless симуляция DEADZONE
//!
//! Игрок идёт вперёд и стреляет, враги сходятся на него.
//! Печатает отчёты, которые получил бы внешний HUD / сцена.

use bevy::prelude::*;
use deadzone_simulation::{
    init_logger, log_info, ArenaObstacle, CombatSimulation, DisplayReport, FlatArena, PlayerInputEvent,
    SimulationConfig, SpawnReport,
};

fn main() {
    init_logger();

    let config = SimulationConfig::default();
    let seed = config.seed;
    let arena = FlatArena::default().with_obstacle(ArenaObstacle::new(Vec3::new(4.0, 1.0, -6.0), Vec3::ONE));

    let mut simulation = match CombatSimulation::new(config, arena) {
        Ok(simulation) => simulation,
        Err(error) => {
            eprintln!("invalid simulation config: {error}");
            std::process::exit(1);
        }
    };

    log_info(&format!("Starting DEADZONE headless simulation (seed: {})", seed));

    let player = simulation.spawn_player(Vec3::ZERO, 0.0);
    for x in [-3.0, 0.0, 3.0] {
        simulation.spawn_enemy(Vec3::new(x, 0.0, -10.0));
    }
    simulation.spawn_dynamic_body(Vec3::new(-2.0, 0.0, -4.0), 20.0, 0.4);

    let dt = 1.0 / 60.0;
    let mut deaths = 0;

    // 10 секунд: идём вперёд, стреляем каждые 10 кадров, перезарядка каждые 2 секунды
    for tick in 0..600u32 {
        simulation.submit_input(PlayerInputEvent {
            move_axes: Vec2::new(0.0, if tick < 120 { 1.0 } else { 0.0 }),
            fire: tick % 10 == 0,
            reload: tick % 120 == 119,
            ..default()
        });

        simulation.advance_physics(dt);
        simulation.advance_frame(dt);

        for report in simulation.drain_display_reports() {
            if let DisplayReport::PlayerDied { .. } = report {
                deaths += 1;
            }
        }
        let removed = simulation
            .drain_spawn_reports()
            .iter()
            .filter(|report| matches!(report, SpawnReport::Removed { .. }))
            .count();
        simulation.drain_effect_requests();

        if tick % 100 == 0 {
            let entity_count = simulation.world().entities().len();
            log_info(&format!(
                "Tick {}: {} entities, player health {:?}, {} removed",
                tick,
                entity_count,
                simulation.health_of(player),
                removed
            ));
        }
    }

    log_info(&format!("Simulation complete! player deaths: {}", deaths));
}
