//! Tests for player death / respawn systems.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;

    use crate::combat::{Dead, EntityDied, WeaponStats};
    use crate::components::Health;
    use crate::config::PlayerConfig;
    use crate::input::{PlayerInputEvent, PlayerInputState};
    use crate::player::{handle_player_death, player_bundle, tick_player_respawn, PlayerLife};
    use crate::reports::DisplayReport;

    fn lifecycle_app(config: PlayerConfig) -> App {
        let mut app = App::new();
        app.add_event::<EntityDied>()
            .add_event::<DisplayReport>()
            .insert_resource(config)
            .init_resource::<PlayerInputState>()
            .insert_resource(Time::<Fixed>::default())
            .add_systems(FixedUpdate, (tick_player_respawn, handle_player_death).chain());
        app
    }

    fn kill(app: &mut App, player: Entity) {
        let mut health = app.world_mut().get_mut::<Health>(player).unwrap();
        health.take_damage(1000.0);
        app.world_mut().entity_mut(player).insert(Dead);
        app.world_mut().send_event(EntityDied {
            entity: player,
            killer: None,
        });
    }

    fn step(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.world_mut().run_schedule(FixedUpdate);
    }

    fn reports(app: &App) -> Vec<DisplayReport> {
        let events = app.world().resource::<Events<DisplayReport>>();
        events.iter_current_update_events().copied().collect()
    }

    #[test]
    fn test_respawn_cycle() {
        let config = PlayerConfig {
            respawn_delay: 1.0,
            ..default()
        };
        let mut app = lifecycle_app(config.clone());
        let spawn = Vec3::new(2.0, 0.0, -3.0);
        let player = app
            .world_mut()
            .spawn(player_bundle(&config, WeaponStats::default(), spawn, 0.5))
            .id();

        // Игрок ушёл от точки spawn'а
        app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(10.0, 0.0, 10.0);

        kill(&mut app, player);
        step(&mut app, 0.1);

        assert_eq!(
            *app.world().get::<PlayerLife>(player).unwrap(),
            PlayerLife::Dead {
                respawn_timer: Some(1.0)
            }
        );
        let died = reports(&app)
            .iter()
            .filter(|report| matches!(report, DisplayReport::PlayerDied { .. }))
            .count();
        assert_eq!(died, 1);

        step(&mut app, 0.5);
        assert!(!app.world().get::<PlayerLife>(player).unwrap().is_alive());

        step(&mut app, 0.6);
        let world = app.world();
        assert!(world.get::<PlayerLife>(player).unwrap().is_alive());
        assert!(world.get::<Dead>(player).is_none());
        assert_eq!(world.get::<Health>(player).unwrap().current(), config.max_health);

        let transform = world.get::<Transform>(player).unwrap();
        assert_eq!(transform.translation, spawn);
        assert!((transform.rotation.to_euler(EulerRot::YXZ).0 - 0.5).abs() < 1e-5);

        let respawned = reports(&app)
            .iter()
            .filter(|report| matches!(report, DisplayReport::PlayerRespawned { .. }))
            .count();
        assert_eq!(respawned, 1);
    }

    #[test]
    fn test_respawn_disabled_keeps_player_dead() {
        let config = PlayerConfig {
            respawn_enabled: false,
            ..default()
        };
        let mut app = lifecycle_app(config.clone());
        let player = app
            .world_mut()
            .spawn(player_bundle(&config, WeaponStats::default(), Vec3::ZERO, 0.0))
            .id();

        kill(&mut app, player);
        for _ in 0..10 {
            step(&mut app, 1.0);
        }

        assert_eq!(
            *app.world().get::<PlayerLife>(player).unwrap(),
            PlayerLife::Dead { respawn_timer: None }
        );
        assert_eq!(app.world().get::<Health>(player).unwrap().current(), 0.0);
    }

    #[test]
    fn test_death_clears_latched_input() {
        let config = PlayerConfig::default();
        let mut app = lifecycle_app(config.clone());
        let player = app
            .world_mut()
            .spawn(player_bundle(&config, WeaponStats::default(), Vec3::ZERO, 0.0))
            .id();

        app.world_mut()
            .resource_mut::<PlayerInputState>()
            .apply(&PlayerInputEvent::fire());

        kill(&mut app, player);
        step(&mut app, 0.1);

        assert!(!app.world_mut().resource_mut::<PlayerInputState>().take_fire());
    }
}
