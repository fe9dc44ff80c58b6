//! Tests for weapon systems.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::combat::systems::weapon::*;
    use crate::combat::{Dead, Projectile, WeaponState, WeaponStats};
    use crate::components::Player;
    use crate::environment::{BodySnapshot, Environment};
    use crate::input::{PlayerInputEvent, PlayerInputState};
    use crate::player::{CameraRig, RecoilKick};
    use crate::reports::{DisplayReport, EffectRequest, SpawnReport};
    use crate::DeterministicRng;

    fn weapon_app() -> App {
        let mut app = App::new();
        app.add_event::<WeaponFireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<WeaponFired>()
            .add_event::<RecoilKick>()
            .add_event::<DisplayReport>()
            .add_event::<EffectRequest>()
            .add_event::<SpawnReport>()
            .init_resource::<Environment>()
            .init_resource::<BodySnapshot>()
            .init_resource::<PlayerInputState>()
            .insert_resource(DeterministicRng::new(7))
            .insert_resource(Time::<()>::default())
            .add_systems(
                Update,
                (player_weapon_input, process_reload, process_weapon_fire, tick_weapons).chain(),
            );
        app
    }

    fn frame(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.world_mut().run_schedule(Update);
    }

    fn spawn_shooter(app: &mut App) -> Entity {
        let stats = WeaponStats::default();
        app.world_mut()
            .spawn((
                Player,
                Transform::from_xyz(0.0, 0.0, 0.0),
                CameraRig::new(0.0, 0.0, 1.7),
                stats,
                WeaponState::new(&stats),
            ))
            .id()
    }

    fn projectiles(app: &mut App) -> Vec<(Projectile, Transform)> {
        let world = app.world_mut();
        let mut query = world.query::<(&Projectile, &Transform)>();
        query.iter(world).map(|(projectile, transform)| (*projectile, *transform)).collect()
    }

    fn ammo_reports(app: &App) -> usize {
        app.world()
            .resource::<Events<DisplayReport>>()
            .iter_current_update_events()
            .filter(|report| matches!(report, DisplayReport::AmmoChanged { .. }))
            .count()
    }

    #[test]
    fn test_two_intents_inside_fire_rate_spawn_one_projectile() {
        let mut app = weapon_app();
        let shooter = spawn_shooter(&mut app);

        app.world_mut().send_event(WeaponFireIntent { shooter });
        app.world_mut().send_event(WeaponFireIntent { shooter });
        frame(&mut app, 1.0 / 60.0);

        assert_eq!(projectiles(&mut app).len(), 1);
        assert_eq!(app.world().get::<WeaponState>(shooter).unwrap().current_ammo(), 29);
        assert_eq!(ammo_reports(&app), 1);
    }

    #[test]
    fn test_camera_shot_flies_along_aim() {
        let mut app = weapon_app();
        spawn_shooter(&mut app);

        app.world_mut()
            .resource_mut::<PlayerInputState>()
            .apply(&PlayerInputEvent::fire());
        frame(&mut app, 1.0 / 60.0);

        let shots = projectiles(&mut app);
        assert_eq!(shots.len(), 1);

        let (projectile, transform) = shots[0];
        let direction = projectile.velocity.normalize();
        // Первый выстрел без spread, точка прицеливания в 1000 м
        assert!(direction.dot(Vec3::NEG_Z) > 0.999);
        assert!((projectile.velocity.length() - 50.0).abs() < 1e-3);

        // Дуло = глаза + view × muzzle_offset
        let expected_muzzle = Vec3::new(0.25, 1.5, -0.6);
        assert!((transform.translation - expected_muzzle).length() < 1e-4);

        let kicks = app.world().resource::<Events<RecoilKick>>();
        assert_eq!(kicks.len(), 1);
    }

    #[test]
    fn test_turret_fires_along_forward() {
        let mut app = weapon_app();
        let stats = WeaponStats {
            muzzle_offset: Vec3::ZERO,
            ..default()
        };
        let turret = app
            .world_mut()
            .spawn((
                Transform::from_xyz(0.0, 1.0, 0.0).looking_to(Vec3::X, Vec3::Y),
                stats,
                WeaponState::new(&stats),
            ))
            .id();

        app.world_mut().send_event(WeaponFireIntent { shooter: turret });
        frame(&mut app, 1.0 / 60.0);

        let shots = projectiles(&mut app);
        assert_eq!(shots.len(), 1);
        assert!(shots[0].0.velocity.normalize().dot(Vec3::X) > 0.999);
        assert_eq!(shots[0].0.owner, Some(turret));

        // Не игрок: ни HUD, ни recoil камеры
        assert_eq!(ammo_reports(&app), 0);
        assert!(app.world().resource::<Events<RecoilKick>>().is_empty());
    }

    #[test]
    fn test_reload_full_magazine_reports_nothing() {
        let mut app = weapon_app();
        let shooter = spawn_shooter(&mut app);

        app.world_mut().send_event(ReloadIntent { shooter });
        frame(&mut app, 1.0 / 60.0);
        assert_eq!(ammo_reports(&app), 0);

        app.world_mut().send_event(WeaponFireIntent { shooter });
        frame(&mut app, 1.0 / 60.0);
        app.world_mut().send_event(ReloadIntent { shooter });
        frame(&mut app, 1.0 / 60.0);

        // Выстрел + перезарядка
        assert_eq!(ammo_reports(&app), 2);
        assert_eq!(app.world().get::<WeaponState>(shooter).unwrap().current_ammo(), 30);
    }

    #[test]
    fn test_dead_player_edges_consumed() {
        let mut app = weapon_app();
        let shooter = spawn_shooter(&mut app);
        app.world_mut().entity_mut(shooter).insert(Dead);

        app.world_mut()
            .resource_mut::<PlayerInputState>()
            .apply(&PlayerInputEvent::fire());
        frame(&mut app, 1.0 / 60.0);

        assert!(projectiles(&mut app).is_empty());
        assert!(!app.world_mut().resource_mut::<PlayerInputState>().take_fire());
    }

    #[test]
    fn test_spread_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spread = 0.06;

        for _ in 0..200 {
            let direction = apply_spread(Vec3::NEG_Z, spread, &mut rng);
            assert!((direction.length() - 1.0).abs() < 1e-4);
            // Два угла по ≤ spread/2 → суммарно ≤ spread/√2
            assert!(direction.angle_between(Vec3::NEG_Z) <= spread * 0.75);
        }

        assert_eq!(apply_spread(Vec3::Y, 0.0, &mut rng), Vec3::Y);
    }
}
