//! Player locomotion (physics tick)
//!
//! Порядок шага:
//! 1. grounded с прошлого move → ground / air ветка для горизонтали
//! 2. Вертикаль: gravity в воздухе, jump edge на земле
//! 3. Environment::move_body → grounded, landing kick, slide
//!
//! Горизонталь считается чистыми функциями (тестируются без World).

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{Collider, KinematicBody, Player};
use crate::config::PlayerConfig;
use crate::environment::{slide_velocity, BodySnapshot, Environment, MoveRequest};
use crate::input::PlayerInputState;
use crate::shared::{lerp, move_toward};

use super::camera::{CameraRig, RecoilKick};

/// Состояние движения игрока между шагами
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionState {
    /// 0 = ходьба, 1 = полный sprint
    pub sprint_ratio: f32,
    /// Желаемое направление (world space, |d| ≤ 1)
    pub direction: Vec3,
}

impl LocomotionState {
    pub fn is_sprinting(&self) -> bool {
        self.sprint_ratio > 0.5
    }
}

/// Оси (x = right, y = forward) → направление в плоскости XZ относительно yaw
pub fn wish_direction(axes: Vec2, yaw: f32) -> Vec3 {
    let rotation = Quat::from_rotation_y(yaw);
    let forward = rotation * Vec3::NEG_Z;
    let right = rotation * Vec3::X;

    let direction = right * axes.x + forward * axes.y;
    if direction.length_squared() > 1.0 {
        direction.normalize()
    } else {
        direction
    }
}

pub fn step_sprint_ratio(ratio: f32, sprinting: bool, rate: f32, delta: f32) -> f32 {
    let target = if sprinting { 1.0 } else { 0.0 };
    move_toward(ratio, target, rate * delta)
}

pub fn max_speed(config: &PlayerConfig, sprint_ratio: f32) -> f32 {
    lerp(config.base_speed, config.base_speed * config.sprint_multiplier, sprint_ratio)
}

/// Горизонталь на земле
///
/// Без input: friction, ниже stop_speed, полная остановка.
/// С input: добираем скорость не больше acceleration × dt, потом clamp к max_speed.
pub fn ground_motion(horizontal: Vec3, direction: Vec3, max_speed: f32, config: &PlayerConfig, delta: f32) -> Vec3 {
    if direction == Vec3::ZERO {
        let speed = horizontal.length();
        if speed <= 0.0 || speed < config.stop_speed {
            return Vec3::ZERO;
        }
        let scale = (speed - config.friction * delta).max(0.0) / speed;
        return horizontal * scale;
    }

    let add = (max_speed - horizontal.length()).clamp(0.0, config.acceleration * delta);
    (horizontal + direction * add).clamp_length_max(max_speed)
}

/// Горизонталь в воздухе: ограниченный air control + air drag
pub fn air_motion(horizontal: Vec3, direction: Vec3, max_speed: f32, config: &PlayerConfig, delta: f32) -> Vec3 {
    if direction == Vec3::ZERO {
        return horizontal;
    }

    let target = direction * (max_speed * config.air_control);
    let step = config.acceleration * config.air_control * delta;
    let steered = Vec3::new(
        move_toward(horizontal.x, target.x, step),
        0.0,
        move_toward(horizontal.z, target.z, step),
    );

    let drag = (config.air_drag * delta).min(1.0);
    steered * (1.0 - drag)
}

/// Kick камеры при жёстком приземлении (радианы), None если мягко
pub fn landing_kick(config: &PlayerConfig, vertical_velocity: f32) -> Option<f32> {
    (vertical_velocity < config.landing_kick_threshold)
        .then(|| (-vertical_velocity * config.landing_kick_scale).to_radians())
}

/// System: шаг движения игрока
///
/// Мёртвый игрок получает нулевой input (только гравитация / трение).
#[allow(clippy::too_many_arguments)]
pub fn player_locomotion(
    time: Res<Time<Fixed>>,
    config: Res<PlayerConfig>,
    mut input: ResMut<PlayerInputState>,
    environment: Res<Environment>,
    bodies: Res<BodySnapshot>,
    mut players: Query<
        (
            Entity,
            &mut Transform,
            &mut KinematicBody,
            &mut LocomotionState,
            &Collider,
            &CameraRig,
            Has<Dead>,
        ),
        With<Player>,
    >,
    mut recoil_kicks: EventWriter<RecoilKick>,
) {
    let delta = time.delta_secs();
    let jump_pressed = input.take_jump();

    for (entity, mut transform, mut body, mut locomotion, collider, rig, dead) in players.iter_mut() {
        let (axes, sprint, jump) = if dead {
            (Vec2::ZERO, false, false)
        } else {
            (input.move_axes, input.sprint, jump_pressed)
        };

        locomotion.direction = wish_direction(axes, rig.yaw);
        locomotion.sprint_ratio = step_sprint_ratio(locomotion.sprint_ratio, sprint, config.sprint_transition_rate, delta);
        let speed = max_speed(&config, locomotion.sprint_ratio);

        let horizontal = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
        let horizontal = if body.grounded {
            ground_motion(horizontal, locomotion.direction, speed, &config, delta)
        } else {
            air_motion(horizontal, locomotion.direction, speed, &config, delta)
        };

        let mut vertical = body.velocity.y;
        if body.grounded {
            if vertical < 0.0 {
                vertical = 0.0;
            }
            if jump {
                vertical = config.jump_velocity;
            }
        } else {
            vertical -= config.gravity * delta;
        }

        body.velocity = Vec3::new(horizontal.x, vertical, horizontal.z);

        let request = MoveRequest::new(entity, transform.translation, body.velocity, delta, collider);
        let result = environment.move_body(&bodies, &request);

        transform.translation = result.position;
        body.record_grounded(result.grounded);

        if body.just_landed() {
            if let Some(radians) = landing_kick(&config, body.velocity.y) {
                recoil_kicks.write(RecoilKick { entity, radians });
            }
        }

        body.velocity = slide_velocity(body.velocity, &result.contacts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_wish_direction_normalized_diagonal() {
        let direction = wish_direction(Vec2::new(1.0, 1.0), 0.0);
        assert!((direction.length() - 1.0).abs() < 1e-5);

        let forward = wish_direction(Vec2::new(0.0, 1.0), 0.0);
        assert!((forward - Vec3::NEG_Z).length() < 1e-5);

        let half = wish_direction(Vec2::new(0.5, 0.0), 0.0);
        assert!((half - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_sprint_ratio_moves_at_fixed_rate() {
        let ratio = step_sprint_ratio(0.0, true, 7.0, 0.1);
        assert!((ratio - 0.7).abs() < 1e-5);

        let ratio = step_sprint_ratio(ratio, true, 7.0, 0.1);
        assert_eq!(ratio, 1.0);

        let config = PlayerConfig::default();
        assert_eq!(max_speed(&config, 0.0), 7.0);
        assert!((max_speed(&config, 1.0) - 10.5).abs() < 1e-5);
    }

    #[test]
    fn test_friction_below_stop_speed_zeroes() {
        let config = PlayerConfig::default();
        let velocity = ground_motion(Vec3::new(1.5, 0.0, 0.0), Vec3::ZERO, 7.0, &config, DT);
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_friction_scales_speed_down() {
        let config = PlayerConfig::default();
        let velocity = ground_motion(Vec3::new(6.0, 0.0, 0.0), Vec3::ZERO, 7.0, &config, 0.1);
        // 6 - 15 × 0.1 = 4.5
        assert!((velocity.x - 4.5).abs() < 1e-5);
    }

    #[test]
    fn test_ground_acceleration_clamped() {
        let config = PlayerConfig::default();
        let mut velocity = Vec3::ZERO;

        velocity = ground_motion(velocity, Vec3::X, 7.0, &config, 0.1);
        assert!((velocity.x - 2.5).abs() < 1e-5);

        for _ in 0..20 {
            velocity = ground_motion(velocity, Vec3::X, 7.0, &config, 0.1);
            assert!(velocity.length() <= 7.0 + 1e-4);
        }
        assert!((velocity.x - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_air_control_is_limited() {
        let config = PlayerConfig::default();
        let velocity = air_motion(Vec3::ZERO, Vec3::X, 7.0, &config, 1.0);
        // target = 7 × 0.3 = 2.1, шаг = 25 × 0.3 = 7.5 → упираемся в target, затем drag 1%
        assert!((velocity.x - 2.1 * 0.99).abs() < 1e-4);

        // Без input воздух ничего не меняет
        let drift = Vec3::new(3.0, 0.0, 0.0);
        assert_eq!(air_motion(drift, Vec3::ZERO, 7.0, &config, DT), drift);
    }

    #[test]
    fn test_landing_kick_threshold() {
        let config = PlayerConfig::default();
        assert_eq!(landing_kick(&config, -4.0), None);

        let kick = landing_kick(&config, -10.0).unwrap();
        assert!((kick - 2.0_f32.to_radians()).abs() < 1e-6);
    }
}
