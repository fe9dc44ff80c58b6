//! FPS camera rig: look input, сглаживание, recoil offset, weapon sway.
//!
//! Камера не отдельный entity: rig живёт на игроке.
//! Transform игрока несёт только yaw, pitch + recoil есть только у rig'а.

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{KinematicBody, Player};
use crate::config::PlayerConfig;
use crate::input::PlayerInputState;
use crate::shared::{lerp, lerp_angle, move_toward, smoothing_factor, wrap_angle};

use super::locomotion::LocomotionState;

/// Pitch не выходит за ±PI/2.1 (без переворота камеры)
pub const PITCH_LIMIT: f32 = PI / 2.1;

/// Kick камеры вверх (выстрел, жёсткое приземление)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct RecoilKick {
    pub entity: Entity,
    pub radians: f32,
}

/// Camera rig игрока
///
/// `target_*`: куда смотрит мышь, `yaw` / `pitch`, сглаженное положение.
/// Recoil: `target_recoil_offset` растёт скачком и сам падает к 0,
/// `recoil_offset` (то что видно) догоняет target.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub target_yaw: f32,
    pub target_pitch: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub recoil_offset: f32,
    pub target_recoil_offset: f32,
    /// Высота глаз над ступнями
    pub height: f32,
    /// Поворот мышью за последний кадр (для sway)
    pub look_rotation: Vec2,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.7)
    }
}

impl CameraRig {
    pub fn new(yaw: f32, pitch: f32, height: f32) -> Self {
        let yaw = wrap_angle(yaw);
        let pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            target_yaw: yaw,
            target_pitch: pitch,
            yaw,
            pitch,
            recoil_offset: 0.0,
            target_recoil_offset: 0.0,
            height,
            look_rotation: Vec2::ZERO,
        }
    }

    /// Сырая дельта мыши → target yaw / pitch
    pub fn apply_look(&mut self, delta: Vec2, sensitivity: f32) {
        let rotation = delta * sensitivity;
        self.target_yaw = wrap_angle(self.target_yaw - rotation.x);
        self.target_pitch = (self.target_pitch - rotation.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.look_rotation = rotation;
    }

    pub fn add_recoil(&mut self, radians: f32) {
        self.target_recoil_offset += radians;
    }

    /// Frame step: rotation → target (rate × dt), recoil two-stage decay
    pub fn smooth(&mut self, smoothing: f32, recoil_recovery: f32, delta: f32) {
        let t = smoothing_factor(smoothing, delta);
        self.yaw = wrap_angle(lerp_angle(self.yaw, self.target_yaw, t));
        self.pitch = lerp(self.pitch, self.target_pitch, t);

        self.recoil_offset = move_toward(self.recoil_offset, self.target_recoil_offset, recoil_recovery * delta);
        self.target_recoil_offset = move_toward(self.target_recoil_offset, 0.0, recoil_recovery * 0.5 * delta);
    }

    /// Pitch с учётом recoil (тоже в пределах ±PITCH_LIMIT)
    pub fn view_pitch(&self) -> f32 {
        (self.pitch + self.recoil_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT)
    }

    pub fn view_rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.view_pitch(), 0.0)
    }

    /// Направление взгляда (-Z камеры)
    pub fn aim_direction(&self) -> Vec3 {
        self.view_rotation() * Vec3::NEG_Z
    }

    pub fn eye_position(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::Y * self.height
    }

    /// Respawn: смотреть как при spawn'е, recoil сброшен
    pub fn reset(&mut self, yaw: f32, pitch: f32) {
        *self = Self::new(yaw, pitch, self.height);
    }
}

/// Weapon bob + sway (косметика, на симуляцию не влияет)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponSway {
    pub bob_timer: f32,
    /// Смещение оружия от начальной позиции (x, y)
    pub offset: Vec2,
}

impl WeaponSway {
    pub fn step(&mut self, config: &PlayerConfig, rig: &CameraRig, moving_on_ground: bool, sprinting: bool, delta: f32) {
        let mut target = Vec2::ZERO;

        if moving_on_ground {
            let sprint_scale = if sprinting { 1.5 } else { 1.0 };
            self.bob_timer += delta * config.bob_speed * sprint_scale;
            target += Vec2::new(
                self.bob_timer.cos() * config.bob_amount,
                (self.bob_timer * 2.0).sin() * config.bob_amount,
            );
        } else {
            self.bob_timer = 0.0;
        }

        target += Vec2::new(-rig.pitch, -rig.yaw) * config.sway_amount;

        self.offset = self.offset.lerp(target, smoothing_factor(config.sway_smoothing, delta));
    }
}

/// System: дельта мыши → CameraRig (мёртвый игрок не смотрит)
pub fn apply_look_input(
    mut input: ResMut<PlayerInputState>,
    config: Res<PlayerConfig>,
    mut rigs: Query<(&mut CameraRig, Has<Dead>), With<Player>>,
) {
    let delta = input.take_look_delta();

    for (mut rig, dead) in rigs.iter_mut() {
        if dead {
            rig.look_rotation = Vec2::ZERO;
            continue;
        }
        rig.apply_look(delta, config.mouse_sensitivity);
    }
}

/// System: RecoilKick → target recoil offset
pub fn apply_recoil_kicks(mut kicks: EventReader<RecoilKick>, mut rigs: Query<&mut CameraRig>) {
    for kick in kicks.read() {
        if let Ok(mut rig) = rigs.get_mut(kick.entity) {
            rig.add_recoil(kick.radians);
        }
    }
}

/// System: сглаживание камеры, yaw → Transform игрока
pub fn smooth_camera(
    config: Res<PlayerConfig>,
    time: Res<Time>,
    mut rigs: Query<(&mut CameraRig, &mut Transform), With<Player>>,
) {
    let delta = time.delta_secs();

    for (mut rig, mut transform) in rigs.iter_mut() {
        rig.smooth(config.camera_smoothing, config.recoil_recovery, delta);
        transform.rotation = Quat::from_rotation_y(rig.yaw);
    }
}

/// System: weapon bob / sway
pub fn update_weapon_sway(
    config: Res<PlayerConfig>,
    time: Res<Time>,
    mut players: Query<(&mut WeaponSway, &CameraRig, &KinematicBody, &LocomotionState), With<Player>>,
) {
    let delta = time.delta_secs();

    for (mut sway, rig, body, locomotion) in players.iter_mut() {
        let moving = locomotion.direction.length() > 0.1 && body.grounded;
        sway.step(&config, rig, moving, locomotion.is_sprinting(), delta);
    }
}
