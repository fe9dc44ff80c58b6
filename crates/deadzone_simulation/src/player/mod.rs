//! Player module: locomotion, FPS камера, lifecycle (death / respawn)
//!
//! Physics step: player_locomotion (Movement), respawn / death (Lifecycle).
//! Frame: look input (Input), recoil + сглаживание + sway (Camera).

use bevy::prelude::*;

pub mod camera;
pub mod lifecycle;
pub mod locomotion;

#[cfg(test)]
mod lifecycle_tests;

pub use camera::*;
pub use lifecycle::*;
pub use locomotion::*;

use crate::combat::{WeaponState, WeaponStats};
use crate::components::{Collider, HealLock, Health, KinematicBody, Player, SpawnPoint};
use crate::config::PlayerConfig;
use crate::{FrameStep, PhysicsStep};

/// Всё, что нужно игроку при spawn'е
pub fn player_bundle(config: &PlayerConfig, weapon: WeaponStats, position: Vec3, yaw: f32) -> impl Bundle {
    (
        (
            Player,
            Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw)),
            Health::new(config.max_health),
            HealLock::new(config.heal_cooldown),
            Collider {
                radius: config.collider_radius,
                ..default()
            },
            KinematicBody::default(),
        ),
        (
            CameraRig::new(yaw, 0.0, config.camera_height),
            LocomotionState::default(),
            WeaponSway::default(),
            PlayerLife::Alive,
            SpawnPoint::new(position, yaw),
            WeaponState::new(&weapon),
            weapon,
        ),
    )
}

/// Player Plugin
///
/// Lifecycle порядок: tick_player_respawn → handle_player_death,
/// чтобы таймер, заведённый в этом step, не тикал в нём же.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<RecoilKick>();

        app.add_systems(FixedUpdate, player_locomotion.in_set(PhysicsStep::Movement))
            .add_systems(
                FixedUpdate,
                (tick_player_respawn, handle_player_death)
                    .chain()
                    .in_set(PhysicsStep::Lifecycle),
            );

        app.add_systems(Update, apply_look_input.in_set(FrameStep::Input))
            .add_systems(
                Update,
                (apply_recoil_kicks, smooth_camera, update_weapon_sway)
                    .chain()
                    .in_set(FrameStep::Camera),
            );
    }
}
