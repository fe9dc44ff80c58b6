//! World positioning компоненты: SpawnPoint

use bevy::prelude::*;

/// Точка (re)spawn актора
///
/// Запоминается при spawn, respawn возвращает сюда position + rotation.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint {
    /// Позиция ступней (world space)
    pub position: Vec3,
    /// Yaw (радианы, вокруг Y)
    pub yaw: f32,
    /// Pitch камеры (радианы)
    pub pitch: f32,
}

impl SpawnPoint {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: 0.0,
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).with_rotation(Quat::from_rotation_y(self.yaw))
    }
}
