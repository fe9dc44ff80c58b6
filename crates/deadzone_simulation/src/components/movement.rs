//! Movement компоненты: кинематическое тело, коллайдер, dynamic body

use bevy::prelude::*;

/// Кинематическое тело актора (velocity интегрируем сами)
///
/// `grounded` приходит из последнего move_body окружения,
/// `was_grounded`: значение на шаг раньше (для детекта приземления).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct KinematicBody {
    /// Скорость (м/с)
    pub velocity: Vec3,
    pub grounded: bool,
    pub was_grounded: bool,
}

impl KinematicBody {
    /// Записать результат движения
    pub fn record_grounded(&mut self, grounded: bool) {
        self.was_grounded = self.grounded;
        self.grounded = grounded;
    }

    /// Переход airborne → grounded на последнем шаге
    pub fn just_landed(&self) -> bool {
        self.grounded && !self.was_grounded
    }

    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

/// Сферический коллайдер для окружения
///
/// Центр сферы = Transform.translation + Y * center_height (translation = ступни).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Collider {
    pub radius: f32,
    pub center_height: f32,
}

impl Default for Collider {
    fn default() -> Self {
        Self {
            radius: 0.5,
            center_height: 0.9,
        }
    }
}

impl Collider {
    pub fn center(&self, feet: Vec3) -> Vec3 {
        feet + Vec3::Y * self.center_height
    }
}

/// Физически симулируемое тело (ящики, бочки): принимает импульсы от пуль
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Collider, Transform)]
pub struct DynamicBody {
    pub velocity: Vec3,
    /// Масса (кг), > 0
    pub mass: f32,
    /// Горизонтальное затухание на земле (1/сек)
    pub damping: f32,
    pub grounded: bool,
}

impl Default for DynamicBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            mass: 10.0,
            damping: 4.0,
            grounded: false,
        }
    }
}

impl DynamicBody {
    pub fn with_mass(mass: f32) -> Self {
        Self {
            mass,
            ..default()
        }
    }

    pub fn apply_impulse(&mut self, impulse: Vec3) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }
}
