//! Projectile и HealthPickup компоненты

use bevy::prelude::*;

use super::weapon::ProjectileTemplate;
use crate::config::PickupConfig;

/// Пуля в полёте
///
/// Живёт до первого контакта или до `lifetime`.
/// `spent` выставляется при обработке контакта, второго контакта не бывает.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Projectile {
    pub velocity: Vec3,
    pub damage: f32,
    pub lifetime: f32,
    /// Сколько уже летит (секунды)
    pub age: f32,
    pub gravity_scale: f32,
    pub radius: f32,
    pub impulse_factor: f32,
    /// Стрелок (пуля его не задевает)
    pub owner: Option<Entity>,
    pub spent: bool,
}

impl Projectile {
    pub fn from_template(template: &ProjectileTemplate, direction: Vec3, owner: Option<Entity>) -> Self {
        Self {
            velocity: direction.normalize_or_zero() * template.speed,
            damage: template.damage,
            lifetime: template.lifetime,
            age: 0.0,
            gravity_scale: template.gravity_scale,
            radius: template.radius,
            impulse_factor: template.impulse_factor,
            owner,
            spent: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age >= self.lifetime
    }

    /// Импульс, передаваемый dynamic body при попадании
    pub fn impact_impulse(&self) -> Vec3 {
        self.velocity * self.impulse_factor
    }
}

/// Аптечка: лечит живого игрока при касании
///
/// Исчезает только если лечение принято (полное HP / heal lock: остаётся).
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct HealthPickup {
    pub heal_amount: f32,
    pub radius: f32,
}

impl Default for HealthPickup {
    fn default() -> Self {
        Self::from(&PickupConfig::default())
    }
}

impl From<&PickupConfig> for HealthPickup {
    fn from(config: &PickupConfig) -> Self {
        Self {
            heal_amount: config.heal_amount,
            radius: config.radius,
        }
    }
}

/// Bundle аптечки в точке
pub fn health_pickup_bundle(config: &PickupConfig, position: Vec3) -> impl Bundle {
    (HealthPickup::from(config), Transform::from_translation(position))
}
