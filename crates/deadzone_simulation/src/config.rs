//! Конфигурация симуляции
//!
//! Все tunables передаются при создании `CombatSimulation`.
//! Значения по умолчанию взяты из игровых настроек (скорости, дальности, cooldowns).
//! Каждая секция: отдельный Resource, системы читают только свою.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки валидации конфига (единственная Result поверхность крейта)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{section}.{field} must be positive, got {value}")]
    NonPositive {
        section: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("{section}.{field} must be within [0, 1], got {value}")]
    OutOfUnitRange {
        section: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error("{section}.{field} must not be negative, got {value}")]
    Negative {
        section: &'static str,
        field: &'static str,
        value: f32,
    },

    #[error(
        "enemy ranges must satisfy minimum < attack <= chase (minimum {minimum}, attack {attack}, chase {chase})"
    )]
    UnorderedRanges { minimum: f32, attack: f32, chase: f32 },
}

fn positive(section: &'static str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    // !(value > 0) ловит NaN
    if !(value > 0.0) {
        return Err(ConfigError::NonPositive {
            section,
            field,
            value,
        });
    }
    Ok(())
}

fn non_negative(section: &'static str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(value >= 0.0) {
        return Err(ConfigError::Negative {
            section,
            field,
            value,
        });
    }
    Ok(())
}

fn unit(section: &'static str, field: &'static str, value: f32) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfUnitRange {
            section,
            field,
            value,
        });
    }
    Ok(())
}

/// Полный конфиг симуляции
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng (spread, pickup drops)
    pub seed: u64,
    pub physics: PhysicsConfig,
    pub player: PlayerConfig,
    pub weapon: WeaponConfig,
    pub projectile: ProjectileConfig,
    pub enemy: EnemyConfig,
    pub pickup: PickupConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            physics: PhysicsConfig::default(),
            player: PlayerConfig::default(),
            weapon: WeaponConfig::default(),
            projectile: ProjectileConfig::default(),
            enemy: EnemyConfig::default(),
            pickup: PickupConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.player.validate()?;
        self.weapon.validate()?;
        self.projectile.validate()?;
        self.enemy.validate()?;
        self.pickup.validate()?;
        Ok(())
    }
}

/// Общая физика (tick rate, гравитация для пуль и dynamic bodies)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Частота physics step (Hz)
    pub fixed_hz: f64,
    /// Гравитация для projectiles (× gravity_scale) и dynamic bodies (м/с²)
    pub gravity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            gravity: 9.8,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("physics", "fixed_hz", self.fixed_hz as f32)?;
        non_negative("physics", "gravity", self.gravity)
    }
}

/// Игрок: locomotion, камера, здоровье, respawn
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub base_speed: f32,
    pub sprint_multiplier: f32,
    /// Скорость перехода sprint ratio 0 ↔ 1 (1/сек)
    pub sprint_transition_rate: f32,
    pub acceleration: f32,
    pub friction: f32,
    /// Ниже этой скорости горизонтальная velocity обнуляется (без micro-sliding)
    pub stop_speed: f32,
    pub air_control: f32,
    /// Коэффициент air drag (× dt, не больше 1)
    pub air_drag: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    /// Приземление быстрее этого (vy < threshold) даёт kick камеры
    pub landing_kick_threshold: f32,
    /// Градусы kick'а на 1 м/с вертикальной скорости
    pub landing_kick_scale: f32,
    pub mouse_sensitivity: f32,
    /// Высота камеры над ступнями
    pub camera_height: f32,
    pub camera_smoothing: f32,
    /// Скорость возврата recoil offset камеры (рад/сек)
    pub recoil_recovery: f32,
    pub max_health: f32,
    /// Блокировка лечения после урона (сек)
    pub heal_cooldown: f32,
    pub respawn_enabled: bool,
    pub respawn_delay: f32,
    pub collider_radius: f32,
    pub bob_speed: f32,
    pub bob_amount: f32,
    pub sway_amount: f32,
    pub sway_smoothing: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_speed: 7.0,
            sprint_multiplier: 1.5,
            sprint_transition_rate: 7.0,
            acceleration: 25.0,
            friction: 15.0,
            stop_speed: 2.0,
            air_control: 0.3,
            air_drag: 0.01,
            jump_velocity: 6.0,
            gravity: 25.0,
            landing_kick_threshold: -5.0,
            landing_kick_scale: 0.2,
            mouse_sensitivity: 0.002,
            camera_height: 1.7,
            camera_smoothing: 10.0,
            recoil_recovery: 5.0,
            max_health: 100.0,
            heal_cooldown: 1.0,
            respawn_enabled: true,
            respawn_delay: 3.0,
            collider_radius: 0.5,
            bob_speed: 14.0,
            bob_amount: 0.05,
            sway_amount: 0.1,
            sway_smoothing: 8.0,
        }
    }
}

impl PlayerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        const S: &str = "player";
        positive(S, "base_speed", self.base_speed)?;
        positive(S, "sprint_multiplier", self.sprint_multiplier)?;
        positive(S, "sprint_transition_rate", self.sprint_transition_rate)?;
        positive(S, "acceleration", self.acceleration)?;
        non_negative(S, "friction", self.friction)?;
        non_negative(S, "stop_speed", self.stop_speed)?;
        unit(S, "air_control", self.air_control)?;
        non_negative(S, "air_drag", self.air_drag)?;
        non_negative(S, "jump_velocity", self.jump_velocity)?;
        positive(S, "gravity", self.gravity)?;
        positive(S, "mouse_sensitivity", self.mouse_sensitivity)?;
        positive(S, "camera_smoothing", self.camera_smoothing)?;
        positive(S, "recoil_recovery", self.recoil_recovery)?;
        positive(S, "max_health", self.max_health)?;
        non_negative(S, "heal_cooldown", self.heal_cooldown)?;
        non_negative(S, "respawn_delay", self.respawn_delay)?;
        positive(S, "collider_radius", self.collider_radius)?;
        non_negative(S, "sway_smoothing", self.sway_smoothing)
    }
}

/// Оружие игрока (fire rate, recoil, spread, магазин)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Минимальный интервал между выстрелами (сек)
    pub fire_rate: f32,
    /// Градусы kick'а на выстрел
    pub recoil_force: f32,
    pub recoil_recovery: f32,
    /// Прирост spread за выстрел (рад), cap = 3×
    pub recoil_spread: f32,
    pub max_range: f32,
    pub max_ammo: u32,
    /// Смещение дула относительно камеры (local space)
    pub muzzle_offset: Vec3,
    /// false: оружие без шаблона пули, Shoot() всегда no-op
    pub has_projectile: bool,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_rate: 0.15,
            recoil_force: 2.0,
            recoil_recovery: 5.0,
            recoil_spread: 0.02,
            max_range: 1000.0,
            max_ammo: 30,
            muzzle_offset: Vec3::new(0.25, -0.2, -0.6),
            has_projectile: true,
        }
    }
}

impl WeaponConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        const S: &str = "weapon";
        positive(S, "fire_rate", self.fire_rate)?;
        non_negative(S, "recoil_force", self.recoil_force)?;
        positive(S, "recoil_recovery", self.recoil_recovery)?;
        non_negative(S, "recoil_spread", self.recoil_spread)?;
        positive(S, "max_range", self.max_range)?;
        positive(S, "max_ammo", self.max_ammo as f32)
    }
}

/// Пуля (шаблон, который спавнит оружие)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub gravity_scale: f32,
    pub radius: f32,
    /// Доля velocity, передаваемая dynamic body как импульс
    pub impulse_factor: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 50.0,
            damage: 10.0,
            lifetime: 2.0,
            gravity_scale: 0.1,
            radius: 0.05,
            impulse_factor: 0.5,
        }
    }
}

impl ProjectileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        const S: &str = "projectile";
        positive(S, "speed", self.speed)?;
        non_negative(S, "damage", self.damage)?;
        positive(S, "lifetime", self.lifetime)?;
        non_negative(S, "gravity_scale", self.gravity_scale)?;
        positive(S, "radius", self.radius)?;
        non_negative(S, "impulse_factor", self.impulse_factor)
    }
}

/// Враг: дистанции, cooldowns, melee, drop
#[derive(Component, Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyConfig {
    pub movement_speed: f32,
    pub gravity: f32,
    pub max_health: f32,
    pub melee_damage: f32,
    pub attack_range: f32,
    /// Ближе этого враг отходит назад
    pub minimum_range: f32,
    pub attack_cooldown: f32,
    pub chase_range: f32,
    /// Пауза перед повторной погоней после выхода из Chasing
    pub chase_cooldown: f32,
    /// Задержка между началом атаки и применением урона (анимация)
    pub attack_delay: f32,
    /// Сглаживание горизонтальной velocity (1/сек)
    pub velocity_damping: f32,
    /// Вероятность выпадения health pickup при смерти
    pub drop_chance: f32,
    /// Задержка удаления трупа (0: сразу)
    pub removal_delay: f32,
    pub collider_radius: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            movement_speed: 3.0,
            gravity: 30.0,
            max_health: 150.0,
            melee_damage: 25.0,
            attack_range: 2.5,
            minimum_range: 1.5,
            attack_cooldown: 1.0,
            chase_range: 12.0,
            chase_cooldown: 2.0,
            attack_delay: 0.5,
            velocity_damping: 10.0,
            drop_chance: 0.3,
            removal_delay: 0.0,
            collider_radius: 0.5,
        }
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        const S: &str = "enemy";
        positive(S, "movement_speed", self.movement_speed)?;
        positive(S, "gravity", self.gravity)?;
        positive(S, "max_health", self.max_health)?;
        non_negative(S, "melee_damage", self.melee_damage)?;
        non_negative(S, "attack_cooldown", self.attack_cooldown)?;
        non_negative(S, "chase_cooldown", self.chase_cooldown)?;
        non_negative(S, "attack_delay", self.attack_delay)?;
        positive(S, "velocity_damping", self.velocity_damping)?;
        unit(S, "drop_chance", self.drop_chance)?;
        non_negative(S, "removal_delay", self.removal_delay)?;
        positive(S, "collider_radius", self.collider_radius)?;
        non_negative(S, "minimum_range", self.minimum_range)?;

        if !(self.minimum_range < self.attack_range && self.attack_range <= self.chase_range) {
            return Err(ConfigError::UnorderedRanges {
                minimum: self.minimum_range,
                attack: self.attack_range,
                chase: self.chase_range,
            });
        }
        Ok(())
    }
}

/// Health pickup (выпадает из врагов)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub heal_amount: f32,
    /// Радиус подбора (от центра коллайдера игрока)
    pub radius: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            heal_amount: 25.0,
            radius: 1.0,
        }
    }
}

impl PickupConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("pickup", "heal_amount", self.heal_amount)?;
        positive("pickup", "radius", self.radius)
    }
}
