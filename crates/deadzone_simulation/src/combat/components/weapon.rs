//! Ranged weapon компоненты: WeaponStats (настройки) + WeaponState (runtime)
//!
//! Architecture Decision:
//! - `WeaponStats`: неизменяемые tunables (fire rate, recoil, шаблон пули)
//! - `WeaponState`: то, что меняется (патроны, cooldown, recoil, spread)
//! - Патроны меняются только через `try_fire` / `reload`
//!
//! Recoil и spread затухают каждый кадр (`tick`), независимо от стрельбы.

use bevy::prelude::*;

use crate::config::{ProjectileConfig, WeaponConfig};
use crate::shared::move_toward;

/// Spread не растёт выше base × этот множитель
pub const MAX_SPREAD_MULTIPLIER: f32 = 3.0;

/// Шаблон пули (то, что спавнит выстрел)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ProjectileTemplate {
    /// Начальная скорость (м/с)
    pub speed: f32,
    pub damage: f32,
    /// Время жизни (секунды)
    pub lifetime: f32,
    /// Множитель гравитации
    pub gravity_scale: f32,
    pub radius: f32,
    /// Доля velocity → импульс dynamic body
    pub impulse_factor: f32,
}

impl From<&ProjectileConfig> for ProjectileTemplate {
    fn from(config: &ProjectileConfig) -> Self {
        Self {
            speed: config.speed,
            damage: config.damage,
            lifetime: config.lifetime,
            gravity_scale: config.gravity_scale,
            radius: config.radius,
            impulse_factor: config.impulse_factor,
        }
    }
}

/// Weapon stats component
///
/// Вешается на стрелка (игрок, турель, враг с оружием).
/// Без `projectile` оружие не стреляет вообще.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponStats {
    /// Минимальный интервал между выстрелами (секунды)
    pub fire_rate: f32,
    pub max_ammo: u32,
    /// Градусы kick'а камеры на выстрел
    pub recoil_force: f32,
    pub recoil_recovery: f32,
    /// Прирост spread за выстрел (радианы)
    pub recoil_spread: f32,
    /// Дальность aim ray (метры)
    pub max_range: f32,
    /// Смещение дула (local space стрелка / камеры)
    pub muzzle_offset: Vec3,
    pub projectile: Option<ProjectileTemplate>,
}

impl Default for WeaponStats {
    fn default() -> Self {
        Self::from_config(&WeaponConfig::default(), &ProjectileConfig::default())
    }
}

impl WeaponStats {
    pub fn from_config(weapon: &WeaponConfig, projectile: &ProjectileConfig) -> Self {
        Self {
            fire_rate: weapon.fire_rate,
            max_ammo: weapon.max_ammo,
            recoil_force: weapon.recoil_force,
            recoil_recovery: weapon.recoil_recovery,
            recoil_spread: weapon.recoil_spread,
            max_range: weapon.max_range,
            muzzle_offset: weapon.muzzle_offset,
            projectile: weapon.has_projectile.then(|| ProjectileTemplate::from(projectile)),
        }
    }

    pub fn max_spread(&self) -> f32 {
        self.recoil_spread * MAX_SPREAD_MULTIPLIER
    }
}

/// Почему выстрел не состоялся (Shoot() = no-op)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireBlocked {
    /// Fire rate cooldown не истёк
    Cooldown,
    NoAmmo,
    /// Не настроен шаблон пули
    NoProjectile,
}

/// Runtime состояние оружия
///
/// Инвариант: 0 ≤ current_ammo ≤ max_ammo, 0 ≤ spread ≤ 3 × recoil_spread.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct WeaponState {
    current_ammo: u32,
    time_since_last_shot: f32,
    current_recoil: f32,
    target_recoil: f32,
    spread: f32,
}

impl Default for WeaponState {
    fn default() -> Self {
        Self::new(&WeaponStats::default())
    }
}

impl WeaponState {
    /// Полный магазин, готов стрелять сразу
    pub fn new(stats: &WeaponStats) -> Self {
        Self {
            current_ammo: stats.max_ammo,
            time_since_last_shot: stats.fire_rate,
            current_recoil: 0.0,
            target_recoil: 0.0,
            spread: 0.0,
        }
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn time_since_last_shot(&self) -> f32 {
        self.time_since_last_shot
    }

    pub fn current_recoil(&self) -> f32 {
        self.current_recoil
    }

    pub fn target_recoil(&self) -> f32 {
        self.target_recoil
    }

    pub fn spread(&self) -> f32 {
        self.spread
    }

    pub fn check_fire(&self, stats: &WeaponStats) -> Result<ProjectileTemplate, FireBlocked> {
        if self.time_since_last_shot < stats.fire_rate {
            return Err(FireBlocked::Cooldown);
        }
        if self.current_ammo == 0 {
            return Err(FireBlocked::NoAmmo);
        }
        stats.projectile.ok_or(FireBlocked::NoProjectile)
    }

    /// Попытка выстрела: при успехе сбрасывает cooldown, тратит патрон,
    /// поднимает recoil target и spread (cap 3×)
    pub fn try_fire(&mut self, stats: &WeaponStats) -> Result<ProjectileTemplate, FireBlocked> {
        let template = self.check_fire(stats)?;

        self.time_since_last_shot = 0.0;
        self.current_ammo -= 1;
        self.target_recoil += stats.recoil_force;
        self.spread = (self.spread + stats.recoil_spread).min(stats.max_spread());

        Ok(template)
    }

    /// Per-frame: cooldown, recoil (current → target, target → 0), spread → 0
    ///
    /// Пока current догоняет target, возвращает current (градусы):
    /// столько recoil'а оружие отдаёт камере в этом кадре.
    pub fn tick(&mut self, stats: &WeaponStats, delta: f32) -> Option<f32> {
        self.time_since_last_shot += delta;

        let settling = self.current_recoil != self.target_recoil;
        if settling {
            self.current_recoil = move_toward(self.current_recoil, self.target_recoil, stats.recoil_recovery * delta);
        }
        self.target_recoil = move_toward(self.target_recoil, 0.0, stats.recoil_recovery * 0.5 * delta);
        self.spread = move_toward(self.spread, 0.0, stats.recoil_recovery * delta);

        (settling && self.current_recoil > 0.0).then_some(self.current_recoil)
    }

    /// Возвращает false если магазин уже полный (ничего не меняется)
    pub fn reload(&mut self, stats: &WeaponStats) -> bool {
        if self.current_ammo == stats.max_ammo {
            return false;
        }

        self.current_ammo = stats.max_ammo;
        true
    }
}
