//! Базовые компоненты акторов: Actor, Health, HealLock

use bevy::prelude::*;

use super::movement::{Collider, KinematicBody};

/// Актор (игрок, враг): живое существо с позицией и здоровьем
///
/// Автоматически добавляет Health, KinematicBody, Collider, Transform через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, KinematicBody, Collider, Transform)]
pub struct Actor;

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Урон не применён (уже мёртв или amount <= 0)
    Ignored,
    /// Здоровье уменьшилось, актор жив
    Wounded,
    /// Этот удар довёл здоровье до 0
    Killed,
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max.
/// Поля приватные: менять только через take_damage / heal / restore_full.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        // !(amount > 0) ловит и NaN
        if !self.is_alive() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }

        self.current = (self.current - amount).max(0.0);

        if self.is_alive() {
            DamageOutcome::Wounded
        } else {
            DamageOutcome::Killed
        }
    }

    /// Возвращает false если лечение отклонено (мёртв, полное HP, amount <= 0)
    pub fn heal(&mut self, amount: f32) -> bool {
        if !self.is_alive() || self.is_full() || !(amount > 0.0) {
            return false;
        }

        self.current = (self.current + amount).min(self.max);
        true
    }

    /// Полное восстановление (respawn)
    pub fn restore_full(&mut self) {
        self.current = self.max;
    }
}

/// Блокировка лечения после получения урона
///
/// Взводится при каждом уроне, пока активна: pickup'ы не лечат.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HealLock {
    /// Длительность блокировки (секунды)
    pub duration: f32,
    /// Осталось (секунды)
    pub remaining: f32,
}

impl Default for HealLock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl HealLock {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    pub fn engage(&mut self) {
        self.remaining = self.duration;
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn tick(&mut self, delta: f32) {
        self.remaining = (self.remaining - delta).max(0.0);
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }
}
