//! FSM AI components (state, timers, tracked target, решение на шаг).

use bevy::prelude::*;

use crate::components::{Actor, Collider, Health, KinematicBody};
use crate::config::EnemyConfig;

/// AI FSM состояния
///
/// Searching → (игрок найден) → Holding / Chasing / Attacking → ... → Dead.
/// Dead: терминальное.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Нет живого игрока: только гравитация
    #[default]
    Searching,

    /// Игрок известен, но делать нечего (далеко / chase cooldown / слишком близко)
    Holding { target: Entity },

    /// Chasing: идём к игроку
    Chasing { target: Entity },

    /// Attacking: удар запланирован, ждём DeferredAction::MeleeStrike
    Attacking { target: Entity },

    /// Dead: враг мертв, AI отключен
    Dead,
}

impl AIState {
    pub fn target(&self) -> Option<Entity> {
        match self {
            AIState::Holding { target } | AIState::Chasing { target } | AIState::Attacking { target } => Some(*target),
            AIState::Searching | AIState::Dead => None,
        }
    }

    /// Для логов переходов (без target)
    pub fn name(&self) -> &'static str {
        match self {
            AIState::Searching => "Searching",
            AIState::Holding { .. } => "Holding",
            AIState::Chasing { .. } => "Chasing",
            AIState::Attacking { .. } => "Attacking",
            AIState::Dead => "Dead",
        }
    }
}

/// Marker component для врага
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Actor, AIState, EnemyTimers, TrackedTarget, EnemyConfig)]
pub struct Enemy;

/// Таймеры и флаги врага (тикают в physics step)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyTimers {
    /// До следующей атаки (секунды)
    pub attack_cooldown: f32,
    /// До следующей погони (секунды)
    pub chase_cooldown: f32,
    /// Удар запланирован, но ещё не отработал
    pub attacking: bool,
    pub chasing: bool,
}

impl EnemyTimers {
    pub fn tick(&mut self, delta: f32) {
        self.attack_cooldown = (self.attack_cooldown - delta).max(0.0);
        self.chase_cooldown = (self.chase_cooldown - delta).max(0.0);
    }

    pub fn attack_ready(&self) -> bool {
        self.attack_cooldown <= 0.0
    }

    pub fn chase_ready(&self) -> bool {
        self.chase_cooldown <= 0.0
    }
}

/// Текущий игрок-цель (non-owning, может протухнуть)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct TrackedTarget(pub Option<Entity>);

/// Что враг делает в этом шаге
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyIntent {
    /// Начать атаку (запланировать удар)
    Attack,
    Chase,
    /// В зоне погони, но chase cooldown не истёк
    Hold,
    /// Ближе minimum_range: отходим
    BackAway,
    /// Дальше chase_range: тормозим
    Decelerate,
}

/// Решение по дистанции и таймерам
///
/// 1. min < d ≤ attack, cooldown истёк, не атакуем → Attack
/// 2. min < d < chase → Chase (или Hold при chase cooldown)
/// 3. d ≤ min → BackAway
/// 4. иначе → Decelerate
pub fn choose_intent(distance: f32, config: &EnemyConfig, timers: &EnemyTimers) -> EnemyIntent {
    let beyond_minimum = distance > config.minimum_range;

    if beyond_minimum && distance <= config.attack_range && timers.attack_ready() && !timers.attacking {
        EnemyIntent::Attack
    } else if beyond_minimum && distance < config.chase_range {
        if timers.chase_ready() {
            EnemyIntent::Chase
        } else {
            EnemyIntent::Hold
        }
    } else if distance <= config.minimum_range {
        EnemyIntent::BackAway
    } else {
        EnemyIntent::Decelerate
    }
}

/// Всё, что нужно врагу при spawn'е
pub fn enemy_bundle(config: &EnemyConfig, position: Vec3) -> impl Bundle {
    (
        Enemy,
        Transform::from_translation(position),
        Health::new(config.max_health),
        Collider {
            radius: config.collider_radius,
            ..default()
        },
        KinematicBody::default(),
        config.clone(),
    )
}
