//! Исходящие отчёты для внешних слоёв (HUD, VFX/SFX, scene mirror)
//!
//! Fire-and-forget: симуляция пишет события, никто не отвечает.
//! Хост вычитывает их через `CombatSimulation::drain_*`.

use bevy::prelude::*;

/// Данные для HUD
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum DisplayReport {
    HealthChanged { entity: Entity, current: f32, max: f32 },
    AmmoChanged { entity: Entity, current: u32, max: u32 },
    PlayerDied { entity: Entity },
    PlayerRespawned { entity: Entity },
}

/// Короткий feedback эффект (звук / анимация / вспышка)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EffectCue {
    WeaponShot,
    MeleeSwing,
    WalkCycle,
    HitFlash,
    Impact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum EffectAction {
    Play,
    Stop,
}

/// Запрос на проигрывание / остановку эффекта на entity
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EffectRequest {
    pub entity: Entity,
    pub cue: EffectCue,
    pub action: EffectAction,
}

impl EffectRequest {
    pub fn play(entity: Entity, cue: EffectCue) -> Self {
        Self {
            entity,
            cue,
            action: EffectAction::Play,
        }
    }

    pub fn stop(entity: Entity, cue: EffectCue) -> Self {
        Self {
            entity,
            cue,
            action: EffectAction::Stop,
        }
    }
}

/// Что было заспавнено (для выбора визуального шаблона на стороне хоста)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SpawnKind {
    Player,
    Enemy,
    Projectile,
    HealthPickup,
    DynamicBody,
}

/// Изменения состава мира
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum SpawnReport {
    Spawned {
        entity: Entity,
        kind: SpawnKind,
        position: Vec3,
    },
    Removed {
        entity: Entity,
    },
}
