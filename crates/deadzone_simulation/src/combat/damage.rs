//! Damage / heal контракт
//!
//! Единственный путь изменения Health:
//! - `DamageRequest` → apply_damage_requests → DamageDealt / EntityDied
//! - `HealRequest` / pickup → try_heal (учитывает HealLock)
//!
//! Никто не трогает Health другого entity напрямую.

use bevy::prelude::*;

use crate::components::{DamageOutcome, HealLock, Health};
use crate::logger;
use crate::reports::{DisplayReport, EffectCue, EffectRequest};

/// Источник урона (для логов и эффектов)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum DamageSource {
    Projectile,
    Melee,
    Environment,
}

/// Запрос: нанести урон (TakeDamage)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: f32,
    pub attacker: Option<Entity>,
    pub source: DamageSource,
}

/// Запрос: вылечить (Heal)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealRequest {
    pub target: Entity,
    pub amount: f32,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Option<Entity>,
    pub target: Entity,
    pub amount: f32,
    pub source: DamageSource,
    pub target_died: bool,
}

/// Событие: entity умер (health <= 0)
///
/// Ровно один раз на смерть: мёртвый урон игнорирует.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв (Health <= 0)
///
/// Мёртвые не участвуют в коллизиях и не выбираются целью.
/// Игрок теряет маркер при respawn, враг удаляется.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Dead;

/// Heal с учётом блокировки после урона
///
/// false: лечение отклонено (heal lock, мёртв, полное HP, amount <= 0).
pub fn try_heal(health: &mut Health, lock: Option<&HealLock>, amount: f32) -> bool {
    if lock.is_some_and(HealLock::is_active) {
        return false;
    }
    health.heal(amount)
}

/// Система: тикать heal lock таймеры
pub fn tick_heal_locks(mut locks: Query<&mut HealLock>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut lock in locks.iter_mut() {
        if lock.is_active() {
            lock.tick(delta);
        }
    }
}

/// Система: применить DamageRequest'ы
///
/// 1. Health::take_damage (мёртвый / некорректный amount → Ignored)
/// 2. Взводим HealLock
/// 3. DamageDealt + HealthChanged + HitFlash
/// 4. Если убили: маркер Dead + EntityDied
pub fn apply_damage_requests(
    mut commands: Commands,
    mut requests: EventReader<DamageRequest>,
    mut targets: Query<(&mut Health, Option<&mut HealLock>)>,
    mut damage_dealt: EventWriter<DamageDealt>,
    mut entity_died: EventWriter<EntityDied>,
    mut display: EventWriter<DisplayReport>,
    mut effects: EventWriter<EffectRequest>,
) {
    for request in requests.read() {
        let Ok((mut health, lock)) = targets.get_mut(request.target) else {
            logger::log(&format!("damage request: target {:?} has no Health", request.target));
            continue;
        };

        let outcome = health.take_damage(request.amount);
        if outcome == DamageOutcome::Ignored {
            logger::log(&format!(
                "damage {:.1} to {:?} ignored (health {:.1})",
                request.amount,
                request.target,
                health.current()
            ));
            continue;
        }

        if let Some(mut lock) = lock {
            lock.engage();
        }

        let died = outcome == DamageOutcome::Killed;

        damage_dealt.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            amount: request.amount,
            source: request.source,
            target_died: died,
        });
        display.write(DisplayReport::HealthChanged {
            entity: request.target,
            current: health.current(),
            max: health.max(),
        });
        effects.write(EffectRequest::play(request.target, EffectCue::HitFlash));

        if died {
            commands.entity(request.target).insert(Dead);
            entity_died.write(EntityDied {
                entity: request.target,
                killer: request.attacker,
            });

            logger::log_info(&format!(
                "entity {:?} killed by {:?} ({:?})",
                request.target, request.attacker, request.source
            ));
        }
    }
}

/// Система: применить HealRequest'ы
pub fn apply_heal_requests(
    mut requests: EventReader<HealRequest>,
    mut targets: Query<(&mut Health, Option<&HealLock>)>,
    mut display: EventWriter<DisplayReport>,
) {
    for request in requests.read() {
        let Ok((mut health, lock)) = targets.get_mut(request.target) else {
            continue;
        };

        if try_heal(&mut health, lock, request.amount) {
            display.write(DisplayReport::HealthChanged {
                entity: request.target,
                current: health.current(),
                max: health.max(),
            });
        } else {
            logger::log(&format!("heal {:.1} for {:?} rejected", request.amount, request.target));
        }
    }
}
