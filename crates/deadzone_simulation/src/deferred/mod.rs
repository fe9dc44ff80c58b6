//! Отложенные действия (melee урон после анимации, удаление трупа)
//!
//! Вместо замыканий, захватывающих актора, храним явную запись:
//! владелец + минимальные данные действия. На момент срабатывания
//! проверяем что владелец жив, иначе действие тихо пропускается.
//!
//! Время: `Time<Fixed>::elapsed()`, проверка раз в physics step.

use std::time::Duration;

use bevy::prelude::*;

use crate::ai::EnemyTimers;
use crate::combat::{DamageRequest, DamageSource, Dead};
use crate::components::Health;
use crate::logger;
use crate::reports::SpawnReport;
use crate::PhysicsStep;

/// Что выполнить
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Применить melee урон, если цель всё ещё в радиусе
    MeleeStrike {
        target: Entity,
        attack_range: f32,
        damage: f32,
    },
    /// Удалить владельца из симуляции
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledAction {
    pub due: Duration,
    pub owner: Entity,
    pub action: DeferredAction,
    sequence: u64,
}

/// Очередь отложенных действий (упорядочена по времени, FIFO при равном due)
#[derive(Resource, Debug, Default)]
pub struct DeferredQueue {
    pending: Vec<ScheduledAction>,
    next_sequence: u64,
}

impl DeferredQueue {
    pub fn schedule(&mut self, due: Duration, owner: Entity, action: DeferredAction) {
        let scheduled = ScheduledAction {
            due,
            owner,
            action,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;

        // Вставка после всех с due <= нового (стабильность порядка)
        let index = self.pending.partition_point(|pending| pending.due <= due);
        self.pending.insert(index, scheduled);
    }

    /// Забрать все действия с due <= now (в порядке срабатывания)
    pub fn take_due(&mut self, now: Duration) -> Vec<ScheduledAction> {
        let count = self.pending.partition_point(|pending| pending.due <= now);
        self.pending.drain(..count).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_for(&self, owner: Entity) -> impl Iterator<Item = &ScheduledAction> {
        self.pending.iter().filter(move |pending| pending.owner == owner)
    }
}

/// Система: выполнить созревшие отложенные действия
///
/// MeleeStrike:
/// 1. Владелец исчез → no-op
/// 2. Снимаем флаг attacking (всегда, если владелец есть)
/// 3. Владелец мёртв → урона нет
/// 4. Цель исчезла / мертва / вне attack_range → урона нет
/// 5. Иначе DamageRequest
///
/// Remove: деспавн если entity ещё существует.
pub fn run_deferred_actions(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut queue: ResMut<DeferredQueue>,
    mut owners: Query<(&Transform, Option<&mut EnemyTimers>, Has<Dead>)>,
    targets: Query<(&Transform, &Health), Without<Dead>>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut spawn_reports: EventWriter<SpawnReport>,
) {
    for scheduled in queue.take_due(time.elapsed()) {
        let owner = scheduled.owner;

        match scheduled.action {
            DeferredAction::MeleeStrike {
                target,
                attack_range,
                damage,
            } => {
                let Ok((owner_transform, timers, owner_dead)) = owners.get_mut(owner) else {
                    logger::log(&format!("deferred strike skipped: owner {:?} is gone", owner));
                    continue;
                };

                if let Some(mut timers) = timers {
                    timers.attacking = false;
                }

                if owner_dead {
                    continue;
                }

                let Ok((target_transform, target_health)) = targets.get(target) else {
                    logger::log(&format!("deferred strike {:?}: target {:?} unavailable", owner, target));
                    continue;
                };

                if !target_health.is_alive() {
                    continue;
                }

                let distance = owner_transform.translation.distance(target_transform.translation);
                if distance <= attack_range {
                    damage_requests.write(DamageRequest {
                        target,
                        amount: damage,
                        attacker: Some(owner),
                        source: DamageSource::Melee,
                    });
                } else {
                    logger::log(&format!(
                        "deferred strike {:?}: target moved away ({:.2} > {:.2})",
                        owner, distance, attack_range
                    ));
                }
            }

            DeferredAction::Remove => {
                if let Ok(mut entity_commands) = commands.get_entity(owner) {
                    entity_commands.despawn();
                    spawn_reports.write(SpawnReport::Removed { entity: owner });
                    logger::log(&format!("entity {:?} removed (deferred)", owner));
                }
            }
        }
    }
}

/// Deferred Plugin
///
/// `run_deferred_actions` стоит после AI (атака с нулевой задержкой
/// срабатывает в том же step) и до Resolve (урон применяется сразу).
pub struct DeferredPlugin;

impl Plugin for DeferredPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeferredQueue>()
            .add_systems(FixedUpdate, run_deferred_actions.in_set(PhysicsStep::Deferred));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(value: f32) -> Duration {
        Duration::from_secs_f32(value)
    }

    #[test]
    fn test_take_due_in_time_order() {
        let mut queue = DeferredQueue::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let c = Entity::from_raw(3);

        queue.schedule(secs(1.0), a, DeferredAction::Remove);
        queue.schedule(secs(0.5), b, DeferredAction::Remove);
        queue.schedule(secs(0.5), c, DeferredAction::Remove);

        assert!(queue.take_due(secs(0.25)).is_empty());

        let due: Vec<_> = queue.take_due(secs(0.5)).iter().map(|s| s.owner).collect();
        assert_eq!(due, vec![b, c]); // Равный due: FIFO

        assert_eq!(queue.len(), 1);
        let due: Vec<_> = queue.take_due(secs(5.0)).iter().map(|s| s.owner).collect();
        assert_eq!(due, vec![a]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pending_for_owner() {
        let mut queue = DeferredQueue::default();
        let owner = Entity::from_raw(4);
        queue.schedule(secs(0.5), owner, DeferredAction::Remove);
        queue.schedule(
            secs(0.2),
            Entity::from_raw(5),
            DeferredAction::MeleeStrike {
                target: owner,
                attack_range: 2.5,
                damage: 25.0,
            },
        );

        assert_eq!(queue.pending_for(owner).count(), 1);
    }

    #[test]
    fn test_remove_of_missing_owner_is_noop() {
        let mut app = App::new();
        app.init_resource::<DeferredQueue>()
            .add_event::<DamageRequest>()
            .add_event::<SpawnReport>()
            .insert_resource(Time::<Fixed>::default())
            .add_systems(FixedUpdate, run_deferred_actions);

        let alive = app.world_mut().spawn(Transform::default()).id();
        let gone = app.world_mut().spawn(Transform::default()).id();
        app.world_mut().despawn(gone);

        {
            let mut queue = app.world_mut().resource_mut::<DeferredQueue>();
            queue.schedule(Duration::ZERO, gone, DeferredAction::Remove);
            queue.schedule(Duration::ZERO, alive, DeferredAction::Remove);
        }

        app.world_mut().run_schedule(FixedUpdate);

        assert!(app.world().get_entity(alive).is_err());
        let reports = app.world().resource::<Events<SpawnReport>>();
        assert_eq!(reports.len(), 1);
    }
}
