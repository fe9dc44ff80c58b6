//! AI reaction systems (death → drop, removal).

use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AIState, Enemy, EnemyTimers};
use crate::combat::{health_pickup_bundle, EntityDied};
use crate::components::KinematicBody;
use crate::config::{EnemyConfig, PickupConfig};
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::logger;
use crate::reports::{EffectCue, EffectRequest, SpawnKind, SpawnReport};
use crate::DeterministicRng;

/// System: смерть врага
///
/// 1. AIState::Dead, velocity = 0, флаги сброшены
/// 2. С вероятностью drop_chance: health pickup в позиции врага
/// 3. Удаление: сразу или через DeferredAction::Remove (removal_delay)
#[allow(clippy::too_many_arguments)]
pub fn handle_enemy_death(
    mut commands: Commands,
    mut deaths: EventReader<EntityDied>,
    time: Res<Time<Fixed>>,
    pickup_config: Res<PickupConfig>,
    mut rng: ResMut<DeterministicRng>,
    mut queue: ResMut<DeferredQueue>,
    mut enemies: Query<(&EnemyConfig, &Transform, &mut AIState, &mut EnemyTimers, &mut KinematicBody), With<Enemy>>,
    mut effects: EventWriter<EffectRequest>,
    mut spawn_reports: EventWriter<SpawnReport>,
) {
    for death in deaths.read() {
        let entity = death.entity;
        let Ok((config, transform, mut state, mut timers, mut body)) = enemies.get_mut(entity) else {
            continue;
        };
        if *state == AIState::Dead {
            continue;
        }

        *state = AIState::Dead;
        body.velocity = Vec3::ZERO;
        timers.attacking = false;
        if timers.chasing {
            timers.chasing = false;
            effects.write(EffectRequest::stop(entity, EffectCue::WalkCycle));
        }

        let position = transform.translation;
        let roll: f32 = rng.rng.gen();
        if roll < config.drop_chance {
            let pickup = commands.spawn(health_pickup_bundle(&pickup_config, position)).id();
            spawn_reports.write(SpawnReport::Spawned {
                entity: pickup,
                kind: SpawnKind::HealthPickup,
                position,
            });
            logger::log(&format!("{:?} dropped health pickup {:?}", entity, pickup));
        }

        if config.removal_delay > 0.0 {
            queue.schedule(
                time.elapsed() + Duration::from_secs_f32(config.removal_delay),
                entity,
                DeferredAction::Remove,
            );
        } else {
            commands.entity(entity).despawn();
            spawn_reports.write(SpawnReport::Removed { entity });
        }

        logger::log_info(&format!("enemy {:?} died (killer {:?}, roll {:.3})", entity, death.killer, roll));
    }
}
