//! FSM AI systems (timers, target re-acquire, decision + movement).

use std::time::Duration;

use bevy::prelude::*;

use crate::ai::{choose_intent, AIState, Enemy, EnemyIntent, EnemyTimers, TrackedTarget};
use crate::combat::Dead;
use crate::components::{Collider, Health, KinematicBody, Player};
use crate::config::EnemyConfig;
use crate::deferred::{DeferredAction, DeferredQueue};
use crate::environment::{slide_velocity, BodySnapshot, Environment, MoveRequest};
use crate::logger;
use crate::reports::{EffectCue, EffectRequest};

/// Система: тикать attack / chase cooldowns (physics step)
pub fn tick_enemy_timers(mut enemies: Query<&mut EnemyTimers, Without<Dead>>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut timers in enemies.iter_mut() {
        timers.tick(delta);
    }
}

/// Найти живого игрока: tracked если ещё валиден, иначе ближайший
fn acquire_target(
    tracked: Option<Entity>,
    position: Vec3,
    players: &Query<(Entity, &Transform, &Health), (With<Player>, Without<Dead>, Without<Enemy>)>,
) -> Option<(Entity, Vec3)> {
    if let Some(entity) = tracked {
        if let Ok((_, transform, health)) = players.get(entity) {
            if health.is_alive() {
                return Some((entity, transform.translation));
            }
        }
    }

    players
        .iter()
        .filter(|(_, _, health)| health.is_alive())
        .map(|(entity, transform, _)| (entity, transform.translation))
        .min_by(|a, b| {
            a.1.distance_squared(position)
                .total_cmp(&b.1.distance_squared(position))
                .then(a.0.cmp(&b.0))
        })
}

/// Система: решение врага + движение (physics step)
///
/// 1. Re-acquire игрока; нет живого → Searching, только гравитация
/// 2. Поворот к игроку (только yaw), если не атакуем и он в chase range
/// 3. choose_intent → velocity / DeferredAction::MeleeStrike
/// 4. Environment::move_body + slide
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn enemy_decision(
    time: Res<Time<Fixed>>,
    environment: Res<Environment>,
    bodies: Res<BodySnapshot>,
    mut queue: ResMut<DeferredQueue>,
    mut enemies: Query<
        (
            Entity,
            &EnemyConfig,
            &mut AIState,
            &mut EnemyTimers,
            &mut TrackedTarget,
            &mut Transform,
            &mut KinematicBody,
            &Collider,
        ),
        (With<Enemy>, Without<Dead>, Without<Player>),
    >,
    players: Query<(Entity, &Transform, &Health), (With<Player>, Without<Dead>, Without<Enemy>)>,
    mut effects: EventWriter<EffectRequest>,
) {
    let delta = time.delta_secs();

    for (entity, config, mut state, mut timers, mut tracked, mut transform, mut body, collider) in enemies.iter_mut() {
        let previous = *state;

        if body.grounded {
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
        } else {
            body.velocity.y -= config.gravity * delta;
        }

        let target = acquire_target(tracked.0, transform.translation, &players);
        tracked.0 = target.map(|(player, _)| player);

        if let Some((player, player_position)) = target {
            let offset = player_position - transform.translation;
            let distance = offset.length();
            let flat = Vec3::new(offset.x, 0.0, offset.z).normalize_or_zero();

            if !timers.attacking && distance <= config.chase_range && flat != Vec3::ZERO {
                let look_at = Vec3::new(player_position.x, transform.translation.y, player_position.z);
                transform.look_at(look_at, Vec3::Y);
            }

            let intent = choose_intent(distance, config, &timers);
            let horizontal = Vec3::new(body.velocity.x, 0.0, body.velocity.z);

            let desired = match intent {
                EnemyIntent::Attack => {
                    timers.attacking = true;
                    timers.attack_cooldown = config.attack_cooldown;
                    queue.schedule(
                        time.elapsed() + Duration::from_secs_f32(config.attack_delay),
                        entity,
                        DeferredAction::MeleeStrike {
                            target: player,
                            attack_range: config.attack_range,
                            damage: config.melee_damage,
                        },
                    );
                    effects.write(EffectRequest::play(entity, EffectCue::MeleeSwing));
                    horizontal
                }
                EnemyIntent::Chase => flat * config.movement_speed,
                EnemyIntent::BackAway => -flat * config.movement_speed,
                EnemyIntent::Hold | EnemyIntent::Decelerate => Vec3::ZERO,
            };

            let smoothed = horizontal.lerp(desired, (config.velocity_damping * delta).min(1.0));
            body.velocity.x = smoothed.x;
            body.velocity.z = smoothed.z;

            let chasing = intent == EnemyIntent::Chase;
            if chasing && !timers.chasing {
                effects.write(EffectRequest::play(entity, EffectCue::WalkCycle));
            } else if !chasing && timers.chasing {
                effects.write(EffectRequest::stop(entity, EffectCue::WalkCycle));
                if intent == EnemyIntent::Decelerate {
                    timers.chase_cooldown = config.chase_cooldown;
                }
            }
            timers.chasing = chasing;

            *state = if timers.attacking {
                AIState::Attacking { target: player }
            } else if chasing {
                AIState::Chasing { target: player }
            } else {
                AIState::Holding { target: player }
            };
        } else {
            if timers.chasing {
                effects.write(EffectRequest::stop(entity, EffectCue::WalkCycle));
                timers.chasing = false;
            }
            *state = AIState::Searching;
        }

        let request = MoveRequest::new(entity, transform.translation, body.velocity, delta, collider);
        let result = environment.move_body(&bodies, &request);

        transform.translation = result.position;
        body.record_grounded(result.grounded);
        body.velocity = slide_velocity(body.velocity, &result.contacts);

        if state.name() != previous.name() {
            logger::log(&format!("{:?}: AI {} → {}", entity, previous.name(), state.name()));
        }
    }
}
