//! Projectile flight: gravity → move → первый контакт → despawn.

use bevy::prelude::*;

use super::dynamic_body::ImpulseRequest;
use crate::combat::{DamageRequest, DamageSource, Projectile};
use crate::config::PhysicsConfig;
use crate::environment::{BodySnapshot, ContactKind, Environment, MoveRequest};
use crate::logger;
use crate::reports::{EffectCue, EffectRequest, SpawnReport};

/// System: шаг всех пуль (physics tick)
///
/// Обрабатывается только ПЕРВЫЙ контакт из списка:
/// - DynamicBody → ImpulseRequest (velocity × impulse_factor)
/// - DamageableAgent → DamageRequest
/// - StaticObstacle → только Impact
///
/// После контакта пуля помечается `spent` и деспавнится; второго попадания нет.
#[allow(clippy::too_many_arguments)]
pub fn step_projectiles(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    physics: Res<PhysicsConfig>,
    environment: Res<Environment>,
    bodies: Res<BodySnapshot>,
    mut projectiles: Query<(Entity, &mut Projectile, &mut Transform)>,
    mut damage_requests: EventWriter<DamageRequest>,
    mut impulses: EventWriter<ImpulseRequest>,
    mut effects: EventWriter<EffectRequest>,
    mut spawn_reports: EventWriter<SpawnReport>,
) {
    let delta = time.delta_secs();

    for (entity, mut projectile, mut transform) in projectiles.iter_mut() {
        if projectile.spent {
            continue;
        }

        projectile.velocity.y -= physics.gravity * projectile.gravity_scale * delta;

        let request = MoveRequest {
            entity,
            position: transform.translation,
            velocity: projectile.velocity,
            delta,
            radius: projectile.radius,
            center_height: 0.0,
            ignore: projectile.owner,
        };
        let result = environment.move_body(&bodies, &request);

        if let Some(contact) = result.contacts.first() {
            match contact.kind {
                ContactKind::DynamicBody(target) => {
                    impulses.write(ImpulseRequest {
                        target,
                        impulse: projectile.impact_impulse(),
                    });
                }
                ContactKind::DamageableAgent(target) => {
                    damage_requests.write(DamageRequest {
                        target,
                        amount: projectile.damage,
                        attacker: projectile.owner,
                        source: DamageSource::Projectile,
                    });
                }
                ContactKind::StaticObstacle => {}
            }

            logger::log(&format!(
                "projectile {:?} hit {:?} at {:.2?}",
                entity, contact.kind, contact.point
            ));

            projectile.spent = true;
            transform.translation = contact.point;
            effects.write(EffectRequest::play(entity, EffectCue::Impact));
            commands.entity(entity).despawn();
            spawn_reports.write(SpawnReport::Removed { entity });
            continue;
        }

        transform.translation = result.position;
        if let Ok(direction) = Dir3::new(projectile.velocity) {
            transform.look_to(direction, Vec3::Y);
        }

        projectile.age += delta;
        if projectile.is_expired() {
            commands.entity(entity).despawn();
            spawn_reports.write(SpawnReport::Removed { entity });
        }
    }
}
