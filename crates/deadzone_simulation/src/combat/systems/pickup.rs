//! Health pickup: касание живым игроком → Heal.

use bevy::prelude::*;

use crate::combat::{try_heal, Dead, HealthPickup};
use crate::components::{Collider, HealLock, Health, Player};
use crate::logger;
use crate::reports::{DisplayReport, SpawnReport};

/// System: подобрать аптечки
///
/// Аптечка исчезает только если лечение принято.
/// Полное HP или активный heal lock → остаётся на месте.
pub fn collect_health_pickups(
    mut commands: Commands,
    pickups: Query<(Entity, &HealthPickup, &Transform), Without<Player>>,
    mut players: Query<(Entity, &Transform, &Collider, &mut Health, Option<&HealLock>), (With<Player>, Without<Dead>)>,
    mut display: EventWriter<DisplayReport>,
    mut spawn_reports: EventWriter<SpawnReport>,
) {
    for (pickup_entity, pickup, pickup_transform) in pickups.iter() {
        for (player, transform, collider, mut health, lock) in players.iter_mut() {
            let center = collider.center(transform.translation);
            if center.distance(pickup_transform.translation) > pickup.radius + collider.radius {
                continue;
            }

            if !try_heal(&mut health, lock, pickup.heal_amount) {
                continue;
            }

            display.write(DisplayReport::HealthChanged {
                entity: player,
                current: health.current(),
                max: health.max(),
            });
            commands.entity(pickup_entity).despawn();
            spawn_reports.write(SpawnReport::Removed { entity: pickup_entity });

            logger::log(&format!(
                "{:?} picked up {:?} (+{:.0}, health {:.0})",
                player,
                pickup_entity,
                pickup.heal_amount,
                health.current()
            ));
            break;
        }
    }
}
