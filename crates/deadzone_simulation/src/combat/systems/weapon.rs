//! Weapon systems (fire / reload intents, projectile spawn, recoil decay).
//!
//! Поток выстрела:
//! 1. `player_weapon_input`: fire/reload edge → WeaponFireIntent / ReloadIntent
//! 2. `process_weapon_fire`: WeaponState::try_fire → aim ray → spread → Projectile
//! 3. `tick_weapons`: cooldown, recoil → камера, spread (каждый кадр, независимо от стрельбы)
//!
//! Intent'ы может писать кто угодно (турель, скрипт): не только игрок.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::{Dead, Projectile, WeaponState, WeaponStats};
use crate::components::Player;
use crate::environment::{BodySnapshot, Environment, RayQuery};
use crate::input::PlayerInputState;
use crate::logger;
use crate::player::{CameraRig, RecoilKick};
use crate::reports::{DisplayReport, EffectCue, EffectRequest, SpawnKind, SpawnReport};
use crate::DeterministicRng;

/// Intent: выстрелить (Shoot)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponFireIntent {
    pub shooter: Entity,
}

/// Intent: перезарядить (Reload)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadIntent {
    pub shooter: Entity,
}

/// Событие: выстрел состоялся, пуля заспавнена
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub projectile: Entity,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// System: fire/reload edges игрока → intents
///
/// Edges забираются всегда (даже у мёртвого игрока), чтобы нажатие
/// во время смерти не выстрелило после respawn.
pub fn player_weapon_input(
    mut input: ResMut<PlayerInputState>,
    players: Query<(Entity, Has<Dead>), (With<Player>, With<WeaponState>)>,
    mut fire_intents: EventWriter<WeaponFireIntent>,
    mut reload_intents: EventWriter<ReloadIntent>,
) {
    let fire = input.take_fire();
    let reload = input.take_reload();

    for (entity, dead) in players.iter() {
        if dead {
            continue;
        }
        if reload {
            reload_intents.write(ReloadIntent { shooter: entity });
        }
        if fire {
            fire_intents.write(WeaponFireIntent { shooter: entity });
        }
    }
}

/// System: ReloadIntent → WeaponState::reload
///
/// Полный магазин = no-op без AmmoChanged.
pub fn process_reload(
    mut intents: EventReader<ReloadIntent>,
    mut shooters: Query<(&WeaponStats, &mut WeaponState, Has<Player>), Without<Dead>>,
    mut display: EventWriter<DisplayReport>,
) {
    for intent in intents.read() {
        let Ok((stats, mut state, is_player)) = shooters.get_mut(intent.shooter) else {
            continue;
        };

        if !state.reload(stats) {
            logger::log(&format!("reload {:?}: magazine already full", intent.shooter));
            continue;
        }

        if is_player {
            display.write(DisplayReport::AmmoChanged {
                entity: intent.shooter,
                current: state.current_ammo(),
                max: stats.max_ammo,
            });
        }
    }
}

/// System: WeaponFireIntent → Projectile
///
/// С CameraRig: aim ray из глаз до max_range, направление = (aim point − muzzle) + spread.
/// Без камеры: forward стрелка, дуло = transform × muzzle_offset.
#[allow(clippy::too_many_arguments)]
pub fn process_weapon_fire(
    mut commands: Commands,
    mut intents: EventReader<WeaponFireIntent>,
    mut shooters: Query<(&Transform, &WeaponStats, &mut WeaponState, Option<&CameraRig>, Has<Player>), Without<Dead>>,
    environment: Res<Environment>,
    bodies: Res<BodySnapshot>,
    mut rng: ResMut<DeterministicRng>,
    mut fired: EventWriter<WeaponFired>,
    mut display: EventWriter<DisplayReport>,
    mut effects: EventWriter<EffectRequest>,
    mut spawn_reports: EventWriter<SpawnReport>,
) {
    for intent in intents.read() {
        let shooter = intent.shooter;
        let Ok((transform, stats, mut state, rig, is_player)) = shooters.get_mut(shooter) else {
            continue;
        };

        // Spread до выстрела: первая пуля летит точно
        let spread = state.spread();

        let template = match state.try_fire(stats) {
            Ok(template) => template,
            Err(blocked) => {
                logger::log(&format!("shot {:?} blocked: {:?}", shooter, blocked));
                continue;
            }
        };

        let (muzzle, direction) = match rig {
            Some(rig) => {
                let eye = rig.eye_position(transform.translation);
                let aim = rig.aim_direction();
                let muzzle = eye + rig.view_rotation() * stats.muzzle_offset;

                let target = environment
                    .cast_ray(
                        &bodies,
                        &RayQuery {
                            origin: eye,
                            direction: aim,
                            max_distance: stats.max_range,
                            exclude: Some(shooter),
                        },
                    )
                    .map(|hit| hit.point)
                    .unwrap_or(eye + aim * stats.max_range);

                let direction = (target - muzzle).normalize_or(aim);
                (muzzle, apply_spread(direction, spread, &mut rng.rng))
            }
            None => {
                let muzzle = transform.translation + transform.rotation * stats.muzzle_offset;
                (muzzle, transform.forward().as_vec3())
            }
        };

        let projectile = commands
            .spawn((
                Projectile::from_template(&template, direction, Some(shooter)),
                Transform::from_translation(muzzle).looking_to(direction, Vec3::Y),
            ))
            .id();

        if is_player {
            display.write(DisplayReport::AmmoChanged {
                entity: shooter,
                current: state.current_ammo(),
                max: stats.max_ammo,
            });
        }
        effects.write(EffectRequest::play(shooter, EffectCue::WeaponShot));
        fired.write(WeaponFired {
            shooter,
            projectile,
            origin: muzzle,
            direction,
        });
        spawn_reports.write(SpawnReport::Spawned {
            entity: projectile,
            kind: SpawnKind::Projectile,
            position: muzzle,
        });

        logger::log(&format!(
            "{:?} fired {:?} (ammo {}/{}, spread {:.3})",
            shooter,
            projectile,
            state.current_ammo(),
            stats.max_ammo,
            spread
        ));
    }
}

/// Повернуть направление на два случайных угла в [−spread/2, spread/2]
/// вокруг локальных right / up осей выстрела
pub fn apply_spread(direction: Vec3, spread: f32, rng: &mut impl Rng) -> Vec3 {
    if spread <= 0.0 {
        return direction;
    }

    let right = direction.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
    let up = right.cross(direction).normalize_or(Vec3::Y);

    let horizontal = (rng.gen::<f32>() - 0.5) * spread;
    let vertical = (rng.gen::<f32>() - 0.5) * spread;

    let rotation = Quat::from_axis_angle(up, horizontal) * Quat::from_axis_angle(right, vertical);
    (rotation * direction).normalize_or(direction)
}

/// System: cooldown + recoil + spread decay (frame tick)
///
/// Recoil оружия каждый кадр уходит в камеру стрелка (RecoilKick),
/// пока current догоняет target: kick нарастает и плавно спадает.
pub fn tick_weapons(
    mut weapons: Query<(Entity, &WeaponStats, &mut WeaponState, Has<CameraRig>)>,
    time: Res<Time>,
    mut recoil_kicks: EventWriter<RecoilKick>,
) {
    let delta = time.delta_secs();

    for (entity, stats, mut state, has_rig) in weapons.iter_mut() {
        let Some(recoil) = state.tick(stats, delta) else {
            continue;
        };
        if has_rig {
            recoil_kicks.write(RecoilKick {
                entity,
                radians: recoil.to_radians(),
            });
        }
    }
}
