//! Player lifecycle: Alive → Dead → (respawn timer) → Alive
//!
//! Смерть приходит как EntityDied (единственный раз на смерть).
//! Respawn восстанавливает HP, позицию и поворот из SpawnPoint.

use bevy::prelude::*;

use crate::combat::{Dead, EntityDied};
use crate::components::{HealLock, Health, KinematicBody, Player, SpawnPoint};
use crate::config::PlayerConfig;
use crate::input::PlayerInputState;
use crate::logger;
use crate::reports::DisplayReport;

use super::camera::{CameraRig, WeaponSway};
use super::locomotion::LocomotionState;

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub enum PlayerLife {
    #[default]
    Alive,
    /// `respawn_timer: None`, respawn выключен, игрок остаётся мёртвым
    Dead { respawn_timer: Option<f32> },
}

impl PlayerLife {
    pub fn is_alive(&self) -> bool {
        matches!(self, PlayerLife::Alive)
    }
}

/// System: EntityDied игрока → Dead, таймер respawn, PlayerDied
pub fn handle_player_death(
    mut deaths: EventReader<EntityDied>,
    config: Res<PlayerConfig>,
    mut input: ResMut<PlayerInputState>,
    mut players: Query<(&mut PlayerLife, &mut KinematicBody), With<Player>>,
    mut display: EventWriter<DisplayReport>,
) {
    for death in deaths.read() {
        let Ok((mut life, mut body)) = players.get_mut(death.entity) else {
            continue;
        };
        if !life.is_alive() {
            continue;
        }

        *life = PlayerLife::Dead {
            respawn_timer: config.respawn_enabled.then_some(config.respawn_delay),
        };
        body.velocity.x = 0.0;
        body.velocity.z = 0.0;
        input.clear();

        display.write(DisplayReport::PlayerDied { entity: death.entity });

        if config.respawn_enabled {
            logger::log_info(&format!(
                "player {:?} died (killer {:?}), respawn in {:.1}s",
                death.entity, death.killer, config.respawn_delay
            ));
        } else {
            logger::log_info(&format!("player {:?} died (killer {:?})", death.entity, death.killer));
        }
    }
}

/// System: тикать respawn таймер, по истечении, вернуть игрока в SpawnPoint
#[allow(clippy::type_complexity)]
pub fn tick_player_respawn(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut input: ResMut<PlayerInputState>,
    mut players: Query<
        (
            Entity,
            &mut PlayerLife,
            &mut Health,
            &mut Transform,
            &mut KinematicBody,
            &mut CameraRig,
            &mut LocomotionState,
            &SpawnPoint,
            Option<&mut HealLock>,
            Option<&mut WeaponSway>,
        ),
        With<Player>,
    >,
    mut display: EventWriter<DisplayReport>,
) {
    let delta = time.delta_secs();

    for (entity, mut life, mut health, mut transform, mut body, mut rig, mut locomotion, spawn, lock, sway) in
        players.iter_mut()
    {
        let PlayerLife::Dead {
            respawn_timer: Some(remaining),
        } = *life
        else {
            continue;
        };

        let remaining = remaining - delta;
        if remaining > 0.0 {
            *life = PlayerLife::Dead {
                respawn_timer: Some(remaining),
            };
            continue;
        }

        health.restore_full();
        *transform = spawn.transform();
        *body = KinematicBody::default();
        *locomotion = LocomotionState::default();
        rig.reset(spawn.yaw, spawn.pitch);
        if let Some(mut lock) = lock {
            lock.clear();
        }
        if let Some(mut sway) = sway {
            *sway = WeaponSway::default();
        }
        *life = PlayerLife::Alive;
        commands.entity(entity).remove::<Dead>();
        input.clear();

        display.write(DisplayReport::HealthChanged {
            entity,
            current: health.current(),
            max: health.max(),
        });
        display.write(DisplayReport::PlayerRespawned { entity });

        logger::log_info(&format!("player {:?} respawned at {:.2?}", entity, spawn.position));
    }
}
