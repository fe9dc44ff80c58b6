//! Combat module: ranged weapon, projectiles, damage / heal контракт
//!
//! ECS ответственность:
//! - Game state: Health, HealLock, WeaponState, Projectile
//! - Combat rules: fire rate, spread, at-most-one-hit, heal lock
//! - Events: DamageRequest → DamageDealt / EntityDied
//!
//! Окружение (Environment) отвечает только за геометрию:
//! aim ray и контакты пули приходят оттуда.

use bevy::prelude::*;

pub mod components;
pub mod damage;
pub mod systems;


// Re-export основных типов
pub use components::*;
pub use damage::{
    apply_damage_requests, apply_heal_requests, tick_heal_locks, try_heal, DamageDealt, DamageRequest, DamageSource,
    Dead, EntityDied, HealRequest,
};
pub use systems::*;

use crate::{FrameStep, PhysicsStep};

/// Combat Plugin
///
/// Physics step (FixedUpdate):
/// 1. Prepare: tick_heal_locks
/// 2. Projectiles: step_projectiles → apply_impulses → step_dynamic_bodies → pickups
/// 3. Resolve: heal, затем damage (урон того же step'а блокирует следующий heal)
///
/// Frame (Update):
/// 1. Input: fire/reload edges → intents
/// 2. Weapons: reload → fire → tick (cooldown / recoil / spread)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<HealRequest>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<WeaponFireIntent>()
            .add_event::<ReloadIntent>()
            .add_event::<WeaponFired>()
            .add_event::<ImpulseRequest>();

        app.add_systems(FixedUpdate, tick_heal_locks.in_set(PhysicsStep::Prepare))
            .add_systems(
                FixedUpdate,
                (step_projectiles, apply_impulses, step_dynamic_bodies, collect_health_pickups)
                    .chain()
                    .in_set(PhysicsStep::Projectiles),
            )
            .add_systems(
                FixedUpdate,
                (apply_heal_requests, apply_damage_requests)
                    .chain()
                    .in_set(PhysicsStep::Resolve),
            );

        app.add_systems(Update, player_weapon_input.in_set(FrameStep::Input))
            .add_systems(
                Update,
                (process_reload, process_weapon_fire, tick_weapons)
                    .chain()
                    .in_set(FrameStep::Weapons),
            );
    }
}
