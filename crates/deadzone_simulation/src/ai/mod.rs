//! AI decision-making module
//!
//! Distance / cooldown FSM для melee врагов (без navmesh).
//! Удар применяется отложенно через DeferredQueue: после задержки
//! дистанция проверяется заново.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use systems::*;

use crate::PhysicsStep;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate.
/// Порядок выполнения:
/// 1. tick_enemy_timers: cooldowns (Prepare)
/// 2. enemy_decision: target, intent, движение (Ai)
/// 3. handle_enemy_death: drop + удаление (Lifecycle)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, tick_enemy_timers.in_set(PhysicsStep::Prepare))
            .add_systems(FixedUpdate, enemy_decision.in_set(PhysicsStep::Ai))
            .add_systems(FixedUpdate, handle_enemy_death.in_set(PhysicsStep::Lifecycle));
    }
}
