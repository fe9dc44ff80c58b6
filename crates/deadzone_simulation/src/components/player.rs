//! Player control marker component
//!
//! Отмечает entity которым управляет игрок через input (в отличие от AI).

use bevy::prelude::*;

use super::actor::Actor;

/// Marker component для player-controlled entity
///
/// Акторы БЕЗ этого компонента управляются AI systems.
/// Акторы С этим компонентом получают команды из `PlayerInputState`.
///
/// # Архитектурная заметка
/// - Enemy systems используют `Without<Player>` filter
/// - Locomotion / camera systems используют `With<Player>` filter
///
/// В симуляции обычно только один entity имеет этот компонент,
/// враги выбирают ближайшего живого если их несколько.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Actor)]
pub struct Player;
