//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (Actor, Health, HealLock)
//! - movement: кинематика и коллайдеры (KinematicBody, Collider, DynamicBody)
//! - player: player control marker (Player)
//! - world: точки появления (SpawnPoint)

pub mod actor;
pub mod movement;
pub mod player;
pub mod world;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
pub use player::*;
pub use world::*;
