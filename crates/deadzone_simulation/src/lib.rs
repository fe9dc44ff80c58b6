//! DEADZONE Simulation Core
//!
//! FPS combat симуляция на Bevy 0.16 (headless, без рендера).
//!
//! Состав:
//! - player: locomotion, FPS камера, death / respawn
//! - combat: оружие, пули, damage / heal контракт
//! - ai: melee враги (distance / cooldown FSM)
//! - environment: коллизии и ray casts (trait, FlatArena по умолчанию)
//! - deferred: отложенные действия (удар после анимации, удаление трупа)
//!
//! Хост двигает симуляцию через `CombatSimulation` (physics step + frame)
//! или через `create_headless_app` + `App::update()`.

use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod deferred;
pub mod environment;
pub mod input;
pub mod logger;
pub mod player;
pub mod reports;
pub mod shared;
pub mod simulation;

// Re-export базовых компонентов для удобства
pub use ai::{AIPlugin, AIState, Enemy, EnemyTimers};
pub use combat::{
    CombatPlugin, DamageDealt, DamageRequest, DamageSource, Dead, EntityDied, HealRequest, HealthPickup, Projectile,
    WeaponState, WeaponStats,
};
pub use components::*;
pub use config::{
    ConfigError, EnemyConfig, PhysicsConfig, PickupConfig, PlayerConfig, ProjectileConfig, SimulationConfig,
    WeaponConfig,
};
pub use deferred::DeferredPlugin;
pub use environment::{ArenaObstacle, Environment, EnvironmentPlugin, FlatArena, PhysicsEnvironment};
pub use input::{PlayerInputEvent, PlayerInputState};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use player::{CameraRig, PlayerLife, PlayerPlugin};
pub use reports::{DisplayReport, EffectAction, EffectCue, EffectRequest, SpawnKind, SpawnReport};
pub use simulation::CombatSimulation;

/// Фазы physics step (FixedUpdate), выполняются строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsStep {
    /// Таймеры, BodySnapshot
    Prepare,
    /// Движение игрока
    Movement,
    /// Решения врагов
    Ai,
    /// Созревшие отложенные действия
    Deferred,
    /// Пули, dynamic bodies, pickups
    Projectiles,
    /// Heal / damage requests
    Resolve,
    /// Смерти и respawn
    Lifecycle,
}

/// Фазы кадра (Update)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameStep {
    /// Look input, fire / reload edges
    Input,
    /// Reload, выстрел, decay recoil / spread
    Weapons,
    /// Recoil kicks, сглаживание камеры, sway
    Camera,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            // Детерминистичный RNG (seed по умолчанию)
            .insert_resource(DeterministicRng::new(42))
            // Конфиги по умолчанию (CombatSimulation перезаписывает своими)
            .init_resource::<PhysicsConfig>()
            .init_resource::<PlayerConfig>()
            .init_resource::<WeaponConfig>()
            .init_resource::<ProjectileConfig>()
            .init_resource::<EnemyConfig>()
            .init_resource::<PickupConfig>()
            // Input + наружные отчёты
            .init_resource::<PlayerInputState>()
            .add_event::<PlayerInputEvent>()
            .add_event::<DisplayReport>()
            .add_event::<EffectRequest>()
            .add_event::<SpawnReport>()
            .add_systems(PreUpdate, input::collect_player_input);

        app.configure_sets(
            FixedUpdate,
            (
                PhysicsStep::Prepare,
                PhysicsStep::Movement,
                PhysicsStep::Ai,
                PhysicsStep::Deferred,
                PhysicsStep::Projectiles,
                PhysicsStep::Resolve,
                PhysicsStep::Lifecycle,
            )
                .chain(),
        )
        .configure_sets(Update, (FrameStep::Input, FrameStep::Weapons, FrameStep::Camera).chain());

        // Один поток: порядок систем = порядок выполнения
        app.edit_schedule(FixedUpdate, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        })
        .edit_schedule(Update, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });

        // Подсистемы
        app.add_plugins((EnvironmentPlugin, DeferredPlugin, PlayerPlugin, CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (хост зовёт `App::update()`)
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, SimulationPlugin))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
