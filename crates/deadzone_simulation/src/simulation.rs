//! CombatSimulation: владеемый цикл симуляции
//!
//! Хост сам решает когда тикать:
//! - `advance_physics(dt)`: один physics step (FixedUpdate)
//! - `advance_frame(dt)`: один кадр (First → PreUpdate → Update)
//!
//! Отчёты (display / effects / spawn) копятся внутри и забираются drain_*.

use std::time::Duration;

use bevy::ecs::event::EventCursor;
use bevy::ecs::schedule::ExecutorKind;
use bevy::prelude::*;

use crate::ai::enemy_bundle;
use crate::combat::{health_pickup_bundle, WeaponState, WeaponStats};
use crate::components::{Collider, DynamicBody, Health};
use crate::config::{ConfigError, EnemyConfig, PickupConfig, PlayerConfig, ProjectileConfig, SimulationConfig, WeaponConfig};
use crate::environment::{Environment, PhysicsEnvironment};
use crate::input::{PlayerInputEvent, PlayerInputState};
use crate::logger;
use crate::player::player_bundle;
use crate::reports::{DisplayReport, EffectRequest, SpawnKind, SpawnReport};
use crate::{DeterministicRng, SimulationPlugin};

pub struct CombatSimulation {
    app: App,
    display_cursor: EventCursor<DisplayReport>,
    effect_cursor: EventCursor<EffectRequest>,
    spawn_cursor: EventCursor<SpawnReport>,
    display_reports: Vec<DisplayReport>,
    effect_requests: Vec<EffectRequest>,
    spawn_reports: Vec<SpawnReport>,
}

impl CombatSimulation {
    /// Собрать симуляцию; невалидный конфиг → ConfigError (до первого тика)
    pub fn new(config: SimulationConfig, environment: impl PhysicsEnvironment + 'static) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut app = App::new();
        app.add_plugins(SimulationPlugin)
            .insert_resource(Time::<Fixed>::from_hz(config.physics.fixed_hz))
            .insert_resource(Time::<()>::default())
            .insert_resource(DeterministicRng::new(config.seed))
            .insert_resource(Environment::new(environment))
            .insert_resource(config.physics.clone())
            .insert_resource(config.player.clone())
            .insert_resource(config.weapon.clone())
            .insert_resource(config.projectile.clone())
            .insert_resource(config.enemy.clone())
            .insert_resource(config.pickup.clone());
        // Хост-цикл без task pool'ов: служебные расписания тоже в один поток
        app.edit_schedule(First, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        })
        .edit_schedule(PreUpdate, |schedule| {
            schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        });
        app.finish();
        app.cleanup();

        logger::log_info(&format!(
            "combat simulation ready (seed {}, {} Hz)",
            config.seed, config.physics.fixed_hz
        ));

        Ok(Self {
            app,
            display_cursor: EventCursor::default(),
            effect_cursor: EventCursor::default(),
            spawn_cursor: EventCursor::default(),
            display_reports: Vec::new(),
            effect_requests: Vec::new(),
            spawn_reports: Vec::new(),
        })
    }

    /// Один physics step длиной `dt` секунд
    pub fn advance_physics(&mut self, dt: f32) {
        let world = self.app.world_mut();
        world
            .resource_mut::<Time<Fixed>>()
            .advance_by(step_duration(dt));
        world.run_schedule(FixedUpdate);
        self.collect_reports();
    }

    /// Один кадр длиной `dt` секунд
    pub fn advance_frame(&mut self, dt: f32) {
        let world = self.app.world_mut();
        // Ротация буферов событий
        world.run_schedule(First);
        world.resource_mut::<Time>().advance_by(step_duration(dt));
        world.run_schedule(PreUpdate);
        world.run_schedule(Update);
        self.collect_reports();
    }

    /// `seconds` симуляции: physics step + кадр на каждый тик `physics_hz`
    pub fn run_for(&mut self, seconds: f32, physics_hz: f32) {
        if !(physics_hz > 0.0 && physics_hz.is_finite() && seconds.is_finite()) {
            return;
        }
        let dt = 1.0 / physics_hz;
        let steps = (seconds * physics_hz).round() as u32;

        for _ in 0..steps {
            self.advance_physics(dt);
            self.advance_frame(dt);
        }
    }

    pub fn submit_input(&mut self, input: PlayerInputEvent) {
        self.app.world_mut().resource_mut::<PlayerInputState>().apply(&input);
    }

    pub fn spawn_player(&mut self, position: Vec3, yaw: f32) -> Entity {
        let world = self.app.world_mut();
        let config = world.resource::<PlayerConfig>().clone();
        let weapon = WeaponStats::from_config(world.resource::<WeaponConfig>(), world.resource::<ProjectileConfig>());

        let entity = world.spawn(player_bundle(&config, weapon, position, yaw)).id();

        world.send_event(SpawnReport::Spawned {
            entity,
            kind: SpawnKind::Player,
            position,
        });
        world.send_event(DisplayReport::HealthChanged {
            entity,
            current: config.max_health,
            max: config.max_health,
        });
        world.send_event(DisplayReport::AmmoChanged {
            entity,
            current: WeaponState::new(&weapon).current_ammo(),
            max: weapon.max_ammo,
        });

        logger::log_info(&format!("player {:?} spawned at {:.2?}", entity, position));
        self.collect_reports();
        entity
    }

    pub fn spawn_enemy(&mut self, position: Vec3) -> Entity {
        let world = self.app.world_mut();
        let config = world.resource::<EnemyConfig>().clone();
        let entity = world.spawn(enemy_bundle(&config, position)).id();

        world.send_event(SpawnReport::Spawned {
            entity,
            kind: SpawnKind::Enemy,
            position,
        });

        logger::log(&format!("enemy {:?} spawned at {:.2?}", entity, position));
        self.collect_reports();
        entity
    }

    /// Сфера `radius`, лежащая ступнями в `position`
    pub fn spawn_dynamic_body(&mut self, position: Vec3, mass: f32, radius: f32) -> Entity {
        let world = self.app.world_mut();
        let entity = world
            .spawn((
                DynamicBody::with_mass(mass),
                Collider {
                    radius,
                    center_height: radius,
                },
                Transform::from_translation(position),
            ))
            .id();

        world.send_event(SpawnReport::Spawned {
            entity,
            kind: SpawnKind::DynamicBody,
            position,
        });
        self.collect_reports();
        entity
    }

    pub fn spawn_health_pickup(&mut self, position: Vec3) -> Entity {
        let world = self.app.world_mut();
        let config = world.resource::<PickupConfig>().clone();
        let entity = world.spawn(health_pickup_bundle(&config, position)).id();

        world.send_event(SpawnReport::Spawned {
            entity,
            kind: SpawnKind::HealthPickup,
            position,
        });
        self.collect_reports();
        entity
    }

    /// Удалить актора из симуляции (отложенные действия владельца станут no-op)
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let world = self.app.world_mut();
        if !world.despawn(entity) {
            return false;
        }
        world.send_event(SpawnReport::Removed { entity });
        self.collect_reports();
        true
    }

    pub fn drain_display_reports(&mut self) -> Vec<DisplayReport> {
        std::mem::take(&mut self.display_reports)
    }

    pub fn drain_effect_requests(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.effect_requests)
    }

    pub fn drain_spawn_reports(&mut self) -> Vec<SpawnReport> {
        std::mem::take(&mut self.spawn_reports)
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn health_of(&self, entity: Entity) -> Option<f32> {
        self.world().get::<Health>(entity).map(Health::current)
    }

    pub fn position_of(&self, entity: Entity) -> Option<Vec3> {
        self.world().get::<Transform>(entity).map(|transform| transform.translation)
    }

    /// Переложить новые события в буферы отчётов (до ротации событий)
    fn collect_reports(&mut self) {
        let world = self.app.world();

        let display = world.resource::<Events<DisplayReport>>();
        self.display_reports.extend(self.display_cursor.read(display).copied());

        let effects = world.resource::<Events<EffectRequest>>();
        self.effect_requests.extend(self.effect_cursor.read(effects).copied());

        let spawns = world.resource::<Events<SpawnReport>>();
        self.spawn_reports.extend(self.spawn_cursor.read(spawns).copied());
    }
}

/// Длительность шага: отрицательный и не-конечный dt → ноль
fn step_duration(dt: f32) -> Duration {
    if !dt.is_finite() {
        logger::log_warning(&format!("non-finite dt {} ignored", dt));
        return Duration::ZERO;
    }
    Duration::from_secs_f32(dt.max(0.0))
}
