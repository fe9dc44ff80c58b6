//! Environment collaborator: коллизии и ray casts
//!
//! Симуляция не знает геометрию уровня. Она просит окружение:
//! - `move_body`: сдвинуть тело и вернуть grounded + список контактов
//! - `cast_ray`: первое пересечение луча
//!
//! Реализация подключается как `Environment` resource (Godot, Rapier, тестовый stub).
//! Headless по умолчанию: `FlatArena` (плоский пол + коробки).

use bevy::prelude::*;

use crate::combat::Dead;
use crate::components::{Collider, DynamicBody, Health};
use crate::PhysicsStep;

pub mod arena;

pub use arena::{ArenaObstacle, FlatArena};

/// С чем столкнулись (закрытый вариант, dispatch один раз на контакт)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    /// Статическая геометрия (стены, пол, коробки)
    StaticObstacle,
    /// Физическое тело, принимает импульсы
    DynamicBody(Entity),
    /// Актор с Health
    DamageableAgent(Entity),
}

impl ContactKind {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            ContactKind::StaticObstacle => None,
            ContactKind::DynamicBody(entity) | ContactKind::DamageableAgent(entity) => Some(*entity),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: ContactKind,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Запрос на перемещение тела за один physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveRequest {
    /// Кто двигается (исключается из коллизий)
    pub entity: Entity,
    /// Позиция ступней (Transform.translation)
    pub position: Vec3,
    pub velocity: Vec3,
    pub delta: f32,
    pub radius: f32,
    /// Центр сферы над ступнями
    pub center_height: f32,
    /// Дополнительно игнорируемый entity (владелец пули)
    pub ignore: Option<Entity>,
}

impl MoveRequest {
    pub fn new(entity: Entity, position: Vec3, velocity: Vec3, delta: f32, collider: &Collider) -> Self {
        Self {
            entity,
            position,
            velocity,
            delta,
            radius: collider.radius,
            center_height: collider.center_height,
            ignore: None,
        }
    }

    pub fn ignoring(mut self, entity: Option<Entity>) -> Self {
        self.ignore = entity;
        self
    }

    pub fn skips(&self, entity: Entity) -> bool {
        entity == self.entity || self.ignore == Some(entity)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveResult {
    /// Итоговая позиция ступней
    pub position: Vec3,
    pub grounded: bool,
    /// Контакты в порядке столкновения (ближайший первым)
    pub contacts: Vec<Contact>,
}

/// Убрать из velocity компоненты, направленные внутрь поверхностей контактов
pub fn slide_velocity(velocity: Vec3, contacts: &[Contact]) -> Vec3 {
    contacts.iter().fold(velocity, |velocity, contact| {
        let into = velocity.dot(contact.normal);
        if into < 0.0 {
            velocity - contact.normal * into
        } else {
            velocity
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayQuery {
    pub origin: Vec3,
    /// Не обязательно нормализован
    pub direction: Vec3,
    pub max_distance: f32,
    pub exclude: Option<Entity>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    /// None для статической геометрии
    pub entity: Option<Entity>,
}

/// Сервис коллизий, предоставляемый хостом
pub trait PhysicsEnvironment: Send + Sync {
    fn move_body(&self, bodies: &BodySnapshot, request: &MoveRequest) -> MoveResult;

    fn cast_ray(&self, bodies: &BodySnapshot, query: &RayQuery) -> Option<RayHit>;
}

/// Resource-обёртка над окружением
#[derive(Resource)]
pub struct Environment(Box<dyn PhysicsEnvironment>);

impl Environment {
    pub fn new(environment: impl PhysicsEnvironment + 'static) -> Self {
        Self(Box::new(environment))
    }

    pub fn move_body(&self, bodies: &BodySnapshot, request: &MoveRequest) -> MoveResult {
        self.0.move_body(bodies, request)
    }

    pub fn cast_ray(&self, bodies: &BodySnapshot, query: &RayQuery) -> Option<RayHit> {
        self.0.cast_ray(bodies, query)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(FlatArena::default())
    }
}

/// Тип тела в snapshot'е
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Agent,
    Dynamic,
}

/// Сфера коллизии одного entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
    pub kind: BodyKind,
}

impl BodyShape {
    pub fn contact_kind(&self) -> ContactKind {
        match self.kind {
            BodyKind::Agent => ContactKind::DamageableAgent(self.entity),
            BodyKind::Dynamic => ContactKind::DynamicBody(self.entity),
        }
    }
}

/// Все живые тела на начало physics step
///
/// Отсортирован по Entity (стабильный порядок → детерминизм).
/// Мёртвые акторы не участвуют в коллизиях.
#[derive(Resource, Debug, Clone, Default)]
pub struct BodySnapshot {
    pub bodies: Vec<BodyShape>,
}

impl BodySnapshot {
    pub fn iter(&self) -> impl Iterator<Item = &BodyShape> {
        self.bodies.iter()
    }

    pub fn get(&self, entity: Entity) -> Option<&BodyShape> {
        self.bodies.iter().find(|body| body.entity == entity)
    }
}

/// Система: пересобрать BodySnapshot (первой в physics step)
pub fn rebuild_body_snapshot(
    mut snapshot: ResMut<BodySnapshot>,
    agents: Query<(Entity, &Transform, &Collider, &Health), Without<Dead>>,
    dynamic_bodies: Query<(Entity, &Transform, &Collider), (With<DynamicBody>, Without<Health>)>,
) {
    snapshot.bodies.clear();

    for (entity, transform, collider, health) in agents.iter() {
        if !health.is_alive() {
            continue;
        }
        snapshot.bodies.push(BodyShape {
            entity,
            center: collider.center(transform.translation),
            radius: collider.radius,
            kind: BodyKind::Agent,
        });
    }

    for (entity, transform, collider) in dynamic_bodies.iter() {
        snapshot.bodies.push(BodyShape {
            entity,
            center: collider.center(transform.translation),
            radius: collider.radius,
            kind: BodyKind::Dynamic,
        });
    }

    snapshot.bodies.sort_by_key(|body| body.entity);
}

/// Environment Plugin
///
/// Регистрирует BodySnapshot и окружение по умолчанию (FlatArena).
/// Snapshot пересобирается в начале каждого physics step (Prepare).
pub struct EnvironmentPlugin;

impl Plugin for EnvironmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<BodySnapshot>()
            .init_resource::<Environment>()
            .add_systems(FixedUpdate, rebuild_body_snapshot.in_set(PhysicsStep::Prepare));
    }
}
