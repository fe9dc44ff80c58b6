//! FlatArena (headless окружение): бесконечный пол + AABB препятствия
//!
//! Тела: сферы (центр = ступни + center_height).
//! Sweep: луч из центра против препятствий, расширенных на радиус (Minkowski sum).
//! Один slide после блокирующего контакта, дальше тело останавливается.
//! Тела, с которыми уже есть перекрытие на старте, пропускаются (не залипаем).
//! Исключение: точечный mover (center_height = 0, пуля) получает контакт на дистанции 0.

use bevy::math::bounding::{Aabb3d, BoundingSphere, RayCast3d};
use bevy::math::{Dir3A, Vec3A};
use bevy::prelude::*;

use super::{BodySnapshot, Contact, ContactKind, MoveRequest, MoveResult, PhysicsEnvironment, RayHit, RayQuery};

/// Нормаль с y выше этого считается полом
const FLOOR_NORMAL_Y: f32 = 0.7;

/// Статическая коробка арены
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArenaObstacle {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl ArenaObstacle {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    fn contains(&self, point: Vec3, margin: f32) -> bool {
        (point - self.center).abs().cmplt(self.half_extents + Vec3::splat(margin)).all()
    }

    /// Нормаль грани, ближайшей к точке на поверхности
    fn face_normal(&self, point: Vec3, margin: f32) -> Vec3 {
        let local = (point - self.center) / (self.half_extents + Vec3::splat(margin));
        let abs = local.abs();

        if abs.x >= abs.y && abs.x >= abs.z {
            Vec3::X * local.x.signum()
        } else if abs.y >= abs.z {
            Vec3::Y * local.y.signum()
        } else {
            Vec3::Z * local.z.signum()
        }
    }
}

/// Headless арена
#[derive(Debug, Clone, PartialEq)]
pub struct FlatArena {
    pub ground_height: f32,
    pub obstacles: Vec<ArenaObstacle>,
    /// Допуск для grounded проверки
    pub ground_epsilon: f32,
    /// Зазор, на котором останавливаемся перед поверхностью
    pub skin: f32,
}

impl Default for FlatArena {
    fn default() -> Self {
        Self {
            ground_height: 0.0,
            obstacles: Vec::new(),
            ground_epsilon: 0.05,
            skin: 0.001,
        }
    }
}

struct SweepHit {
    distance: f32,
    normal: Vec3,
    point: Vec3,
    kind: ContactKind,
}

impl SweepHit {
    fn contact(&self) -> Contact {
        Contact {
            kind: self.kind,
            point: self.point,
            normal: self.normal,
        }
    }
}

fn ray_cast(origin: Vec3, direction: Vec3, max: f32) -> Option<RayCast3d> {
    let direction = Dir3A::new(Vec3A::from(direction)).ok()?;
    Some(RayCast3d::new(Vec3A::from(origin), direction, max))
}

fn keep_nearest(best: &mut Option<SweepHit>, candidate: SweepHit) {
    if best.as_ref().is_none_or(|hit| candidate.distance < hit.distance) {
        *best = Some(candidate);
    }
}

impl FlatArena {
    pub fn with_obstacle(mut self, obstacle: ArenaObstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Первое препятствие на пути сферы `center → center + displacement`
    fn sweep(&self, bodies: &BodySnapshot, request: &MoveRequest, center: Vec3, displacement: Vec3) -> Option<SweepHit> {
        let length = displacement.length();
        let cast = ray_cast(center, displacement, length)?;
        let direction = displacement / length;
        let radius = request.radius;
        let mut best: Option<SweepHit> = None;

        // Пол проверяем по ступням
        let feet_y = center.y - request.center_height;
        if direction.y < 0.0 && feet_y + displacement.y < self.ground_height {
            let distance = ((feet_y - self.ground_height) / -direction.y).max(0.0);
            let feet = center + direction * distance - Vec3::Y * request.center_height;
            keep_nearest(
                &mut best,
                SweepHit {
                    distance,
                    normal: Vec3::Y,
                    point: feet,
                    kind: ContactKind::StaticObstacle,
                },
            );
        }

        for obstacle in &self.obstacles {
            if obstacle.contains(center, radius) {
                continue;
            }
            let expanded = Aabb3d::new(obstacle.center, obstacle.half_extents + Vec3::splat(radius));
            if let Some(distance) = cast.aabb_intersection_at(&expanded) {
                let hit_center = center + direction * distance;
                let normal = obstacle.face_normal(hit_center, radius);
                keep_nearest(
                    &mut best,
                    SweepHit {
                        distance,
                        normal,
                        point: hit_center - normal * radius,
                        kind: ContactKind::StaticObstacle,
                    },
                );
            }
        }

        for body in bodies.iter() {
            if request.skips(body.entity) {
                continue;
            }
            let combined = body.radius + radius;
            if center.distance(body.center) < combined {
                if request.center_height == 0.0 {
                    let normal = (center - body.center).normalize_or(-direction);
                    keep_nearest(
                        &mut best,
                        SweepHit {
                            distance: 0.0,
                            normal,
                            point: center,
                            kind: body.contact_kind(),
                        },
                    );
                }
                continue;
            }
            let sphere = BoundingSphere::new(body.center, combined);
            if let Some(distance) = cast.sphere_intersection_at(&sphere) {
                let hit_center = center + direction * distance;
                let normal = (hit_center - body.center).normalize_or(-direction);
                keep_nearest(
                    &mut best,
                    SweepHit {
                        distance,
                        normal,
                        point: body.center + normal * body.radius,
                        kind: body.contact_kind(),
                    },
                );
            }
        }

        best
    }

    fn probe_floor(&self, bodies: &BodySnapshot, request: &MoveRequest, center: Vec3) -> bool {
        self.sweep(bodies, request, center, Vec3::NEG_Y * self.ground_epsilon)
            .is_some_and(|hit| hit.normal.y > FLOOR_NORMAL_Y)
    }
}

impl PhysicsEnvironment for FlatArena {
    fn move_body(&self, bodies: &BodySnapshot, request: &MoveRequest) -> MoveResult {
        let lift = Vec3::Y * request.center_height;
        let mut center = request.position + lift;
        let mut remaining = request.velocity * request.delta;
        let mut contacts = Vec::new();

        // Основной sweep + один slide
        for _ in 0..2 {
            let length = remaining.length();
            if length <= f32::EPSILON {
                break;
            }

            let Some(hit) = self.sweep(bodies, request, center, remaining) else {
                center += remaining;
                break;
            };

            let direction = remaining / length;
            center += direction * (hit.distance - self.skin).max(0.0);

            let leftover = direction * (length - hit.distance).max(0.0);
            remaining = leftover - hit.normal * leftover.dot(hit.normal).min(0.0);
            contacts.push(hit.contact());
        }

        let mut position = center - lift;
        if position.y < self.ground_height {
            position.y = self.ground_height;
        }

        let grounded = request.velocity.y <= 0.0 && self.probe_floor(bodies, request, position + lift);

        MoveResult {
            position,
            grounded,
            contacts,
        }
    }

    fn cast_ray(&self, bodies: &BodySnapshot, query: &RayQuery) -> Option<RayHit> {
        let cast = ray_cast(query.origin, query.direction, query.max_distance)?;
        let direction = query.direction.normalize_or_zero();
        let mut best: Option<RayHit> = None;

        let mut consider = |distance: f32, normal: Vec3, entity: Option<Entity>| {
            if distance > query.max_distance {
                return;
            }
            if best.is_none_or(|hit| distance < hit.distance) {
                best = Some(RayHit {
                    point: query.origin + direction * distance,
                    normal,
                    distance,
                    entity,
                });
            }
        };

        if direction.y < 0.0 && query.origin.y > self.ground_height {
            consider((query.origin.y - self.ground_height) / -direction.y, Vec3::Y, None);
        }

        for obstacle in &self.obstacles {
            if obstacle.contains(query.origin, 0.0) {
                continue;
            }
            let aabb = Aabb3d::new(obstacle.center, obstacle.half_extents);
            if let Some(distance) = cast.aabb_intersection_at(&aabb) {
                let point = query.origin + direction * distance;
                consider(distance, obstacle.face_normal(point, 0.0), None);
            }
        }

        for body in bodies.iter() {
            if query.exclude == Some(body.entity) || query.origin.distance(body.center) < body.radius {
                continue;
            }
            let sphere = BoundingSphere::new(body.center, body.radius);
            if let Some(distance) = cast.sphere_intersection_at(&sphere) {
                let point = query.origin + direction * distance;
                consider(distance, (point - body.center).normalize_or(-direction), Some(body.entity));
            }
        }

        best
    }
}
