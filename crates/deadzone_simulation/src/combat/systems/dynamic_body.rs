//! Dynamic bodies (ящики, бочки): импульсы от пуль + простая интеграция.

use bevy::prelude::*;

use crate::components::{Collider, DynamicBody};
use crate::config::PhysicsConfig;
use crate::environment::{slide_velocity, BodySnapshot, Environment, MoveRequest};

/// Запрос: толкнуть dynamic body
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ImpulseRequest {
    pub target: Entity,
    pub impulse: Vec3,
}

/// System: применить импульсы (velocity += impulse / mass)
pub fn apply_impulses(mut requests: EventReader<ImpulseRequest>, mut bodies: Query<&mut DynamicBody>) {
    for request in requests.read() {
        if let Ok(mut body) = bodies.get_mut(request.target) {
            body.apply_impulse(request.impulse);
        }
    }
}

/// System: гравитация в воздухе, затухание на земле, move + slide
pub fn step_dynamic_bodies(
    time: Res<Time<Fixed>>,
    physics: Res<PhysicsConfig>,
    environment: Res<Environment>,
    snapshot: Res<BodySnapshot>,
    mut bodies: Query<(Entity, &mut DynamicBody, &mut Transform, &Collider)>,
) {
    let delta = time.delta_secs();

    for (entity, mut body, mut transform, collider) in bodies.iter_mut() {
        if body.grounded {
            if body.velocity.y < 0.0 {
                body.velocity.y = 0.0;
            }
            let keep = (1.0 - body.damping * delta).max(0.0);
            body.velocity.x *= keep;
            body.velocity.z *= keep;
        } else {
            body.velocity.y -= physics.gravity * delta;
        }

        if body.velocity.length_squared() <= f32::EPSILON && body.grounded {
            continue;
        }

        let request = MoveRequest::new(entity, transform.translation, body.velocity, delta, collider);
        let result = environment.move_body(&snapshot, &request);

        transform.translation = result.position;
        body.velocity = slide_velocity(body.velocity, &result.contacts);
        body.grounded = result.grounded;
    }
}
