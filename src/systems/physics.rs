//! Physics integration systems.
//!
//! - [`initialize_physics`] creates one body and one collider per entity with
//!   [`Transform`] + [`RigidBody`].
//! - [`physics_step`] advances the world once per frame by its fixed step.
//! - [`emit_trigger_events`] forwards sensor entries as [`TriggerEntryEvent`]s.
//! - [`sync_transforms`] writes simulated poses back into [`Transform`]s.
use bevy_ecs::prelude::*;
use log::{error, info};

use crate::components::boxcollider::BoxCollider;
use crate::components::circlecollider::CircleCollider;
use crate::components::rigidbody::{BodyType, RigidBody};
use crate::components::transform::Transform;
use crate::error::PhysicsError;
use crate::events::trigger::TriggerEntryEvent;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::worldtime::WorldTime;

/// Create physics bodies for every entity with a [`Transform`] and a
/// [`RigidBody`] that has no body yet.
///
/// The body is placed at the transform position plus the body's offset and
/// rotated by `rotation.z`. Exactly one collider is attached: [`BoxCollider`]
/// when present, otherwise [`CircleCollider`]. An entity with neither is an
/// error: no body is created for it, initialization stops there and the
/// caller is expected to abort startup. Bodies created before the failing
/// entity are kept. The entity stays detached, so a later call fails again.
///
/// Returns the number of bodies created.
pub fn initialize_physics(world: &mut World) -> Result<usize, PhysicsError> {
    world.resource_scope(|world, mut physics: Mut<PhysicsWorld>| {
        let pending: Vec<_> = {
            let mut query = world.query::<(
                Entity,
                &Transform,
                &RigidBody,
                Option<&BoxCollider>,
                Option<&CircleCollider>,
            )>();
            query
                .iter(world)
                .filter(|(_, _, rb, _, _)| !rb.is_attached())
                .map(|(entity, transform, rb, boxc, circle)| {
                    let fixture = boxc
                        .map(BoxCollider::fixture)
                        .or_else(|| circle.map(CircleCollider::fixture));
                    (entity, *transform, rb.initial, fixture)
                })
                .collect()
        };

        let mut created = 0;
        for (entity, transform, params, fixture) in pending {
            let Some(fixture) = fixture else {
                error!(
                    "Rigidbodies can't function without a physics shape! Attach a collider to all physics-affected entities ({:?}).",
                    entity
                );
                return Err(PhysicsError::MissingCollider(entity));
            };

            let position = transform.planar() + params.position_offset;
            let handle = physics.create_body(entity, &params, position, transform.angle());
            physics.attach_fixture(handle, &fixture);
            if let Some(mut rb) = world.get_mut::<RigidBody>(entity) {
                rb.handle = Some(handle);
            }
            created += 1;
        }

        info!(
            "Physics initialized: {} new bodies, {} total",
            created,
            physics.body_count()
        );
        Ok(created)
    })
}

/// Advance the physics world by one fixed step.
pub fn physics_step(mut physics: ResMut<PhysicsWorld>, time: Res<WorldTime>) {
    physics.run(time.delta);
}

/// Trigger a [`TriggerEntryEvent`] for every sensor entered during the step.
pub fn emit_trigger_events(mut physics: ResMut<PhysicsWorld>, mut commands: Commands) {
    for (sensor, other) in physics.drain_trigger_entries() {
        commands.trigger(TriggerEntryEvent { sensor, other });
    }
}

/// Copy simulated body poses into the entities' transforms.
///
/// Static bodies never move and are left untouched, so their transforms keep
/// whatever depth and off-plane rotation the scene gave them.
pub fn sync_transforms(
    physics: Res<PhysicsWorld>,
    mut query: Query<(&RigidBody, &mut Transform)>,
) {
    for (rigidbody, mut transform) in query.iter_mut() {
        if rigidbody.body_type() == BodyType::Static {
            continue;
        }
        let Some(handle) = rigidbody.handle() else {
            continue;
        };
        if let Some((position, angle)) = physics.body_pose(handle) {
            transform.set_planar(position - rigidbody.initial.position_offset, angle);
        }
    }
}
