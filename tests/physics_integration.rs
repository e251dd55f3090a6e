//! Physics adapter integration tests: body creation from components, fixed
//! stepping, transform sync, joints and sensor events.

use bevy_ecs::observer::{Observer, On};
use bevy_ecs::prelude::*;
use glam::Vec2;

use terraincar::components::boxcollider::BoxCollider;
use terraincar::components::circlecollider::CircleCollider;
use terraincar::components::rigidbody::RigidBody;
use terraincar::components::transform::Transform;
use terraincar::error::PhysicsError;
use terraincar::events::trigger::TriggerEntryEvent;
use terraincar::resources::physicsworld::{MotorDrive, PhysicsWorld, WHEEL_TRAVEL};
use terraincar::resources::worldtime::WorldTime;
use terraincar::systems::physics::{
    emit_trigger_events, initialize_physics, physics_step, sync_transforms,
};
use terraincar::systems::time::update_world_time;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world() -> World {
    let mut world = World::new();
    world.insert_resource(PhysicsWorld::default());
    world.insert_resource(WorldTime::default());
    world
}

fn physics_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems((physics_step, emit_trigger_events, sync_transforms).chain());
    schedule
}

fn tick(world: &mut World, schedule: &mut Schedule, frames: usize) {
    for _ in 0..frames {
        update_world_time(world, 1.0 / 60.0);
        schedule.run(world);
    }
}

fn spawn_body(world: &mut World, at: Vec2, body: RigidBody, collider: impl Bundle) -> Entity {
    world
        .spawn((Transform::from_xy(at.x, at.y), body, collider))
        .id()
}

fn near(a: Vec2, b: Vec2, tolerance: f32) -> bool {
    a.distance(b) < tolerance
}

#[derive(Resource, Default)]
struct Entries(Vec<(Entity, Entity)>);

fn record_entries(trigger: On<TriggerEntryEvent>, mut entries: ResMut<Entries>) {
    let e = trigger.event();
    entries.0.push((e.sensor, e.other));
}

#[test]
fn missing_collider_fails_initialization() {
    let mut world = make_world();
    let e = world
        .spawn((Transform::from_xy(0.0, 0.0), RigidBody::dynamic()))
        .id();

    assert_eq!(
        initialize_physics(&mut world),
        Err(PhysicsError::MissingCollider(e))
    );
    assert_eq!(world.resource::<PhysicsWorld>().body_count(), 0);
    assert!(!world.get::<RigidBody>(e).unwrap().is_attached());

    // Retrying does not slip the entity through without a collider.
    assert_eq!(
        initialize_physics(&mut world),
        Err(PhysicsError::MissingCollider(e))
    );
    let physics = world.resource::<PhysicsWorld>();
    assert_eq!(physics.body_count(), 0);
    assert_eq!(physics.fixture_count(e), 0);
}

#[test]
fn each_collider_kind_gives_exactly_one_fixture() {
    let mut world = make_world();
    let boxed = world
        .spawn((
            Transform::from_xy(0.0, 0.0),
            RigidBody::dynamic(),
            BoxCollider::new(1.0, 0.5),
        ))
        .id();
    let round = world
        .spawn((
            Transform::from_xy(5.0, 0.0),
            RigidBody::dynamic(),
            CircleCollider::new(1.0),
        ))
        .id();
    let both = world
        .spawn((
            Transform::from_xy(10.0, 0.0),
            RigidBody::dynamic(),
            BoxCollider::new(1.0, 0.5),
            CircleCollider::new(1.0),
        ))
        .id();

    assert_eq!(initialize_physics(&mut world), Ok(3));
    let physics = world.resource::<PhysicsWorld>();
    assert_eq!(physics.fixture_count(boxed), 1);
    assert_eq!(physics.fixture_count(round), 1);
    assert_eq!(physics.fixture_count(both), 1);
    assert_eq!(physics.collider_count(), 3);

    // The box wins: 2 × 1 box of density 1, not a unit circle.
    let h = physics.body_handle(both).unwrap();
    assert!((physics.body_mass(h) - 2.0).abs() < 1e-3);
}

#[test]
fn initialization_writes_handles_and_skips_attached_bodies() {
    let mut world = make_world();
    let e = world
        .spawn((
            Transform::from_xy(0.0, 0.0),
            RigidBody::fixed(),
            BoxCollider::new(1.0, 1.0),
        ))
        .id();

    assert_eq!(initialize_physics(&mut world), Ok(1));
    let handle = world.get::<RigidBody>(e).unwrap().handle();
    assert!(handle.is_some());
    assert_eq!(world.resource::<PhysicsWorld>().body_handle(e), handle);

    assert_eq!(initialize_physics(&mut world), Ok(0));
    assert_eq!(world.resource::<PhysicsWorld>().body_count(), 1);
}

#[test]
fn body_pose_follows_transform_and_offset() {
    let mut world = make_world();
    let e = world
        .spawn((
            Transform::from_xy(3.0, 10.0).with_angle(0.5),
            RigidBody::kinematic().with_offset(Vec2::new(0.0, 1.0)),
            BoxCollider::new(1.0, 1.0),
        ))
        .id();
    initialize_physics(&mut world).unwrap();

    let (pos, angle) = world.resource::<PhysicsWorld>().entity_pose(e).unwrap();
    assert!(approx_eq(pos.x, 3.0));
    assert!(approx_eq(pos.y, 11.0));
    assert!(approx_eq(angle, 0.5));

    // A kinematic body without velocity stays put; sync removes the offset.
    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 5);
    let t = world.get::<Transform>(e).unwrap();
    assert!(approx_eq(t.position.x, 3.0));
    assert!(approx_eq(t.position.y, 10.0));
    assert!(approx_eq(t.angle(), 0.5));
}

#[test]
fn dynamic_body_falls_and_static_body_stays() {
    let mut world = make_world();
    let ground = world
        .spawn((
            Transform::from_xy(0.0, 0.0).with_angle(0.1),
            RigidBody::fixed(),
            BoxCollider::new(20.0, 1.0),
        ))
        .id();
    let ball = world
        .spawn((
            Transform::from_xy(0.0, 20.0),
            RigidBody::dynamic(),
            CircleCollider::new(1.0),
        ))
        .id();
    initialize_physics(&mut world).unwrap();
    let ground_before = *world.get::<Transform>(ground).unwrap();

    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 30);

    assert_eq!(*world.get::<Transform>(ground).unwrap(), ground_before);
    let y = world.get::<Transform>(ball).unwrap().position.y;
    assert!(y < 20.0, "ball should have fallen, y = {}", y);
    assert!(y > 1.0, "ball should not have passed the ground yet, y = {}", y);
}

#[test]
fn step_ignores_frame_delta() {
    let spawn = |world: &mut World| {
        world
            .spawn((
                Transform::from_xy(0.0, 10.0),
                RigidBody::dynamic(),
                BoxCollider::new(0.5, 0.5),
            ))
            .id()
    };
    let mut slow = make_world();
    let mut fast = make_world();
    let a = spawn(&mut slow);
    let b = spawn(&mut fast);
    initialize_physics(&mut slow).unwrap();
    initialize_physics(&mut fast).unwrap();

    for _ in 0..10 {
        slow.resource_mut::<PhysicsWorld>().run(0.001);
        fast.resource_mut::<PhysicsWorld>().run(1.0);
    }

    let (pa, _) = slow.resource::<PhysicsWorld>().entity_pose(a).unwrap();
    let (pb, _) = fast.resource::<PhysicsWorld>().entity_pose(b).unwrap();
    assert!(approx_eq(pa.y, pb.y));
    assert_eq!(slow.resource::<PhysicsWorld>().steps(), 10);
}

#[test]
fn wheel_motor_speed_reads_back_last_value() {
    let mut world = make_world();
    let chassis = world
        .spawn((
            Transform::from_xy(0.0, 5.0),
            RigidBody::dynamic(),
            BoxCollider::new(4.0, 0.5),
        ))
        .id();
    let wheel = world
        .spawn((
            Transform::from_xy(-5.0, 4.0),
            RigidBody::dynamic(),
            CircleCollider::new(1.0),
        ))
        .id();
    initialize_physics(&mut world).unwrap();

    let mut physics = world.resource_mut::<PhysicsWorld>();
    let handle = physics
        .motorize_as_wheel(wheel, chassis, 1500.0, Vec2::new(0.0, -1.0))
        .unwrap();
    assert_eq!(handle.motor_speed(&physics), Ok(0.0));
    handle.set_motor_speed(&mut physics, 30.0).unwrap();
    handle.set_motor_speed(&mut physics, -12.5).unwrap();
    assert_eq!(handle.motor_speed(&physics), Ok(-12.5));
    physics.run(0.0);
    assert_eq!(handle.motor_speed(&physics), Ok(-12.5));

    for _ in 0..2 {
        let speed = handle.motor_speed(&physics).unwrap();
        handle.set_motor_speed(&mut physics, -speed).unwrap();
    }
    assert_eq!(handle.motor_speed(&physics), Ok(-12.5));
}

#[test]
fn welded_body_is_carried_along() {
    let mut world = make_world();
    let base = world
        .spawn((
            Transform::from_xy(0.0, 10.0),
            RigidBody::dynamic(),
            BoxCollider::new(1.0, 1.0),
        ))
        .id();
    let top = world
        .spawn((
            Transform::from_xy(0.0, 12.0),
            RigidBody::dynamic(),
            BoxCollider::new(1.0, 1.0),
        ))
        .id();
    initialize_physics(&mut world).unwrap();
    world.resource_mut::<PhysicsWorld>().weld(top, base).unwrap();

    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 30);

    let base_y = world.get::<Transform>(base).unwrap().position.y;
    let top_y = world.get::<Transform>(top).unwrap().position.y;
    assert!(base_y < 10.0);
    assert!((top_y - base_y - 2.0).abs() < 0.05);
}

#[test]
fn entering_a_sensor_triggers_an_event() {
    let mut world = make_world();
    world.init_resource::<Entries>();
    world.spawn(Observer::new(record_entries));
    let sensor = world
        .spawn((
            Transform::from_xy(0.0, 0.0),
            RigidBody::fixed(),
            BoxCollider::new(2.0, 2.0).as_sensor(),
        ))
        .id();
    let ball = world
        .spawn((
            Transform::from_xy(0.0, 4.0),
            RigidBody::dynamic(),
            CircleCollider::new(0.5),
        ))
        .id();
    world.flush();
    initialize_physics(&mut world).unwrap();

    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 90);

    let entries = &world.resource::<Entries>().0;
    assert_eq!(entries.first(), Some(&(sensor, ball)));
    assert_eq!(entries.len(), 1);
    // Sensors do not stop the ball.
    assert!(world.get::<Transform>(ball).unwrap().position.y < -2.0);
}

#[test]
fn motorized_body_turns_about_its_anchor_on_the_base() {
    let mut world = make_world();
    let base = world
        .spawn((
            Transform::from_xy(0.0, 10.0).with_angle(0.5),
            RigidBody::fixed(),
            BoxCollider::new(1.0, 0.5),
        ))
        .id();
    // (3, 0) in the base's rotated frame.
    let anchor = Vec2::new(0.0, 10.0) + Vec2::new(0.5f32.cos(), 0.5f32.sin()) * 3.0;
    let rotor = spawn_body(&mut world, anchor, RigidBody::dynamic(), CircleCollider::new(0.5));
    initialize_physics(&mut world).unwrap();

    let motor = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        let motor = physics
            .motorize(rotor, base, 100.0, Vec2::new(3.0, 0.0))
            .unwrap();
        motor.set_motor_speed(&mut physics, 3.0).unwrap();
        motor
    };

    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 30);

    let physics = world.resource::<PhysicsWorld>();
    let (on_base, on_rotor) = physics.joint_anchors(motor.joint()).unwrap();
    assert!(near(on_base, anchor, 1e-3), "anchor moved: {:?}", on_base);
    assert!(near(on_rotor, on_base, 0.05));

    let t = world.get::<Transform>(rotor).unwrap();
    assert!(near(t.planar(), anchor, 0.05), "rotor left its pin: {:?}", t.planar());
    assert!(t.angle().abs() > 0.3, "rotor did not turn: {}", t.angle());
}

#[test]
fn weld_at_holds_the_given_world_anchor() {
    let mut world = make_world();
    let base = spawn_body(
        &mut world,
        Vec2::new(0.0, 10.0),
        RigidBody::fixed(),
        BoxCollider::new(0.5, 0.5),
    );
    let side = spawn_body(
        &mut world,
        Vec2::new(2.0, 10.0),
        RigidBody::dynamic(),
        BoxCollider::new(0.5, 0.5),
    );
    let top = spawn_body(
        &mut world,
        Vec2::new(0.0, 14.0),
        RigidBody::dynamic(),
        BoxCollider::new(0.5, 0.5),
    );
    initialize_physics(&mut world).unwrap();

    let (explicit, at_base) = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        (
            physics.weld_at(side, base, Vec2::new(1.0, 10.0)).unwrap(),
            physics.weld(top, base).unwrap(),
        )
    };
    {
        let physics = world.resource::<PhysicsWorld>();
        let (a, b) = physics.joint_anchors(explicit).unwrap();
        assert!(near(a, Vec2::new(1.0, 10.0), 1e-3));
        assert!(near(b, Vec2::new(1.0, 10.0), 1e-3));
        let (a, b) = physics.joint_anchors(at_base).unwrap();
        assert!(near(a, Vec2::new(0.0, 10.0), 1e-3));
        assert!(near(b, Vec2::new(0.0, 10.0), 1e-3));
    }

    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 60);

    // Both welded bodies hang on the fixed base against gravity.
    let side_t = world.get::<Transform>(side).unwrap();
    assert!(near(side_t.planar(), Vec2::new(2.0, 10.0), 0.05), "{:?}", side_t.planar());
    let top_t = world.get::<Transform>(top).unwrap();
    assert!(near(top_t.planar(), Vec2::new(0.0, 14.0), 0.05), "{:?}", top_t.planar());
    let (a, b) = world.resource::<PhysicsWorld>().joint_anchors(explicit).unwrap();
    assert!(near(a, b, 0.05));
}

#[test]
fn wheel_moves_only_along_its_axis_within_travel() {
    let mut world = make_world();
    let chassis = spawn_body(
        &mut world,
        Vec2::new(0.0, 10.0),
        RigidBody::fixed(),
        BoxCollider::new(4.0, 0.5),
    );
    let mount = Vec2::new(-5.0, 8.0);
    let wheel = spawn_body(&mut world, mount, RigidBody::dynamic(), CircleCollider::new(1.0));
    initialize_physics(&mut world).unwrap();

    let handle = world
        .resource_mut::<PhysicsWorld>()
        .motorize_as_wheel(wheel, chassis, 1500.0, Vec2::new(0.0, -1.0))
        .unwrap();
    {
        let physics = world.resource::<PhysicsWorld>();
        let (on_chassis, _) = physics.joint_anchors(handle.joint()).unwrap();
        assert!(near(on_chassis, mount, 1e-3));
    }

    let mut schedule = physics_schedule();
    tick(&mut world, &mut schedule, 120);

    let offset = world.get::<Transform>(wheel).unwrap().planar() - mount;
    // Axis points down: travel is -offset.y, sideways drift is offset.x.
    let travel = -offset.y;
    assert!(travel.abs() <= WHEEL_TRAVEL + 0.02, "travel {}", travel);
    assert!(travel > 0.0, "wheel should sag under gravity, travel {}", travel);
    assert!(offset.x.abs() < 0.02, "sideways drift {}", offset.x);
}
