//! The car-on-terrain scene.
//!
//! - [`setup_scene`] spawns the car (chassis + two wheels), the terrain, the
//!   finish line, a light and a camera.
//! - [`mount_wheels`] runs after physics initialization and turns both wheels
//!   into motorized suspension joints, publishing [`CarControls`].
//! - [`car_input_observer`] drives the wheel motors from [`InputEvent`]s.
//! - [`finish_line_observer`] records the run as finished when the car enters
//!   the finish line sensor.
//!
//! World units are metres, y up.

use bevy_ecs::observer::{Observer, On};
use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use log::{debug, info, warn};

use crate::components::boxcollider::BoxCollider;
use crate::components::camera::Camera;
use crate::components::circlecollider::CircleCollider;
use crate::components::light::Light;
use crate::components::node::Node;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform;
use crate::error::PhysicsError;
use crate::events::input::{InputAction, InputEvent};
use crate::events::switchdebug::switch_debug_observer;
use crate::events::trigger::TriggerEntryEvent;
use crate::kernel::Kernel;
use crate::resources::carcontrols::CarControls;
use crate::resources::gameconfig::GameConfig;
use crate::resources::kernelstate::KernelState;
use crate::resources::physicsworld::{MotorDrive, PhysicsWorld};
use crate::resources::racestate::RaceState;

pub const CAR_START: Vec2 = Vec2::new(-90.0, 60.0);
/// Wheel mount points relative to the chassis.
pub const BACK_WHEEL_OFFSET: Vec2 = Vec2::new(-5.0, -1.0);
pub const FRONT_WHEEL_OFFSET: Vec2 = Vec2::new(5.0, -1.0);
/// Suspension direction of both wheels.
pub const WHEEL_AXIS: Vec2 = Vec2::new(0.0, -1.0);
pub const LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, -30.0);
pub const LIGHT_COLOR: Vec3 = Vec3::new(0.4, 0.7, 0.929);

/// Entities making up the player car.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CarRig {
    pub chassis: Entity,
    pub back_wheel: Entity,
    pub front_wheel: Entity,
}

/// Marks the sensor that ends the run.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FinishLine;

fn spawn_terrain(world: &mut World, name: &str, position: Vec2, angle: f32, half: Vec2, friction: f32) {
    world.spawn((
        Node::new(name).with_color([110, 85, 60, 255]),
        Transform::from_xy(position.x, position.y).with_angle(angle),
        RigidBody::fixed(),
        BoxCollider::new(half.x, half.y).with_friction(friction),
    ));
}

/// Spawn the car, terrain, finish line, light and camera. Inserts [`CarRig`].
pub fn setup_scene(world: &mut World) -> CarRig {
    let chassis = world
        .spawn((
            Node::new("car_base").with_color([200, 40, 40, 255]),
            Transform::from_xy(CAR_START.x, CAR_START.y),
            RigidBody::dynamic(),
            BoxCollider::new(4.0, 0.5).with_friction(0.9),
        ))
        .id();

    let mut wheel = |name: &str, offset: Vec2| {
        let p = CAR_START + offset;
        world
            .spawn((
                Node::new(name).with_color([40, 40, 40, 255]),
                Transform::from_xy(p.x, p.y),
                RigidBody::dynamic(),
                CircleCollider::new(1.0).with_friction(0.9),
            ))
            .id()
    };
    let back_wheel = wheel("back_wheel", BACK_WHEEL_OFFSET);
    let front_wheel = wheel("front_wheel", FRONT_WHEEL_OFFSET);

    spawn_terrain(world, "ground", Vec2::new(-100.0, 50.0), 0.0, Vec2::new(20.0, 1.0), 0.5);
    spawn_terrain(world, "down_ramp", Vec2::new(-52.0, 21.0), -0.8, Vec2::new(40.0, 1.0), 0.5);
    spawn_terrain(world, "down_ground", Vec2::new(-20.0, -8.0), 0.0, Vec2::new(5.0, 1.0), 0.5);
    spawn_terrain(world, "up_ramp", Vec2::new(-11.0, -6.3), 0.3, Vec2::new(5.0, 1.0), 0.5);
    spawn_terrain(world, "right_ground", Vec2::new(60.0, -10.0), 0.0, Vec2::new(30.0, 1.0), 0.1);
    spawn_terrain(world, "finish_wall", Vec2::new(90.0, -10.0), 0.0, Vec2::new(0.5, 10.0), 0.5);

    world.spawn((
        Node::new("finish_line").with_color([250, 250, 250, 255]),
        Transform::from_xy(82.0, -4.0),
        RigidBody::fixed(),
        BoxCollider::new(0.5, 5.0).as_sensor(),
        FinishLine,
    ));

    world.spawn((
        Node::new("light"),
        Transform::new(LIGHT_POSITION, Vec3::ZERO, Vec3::ONE),
        Light { color: LIGHT_COLOR },
    ));
    world.spawn((
        Node::new("camera"),
        Transform::new(Vec3::new(0.0, 0.0, 100.0), Vec3::ZERO, Vec3::ONE),
        Camera::following(chassis),
    ));

    let rig = CarRig {
        chassis,
        back_wheel,
        front_wheel,
    };
    world.insert_resource(rig);
    info!("Scene ready: car at ({}, {})", CAR_START.x, CAR_START.y);
    rig
}

/// Init task: mount both wheels on the chassis and insert [`CarControls`].
///
/// Needs the bodies created by physics initialization.
pub fn mount_wheels(world: &mut World) -> Result<(), PhysicsError> {
    let Some(rig) = world.get_resource::<CarRig>().copied() else {
        warn!("No car in the scene, skipping wheel setup");
        return Ok(());
    };
    let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();

    let (back_wheel, front_wheel) = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        (
            physics.motorize_as_wheel(rig.back_wheel, rig.chassis, config.car_max_torque, WHEEL_AXIS)?,
            physics.motorize_as_wheel(rig.front_wheel, rig.chassis, config.car_max_torque, WHEEL_AXIS)?,
        )
    };

    world.insert_resource(CarControls {
        chassis: rig.chassis,
        back_wheel,
        front_wheel,
        speed: config.car_speed,
    });
    info!(
        "Wheels mounted (max torque {}, speed {})",
        config.car_max_torque, config.car_speed
    );
    Ok(())
}

/// Apply one input action to the car's wheel motors.
pub fn drive(
    action: InputAction,
    controls: &CarControls,
    physics: &mut PhysicsWorld,
) -> Result<(), PhysicsError> {
    match action {
        InputAction::Quit => {}
        InputAction::Forward => debug!("forward: no action"),
        InputAction::Backwards => {
            for wheel in controls.wheels() {
                let speed = wheel.motor_speed(physics)?;
                wheel.set_motor_speed(physics, -speed)?;
            }
            if controls.back_wheel.motor_speed(physics)? < 1.0 {
                for wheel in controls.wheels() {
                    wheel.set_motor_speed(physics, 0.0)?;
                }
            }
        }
        InputAction::Left => {
            for wheel in controls.wheels() {
                wheel.set_motor_speed(physics, controls.speed)?;
            }
        }
        InputAction::Right => {
            for wheel in controls.wheels() {
                wheel.set_motor_speed(physics, -controls.speed)?;
            }
        }
    }
    Ok(())
}

/// Observer: quit stops the kernel, the drive actions go to the wheels.
pub fn car_input_observer(
    trigger: On<InputEvent>,
    controls: Option<Res<CarControls>>,
    mut physics: ResMut<PhysicsWorld>,
    mut kernel: ResMut<KernelState>,
) {
    let action = trigger.event().action;
    if action == InputAction::Quit {
        kernel.stop();
        return;
    }
    let Some(controls) = controls else {
        debug!("{:?} ignored, car not ready", action);
        return;
    };
    if let Err(e) = drive(action, &controls, &mut physics) {
        warn!("{:?} failed: {}", action, e);
    }
}

/// Observer: log every sensor entry, finish the run on the finish line.
pub fn finish_line_observer(
    trigger: On<TriggerEntryEvent>,
    finish_lines: Query<(), With<FinishLine>>,
    rig: Option<Res<CarRig>>,
    physics: Res<PhysicsWorld>,
    mut race: ResMut<RaceState>,
) {
    let event = trigger.event();
    info!("TRIGGER ENTRY {:?} -> {:?}", event.other, event.sensor);
    if race.finished || finish_lines.get(event.sensor).is_err() {
        return;
    }
    let is_car = rig.is_none_or(|r| [r.chassis, r.back_wheel, r.front_wheel].contains(&event.other));
    if is_car {
        race.finished = true;
        race.finish_time = Some(physics.simulated_time());
        info!("Finish line reached after {:.2}s", physics.simulated_time());
    }
}

/// Build the scene into `kernel` and register the game's observers and init
/// tasks. Call before [`Kernel::initialize`].
pub fn install(kernel: &mut Kernel, config: &GameConfig) -> CarRig {
    let world = kernel.world_mut();
    world.insert_resource(config.clone());
    let rig = setup_scene(world);
    world.spawn(Observer::new(car_input_observer));
    world.spawn(Observer::new(finish_line_observer));
    world.spawn(Observer::new(switch_debug_observer));
    world.flush();
    kernel.add_init_task(mount_wheels);
    rig
}
