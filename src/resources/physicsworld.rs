//! 2D physics world resource backed by Rapier.
//!
//! [`PhysicsWorld`] owns every Rapier set (bodies, colliders, joints) plus the
//! bookkeeping that maps bodies and colliders back to ECS entities. Bodies are
//! created by [`initialize_physics`](crate::systems::physics::initialize_physics)
//! from [`RigidBody`](crate::components::rigidbody::RigidBody) components and
//! live until the world is dropped.
//!
//! Game code builds mechanical assemblies through the joint helpers:
//! - [`PhysicsWorld::weld`] / [`PhysicsWorld::weld_at`] – rigid joint
//! - [`PhysicsWorld::motorize`] – revolute joint with an angular motor
//! - [`PhysicsWorld::motorize_as_wheel`] – sprung suspension axis plus an
//!   angular motor
//!
//! The motorized helpers return [`Motor`] and [`Wheel`] handles whose target
//! speed can be changed at runtime through [`MotorDrive`].
//!
//! Stepping is fixed: [`PhysicsWorld::run`] always advances by the time step
//! the world was built with, whatever the frame delta.

use std::f32::consts::PI;

use bevy_ecs::prelude::{Entity, Resource};
use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};
use rapier2d::pipeline::EventHandler;
use rapier2d::prelude::*;
use rustc_hash::FxHashMap;

use crate::components::rigidbody::{BodyParameters, BodyType};
use crate::error::PhysicsError;

/// Suspension frequency of wheel joints, in hertz.
pub const WHEEL_HERTZ: f32 = 4.0;
/// Suspension damping ratio of wheel joints.
pub const WHEEL_DAMPING_RATIO: f32 = 0.7;
/// Wheel travel along the suspension axis, both directions.
pub const WHEEL_TRAVEL: f32 = 0.25;
/// Velocity gain of joint motors. High enough that the motor saturates at its
/// maximum torque before reaching the target speed.
const MOTOR_GAIN: f32 = 1.0e4;

// ── Descriptors ─────────────────────────────────────────────────────────

/// Collision shape of a fixture. Box sizes are half-extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FixtureShape {
    Box { half_width: f32, half_height: f32 },
    Circle { radius: f32 },
}

impl FixtureShape {
    pub fn area(&self) -> f32 {
        match *self {
            FixtureShape::Box {
                half_width,
                half_height,
            } => 4.0 * half_width * half_height,
            FixtureShape::Circle { radius } => PI * radius * radius,
        }
    }
}

/// Shape plus material of a collider attached to a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureDef {
    pub shape: FixtureShape,
    pub density: f32,
    pub friction: f32,
    pub sensor: bool,
}

impl FixtureDef {
    pub fn mass(&self) -> f32 {
        self.shape.area() * self.density
    }
}

/// Construction parameters of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    pub gravity: glam::Vec2,
    /// Fixed simulated time per step, in seconds. Should not vary.
    pub time_step: f32,
    pub velocity_iterations: usize,
    pub position_iterations: usize,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: glam::Vec2::new(0.0, -9.8),
            time_step: 1.0 / 60.0,
            velocity_iterations: 8,
            position_iterations: 2,
        }
    }
}

// ── Motor handles ───────────────────────────────────────────────────────

/// Runtime control over the angular motor of a joint.
///
/// Speeds are in radians per second.
pub trait MotorDrive {
    fn joint(&self) -> ImpulseJointHandle;

    fn set_motor_speed(&self, physics: &mut PhysicsWorld, speed: f32) -> Result<(), PhysicsError> {
        physics.set_joint_motor_speed(self.joint(), speed)
    }

    fn motor_speed(&self, physics: &PhysicsWorld) -> Result<f32, PhysicsError> {
        physics.joint_motor_speed(self.joint())
    }
}

/// Revolute motor created by [`PhysicsWorld::motorize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motor {
    joint: ImpulseJointHandle,
}

impl MotorDrive for Motor {
    fn joint(&self) -> ImpulseJointHandle {
        self.joint
    }
}

/// Suspension + motor created by [`PhysicsWorld::motorize_as_wheel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wheel {
    joint: ImpulseJointHandle,
}

impl MotorDrive for Wheel {
    fn joint(&self) -> ImpulseJointHandle {
        self.joint
    }
}

// ── Conversion helpers ──────────────────────────────────────────────────

fn body_type_to_rapier(bt: BodyType) -> RigidBodyType {
    match bt {
        BodyType::Static => RigidBodyType::Fixed,
        BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
        BodyType::Dynamic => RigidBodyType::Dynamic,
    }
}

fn to_rapier(v: glam::Vec2) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Express world point `point` in the frame of a body at `origin` rotated by
/// `angle`.
fn to_local(point: glam::Vec2, origin: glam::Vec2, angle: f32) -> glam::Vec2 {
    let d = point - origin;
    let (s, c) = angle.sin_cos();
    glam::Vec2::new(c * d.x + s * d.y, -s * d.x + c * d.y)
}

/// Inverse of [`to_local`].
fn to_world(local: glam::Vec2, origin: glam::Vec2, angle: f32) -> glam::Vec2 {
    let (s, c) = angle.sin_cos();
    origin + glam::Vec2::new(c * local.x - s * local.y, s * local.x + c * local.y)
}

// ── Event forwarding ────────────────────────────────────────────────────

/// Pushes Rapier's pipeline events into crossbeam channels, drained after
/// each step by [`PhysicsWorld::drain_trigger_entries`].
struct EventForwarder {
    collisions: Sender<CollisionEvent>,
    contact_forces: Sender<ContactForceEvent>,
}

impl EventHandler for EventForwarder {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        // The receiver lives as long as the world; a failed send means it is
        // being dropped.
        let _ = self.collisions.send(event);
    }

    fn handle_contact_force_event(
        &self,
        dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        total_force_magnitude: f32,
    ) {
        let event = ContactForceEvent::from_contact_pair(dt, contact_pair, total_force_magnitude);
        let _ = self.contact_forces.send(event);
    }
}

// ── Resource ────────────────────────────────────────────────────────────

/// The physics world. Insert as a resource; bodies are created by
/// `initialize_physics` and the world is advanced by `physics_step`.
#[derive(Resource)]
pub struct PhysicsWorld {
    settings: PhysicsSettings,
    gravity: Vec2,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    events: EventForwarder,
    collision_recv: Receiver<CollisionEvent>,
    contact_force_recv: Receiver<ContactForceEvent>,
    body_to_entity: FxHashMap<RigidBodyHandle, Entity>,
    entity_to_body: FxHashMap<Entity, RigidBodyHandle>,
    collider_to_entity: FxHashMap<ColliderHandle, Entity>,
    fixture_mass: FxHashMap<RigidBodyHandle, f32>,
    steps: u64,
}

impl std::fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("settings", &self.settings)
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("joints", &self.impulse_joints.len())
            .field("steps", &self.steps)
            .finish()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsSettings::default())
    }
}

impl PhysicsWorld {
    pub fn new(settings: PhysicsSettings) -> Self {
        let mut params = IntegrationParameters::default();
        params.dt = settings.time_step;
        params.num_solver_iterations = settings.velocity_iterations.max(1);
        params.num_internal_stabilization_iterations = settings.position_iterations;

        let (collision_send, collision_recv) = crossbeam_channel::unbounded();
        let (contact_force_send, contact_force_recv) = crossbeam_channel::unbounded();

        Self {
            settings,
            gravity: to_rapier(settings.gravity),
            pipeline: PhysicsPipeline::new(),
            params,
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            events: EventForwarder {
                collisions: collision_send,
                contact_forces: contact_force_send,
            },
            collision_recv,
            contact_force_recv,
            body_to_entity: FxHashMap::default(),
            entity_to_body: FxHashMap::default(),
            collider_to_entity: FxHashMap::default(),
            fixture_mass: FxHashMap::default(),
            steps: 0,
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Take a time step: collision detection, integration and constraint
    /// solving.
    ///
    /// The world always advances by the configured fixed time step; `_delta`
    /// (the frame time) is accepted for the task interface only.
    pub fn run(&mut self, _delta: f32) {
        self.pipeline.step(
            self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            &(),
            &self.events,
        );
        self.steps += 1;
        trace!("physics step {}", self.steps);
    }

    /// Number of steps taken since creation.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds since creation.
    pub fn simulated_time(&self) -> f32 {
        self.steps as f32 * self.settings.time_step
    }

    // ── Bodies and fixtures ─────────────────────────────────────────────

    /// Create a body for `entity` at `position`/`angle` using `params`.
    pub fn create_body(
        &mut self,
        entity: Entity,
        params: &BodyParameters,
        position: glam::Vec2,
        angle: f32,
    ) -> RigidBodyHandle {
        let mut builder = RigidBodyBuilder::new(body_type_to_rapier(params.body_type))
            .translation(to_rapier(position))
            .rotation(angle)
            .linvel(to_rapier(params.linear_velocity))
            .angvel(params.angular_velocity)
            .gravity_scale(params.gravity_scale)
            .linear_damping(params.linear_damping)
            .angular_damping(params.angular_damping)
            .ccd_enabled(params.bullet)
            .can_sleep(params.allow_sleep)
            .sleeping(!params.awake)
            .enabled(params.enabled);
        if params.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let handle = self.bodies.insert(builder.build());
        self.body_to_entity.insert(handle, entity);
        self.entity_to_body.insert(entity, handle);
        debug!(
            "created {:?} body for {:?} at ({:.2}, {:.2})",
            params.body_type, entity, position.x, position.y
        );
        handle
    }

    /// Attach a collider described by `fixture` to `body`.
    pub fn attach_fixture(
        &mut self,
        body: RigidBodyHandle,
        fixture: &FixtureDef,
    ) -> ColliderHandle {
        let builder = match fixture.shape {
            FixtureShape::Box {
                half_width,
                half_height,
            } => ColliderBuilder::cuboid(half_width, half_height),
            FixtureShape::Circle { radius } => ColliderBuilder::ball(radius),
        };
        let mut builder = builder
            .density(fixture.density)
            .friction(fixture.friction)
            .sensor(fixture.sensor);
        if fixture.sensor {
            builder = builder.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        let handle = self
            .colliders
            .insert_with_parent(builder.build(), body, &mut self.bodies);
        if let Some(entity) = self.body_to_entity.get(&body) {
            self.collider_to_entity.insert(handle, *entity);
        }
        *self.fixture_mass.entry(body).or_insert(0.0) += fixture.mass();
        handle
    }

    pub fn body_handle(&self, entity: Entity) -> Option<RigidBodyHandle> {
        self.entity_to_body.get(&entity).copied()
    }

    pub fn entity_of(&self, body: RigidBodyHandle) -> Option<Entity> {
        self.body_to_entity.get(&body).copied()
    }

    fn body_of(&self, entity: Entity) -> Result<RigidBodyHandle, PhysicsError> {
        self.body_handle(entity).ok_or(PhysicsError::NoBody(entity))
    }

    /// World position and angle of a body.
    pub fn body_pose(&self, body: RigidBodyHandle) -> Option<(glam::Vec2, f32)> {
        self.bodies.get(body).map(|rb| {
            let t = rb.translation();
            (glam::Vec2::new(t.x, t.y), rb.rotation().angle())
        })
    }

    /// World position and angle of an entity's body.
    pub fn entity_pose(&self, entity: Entity) -> Option<(glam::Vec2, f32)> {
        self.body_handle(entity).and_then(|h| self.body_pose(h))
    }

    /// Mass of a body. Static bodies have no mass.
    pub fn body_mass(&self, body: RigidBodyHandle) -> f32 {
        let Some(rb) = self.bodies.get(body) else {
            return 0.0;
        };
        if rb.is_fixed() {
            return 0.0;
        }
        let mass = rb.mass();
        if mass > 0.0 {
            mass
        } else {
            // Mass properties are refreshed lazily; fall back to the fixtures.
            self.fixture_mass.get(&body).copied().unwrap_or(0.0)
        }
    }

    /// Number of colliders attached to an entity's body.
    pub fn fixture_count(&self, entity: Entity) -> usize {
        self.body_handle(entity)
            .and_then(|h| self.bodies.get(h))
            .map(|rb| rb.colliders().len())
            .unwrap_or(0)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }

    // ── Joints ──────────────────────────────────────────────────────────

    /// Weld entity `a` to entity `b`, anchored at `b`'s position.
    pub fn weld(&mut self, a: Entity, b: Entity) -> Result<ImpulseJointHandle, PhysicsError> {
        let hb = self.body_of(b)?;
        let (anchor, _) = self.body_pose(hb).ok_or(PhysicsError::NoBody(b))?;
        self.weld_at(a, b, anchor)
    }

    /// Weld entity `a` to entity `b` around the world point `anchor`.
    ///
    /// The bodies keep the relative position and angle they have right now.
    pub fn weld_at(
        &mut self,
        a: Entity,
        b: Entity,
        anchor: glam::Vec2,
    ) -> Result<ImpulseJointHandle, PhysicsError> {
        let ha = self.body_of(a)?;
        let hb = self.body_of(b)?;
        let (pa, aa) = self.body_pose(ha).ok_or(PhysicsError::NoBody(a))?;
        let (pb, ab) = self.body_pose(hb).ok_or(PhysicsError::NoBody(b))?;

        let joint = FixedJointBuilder::new()
            .local_frame1(Pose::new(to_rapier(to_local(anchor, pa, aa)), -aa))
            .local_frame2(Pose::new(to_rapier(to_local(anchor, pb, ab)), -ab))
            .build();
        let handle = self.impulse_joints.insert(ha, hb, joint, true);
        debug!("welded {:?} to {:?}", a, b);
        Ok(handle)
    }

    /// Pin the origin of `a` to `relative_anchor` (in `b`'s local frame) with
    /// a revolute joint driven by a motor of at most `max_torque`.
    ///
    /// The motor starts with a target speed of zero.
    pub fn motorize(
        &mut self,
        a: Entity,
        b: Entity,
        max_torque: f32,
        relative_anchor: glam::Vec2,
    ) -> Result<Motor, PhysicsError> {
        let ha = self.body_of(a)?;
        let hb = self.body_of(b)?;

        let joint = RevoluteJointBuilder::new()
            .local_anchor1(to_rapier(relative_anchor))
            .local_anchor2(Vec2::ZERO)
            .motor_model(MotorModel::ForceBased)
            .motor_velocity(0.0, MOTOR_GAIN)
            .motor_max_force(max_torque)
            .build();
        let handle = self.impulse_joints.insert(hb, ha, joint, true);
        debug!("motorized {:?} on {:?} (max torque {})", a, b, max_torque);
        Ok(Motor { joint: handle })
    }

    /// Mount `a` as a wheel of `b`.
    ///
    /// The wheel is anchored at its current position and may slide along
    /// `axis` (world direction, fixed in `b`'s frame) within
    /// ±[`WHEEL_TRAVEL`], held by a spring tuned from `b`'s mass at
    /// [`WHEEL_HERTZ`] and [`WHEEL_DAMPING_RATIO`]. Rotation is free and
    /// driven by a motor of at most `max_torque`, initially at speed zero.
    ///
    /// A zero `axis` falls back to the vertical.
    pub fn motorize_as_wheel(
        &mut self,
        a: Entity,
        b: Entity,
        max_torque: f32,
        axis: glam::Vec2,
    ) -> Result<Wheel, PhysicsError> {
        let ha = self.body_of(a)?;
        let hb = self.body_of(b)?;
        let (pa, aa) = self.body_pose(ha).ok_or(PhysicsError::NoBody(a))?;
        let (pb, ab) = self.body_pose(hb).ok_or(PhysicsError::NoBody(b))?;

        let axis = axis.try_normalize().unwrap_or(glam::Vec2::Y);
        let axis_angle = axis.y.atan2(axis.x);
        let (stiffness, damping) = wheel_spring(self.body_mass(hb));

        let joint = GenericJointBuilder::new(JointAxesMask::LIN_Y)
            .local_frame1(Pose::new(to_rapier(to_local(pa, pb, ab)), axis_angle - ab))
            .local_frame2(Pose::new(Vec2::ZERO, axis_angle - aa))
            .limits(JointAxis::LinX, [-WHEEL_TRAVEL, WHEEL_TRAVEL])
            .motor_model(JointAxis::LinX, MotorModel::ForceBased)
            .motor_position(JointAxis::LinX, 0.0, stiffness, damping)
            .motor_model(JointAxis::AngX, MotorModel::ForceBased)
            .motor_velocity(JointAxis::AngX, 0.0, MOTOR_GAIN)
            .motor_max_force(JointAxis::AngX, max_torque)
            .build();
        let handle = self.impulse_joints.insert(hb, ha, joint, true);
        debug!(
            "mounted {:?} as wheel of {:?} (stiffness {:.1}, damping {:.1})",
            a, b, stiffness, damping
        );
        Ok(Wheel { joint: handle })
    }

    /// Change the target speed (rad/s) of a joint's angular motor, waking the
    /// attached bodies.
    pub fn set_joint_motor_speed(
        &mut self,
        joint: ImpulseJointHandle,
        speed: f32,
    ) -> Result<(), PhysicsError> {
        let joint = self
            .impulse_joints
            .get_mut(joint, true)
            .ok_or(PhysicsError::NoJoint)?;
        joint
            .data
            .set_motor_velocity(JointAxis::AngX, speed, MOTOR_GAIN);
        Ok(())
    }

    /// Target speed (rad/s) of a joint's angular motor.
    pub fn joint_motor_speed(&self, joint: ImpulseJointHandle) -> Result<f32, PhysicsError> {
        let joint = self
            .impulse_joints
            .get(joint)
            .ok_or(PhysicsError::NoJoint)?;
        Ok(joint
            .data
            .motor(JointAxis::AngX)
            .map(|m| m.target_vel)
            .unwrap_or(0.0))
    }

    /// World positions of the two anchors of a joint, on its first and second
    /// body. They coincide while the joint is satisfied.
    pub fn joint_anchors(&self, joint: ImpulseJointHandle) -> Option<(glam::Vec2, glam::Vec2)> {
        let joint = self.impulse_joints.get(joint)?;
        let (p1, a1) = self.body_pose(joint.body1)?;
        let (p2, a2) = self.body_pose(joint.body2)?;
        let l1 = joint.data.local_anchor1();
        let l2 = joint.data.local_anchor2();
        Some((
            to_world(glam::Vec2::new(l1.x, l1.y), p1, a1),
            to_world(glam::Vec2::new(l2.x, l2.y), p2, a2),
        ))
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Drain the collision events of the last steps and return the
    /// `(sensor, other)` entity pairs that started overlapping.
    pub fn drain_trigger_entries(&mut self) -> Vec<(Entity, Entity)> {
        let mut entries = Vec::new();
        while let Ok(event) = self.collision_recv.try_recv() {
            if !event.started() || !event.sensor() {
                continue;
            }
            let (c1, c2) = (event.collider1(), event.collider2());
            let first_is_sensor = self
                .colliders
                .get(c1)
                .map(|c| c.is_sensor())
                .unwrap_or(false);
            let (sensor, other) = if first_is_sensor { (c1, c2) } else { (c2, c1) };
            if let (Some(s), Some(o)) = (
                self.collider_to_entity.get(&sensor),
                self.collider_to_entity.get(&other),
            ) {
                entries.push((*s, *o));
            }
        }
        // Contact force events are not requested by any collider.
        while self.contact_force_recv.try_recv().is_ok() {}
        entries
    }
}

/// Spring stiffness and damping of a wheel suspension carrying `mass`.
pub fn wheel_spring(mass: f32) -> (f32, f32) {
    let omega = 2.0 * PI * WHEEL_HERTZ;
    let stiffness = mass * omega * omega;
    let damping = 2.0 * mass * WHEEL_DAMPING_RATIO * omega;
    (stiffness, damping)
}
