//! Frame scheduler.
//!
//! The [`Kernel`] owns the ECS [`World`] and an update [`Schedule`] split into
//! [`FrameSet`]s that always run in the same order:
//!
//! `Input → Physics → Sync → Update → Render`
//!
//! so the physics step of a frame is finished before anything reads poses
//! and before anything is drawn. Startup work is split between physics
//! initialization (bodies and colliders) and the init tasks registered with
//! [`Kernel::add_init_task`], which run afterwards and may rely on every body
//! existing (mounting joints, for instance).
//!
//! The loop stops once [`KernelState::stop`] has been called.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::IntoScheduleConfigs;
use bevy_ecs::system::ScheduleSystem;
use log::{debug, info};

use crate::error::{KernelError, PhysicsError};
use crate::resources::kernelstate::KernelState;
use crate::resources::physicsworld::{PhysicsSettings, PhysicsWorld};
use crate::resources::racestate::RaceState;
use crate::resources::worldtime::WorldTime;
use crate::systems::camera::camera_follow;
use crate::systems::physics::{emit_trigger_events, initialize_physics, physics_step, sync_transforms};
use crate::systems::time::update_world_time;

/// Ordered stages of a frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    Input,
    Physics,
    Sync,
    Update,
    Render,
}

/// Startup task run once after physics initialization.
pub type InitTask = fn(&mut World) -> Result<(), PhysicsError>;

pub struct Kernel {
    world: World,
    update: Schedule,
    init_tasks: Vec<InitTask>,
    initialized: bool,
}

impl Kernel {
    /// Create a kernel with a fresh physics world and the built-in physics,
    /// sync and camera systems registered.
    pub fn new(settings: PhysicsSettings) -> Self {
        let mut world = World::new();
        world.insert_resource(PhysicsWorld::new(settings));
        world.insert_resource(WorldTime::default());
        world.insert_resource(KernelState::default());
        world.insert_resource(RaceState::default());

        let mut update = Schedule::default();
        update.configure_sets(
            (
                FrameSet::Input,
                FrameSet::Physics,
                FrameSet::Sync,
                FrameSet::Update,
                FrameSet::Render,
            )
                .chain(),
        );
        update.add_systems((physics_step, emit_trigger_events).chain().in_set(FrameSet::Physics));
        update.add_systems(sync_transforms.in_set(FrameSet::Sync));
        update.add_systems(camera_follow.in_set(FrameSet::Update));

        Self {
            world,
            update,
            init_tasks: Vec::new(),
            initialized: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Add systems to one stage of the frame.
    pub fn add_systems<M>(
        &mut self,
        set: FrameSet,
        systems: impl IntoScheduleConfigs<ScheduleSystem, M>,
    ) -> &mut Self {
        self.update.add_systems(systems.in_set(set));
        self
    }

    pub fn add_init_task(&mut self, task: InitTask) -> &mut Self {
        self.init_tasks.push(task);
        self
    }

    /// Create the physics bodies, run the init tasks and build the schedule.
    ///
    /// A failure leaves the kernel uninitialized; the caller is expected to
    /// abort.
    pub fn initialize(&mut self) -> Result<(), KernelError> {
        let bodies = initialize_physics(&mut self.world)?;
        debug!("{} bodies created", bodies);
        for task in &self.init_tasks {
            task(&mut self.world)?;
        }
        self.world.flush();
        self.update
            .initialize(&mut self.world)
            .map_err(|e| KernelError::Schedule(ToString::to_string(&e)))?;
        self.initialized = true;
        info!("Kernel initialized with {} init tasks", self.init_tasks.len());
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run one frame of `dt` seconds.
    pub fn run_frame(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.update.run(&mut self.world);
        self.world.clear_trackers();
    }

    pub fn is_running(&self) -> bool {
        self.world.resource::<KernelState>().is_running()
    }

    pub fn stop(&mut self) {
        self.world.resource_mut::<KernelState>().stop();
    }

    /// Run frames of `dt` seconds until stopped or `max_frames` have run.
    /// Returns the number of frames run.
    pub fn run(&mut self, dt: f32, max_frames: u64) -> u64 {
        let mut frames = 0;
        while self.is_running() && frames < max_frames {
            self.run_frame(dt);
            frames += 1;
        }
        frames
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(PhysicsSettings::default())
    }
}
