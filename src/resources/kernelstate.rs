//! Run flag of the frame loop.
//!
//! The [`Kernel`](crate::kernel::Kernel) keeps looping while
//! [`KernelState::is_running`] holds. Systems and observers stop the loop by
//! calling [`KernelState::stop`].

use bevy_ecs::prelude::Resource;
use log::info;

#[derive(Resource, Debug, Clone, Copy)]
pub struct KernelState {
    running: bool,
}

impl Default for KernelState {
    fn default() -> Self {
        Self { running: true }
    }
}

impl KernelState {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        if self.running {
            info!("Kernel stop requested");
        }
        self.running = false;
    }
}
