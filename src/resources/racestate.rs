use bevy_ecs::prelude::Resource;

/// Progress of the run through the course.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct RaceState {
    /// Set once the car crosses the finish line sensor.
    pub finished: bool,
    /// Simulated seconds at the moment the finish line was crossed.
    pub finish_time: Option<f32>,
}
