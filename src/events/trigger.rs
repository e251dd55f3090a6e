//! Sensor entry events.
//!
//! After each physics step, [`emit_trigger_events`] turns Rapier's sensor
//! intersection reports into [`TriggerEntryEvent`]s so observers can react to
//! an entity entering a sensor collider (finish lines, checkpoints).
//!
//! [`emit_trigger_events`]: crate::systems::physics::emit_trigger_events

use bevy_ecs::prelude::*;

/// Fired once when `other` starts overlapping the sensor collider of `sensor`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerEntryEvent {
    pub sensor: Entity,
    pub other: Entity,
}
