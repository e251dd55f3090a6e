//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. The render pass reads
//! it to centre the camera after window resizes.

use bevy_ecs::prelude::Resource;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy, Debug)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}
