use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Ambient light. The renderer shades the background with its colour.
#[derive(Component, Clone, Copy, Debug)]
pub struct Light {
    /// Linear RGB in `[0, 1]`.
    pub color: Vec3,
}

impl Light {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            color: Vec3::new(r, g, b),
        }
    }

    /// Colour as 8-bit RGBA, fully opaque.
    pub fn rgba8(&self) -> [u8; 4] {
        let c = self.color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
        [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba8_clamps() {
        let l = Light::new(2.0, 0.0, -1.0);
        assert_eq!(l.rgba8(), [255, 0, 0, 255]);
    }

    #[test]
    fn test_rgba8_rounds() {
        let l = Light::new(0.4, 0.5, 0.929);
        assert_eq!(l.rgba8(), [102, 128, 237, 255]);
    }
}
