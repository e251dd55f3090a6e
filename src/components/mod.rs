//! ECS components for entities.
//!
//! Submodules overview:
//! - [`boxcollider`] – rectangular fixture, sized by half-extents
//! - [`camera`] – view camera, optionally following an entity
//! - [`circlecollider`] – circular fixture
//! - [`light`] – scene light; its colour tints the background
//! - [`node`] – name and draw colour of a scene object
//! - [`rigidbody`] – physics body parameters and handle
//! - [`transform`] – position, rotation and scale in world units

pub mod boxcollider;
pub mod camera;
pub mod circlecollider;
pub mod light;
pub mod node;
pub mod rigidbody;
pub mod transform;
