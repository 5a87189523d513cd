//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Player/Enemy markers, Health, Hurtbox
//! - movement: LocomotionConfig, MotionState, CharacterBody
//! - camera: CameraRig (orbit yaw/pitch), FollowCamera
//! - attachment: Attached (плоская привязка к владельцу), ThrowPoint

pub mod actor;
pub mod attachment;
pub mod camera;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use attachment::*;
pub use camera::*;
pub use movement::*;
