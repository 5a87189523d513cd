//! Player control: locomotion, бросок гранаты, спавн
//!
//! Input приходит через `InputSnapshot`, камера — отдельная entity
//! с `FollowCamera`, rig (yaw/pitch) живёт на акторе.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;
use serde::{Deserialize, Serialize};

pub mod locomotion;
pub mod throw;

pub use locomotion::{drive_player_locomotion, locomotion_step, FootstepLoop, LocomotionStep, MoveBasis};
pub use throw::{player_aim, player_throw, PlayerThrowConfig, ThrowCooldown};

use crate::camera::camera_pose;
use crate::components::{
    CameraConfig, CameraRig, CharacterBody, FollowCamera, Health, Hurtbox, LocomotionConfig, MotionState,
    Player,
};
use crate::math::{yaw_degrees, yaw_rotation};
use crate::physics::layers::actor_groups;
use crate::physics::{character_controller, standing_capsule};
use crate::TickPhase;

/// Параметры спавна игрока
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: u32,
    pub capsule_radius: f32,
    pub capsule_height: f32,
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
    pub throw: PlayerThrowConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: 2,
            capsule_radius: 0.4,
            capsule_height: 1.8,
            locomotion: LocomotionConfig::default(),
            camera: CameraConfig::default(),
            throw: PlayerThrowConfig::default(),
        }
    }
}

/// Entity игрока и его камеры
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerHandles {
    pub actor: Entity,
    pub camera: Entity,
}

/// Спавн игрока (актор + follow камера)
pub fn spawn_player(commands: &mut Commands, position: Vec3, yaw: f32, config: &PlayerConfig) -> PlayerHandles {
    let transform = Transform::from_translation(position).with_rotation(yaw_rotation(yaw));
    let rig = CameraRig::new(yaw_degrees(transform.rotation), config.camera.clone());
    let camera_transform = camera_pose(&rig, position);

    let actor = commands
        .spawn((
            Player,
            transform,
            Health::new(config.max_health),
            Hurtbox,
            (
                standing_capsule(config.capsule_radius, config.capsule_height),
                actor_groups(),
                RigidBody::KinematicPositionBased,
                character_controller(config.capsule_radius, config.capsule_height),
            ),
            config.locomotion.clone(),
            MotionState::default(),
            CharacterBody {
                vertical_velocity: 0.0,
                grounded: true,
            },
            FootstepLoop::default(),
            rig,
            config.throw.clone(),
            ThrowCooldown::default(),
        ))
        .id();

    let camera = commands
        .spawn((FollowCamera { target: actor }, camera_transform))
        .id();

    crate::log_info(&format!("Player {:?} spawned at {:?}", actor, position));

    PlayerHandles { actor, camera }
}

/// Player Plugin (TickPhase::Update)
///
/// 1. drive_player_locomotion — движение и поворот
/// 2. player_throw — бросок (после движения: origin из актуальной позиции)
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (drive_player_locomotion, player_throw)
                .chain()
                .in_set(TickPhase::Update),
        );
    }
}
