//! CameraRig: orbit камера от pointer delta
//!
//! Только late-фаза: камера читает transform актора, уже обновлённый
//! locomotion'ом в этом тике. Pitch жёстко clamp'ится каждый тик.

use bevy::prelude::*;

use crate::components::{CameraRig, FollowCamera};
use crate::input::InputSnapshot;
use crate::TickPhase;

/// Накопить yaw/pitch из pointer delta (x — вправо, y — вверх)
pub fn apply_pointer_delta(rig: &mut CameraRig, pointer_delta: Vec2) {
    let sensitivity = rig.config.sensitivity;
    rig.yaw -= pointer_delta.x * sensitivity;
    rig.pitch -= pointer_delta.y * sensitivity;
    rig.pitch = rig.config.clamp_pitch(rig.pitch);
}

/// Pivot и поза камеры: на `distance` позади pivot, взгляд на pivot
pub fn camera_pose(rig: &CameraRig, actor_position: Vec3) -> Transform {
    let pivot = actor_position + rig.config.pivot_offset;
    let position = pivot - rig.look_direction() * rig.config.distance;
    Transform::from_translation(position).looking_at(pivot, Vec3::Y)
}

/// Система: pointer delta → rig → transform камеры
pub fn update_camera_rigs(
    input: Res<InputSnapshot>,
    mut rigs: Query<(&mut CameraRig, &Transform), Without<FollowCamera>>,
    mut cameras: Query<(&FollowCamera, &mut Transform)>,
) {
    for (mut rig, _) in rigs.iter_mut() {
        apply_pointer_delta(&mut rig, input.pointer_delta);
    }

    for (follow, mut camera_transform) in cameras.iter_mut() {
        let Ok((rig, actor_transform)) = rigs.get(follow.target) else {
            continue;
        };
        *camera_transform = camera_pose(rig, actor_transform.translation);
    }
}

/// Camera Plugin (TickPhase::Late)
pub struct CameraRigPlugin;

impl Plugin for CameraRigPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, update_camera_rigs.in_set(TickPhase::Late));
    }
}
