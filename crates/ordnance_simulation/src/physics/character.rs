//! Kinematic character movement (rapier `KinematicCharacterController`)
//!
//! Locomotion отдаёт один displacement за тик, controller сдвигает капсулу
//! с учётом препятствий (акторы, окружение) во время physics шага.
//! Grounded флаг приходит из `KinematicCharacterControllerOutput`.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    CharacterLength, KinematicCharacterController, KinematicCharacterControllerOutput, QueryFilterFlags,
};

use super::colliders::standing_capsule_shape;
use super::layers::character_sweep_groups;
use crate::components::CharacterBody;

/// Зазор между капсулой и препятствиями
pub const CHARACTER_SKIN: f32 = 0.01;
/// Дистанция прилипания к земле на спусках
pub const SNAP_TO_GROUND: f32 = 0.2;

/// Controller для стоящей капсулы (сенсоры не мешают движению)
pub fn character_controller(radius: f32, height: f32) -> KinematicCharacterController {
    KinematicCharacterController {
        custom_shape: Some(standing_capsule_shape(radius, height)),
        offset: CharacterLength::Absolute(CHARACTER_SKIN),
        up: Vec3::Y,
        snap_to_ground: Some(CharacterLength::Absolute(SNAP_TO_GROUND)),
        filter_groups: Some(character_sweep_groups()),
        filter_flags: QueryFilterFlags::EXCLUDE_SENSORS,
        ..Default::default()
    }
}

/// Единственный authoritative move call за тик (позиция = ноги)
pub fn move_character(controller: &mut KinematicCharacterController, displacement: Vec3) {
    controller.translation = Some(displacement);
}

/// Система: результат шага controller'а → `CharacterBody.grounded`
pub fn sync_grounded(mut characters: Query<(&KinematicCharacterControllerOutput, &mut CharacterBody)>) {
    for (output, mut body) in characters.iter_mut() {
        if body.grounded != output.grounded {
            body.grounded = output.grounded;
        }
    }
}
