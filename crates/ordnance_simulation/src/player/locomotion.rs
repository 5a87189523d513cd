//! LocomotionController: camera-relative движение игрока
//!
//! Порядок за тик:
//! 1. оси ввода (clamp [-1, 1])
//! 2. desired direction относительно камеры (|dir| ≤ 1, не нормализуем вверх)
//! 3. поворот корпуса через SmoothDampAngle
//! 4. вертикальная скорость (grounded gravity / free fall)
//! 5. горизонтальная скорость через SmoothDamp (разгон/торможение — разные константы)
//! 6. один authoritative move call (KinematicCharacterController, шаг — в Physics)

use bevy::prelude::*;
use bevy_rapier3d::prelude::KinematicCharacterController;

use crate::combat::Dead;
use crate::components::{CharacterBody, FollowCamera, LocomotionConfig, MotionState, Player};
use crate::input::InputSnapshot;
use crate::math::{heading_to_yaw, smooth_damp_angle, smooth_damp_vec3, yaw_degrees, yaw_rotation};
use crate::physics::move_character;
use crate::presentation::{PresentationEvent, ANIM_BLEND};

/// Ниже этого |v|² вектор считается вырожденным
const DEGENERATE_SQR: f32 = 0.0001;

/// Плоский базис движения (forward, right), оба горизонтальные и единичные
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

/// Правая сторона актора (модель смотрит вдоль +Z)
pub fn actor_right(rotation: Quat) -> Vec3 {
    rotation * Vec3::NEG_X
}

fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Базис из камеры (forward/right камеры), fallback на forward актора
///
/// Без камеры — forward/right самого актора.
pub fn move_basis(camera: Option<(Vec3, Vec3)>, actor_rotation: Quat) -> MoveBasis {
    let actor_forward = flatten(actor_rotation * Vec3::Z).normalize_or(Vec3::Z);

    let Some((camera_forward, camera_right)) = camera else {
        return MoveBasis {
            forward: actor_forward,
            right: flatten(actor_right(actor_rotation)).normalize_or(Vec3::NEG_X),
        };
    };

    let mut forward = flatten(camera_forward);
    if forward.length_squared() < DEGENERATE_SQR {
        forward = actor_forward;
    }
    let forward = forward.normalize_or(Vec3::Z);

    let mut right = flatten(camera_right);
    if right.length_squared() < DEGENERATE_SQR {
        right = forward.cross(Vec3::Y);
    }

    MoveBasis {
        forward,
        right: right.normalize_or(Vec3::NEG_X),
    }
}

/// Желаемое направление: `fwd·z + right·x`, clamp длины ≤ 1
pub fn desired_direction(axes: Vec2, basis: MoveBasis) -> Vec3 {
    let axes = Vec2::new(axes.x.clamp(-1.0, 1.0), axes.y.clamp(-1.0, 1.0));
    let direction = basis.forward * axes.y + basis.right * axes.x;
    if direction.length_squared() > 1.0 {
        direction.normalize()
    } else {
        direction
    }
}

/// Разгон, если цель быстрее текущей скорости, иначе торможение
pub fn select_smooth_time(config: &LocomotionConfig, current_speed: f32, target_speed: f32) -> f32 {
    if target_speed > current_speed {
        config.acceleration_time
    } else {
        config.deceleration_time
    }
}

/// Результат одного шага
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionStep {
    /// Смещение для move call (уже умножено на delta)
    pub displacement: Vec3,
    /// Новый yaw корпуса (градусы)
    pub yaw: f32,
}

/// Чистый шаг locomotion (без ECS)
pub fn locomotion_step(
    config: &LocomotionConfig,
    state: &mut MotionState,
    body: &mut CharacterBody,
    current_yaw: f32,
    axes: Vec2,
    basis: MoveBasis,
    delta: f32,
) -> LocomotionStep {
    let axes = Vec2::new(axes.x.clamp(-1.0, 1.0), axes.y.clamp(-1.0, 1.0));
    let direction = desired_direction(axes, basis);
    let input_magnitude = axes.length().min(1.0);

    // Поворот
    let mut yaw = current_yaw;
    if !config.rotation_locked && direction.length_squared() > DEGENERATE_SQR {
        yaw = smooth_damp_angle(
            current_yaw,
            heading_to_yaw(direction),
            &mut state.yaw_velocity,
            config.rotation_smooth_time,
            delta,
        );
    }

    // Гравитация
    if body.grounded && body.vertical_velocity <= 0.0 {
        body.vertical_velocity = config.grounded_gravity;
    } else {
        body.vertical_velocity += config.gravity * delta;
    }

    // Горизонтальная скорость
    let target = direction.normalize_or_zero() * (config.max_speed * input_magnitude);

    if state.last_desired_direction.dot(direction) < 0.0 {
        state.smoothing_velocity = Vec3::ZERO;
    }

    let current_speed = flatten(state.horizontal_velocity).length();
    let smooth_time = select_smooth_time(config, current_speed, target.length());
    let mut horizontal = smooth_damp_vec3(
        state.horizontal_velocity,
        target,
        &mut state.smoothing_velocity,
        smooth_time,
        delta,
    );
    horizontal.y = 0.0;

    state.horizontal_velocity = horizontal;
    state.last_desired_direction = direction;
    state.desired_direction = direction;
    state.input_magnitude = input_magnitude;

    LocomotionStep {
        displacement: Vec3::new(horizontal.x, body.vertical_velocity, horizontal.z) * delta,
        yaw,
    }
}

/// Текущее состояние шагов: на земле и движемся
pub fn should_play_footsteps(config: &LocomotionConfig, body: &CharacterBody, input_magnitude: f32) -> bool {
    body.grounded && input_magnitude > config.allow_rotation_threshold
}

/// Состояние footstep loop (меняем только на переходах)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct FootstepLoop {
    pub playing: bool,
}

/// Система: locomotion игрока
pub fn drive_player_locomotion(
    time: Res<Time>,
    input: Res<InputSnapshot>,
    mut players: Query<
        (
            Entity,
            &LocomotionConfig,
            &mut MotionState,
            &mut CharacterBody,
            &mut Transform,
            &mut KinematicCharacterController,
            Option<&mut FootstepLoop>,
        ),
        (With<Player>, Without<Dead>),
    >,
    cameras: Query<(&FollowCamera, &Transform), Without<Player>>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    for (entity, config, mut state, mut body, mut transform, mut controller, footsteps) in players.iter_mut() {
        let camera = cameras
            .iter()
            .find(|(follow, _)| follow.target == entity)
            .map(|(_, camera_transform)| (*camera_transform.forward(), *camera_transform.right()));

        let basis = move_basis(camera, transform.rotation);
        let step = locomotion_step(
            config,
            &mut state,
            &mut body,
            yaw_degrees(transform.rotation),
            input.clamped_axes(),
            basis,
            delta,
        );

        transform.rotation = yaw_rotation(step.yaw);
        move_character(&mut controller, step.displacement);

        let moving = state.input_magnitude > config.allow_rotation_threshold;
        presentation.write(PresentationEvent::AnimFloat {
            entity,
            parameter: ANIM_BLEND,
            value: state.input_magnitude,
            damp_time: if moving {
                config.start_anim_time
            } else {
                config.stop_anim_time
            },
        });

        if let Some(mut footsteps) = footsteps {
            let playing = should_play_footsteps(config, &body, state.input_magnitude);
            if playing != footsteps.playing {
                footsteps.playing = playing;
                presentation.write(PresentationEvent::Footsteps { entity, playing });
            }
        }
    }
}

#[cfg(test)]
#[path = "locomotion_tests.rs"]
mod tests;
