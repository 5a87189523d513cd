//! Movement компоненты: locomotion tuning, motion state, character body

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тюнинг third-person locomotion
///
/// Значения по умолчанию — ощущение "быстрый старт, ещё более быстрая остановка".
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Максимальная горизонтальная скорость (m/s) при |input| = 1
    pub max_speed: f32,
    /// Постоянная времени поворота корпуса (секунды)
    pub rotation_smooth_time: f32,
    /// Постоянная времени разгона
    pub acceleration_time: f32,
    /// Постоянная времени торможения
    pub deceleration_time: f32,
    /// Гравитация free-fall (m/s², отрицательная)
    pub gravity: f32,
    /// Прижимающая скорость на земле (не даёт подпрыгивать на неровностях)
    pub grounded_gravity: f32,
    /// Блокировка поворота корпуса (aim mode)
    pub rotation_locked: bool,
    /// Порог |input| для "движется" (анимация, шаги)
    pub allow_rotation_threshold: f32,
    /// Damp time анимационного Blend при старте движения
    pub start_anim_time: f32,
    /// Damp time анимационного Blend при остановке
    pub stop_anim_time: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            max_speed: 5.0,
            rotation_smooth_time: 0.12,
            acceleration_time: 0.12,
            deceleration_time: 0.16,
            gravity: -9.81,
            grounded_gravity: -2.0,
            rotation_locked: false,
            allow_rotation_threshold: 0.1,
            start_anim_time: 0.3,
            stop_anim_time: 0.15,
        }
    }
}

/// Состояние locomotion (только у игрока)
///
/// Мутируется каждый тик LocomotionController'ом.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MotionState {
    /// Текущая горизонтальная скорость (y = 0)
    pub horizontal_velocity: Vec3,
    /// Внутреннее состояние SmoothDamp для horizontal_velocity
    pub smoothing_velocity: Vec3,
    /// Camera-relative направление этого тика (|dir| ≤ 1)
    pub desired_direction: Vec3,
    /// Направление прошлого тика (детект разворота)
    pub last_desired_direction: Vec3,
    /// Угловая скорость yaw (градусы/сек, состояние SmoothDampAngle)
    pub yaw_velocity: f32,
    /// |input| этого тика (скорость + анимация)
    pub input_magnitude: f32,
}

/// Kinematic тело персонажа: вертикальная скорость + grounded флаг
///
/// `grounded` выставляет только authoritative move call.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterBody {
    pub vertical_velocity: f32,
    pub grounded: bool,
}
