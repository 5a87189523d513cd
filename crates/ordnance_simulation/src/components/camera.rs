//! Camera rig компоненты
//!
//! Orbit камера развязана с корпусом: yaw/pitch копятся из pointer delta,
//! корпус поворачивается только от движения.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тюнинг orbit камеры
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CameraConfig {
    /// Градусы на единицу pointer delta
    pub sensitivity: f32,
    /// Нижний предел pitch (градусы, отрицательный — смотрим вверх)
    pub min_pitch: f32,
    /// Верхний предел pitch (градусы, положительный — смотрим вниз)
    pub max_pitch: f32,
    /// Дистанция камеры за pivot (метры)
    pub distance: f32,
    /// Pivot относительно позиции актора
    pub pivot_offset: Vec3,
    /// Стартовый pitch
    pub initial_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sensitivity: 2.0,
            min_pitch: -35.0,
            max_pitch: 60.0,
            distance: 4.0,
            pivot_offset: Vec3::new(0.0, 1.6, 0.0),
            initial_pitch: 15.0,
        }
    }
}

impl CameraConfig {
    /// Pitch в пределах `[min_pitch, max_pitch]`.
    /// При перевёрнутых пределах побеждает `max_pitch` (без panic, в отличие от `f32::clamp`).
    pub fn clamp_pitch(&self, pitch: f32) -> f32 {
        pitch.max(self.min_pitch).min(self.max_pitch)
    }
}

/// Состояние orbit камеры (живёт на акторе игрока)
///
/// Инвариант: `config.min_pitch ≤ pitch ≤ config.max_pitch`.
/// Yaw — против часовой вокруг +Y (вид сверху), 0 — смотрим вдоль +Z.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraRig {
    pub yaw: f32,
    pub pitch: f32,
    pub config: CameraConfig,
}

impl CameraRig {
    pub fn new(initial_yaw: f32, config: CameraConfig) -> Self {
        let pitch = config.clamp_pitch(config.initial_pitch);
        Self {
            yaw: initial_yaw,
            pitch,
            config,
        }
    }

    /// Направление взгляда из pivot (unit vector)
    pub fn look_direction(&self) -> Vec3 {
        let rotation = Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            0.0,
        );
        rotation * Vec3::Z
    }
}

/// Камера, следующая за актором (отдельная entity)
///
/// Transform камеры пишет только late-фаза camera rig системы.
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowCamera {
    pub target: Entity,
}
