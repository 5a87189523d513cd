//! Dynamic тела: гранаты и ragdoll части
//!
//! Интегрирует rapier: `Velocity`, `ExternalImpulse`, `GravityScale`.
//! Здесь только глобальные параметры и радиальный импульс взрыва.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RapierConfiguration;
use serde::{Deserialize, Serialize};

/// Глобальные параметры физики
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Модуль гравитации (m/s², > 0)
    pub gravity: f32,
    /// Высота верхней грани земли
    pub ground_height: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            ground_height: 0.0,
        }
    }
}

impl PhysicsSettings {
    pub fn gravity_vector(&self) -> Vec3 {
        Vec3::NEG_Y * self.gravity
    }
}

/// Радиальный импульс взрыва: `force · (1 − dist/radius)` вдоль center → body
///
/// Тело ровно в центре толкаем вверх. За радиусом — ноль.
pub fn explosion_impulse(center: Vec3, radius: f32, force: f32, body_position: Vec3) -> Vec3 {
    if radius <= 0.0 {
        return Vec3::ZERO;
    }

    let offset = body_position - center;
    let distance = offset.length();
    let falloff = (1.0 - distance / radius).clamp(0.0, 1.0);
    let direction = offset.try_normalize().unwrap_or(Vec3::Y);

    direction * (force * falloff)
}

/// Система: гравитация из `PhysicsSettings` → rapier контекст
///
/// Солвер баллистики и rapier должны видеть одно и то же g.
pub fn apply_physics_settings(settings: Res<PhysicsSettings>, mut contexts: Query<&mut RapierConfiguration>) {
    let gravity = settings.gravity_vector();
    for mut configuration in contexts.iter_mut() {
        if configuration.gravity != gravity {
            configuration.gravity = gravity;
        }
    }
}
