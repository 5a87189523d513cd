//! Enemy AI components: конфиг, FSM состояние, throw gate.
//!
//! Hysteresis: Chasing при `distance ≤ detection_radius`,
//! выход только при `distance > lose_radius` (lose > detection).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::GrenadeConfig;
use crate::math::{heading_to_yaw, yaw_rotation, BallisticParams};

/// Смещение точки спавна гранаты от throw point
pub const THROW_SPAWN_FORWARD_OFFSET: f32 = 0.3;
pub const THROW_SPAWN_UP_OFFSET: f32 = 0.2;

/// Ragdoll части: (локальный offset, радиус сферы)
pub const RAGDOLL_PARTS: [(Vec3, f32); 3] = [
    (Vec3::new(0.0, 0.9, 0.0), 0.22),
    (Vec3::new(0.0, 1.35, 0.0), 0.25),
    (Vec3::new(0.0, 1.75, 0.0), 0.15),
];

/// Параметры врага
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct EnemyConfig {
    // Detection
    pub detection_radius: f32,
    /// Больше detection_radius (иначе дёргается на границе)
    pub lose_radius: f32,

    // Chase
    pub chase_speed: f32,
    pub return_speed: f32,
    pub stopping_distance: f32,

    // Grenades
    pub throw_cooldown: f32,
    /// Первый бросок тоже ждёт cooldown от старта сцены
    pub cooldown_from_start: bool,
    /// Fallback горизонтальная сила
    pub throw_force: f32,
    /// Fallback вертикальная сила
    pub up_force: f32,
    pub min_throw_range: f32,
    pub max_throw_range: f32,
    pub launch_angle_deg: f32,
    /// Без префаба враг не бросает
    pub grenade: Option<GrenadeConfig>,
    /// Локальный offset throw point (None → `max(1, capsule_height·0.75)` вверх)
    pub throw_point_offset: Option<Vec3>,

    // Body
    pub max_health: u32,
    pub capsule_radius: f32,
    pub capsule_height: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            detection_radius: 12.0,
            lose_radius: 14.0,
            chase_speed: 4.0,
            return_speed: 3.0,
            stopping_distance: 1.5,
            throw_cooldown: 2.5,
            cooldown_from_start: false,
            throw_force: 12.0,
            up_force: 4.0,
            min_throw_range: 5.0,
            max_throw_range: 25.0,
            launch_angle_deg: 35.0,
            grenade: Some(GrenadeConfig::default()),
            throw_point_offset: None,
            max_health: 2,
            capsule_radius: 0.4,
            capsule_height: 2.0,
        }
    }
}

impl EnemyConfig {
    pub fn in_throw_range(&self, distance: f32) -> bool {
        distance >= self.min_throw_range && distance <= self.max_throw_range
    }

    /// Параметры solver'а при данной гравитации
    pub fn ballistic_params(&self, gravity: f32) -> BallisticParams {
        BallisticParams {
            launch_angle_deg: self.launch_angle_deg,
            gravity,
            fallback_force: self.throw_force,
            fallback_up_force: self.up_force,
        }
    }
}

/// FSM состояния врага
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EnemyState {
    /// Стоит в origin, ждёт игрока
    Idle,
    /// Идёт в origin (начальное состояние)
    #[default]
    Returning,
    Chasing,
    /// Терминальное: AI выключен, ragdoll
    Dead,
}

/// "Мозг" врага: состояние + origin + время последней атаки
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct EnemyBrain {
    pub state: EnemyState,
    /// Точка спавна (уже на navmesh)
    pub origin: Vec3,
    /// None — ещё не бросал (первый бросок без ожидания)
    pub last_attack: Option<f32>,
}

impl EnemyBrain {
    pub fn new(origin: Vec3) -> Self {
        Self {
            state: EnemyState::Returning,
            origin,
            last_attack: None,
        }
    }

    pub fn is_chasing(&self) -> bool {
        self.state == EnemyState::Chasing
    }

    /// Переход по дистанции до цели (hysteresis). Возвращает (from, to) при смене.
    pub fn observe_target(&mut self, distance: f32, config: &EnemyConfig) -> Option<(EnemyState, EnemyState)> {
        let from = self.state;
        let to = match from {
            EnemyState::Dead => return None,
            EnemyState::Chasing if distance > config.lose_radius => EnemyState::Returning,
            EnemyState::Idle | EnemyState::Returning if distance <= config.detection_radius => EnemyState::Chasing,
            _ => return None,
        };

        self.state = to;
        Some((from, to))
    }

    pub fn throw_ready(&self, now: f32, cooldown: f32, from_start: bool) -> bool {
        match self.last_attack {
            Some(last) => now - last >= cooldown,
            None => !from_start || now >= cooldown,
        }
    }

    /// Throw gate: cooldown вышел и цель в [min_range, max_range]
    pub fn can_throw(&self, now: f32, distance: f32, config: &EnemyConfig) -> bool {
        self.is_chasing()
            && self.throw_ready(now, config.throw_cooldown, config.cooldown_from_start)
            && config.in_throw_range(distance)
    }
}

/// Поворот throw point к цели (только yaw). Вырожденный случай — текущий поворот.
pub fn aim_throw_point(origin: Vec3, current: Quat, target: Vec3) -> Quat {
    let planar = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z);
    if planar.length_squared() > 0.0001 {
        yaw_rotation(heading_to_yaw(planar))
    } else {
        current
    }
}

/// Точка спавна гранаты: чуть вперёд и вверх от throw point
pub fn throw_spawn_position(origin: Vec3, rotation: Quat) -> Vec3 {
    origin + rotation * Vec3::Z * THROW_SPAWN_FORWARD_OFFSET + Vec3::Y * THROW_SPAWN_UP_OFFSET
}

#[cfg(test)]
#[path = "enemy_tests.rs"]
mod tests;
