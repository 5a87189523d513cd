//! Ballistic solver — начальная скорость броска под фиксированным углом
//!
//! Формула (движение снаряда без сопротивления):
//! `v² = g·d² / (2·cos²θ·(d·tanθ − y))`
//! где `d` — горизонтальная дистанция, `y` — перепад высот target − origin.
//!
//! Формула сингулярна для почти вертикальных/недостижимых целей —
//! в этих случаях возвращаем прямой fallback вектор `dir·F + up·U`.

use bevy::prelude::*;

/// Допустимый диапазон угла броска (градусы)
pub const MIN_LAUNCH_ANGLE_DEG: f32 = 10.0;
pub const MAX_LAUNCH_ANGLE_DEG: f32 = 60.0;

/// Ниже этой горизонтальной дистанции формула не применяется
pub const MIN_PLANAR_DISTANCE: f32 = 0.1;

/// Минимальный знаменатель (угол не достаёт до цели если меньше)
pub const DENOMINATOR_EPSILON: f32 = 0.0001;

/// Параметры броска
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallisticParams {
    /// Угол броска (градусы), clamp в [10°, 60°]
    pub launch_angle_deg: f32,
    /// Модуль гравитации (m/s², > 0)
    pub gravity: f32,
    /// Fallback: горизонтальная сила
    pub fallback_force: f32,
    /// Fallback: вертикальная сила
    pub fallback_up_force: f32,
}

/// Каким путём получена скорость
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionKind {
    /// Аналитическое решение — попадает в target
    Ballistic,
    /// Формула неприменима — прямой бросок `dir·F + up·U`
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSolution {
    pub velocity: Vec3,
    pub kind: SolutionKind,
}

/// Горизонтальная дистанция и перепад высот (origin → target)
pub fn planar_displacement(origin: Vec3, target: Vec3) -> (Vec3, f32, f32) {
    let to_target = target - origin;
    let height_delta = to_target.y;
    let planar = Vec3::new(to_target.x, 0.0, to_target.z);
    (planar, planar.length(), height_delta)
}

/// Вычисляет начальную скорость броска origin → target
///
/// Чистая функция: без скрытого состояния, детерминирована,
/// никогда не возвращает NaN или нулевой вектор.
pub fn solve_launch_velocity(origin: Vec3, target: Vec3, params: &BallisticParams) -> LaunchSolution {
    let (planar, distance, height_delta) = planar_displacement(origin, target);
    let direction = planar.normalize_or_zero();

    let angle = params
        .launch_angle_deg
        .clamp(MIN_LAUNCH_ANGLE_DEG, MAX_LAUNCH_ANGLE_DEG)
        .to_radians();
    let (sin, cos) = angle.sin_cos();
    let gravity = params.gravity.abs();

    let denominator = 2.0 * cos * cos * (distance * angle.tan() - height_delta);

    if distance > MIN_PLANAR_DISTANCE && denominator > DENOMINATOR_EPSILON && gravity > 0.0 {
        let speed_squared = gravity * distance * distance / denominator;
        if speed_squared > 0.0 && speed_squared.is_finite() {
            let speed = speed_squared.sqrt();
            return LaunchSolution {
                velocity: direction * (speed * cos) + Vec3::Y * (speed * sin),
                kind: SolutionKind::Ballistic,
            };
        }
    }

    LaunchSolution {
        velocity: fallback_velocity(direction, params),
        kind: SolutionKind::Fallback,
    }
}

/// Прямой бросок: `dir·F + up·U`
///
/// Если и направление, и U вырождены — бросаем вверх с силой F,
/// чтобы результат никогда не был нулевым.
pub fn fallback_velocity(direction: Vec3, params: &BallisticParams) -> Vec3 {
    let velocity = direction * params.fallback_force + Vec3::Y * params.fallback_up_force;
    if velocity.length_squared() > f32::EPSILON {
        velocity
    } else if params.fallback_force.abs() > f32::EPSILON {
        Vec3::Y * params.fallback_force.abs()
    } else {
        Vec3::Y
    }
}

/// Оценка точки приземления на высоте старта (для диагностики)
///
/// `t = 2·vy / g`, горизонталь — равномерное движение.
pub fn estimate_flat_landing(origin: Vec3, velocity: Vec3, gravity: f32) -> Vec3 {
    let gravity = gravity.abs().max(f32::EPSILON);
    let flight_time = (2.0 * velocity.y.max(0.0) / gravity).max(0.0);
    Vec3::new(
        origin.x + velocity.x * flight_time,
        origin.y,
        origin.z + velocity.z * flight_time,
    )
}

/// Позиция снаряда в момент `t` (аналитическая траектория)
pub fn position_at(origin: Vec3, velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    origin + velocity * t - Vec3::Y * (0.5 * gravity.abs() * t * t)
}
