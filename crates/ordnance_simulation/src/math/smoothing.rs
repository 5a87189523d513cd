//! Critically-damped smoothing (spring-damper аппроксимация)
//!
//! Формула из Game Programming Gems 4 (ch. 1.10): экспонента заменена
//! полиномом `1 / (1 + x + 0.48x² + 0.235x³)`, результат не перелетает target.
//! `velocity` — внутреннее состояние сглаживания, живёт у вызывающего.

use bevy::prelude::*;

/// Минимальная постоянная времени (защита от деления на 0)
const MIN_SMOOTH_TIME: f32 = 0.0001;

fn damping_terms(smooth_time: f32, delta: f32) -> (f32, f32) {
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    (omega, exp)
}

/// Скалярный SmoothDamp
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    if delta <= 0.0 {
        return current;
    }

    let (omega, exp) = damping_terms(smooth_time, delta);
    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Не перелетаем target
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / delta;
    }

    output
}

/// Векторный SmoothDamp (одна постоянная времени на все оси)
pub fn smooth_damp_vec3(current: Vec3, target: Vec3, velocity: &mut Vec3, smooth_time: f32, delta: f32) -> Vec3 {
    if delta <= 0.0 {
        return current;
    }

    let (omega, exp) = damping_terms(smooth_time, delta);
    let change = current - target;
    let temp = (*velocity + omega * change) * delta;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = (output - target) / delta;
    }

    output
}

/// Кратчайшая разница углов (градусы), результат в (-180, 180]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// SmoothDamp для углов в градусах (поворот по кратчайшей дуге)
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta: f32) -> f32 {
    let unwrapped_target = current + delta_angle(current, target);
    smooth_damp(current, unwrapped_target, velocity, smooth_time, delta)
}
