//! Чистая математика симуляции (без ECS)
//!
//! - ballistics: начальная скорость броска под фиксированным углом
//! - smoothing: critically-damped SmoothDamp (скаляр, вектор, угол)

pub mod ballistics;
pub mod smoothing;

pub use ballistics::{
    estimate_flat_landing, solve_launch_velocity, BallisticParams, LaunchSolution, SolutionKind,
};
pub use smoothing::{delta_angle, smooth_damp, smooth_damp_angle, smooth_damp_vec3};

use bevy::prelude::*;

/// Yaw (градусы) из rotation. Ноль — лицом к +Z, рост — против часовой (вид сверху).
pub fn yaw_degrees(rotation: Quat) -> f32 {
    let (yaw, _, _) = rotation.to_euler(EulerRot::YXZ);
    yaw.to_degrees()
}

/// Rotation по yaw (градусы), та же конвенция что `yaw_degrees`
pub fn yaw_rotation(yaw_degrees: f32) -> Quat {
    Quat::from_rotation_y(yaw_degrees.to_radians())
}

/// Forward актора (модель смотрит вдоль локальной +Z)
pub fn actor_forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Yaw, при котором актор смотрит вдоль direction
pub fn heading_to_yaw(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_yaw_roundtrip() {
        let direction = Vec3::new(1.0, 0.0, 1.0).normalize();
        let yaw = heading_to_yaw(direction);
        assert!((yaw - 45.0).abs() < 1e-4);

        let forward = actor_forward(yaw_rotation(yaw));
        assert!(forward.distance(direction) < 1e-5);
        assert!((yaw_degrees(yaw_rotation(yaw)) - yaw).abs() < 1e-3);
    }
}
