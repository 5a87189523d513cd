//! Бросок гранаты игроком
//!
//! Edge-triggered (InputSnapshot::throw_pressed) + cooldown.
//! Прицел — forward камеры: вертикаль clamp [-0.5, 0.75], затем pitch вверх
//! вокруг right камеры. Origin: ThrowPoint → камера → сам актор.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::locomotion::actor_right;
use crate::combat::{spawn_projectile, Dead, GrenadeConfig, ThrowRequest};
use crate::components::{FollowCamera, Player, ThrowPoint};
use crate::input::InputSnapshot;
use crate::physics::ColliderOwners;
use crate::presentation::{PresentationEvent, SoundCue};

/// Пределы вертикальной компоненты прицела
pub const AIM_MIN_Y: f32 = -0.5;
pub const AIM_MAX_Y: f32 = 0.75;

#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Component)]
#[serde(default)]
pub struct PlayerThrowConfig {
    pub cooldown: f32,
    /// Первый бросок тоже ждёт cooldown, отсчитанный от начала сцены (t = 0)
    pub cooldown_from_start: bool,
    /// Сила вдоль прицела
    pub throw_force: f32,
    /// Дополнительная вертикальная скорость
    pub up_force: f32,
    /// Pitch вверх (градусы) вокруг right камеры
    pub pitch_degrees: f32,
    pub spawn_forward_offset: f32,
    pub spawn_up_offset: f32,
    /// Громкость звука броска, clamp в [0, 1]
    pub master_volume: f32,
    /// Без префаба гранаты бросок невозможен
    pub grenade: Option<GrenadeConfig>,
}

impl Default for PlayerThrowConfig {
    fn default() -> Self {
        Self {
            cooldown: 1.2,
            cooldown_from_start: false,
            throw_force: 14.0,
            up_force: 4.5,
            pitch_degrees: 15.0,
            spawn_forward_offset: 0.35,
            spawn_up_offset: 0.2,
            master_volume: 1.0,
            grenade: Some(GrenadeConfig::default()),
        }
    }
}

/// Время последнего броска
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrowCooldown {
    pub last_throw: Option<f32>,
}

impl ThrowCooldown {
    /// Без прошлого броска: сразу, либо (`from_start`) не раньше `cooldown` от t = 0
    pub fn ready(&self, now: f32, cooldown: f32, from_start: bool) -> bool {
        match self.last_throw {
            Some(last) => now - last >= cooldown,
            None => !from_start || now >= cooldown,
        }
    }
}

/// Направление броска из forward/right камеры
pub fn player_aim(forward: Vec3, right: Vec3, pitch_degrees: f32) -> Vec3 {
    let mut base = forward.normalize_or(Vec3::Z);
    base.y = base.y.clamp(AIM_MIN_Y, AIM_MAX_Y);

    let axis = right.normalize_or(Vec3::NEG_X);
    let aim = Quat::from_axis_angle(axis, pitch_degrees.to_radians()) * base;
    aim.normalize_or(base)
}

/// Позиция спавна и скорость гранаты
pub fn player_throw_launch(origin: Vec3, aim: Vec3, config: &PlayerThrowConfig) -> (Vec3, Vec3) {
    let position = origin + aim * config.spawn_forward_offset + Vec3::Y * config.spawn_up_offset;
    let velocity = aim * config.throw_force + Vec3::Y * config.up_force;
    (position, velocity)
}

/// Система: бросок игрока
pub fn player_throw(
    mut commands: Commands,
    time: Res<Time>,
    input: Res<InputSnapshot>,
    owners: ColliderOwners,
    mut players: Query<
        (Entity, &Transform, &PlayerThrowConfig, &mut ThrowCooldown, Option<&ThrowPoint>),
        (With<Player>, Without<Dead>),
    >,
    cameras: Query<(&FollowCamera, &Transform), Without<Player>>,
    points: Query<&Transform, (Without<Player>, Without<FollowCamera>)>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    if !input.throw_pressed {
        return;
    }

    let now = time.elapsed_secs();

    for (entity, transform, config, mut cooldown, throw_point) in players.iter_mut() {
        let Some(grenade) = config.grenade.as_ref() else {
            continue;
        };
        if !cooldown.ready(now, config.cooldown, config.cooldown_from_start) {
            continue;
        }

        let camera = cameras
            .iter()
            .find(|(follow, _)| follow.target == entity)
            .map(|(_, camera_transform)| camera_transform);

        let (forward, right) = match camera {
            Some(camera_transform) => (*camera_transform.forward(), *camera_transform.right()),
            None => (transform.rotation * Vec3::Z, actor_right(transform.rotation)),
        };

        let origin = throw_point
            .and_then(|point| points.get(point.entity).ok())
            .or(camera)
            .unwrap_or(transform)
            .translation;

        let aim = player_aim(forward, right, config.pitch_degrees);
        let (position, velocity) = player_throw_launch(origin, aim, config);

        let projectile = spawn_projectile(
            &mut commands,
            ThrowRequest {
                thrower: entity,
                position,
                velocity,
            },
            owners.owned_by(entity),
            grenade,
            now,
        );
        cooldown.last_throw = Some(now);

        presentation.write(PresentationEvent::PlaySound {
            cue: SoundCue::Throw,
            position,
            volume: config.master_volume.clamp(0.0, 1.0),
        });

        crate::log_info(&format!(
            "Player {:?} threw grenade {:?} (velocity {:?})",
            entity, projectile, velocity
        ));
    }
}
