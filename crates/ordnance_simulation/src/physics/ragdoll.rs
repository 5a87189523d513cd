//! Ragdoll rig: набор тел и коллайдеров, собранный один раз при спавне
//!
//! Structure-of-arrays вместо обхода иерархии при каждом переключении.
//! Один флаг `active` переключает весь rig:
//! - active = false: части kinematic (следуют за владельцем), их коллайдеры выключены,
//!   root коллайдер (капсула актора) включён
//! - active = true: части dynamic, коллайдеры частей включены, root выключен,
//!   каждой части — небольшой импульс вверх

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ColliderDisabled, ExternalImpulse, RigidBody};

/// Импульс вверх для каждой части при включении ragdoll
pub const RAGDOLL_KICK: f32 = 2.0;

#[derive(Component, Debug, Clone, Default)]
pub struct RagdollRig {
    /// Тела частей (RigidBody + Velocity + ExternalImpulse)
    pub bodies: Vec<Entity>,
    /// Коллайдеры частей
    pub part_colliders: Vec<Entity>,
    /// Основной коллайдер актора
    pub root_collider: Option<Entity>,
    pub active: bool,
}

impl RagdollRig {
    /// Переключить rig. Повторный вызов с тем же значением — no-op.
    pub fn set_active(&mut self, commands: &mut Commands, enabled: bool) {
        if self.active == enabled {
            return;
        }
        self.active = enabled;

        for &body in &self.bodies {
            let Ok(mut entity) = commands.get_entity(body) else {
                continue;
            };
            if enabled {
                entity.insert((
                    RigidBody::Dynamic,
                    ExternalImpulse {
                        impulse: Vec3::Y * RAGDOLL_KICK,
                        torque_impulse: Vec3::ZERO,
                    },
                ));
            } else {
                entity.insert(RigidBody::KinematicPositionBased);
            }
        }

        for &collider in &self.part_colliders {
            set_collider_enabled(commands, collider, enabled);
        }

        if let Some(root) = self.root_collider {
            set_collider_enabled(commands, root, !enabled);
        }
    }
}

fn set_collider_enabled(commands: &mut Commands, collider: Entity, enabled: bool) {
    let Ok(mut entity) = commands.get_entity(collider) else {
        return;
    };
    if enabled {
        entity.remove::<ColliderDisabled>();
    } else {
        entity.insert(ColliderDisabled);
    }
}
