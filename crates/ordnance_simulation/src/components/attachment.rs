//! Attachment компоненты: throw point, ragdoll части, прочие "дочерние" entity
//!
//! Плоская привязка вместо Transform-иерархии: Attached entity каждый тик
//! копирует позицию владельца + локальный offset. `owner` также служит
//! для маршрутизации урона и поиска коллайдеров актора.

use bevy::prelude::*;
use bevy_rapier3d::prelude::RigidBody;

/// Привязка entity к владельцу (актору)
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Attached {
    /// Актор-владелец
    pub owner: Entity,
    /// Offset в локальных координатах владельца
    pub local_offset: Vec3,
}

impl Attached {
    pub fn new(owner: Entity, local_offset: Vec3) -> Self {
        Self { owner, local_offset }
    }

    /// Мировая позиция при данном transform владельца
    pub fn world_position(&self, owner_transform: &Transform) -> Vec3 {
        owner_transform.translation + owner_transform.rotation * self.local_offset
    }
}

/// Точка броска (у игрока и врагов)
///
/// Если при спавне точку не задали — создаётся автоматически
/// на высоте `max(1, capsule_height * 0.75)`.
#[derive(Component, Debug, Clone, Copy)]
pub struct ThrowPoint {
    pub entity: Entity,
}

/// Высота автоматически созданной throw point
pub fn default_throw_point_height(capsule_height: f32) -> f32 {
    (capsule_height * 0.75).max(1.0)
}

/// Система: Attached entity следуют за владельцем
///
/// Dynamic тела (активный ragdoll) живут своей физикой и не трогаются.
pub fn follow_attachments(
    mut attached: Query<(&Attached, &mut Transform, Option<&RigidBody>)>,
    owners: Query<&Transform, Without<Attached>>,
) {
    for (attachment, mut transform, rigid_body) in attached.iter_mut() {
        if matches!(rigid_body, Some(RigidBody::Dynamic)) {
            continue;
        }

        let Ok(owner_transform) = owners.get(attachment.owner) else {
            continue;
        };

        transform.translation = attachment.world_position(owner_transform);
        transform.rotation = owner_transform.rotation;
    }
}
