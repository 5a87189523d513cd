//! Коллайдеры акторов и окружения (rapier `Collider`)
//!
//! Позиция актора — ноги, поэтому капсула собирается как compound
//! со смещением вверх: Transform остаётся в точке опоры.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{ActiveCollisionTypes, ActiveEvents, Collider, ColliderDisabled, Sensor};

use super::body::PhysicsSettings;
use super::layers::{environment_groups, trigger_groups};
use crate::components::Attached;

/// Половина стороны плиты земли
pub const GROUND_HALF_EXTENT: f32 = 500.0;
/// Половина толщины плиты земли (верх плиты — `ground_height`)
pub const GROUND_HALF_THICKNESS: f32 = 0.5;

/// Marker: плита земли
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Ground;

/// Осевой отрезок капсулы полной высоты `height` и её центр над ногами
fn capsule_dimensions(radius: f32, height: f32) -> (f32, Vec3) {
    let half_height = (height * 0.5 - radius).max(0.0);
    (half_height, Vec3::Y * (half_height + radius))
}

/// Капсула, стоящая на позиции entity
pub fn standing_capsule(radius: f32, height: f32) -> Collider {
    let (half_height, center) = capsule_dimensions(radius, height);
    Collider::compound(vec![(center, Quat::IDENTITY, Collider::capsule_y(half_height, radius))])
}

/// Та же капсула для shape-cast'ов character controller'а
pub fn standing_capsule_shape(radius: f32, height: f32) -> (Collider, Vec3, Quat) {
    let (half_height, center) = capsule_dimensions(radius, height);
    (Collider::capsule_y(half_height, radius), center, Quat::IDENTITY)
}

/// Sensor volume: trigger слой, события входа/выхода
///
/// Kinematic акторы против volume без тела — пара KINEMATIC_STATIC,
/// её rapier по умолчанию не проверяет.
pub fn trigger_volume(radius: f32) -> impl Bundle {
    (
        Collider::ball(radius),
        Sensor,
        trigger_groups(),
        ActiveEvents::COLLISION_EVENTS,
        ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_STATIC,
    )
}

/// Твёрдый бокс окружения (сундук, дверь) с центром в `half_extents.y` над позицией
pub fn solid_block(half_extents: Vec3) -> impl Bundle {
    (
        Collider::compound(vec![(
            Vec3::Y * half_extents.y,
            Quat::IDENTITY,
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z),
        )]),
        environment_groups(),
    )
}

/// Startup: плита земли по `PhysicsSettings::ground_height`
pub fn spawn_ground(mut commands: Commands, settings: Res<PhysicsSettings>) {
    commands.spawn((
        Ground,
        Transform::from_xyz(0.0, settings.ground_height - GROUND_HALF_THICKNESS, 0.0),
        Collider::cuboid(GROUND_HALF_EXTENT, GROUND_HALF_THICKNESS, GROUND_HALF_EXTENT),
        environment_groups(),
    ));
}

/// Включённые коллайдеры `owner` (сам актор + Attached части), по возрастанию Entity
pub fn owned_colliders<'a>(
    colliders: impl IntoIterator<Item = (Entity, Option<&'a Attached>)>,
    owner: Entity,
) -> Vec<Entity> {
    let mut owned: Vec<Entity> = colliders
        .into_iter()
        .filter(|(entity, attached)| attached.map_or(*entity, |a| a.owner) == owner)
        .map(|(entity, _)| entity)
        .collect();
    owned.sort();
    owned
}

/// Владелец коллайдера: актор для Attached частей, иначе сам коллайдер
#[derive(SystemParam)]
pub struct ColliderOwners<'w, 's> {
    colliders: Query<'w, 's, (Entity, Option<&'static Attached>), (With<Collider>, Without<ColliderDisabled>)>,
    attachments: Query<'w, 's, &'static Attached>,
}

impl ColliderOwners<'_, '_> {
    pub fn owner_of(&self, collider: Entity) -> Entity {
        self.attachments.get(collider).map_or(collider, |attached| attached.owner)
    }

    pub fn owned_by(&self, owner: Entity) -> Vec<Entity> {
        owned_colliders(self.colliders.iter(), owner)
    }
}
