//! Бросок гранаты: конфиг гранаты + спавн снаряда
//!
//! Исключение самоподрыва ставится в момент спавна: все включённые
//! коллайдеры бросающего записываются в `Projectile`, а rapier hook
//! `ThrowerContactFilter` отбрасывает эти пары. Контакт с владельцем
//! не генерируется никогда.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    ActiveEvents, ActiveHooks, BevyPhysicsHooks, Ccd, Collider, ColliderMassProperties, ExternalImpulse,
    GravityScale, PairFilterContextView, RigidBody, Velocity,
};
use bevy_rapier3d::rapier::geometry::SolverFlags;
use serde::{Deserialize, Serialize};

use super::explosive::{BlastConfig, Explosive};
use crate::physics::layers::projectile_groups;

/// Префаб гранаты
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct GrenadeConfig {
    pub fuse_time: f32,
    /// Взрыв от любого контакта
    pub explode_on_impact: bool,
    /// Взрыв через fuse_time, если ничего не задели
    pub use_fuse_fallback: bool,
    /// Радиус коллайдера гранаты
    pub collider_radius: f32,
    pub mass: f32,
    pub blast: BlastConfig,
}

impl Default for GrenadeConfig {
    fn default() -> Self {
        Self {
            fuse_time: 2.5,
            explode_on_impact: true,
            use_fuse_fallback: false,
            collider_radius: 0.1,
            mass: 1.0,
            blast: BlastConfig::default(),
        }
    }
}

/// Летящий снаряд
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub thrower: Entity,
    pub spawn_position: Vec3,
    pub launch_velocity: Vec3,
    /// Коллайдеры бросающего (non-owning), с которыми контакт игнорируется
    pub excluded_colliders: Vec<Entity>,
}

/// Параметры конкретного броска
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowRequest {
    pub thrower: Entity,
    pub position: Vec3,
    pub velocity: Vec3,
}

impl Projectile {
    /// Коллайдер принадлежит бросающему
    pub fn excludes(&self, collider: Entity) -> bool {
        self.excluded_colliders.contains(&collider)
    }
}

/// Спавн гранаты; `excluded_colliders` — включённые коллайдеры бросающего
pub fn spawn_projectile(
    commands: &mut Commands,
    request: ThrowRequest,
    excluded_colliders: Vec<Entity>,
    config: &GrenadeConfig,
    now: f32,
) -> Entity {
    let fuse = config.use_fuse_fallback.then_some(config.fuse_time);

    commands
        .spawn((
            Transform::from_translation(request.position),
            Collider::ball(config.collider_radius),
            projectile_groups(),
            ActiveEvents::COLLISION_EVENTS,
            ActiveHooks::FILTER_CONTACT_PAIRS | ActiveHooks::FILTER_INTERSECTION_PAIR,
            RigidBody::Dynamic,
            ColliderMassProperties::Mass(config.mass),
            GravityScale(1.0),
            Ccd::enabled(),
            Velocity::linear(request.velocity),
            ExternalImpulse::default(),
            Explosive::grenade(config.explode_on_impact, fuse, config.blast.clone(), now),
            Projectile {
                thrower: request.thrower,
                spawn_position: request.position,
                launch_velocity: request.velocity,
                excluded_colliders,
            },
        ))
        .id()
}

/// Rapier hook: пары "граната ↔ коллайдер бросающего" не дают ни контакта, ни trigger
#[derive(SystemParam)]
pub struct ThrowerContactFilter<'w, 's> {
    projectiles: Query<'w, 's, &'static Projectile>,
}

impl ThrowerContactFilter<'_, '_> {
    fn excludes(&self, a: Entity, b: Entity) -> bool {
        self.projectiles.get(a).is_ok_and(|projectile| projectile.excludes(b))
            || self.projectiles.get(b).is_ok_and(|projectile| projectile.excludes(a))
    }
}

impl BevyPhysicsHooks for ThrowerContactFilter<'_, '_> {
    fn filter_contact_pair(&self, context: PairFilterContextView) -> Option<SolverFlags> {
        (!self.excludes(context.collider1(), context.collider2())).then_some(SolverFlags::COMPUTE_IMPULSES)
    }

    fn filter_intersection_pair(&self, context: PairFilterContextView) -> bool {
        !self.excludes(context.collider1(), context.collider2())
    }
}
