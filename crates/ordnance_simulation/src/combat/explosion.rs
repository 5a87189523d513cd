//! ExplosionResolver: area query → урон → импульсы → VFX/SFX → despawn
//!
//! Владелец гранаты в area-шаге не исключается: если бросивший стоит
//! в радиусе взрыва, он получает урон (исключён только контакт).
//! Урон — один раз на Damageable, даже если взрыв задел несколько его Hurtbox.

use bevy::ecs::entity::EntityHashSet;
use bevy::prelude::*;
use bevy_rapier3d::prelude::{
    Collider, CollisionGroups, ExternalImpulse, Group, QueryFilter, RapierContext, ReadRapierContext, RigidBody,
};

use super::damage::{apply_damage, resolve_damage_target, DamageDealt, EntityDied};
use super::explosive::{BlastConfig, Detonation};
use crate::components::{Health, Hurtbox};
use crate::physics::layers::{layers_from_bits, LAYER_ENVIRONMENT};
use crate::physics::{explosion_impulse, ColliderOwners};
use crate::presentation::{PresentationEvent, SoundCue, VfxCue};

/// Урон взрыва каждой задетой цели
pub const EXPLOSION_DAMAGE: u32 = 1;

/// VFX raycast: старт выше центра и максимальная дистанция вниз
pub const VFX_RAY_LIFT: f32 = 0.2;
pub const VFX_RAY_DISTANCE: f32 = 2.0;

pub const MAX_EXPLOSION_VOLUME: f32 = 2.0;

/// Коллайдер, задетый взрывом
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapHit {
    pub collider: Entity,
    /// Актор-владелец (`Attached::owner`) или сам коллайдер
    pub owner: Entity,
}

/// Коллайдеры в радиусе взрыва (без сенсоров), по возрастанию Entity
pub fn blast_overlap(
    context: &RapierContext,
    owners: &ColliderOwners,
    center: Vec3,
    blast: &BlastConfig,
) -> Vec<OverlapHit> {
    if blast.radius <= 0.0 {
        return Vec::new();
    }

    let filter = QueryFilter::new()
        .exclude_sensors()
        .groups(CollisionGroups::new(Group::ALL, layers_from_bits(blast.affect_layers)));

    let mut colliders = Vec::new();
    context.intersect_shape(center, Quat::IDENTITY, &*Collider::ball(blast.radius).raw, filter, |collider| {
        colliders.push(collider);
        true
    });
    colliders.sort();

    colliders
        .into_iter()
        .map(|collider| OverlapHit {
            collider,
            owner: owners.owner_of(collider),
        })
        .collect()
}

/// Цели урона: Damageable за каждым задетым Hurtbox, без повторов
pub fn damage_targets(
    hits: &[OverlapHit],
    explosive: Entity,
    is_hurtbox: impl Fn(Entity) -> bool,
    has_health: impl Fn(Entity) -> bool,
) -> Vec<Entity> {
    let mut seen = EntityHashSet::default();
    hits.iter()
        .filter(|hit| hit.collider != explosive && is_hurtbox(hit.collider))
        .filter_map(|hit| resolve_damage_target(hit.collider, hit.owner, &has_health))
        .filter(|target| seen.insert(*target))
        .collect()
}

/// Позиция и ориентация VFX: на поверхности окружения под взрывом, up вдоль нормали
pub fn vfx_placement(context: &RapierContext, center: Vec3) -> (Vec3, Quat) {
    let filter = QueryFilter::new()
        .exclude_sensors()
        .groups(CollisionGroups::new(Group::ALL, LAYER_ENVIRONMENT));

    match context.cast_ray_and_get_normal(center + Vec3::Y * VFX_RAY_LIFT, Vec3::NEG_Y, VFX_RAY_DISTANCE, true, filter) {
        Some((_, hit)) => {
            let normal = hit.normal.normalize_or(Vec3::Y);
            (hit.point, Quat::from_rotation_arc(Vec3::Y, normal))
        }
        None => (center, Quat::IDENTITY),
    }
}

pub fn explosion_volume(volume: f32) -> f32 {
    volume.clamp(0.0, MAX_EXPLOSION_VOLUME)
}

/// Система: обработать Detonation события
pub fn resolve_detonations(
    mut commands: Commands,
    mut detonations: EventReader<Detonation>,
    rapier_context: ReadRapierContext,
    owners: ColliderOwners,
    hurtboxes: Query<(), With<Hurtbox>>,
    mut healths: Query<&mut Health>,
    mut bodies: Query<(&mut ExternalImpulse, &Transform, &RigidBody)>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<EntityDied>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    let context = rapier_context.single().ok();

    for detonation in detonations.read() {
        let blast = &detonation.blast;
        let hits = context
            .as_ref()
            .map(|context| blast_overlap(context, &owners, detonation.center, blast))
            .unwrap_or_default();

        crate::log_info(&format!(
            "Explosion {:?} at {:?} (radius {:.1}, {} colliders)",
            detonation.explosive,
            detonation.center,
            blast.radius,
            hits.len()
        ));

        let targets = damage_targets(
            &hits,
            detonation.explosive,
            |collider| hurtboxes.contains(collider),
            |entity| healths.contains(entity),
        );
        for target in targets {
            if let Ok(mut health) = healths.get_mut(target) {
                apply_damage(
                    target,
                    health.as_mut(),
                    EXPLOSION_DAMAGE,
                    detonation.explosive,
                    &mut damage_events,
                    &mut death_events,
                );
            }
        }

        for hit in hits.iter().filter(|hit| hit.collider != detonation.explosive) {
            let Ok((mut impulse, transform, rigid_body)) = bodies.get_mut(hit.collider) else {
                continue;
            };
            if *rigid_body == RigidBody::Dynamic {
                impulse.impulse +=
                    explosion_impulse(detonation.center, blast.radius, blast.force, transform.translation);
            }
        }

        if blast.spawn_vfx {
            let (position, rotation) = context
                .as_ref()
                .map_or((detonation.center, Quat::IDENTITY), |context| {
                    vfx_placement(context, detonation.center)
                });
            presentation.write(PresentationEvent::SpawnVfx {
                cue: VfxCue::Explosion,
                position,
                rotation,
                lifetime: blast.vfx_lifetime,
            });
        }

        if blast.play_sound {
            presentation.write(PresentationEvent::PlaySound {
                cue: SoundCue::Explosion,
                position: detonation.center,
                volume: explosion_volume(blast.sfx_volume),
            });
        }

        if let Ok(mut entity) = commands.get_entity(detonation.explosive) {
            entity.despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(collider: u32, owner: u32) -> OverlapHit {
        OverlapHit {
            collider: Entity::from_raw(collider),
            owner: Entity::from_raw(owner),
        }
    }

    #[test]
    fn test_two_hurtboxes_of_one_actor_give_one_target() {
        let actor = Entity::from_raw(1);
        let grenade = Entity::from_raw(9);
        // Капсула актора + attached hurtbox (голова) + ragdoll часть без Hurtbox
        let hits = [hit(1, 1), hit(4, 1), hit(5, 1), hit(9, 9)];

        let is_hurtbox = |e: Entity| e != Entity::from_raw(5);
        let has_health = |e: Entity| e == actor;

        assert_eq!(damage_targets(&hits, grenade, is_hurtbox, has_health), vec![actor]);
    }

    #[test]
    fn test_damage_targets_skip_explosive_and_healthless() {
        let grenade = Entity::from_raw(9);
        let hits = [hit(9, 9), hit(2, 2), hit(3, 3)];

        let targets = damage_targets(&hits, grenade, |_| true, |e| e != Entity::from_raw(3));
        assert_eq!(targets, vec![Entity::from_raw(2)], "сама граната и цели без Health не получают урон");
    }

    #[test]
    fn test_explosion_volume_clamped() {
        assert_eq!(explosion_volume(3.0), 2.0);
        assert_eq!(explosion_volume(-1.0), 0.0);
        assert_eq!(explosion_volume(1.0), 1.0);
    }
}
