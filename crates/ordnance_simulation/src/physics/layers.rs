//! Collision Layers Constants
//!
//! Централизованные слои для всего проекта (rapier `Group` bitflags).
//!
//! ## Layers:
//! - GROUP_1: Reserved
//! - GROUP_2: Actors (player, enemies)
//! - GROUP_3: Environment (ground, static obstacles)
//! - GROUP_4: Projectiles (grenades)
//! - GROUP_5: Triggers (mines, chest/door interaction volumes)
//! - GROUP_6: Ragdoll parts

use bevy_rapier3d::prelude::{CollisionGroups, Group};

/// Actors (player, enemies)
pub const LAYER_ACTORS: Group = Group::GROUP_2;

/// Environment (ground plane, static obstacles)
pub const LAYER_ENVIRONMENT: Group = Group::GROUP_3;

/// Projectiles (grenades)
pub const LAYER_PROJECTILES: Group = Group::GROUP_4;

/// Trigger volumes (mines, interactables)
pub const LAYER_TRIGGERS: Group = Group::GROUP_5;

/// Ragdoll parts (включаются только после смерти)
pub const LAYER_RAGDOLL: Group = Group::GROUP_6;

pub fn actor_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_ACTORS, Group::ALL)
}

pub fn environment_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_ENVIRONMENT, Group::ALL)
}

pub fn projectile_groups() -> CollisionGroups {
    CollisionGroups::new(
        LAYER_PROJECTILES,
        LAYER_ACTORS | LAYER_ENVIRONMENT | LAYER_TRIGGERS | LAYER_RAGDOLL,
    )
}

pub fn trigger_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_TRIGGERS, LAYER_ACTORS | LAYER_PROJECTILES | LAYER_RAGDOLL)
}

pub fn ragdoll_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_RAGDOLL, Group::ALL)
}

/// Фильтр shape-cast'ов character controller'а: упирается в акторов и окружение
pub fn character_sweep_groups() -> CollisionGroups {
    CollisionGroups::new(LAYER_ACTORS, LAYER_ACTORS | LAYER_ENVIRONMENT)
}

/// Layer mask из конфига (u32 bits) → Group
pub fn layers_from_bits(bits: u32) -> Group {
    Group::from_bits_truncate(bits)
}
