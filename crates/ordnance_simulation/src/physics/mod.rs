//! Physics simulation module
//!
//! Rapier pipeline внутри fixed тика:
//! - colliders: капсулы акторов, trigger volumes, земля, владельцы коллайдеров
//! - body: глобальные параметры, радиальные импульсы
//! - character: KinematicCharacterController игрока
//! - events: rapier CollisionEvent → контакты / trigger volumes
//! - ragdoll: RagdollRig (переключение одним флагом)
//! - layers: collision groups
//!
//! Шаг rapier (SyncBackend → StepSimulation → Writeback) вложен в
//! `TickPhase::Physics`, так что combat видит контакты того же тика.

pub mod body;
pub mod character;
pub mod colliders;
pub mod events;
pub mod layers;
pub mod ragdoll;

use bevy::prelude::*;
use bevy_rapier3d::plugin::PhysicsSet;
use bevy_rapier3d::prelude::{RapierPhysicsPlugin, TimestepMode};

pub use body::{apply_physics_settings, explosion_impulse, PhysicsSettings};
pub use character::{character_controller, move_character, sync_grounded};
pub use colliders::{
    owned_colliders, solid_block, spawn_ground, standing_capsule, trigger_volume, ColliderOwners, Ground,
};
pub use events::{route_collision_events, CollisionStarted, ContactTarget, TriggerEntered, TriggerExited};
pub use ragdoll::RagdollRig;

use crate::combat::ThrowerContactFilter;
use crate::components::follow_attachments;
use crate::{TickPhase, TICK};

/// Physics Plugin
///
/// Sync: attachments, гравитация из настроек.
/// Physics: attachments → rapier шаг → grounded флаги → игровые события.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RapierPhysicsPlugin::<ThrowerContactFilter>::default().in_schedule(FixedUpdate))
            .insert_resource(TimestepMode::Fixed {
                dt: TICK.as_secs_f32(),
                substeps: 1,
            })
            .configure_sets(
                FixedUpdate,
                (PhysicsSet::SyncBackend, PhysicsSet::StepSimulation, PhysicsSet::Writeback)
                    .chain()
                    .in_set(TickPhase::Physics),
            )
            .init_resource::<PhysicsSettings>()
            .add_event::<CollisionStarted>()
            .add_event::<TriggerEntered>()
            .add_event::<TriggerExited>()
            .add_systems(Startup, spawn_ground)
            .add_systems(
                FixedUpdate,
                (follow_attachments, apply_physics_settings)
                    .chain()
                    .in_set(TickPhase::Sync),
            )
            .add_systems(
                FixedUpdate,
                follow_attachments
                    .in_set(TickPhase::Physics)
                    .before(PhysicsSet::SyncBackend),
            )
            .add_systems(
                FixedUpdate,
                (sync_grounded, route_collision_events)
                    .chain()
                    .in_set(TickPhase::Physics)
                    .after(PhysicsSet::Writeback),
            );
    }
}
