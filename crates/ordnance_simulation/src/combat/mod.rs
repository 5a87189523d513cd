//! Combat system module (explosives)
//!
//! ECS ответственность:
//! - Explosive lifecycle (Armed → Exploded, write-once)
//! - ExplosionResolver: area damage, радиальные импульсы, VFX/SFX hooks
//! - Spawn снарядов с исключением самоподрыва
//! - Events: Detonation, DamageDealt, EntityDied
//!
//! Контакты/триггеры приходят из physics фазы того же тика.

use bevy::prelude::*;

pub mod damage;
pub mod explosion;
pub mod explosive;
pub mod throw;

// Re-export основных типов
pub use damage::{apply_damage, Damageable, DamageDealt, Dead, EntityDied};
pub use explosion::{blast_overlap, damage_targets, resolve_detonations, vfx_placement, OverlapHit};
pub use explosive::{spawn_mine, BlastConfig, Detonation, Explosive, ExplosiveKind, ExplosiveState, MineConfig};
pub use throw::{spawn_projectile, GrenadeConfig, Projectile, ThrowRequest, ThrowerContactFilter};

use crate::TickPhase;

/// Combat Plugin
///
/// Порядок выполнения (TickPhase::Combat):
/// 1. detonate_on_contact / detonate_on_trigger / tick_fuses — триггеры взрыва
/// 2. resolve_detonations — урон, импульсы, VFX/SFX, despawn
/// 3. publish_health_changes — health bar
/// 4. handle_player_death — смерть игрока останавливает сессию
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<Detonation>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: триггеры (write-once флаг гасит дубликаты)
                explosive::detonate_on_contact,
                explosive::detonate_on_trigger,
                explosive::tick_fuses,
                // Фаза 2: взрывы
                explosion::resolve_detonations,
                // Фаза 3: последствия урона
                damage::publish_health_changes,
                damage::handle_player_death,
            )
                .chain()
                .in_set(TickPhase::Combat),
        );
    }
}
