//! Enemy AI module
//!
//! FSM: Returning (начальное) / Idle ⇄ Chasing, Dead терминальное.
//! Атака — баллистический бросок гранаты (math::ballistics).

use bevy::prelude::*;

pub mod enemy;
pub mod systems;

// Re-export основных типов
pub use enemy::{EnemyBrain, EnemyConfig, EnemyState};
pub use systems::{handle_enemy_death, spawn_enemy, update_enemy_ai, EnemyHandles};

use crate::combat::resolve_detonations;
use crate::navigation::steer_agents;
use crate::player::player_throw;
use crate::TickPhase;

/// AI Plugin
///
/// Порядок выполнения:
/// 1. update_enemy_ai — FSM, цель/скорость агента, бросок (после систем игрока)
/// 2. steer_agents — движение агентов по navmesh
/// 3. handle_enemy_death — в Combat фазе, после взрывов
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (update_enemy_ai, steer_agents)
                .chain()
                .after(player_throw)
                .in_set(TickPhase::Update),
        )
        .add_systems(
            FixedUpdate,
            handle_enemy_death
                .after(resolve_detonations)
                .in_set(TickPhase::Combat),
        );
    }
}
