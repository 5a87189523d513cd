//! Damage: Damageable sink, события урона/смерти, смерть игрока
//!
//! Урон приходит только от взрывов (ExplosionResolver).
//! Цель — Health на коллайдере с Hurtbox или на его владельце.

use bevy::prelude::*;

use crate::components::{DamageOutcome, Health, Player};
use crate::presentation::PresentationEvent;
use crate::session::{SessionOutcome, SessionState};

/// Всё, что принимает урон. No-op после смерти.
pub trait Damageable {
    fn take_damage(&mut self, amount: u32) -> DamageOutcome;
    fn is_dead(&self) -> bool;
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        Health::take_damage(self, amount)
    }

    fn is_dead(&self) -> bool {
        !self.is_alive()
    }
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    /// Взрывчатка-источник
    pub source: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Событие: entity умер (ровно один раз за жизнь)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
///
/// Трупы остаются на месте (ragdoll), AI/input их пропускают.
#[derive(Component, Debug)]
pub struct Dead;

/// Кто принимает урон за коллайдер: сам коллайдер или его владелец
pub fn resolve_damage_target(
    collider: Entity,
    owner: Entity,
    has_health: impl Fn(Entity) -> bool,
) -> Option<Entity> {
    if has_health(collider) {
        Some(collider)
    } else if has_health(owner) {
        Some(owner)
    } else {
        None
    }
}

/// Применить урон к Damageable и разослать события
pub fn apply_damage<D: Damageable>(
    target: Entity,
    damageable: &mut D,
    amount: u32,
    source: Entity,
    damage_events: &mut EventWriter<DamageDealt>,
    death_events: &mut EventWriter<EntityDied>,
) -> DamageOutcome {
    let outcome = damageable.take_damage(amount);
    if outcome.applied == 0 && !outcome.died {
        return outcome;
    }

    damage_events.write(DamageDealt {
        source,
        target,
        damage: outcome.applied,
        target_died: outcome.died,
    });

    if outcome.died {
        death_events.write(EntityDied {
            entity: target,
            killer: Some(source),
        });
    }

    outcome
}

/// Система: health bar на каждое изменение
pub fn publish_health_changes(
    mut damage_events: EventReader<DamageDealt>,
    healths: Query<&Health>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for event in damage_events.read() {
        if let Ok(health) = healths.get(event.target) {
            presentation.write(PresentationEvent::HealthChanged {
                entity: event.target,
                current: health.current,
                max: health.max,
            });
        }
    }
}

/// Система: смерть игрока останавливает сессию
pub fn handle_player_death(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    players: Query<(), With<Player>>,
    mut session: ResMut<SessionState>,
) {
    for event in death_events.read() {
        if !players.contains(event.entity) {
            continue;
        }

        if let Ok(mut entity) = commands.get_entity(event.entity) {
            entity.insert(Dead);
        }

        if session.finish(SessionOutcome::PlayerDied) {
            crate::log_info("Player died.");
        }
    }
}
