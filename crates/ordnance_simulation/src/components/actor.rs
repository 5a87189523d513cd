//! Базовые компоненты акторов: Player, Enemy, Health, Hurtbox

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// AI systems используют `Without<Player>`, input systems — `With<Player>`.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Marker component для врага (управляется EnemyAI)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Коллайдер, через который актор получает урон от взрывов
///
/// Урон уходит в Health самого коллайдера или его владельца
/// (`Attached::owner`). Ragdoll части без Hurtbox урона не передают.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hurtbox;

/// Результат попытки нанести урон
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    /// Сколько HP реально снято
    pub applied: u32,
    /// Этот вызов убил актора (ровно один раз за жизнь)
    pub died: bool,
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max.
/// После смерти (`dead == true`) current остаётся 0, урон игнорируется.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
    pub dead: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(2)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            dead: max == 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.dead && self.current > 0
    }

    /// Снимает HP, no-op если уже мёртв
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::default();
        }

        let applied = amount.min(self.current);
        self.current -= applied;

        let died = self.current == 0;
        if died {
            self.dead = true;
        }

        DamageOutcome { applied, died }
    }
}
