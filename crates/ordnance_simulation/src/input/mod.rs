//! Input snapshot (host → simulation)
//!
//! Host (движок/тест) каждый тик заполняет `InputSnapshot`:
//! оси движения, pointer delta, edge-флаги действий.
//! Edge-флаги гасятся в конце тика (`TickPhase::Cleanup`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Сырые данные ввода этого тика
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// x — вправо, y — вперёд (каждая ось в [-1, 1])
    pub axes: Vec2,
    /// Смещение указателя (x — вправо, y — вверх)
    pub pointer_delta: Vec2,
    /// Нажатие броска в этом тике
    pub throw_pressed: bool,
    /// Нажатие взаимодействия в этом тике
    pub interact_pressed: bool,
}

impl InputSnapshot {
    /// Оси, clamp каждой в [-1, 1]
    pub fn clamped_axes(&self) -> Vec2 {
        Vec2::new(self.axes.x.clamp(-1.0, 1.0), self.axes.y.clamp(-1.0, 1.0))
    }
}

/// Раскладка клавиш движения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Reflect)]
pub enum KeyLayout {
    /// Z вперёд, S назад, Q влево, D вправо (AZERTY)
    #[default]
    Zqsd,
    /// W вперёд, S назад, A влево, D вправо
    Wasd,
}

/// Логические клавиши движения (host передаёт нажатые символы)
pub fn axes_from_keys(layout: KeyLayout, pressed: &[char]) -> Vec2 {
    let (forward, back, left, right) = match layout {
        KeyLayout::Zqsd => ('z', 's', 'q', 'd'),
        KeyLayout::Wasd => ('w', 's', 'a', 'd'),
    };

    let is_down = |key: char| pressed.iter().any(|c| c.eq_ignore_ascii_case(&key));
    let axis = |positive: char, negative: char| {
        (is_down(positive) as i32 - is_down(negative) as i32) as f32
    };

    Vec2::new(axis(right, left), axis(forward, back))
}

/// Система: сбросить edge-флаги (конец тика)
pub fn consume_input_edges(mut input: ResMut<InputSnapshot>) {
    input.throw_pressed = false;
    input.interact_pressed = false;
    input.pointer_delta = Vec2::ZERO;
}
