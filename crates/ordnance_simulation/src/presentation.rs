//! Presentation hooks (simulation → host)
//!
//! Fire-and-forget: анимация, звук, VFX, подсказки, health bar.
//! Симуляция не ждёт ответа и не зависит от того, обработал ли host событие.

use bevy::prelude::*;

/// Звуковые cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum SoundCue {
    Throw,
    Explosion,
}

/// VFX cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum VfxCue {
    Explosion,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub enum PresentationEvent {
    /// Float параметр аниматора с damp time
    AnimFloat {
        entity: Entity,
        parameter: &'static str,
        value: f32,
        damp_time: f32,
    },
    /// Trigger аниматора ("Open")
    AnimTrigger { entity: Entity, trigger: &'static str },
    AnimatorEnabled { entity: Entity, enabled: bool },
    /// Позиционный звук, volume уже clamped
    PlaySound {
        cue: SoundCue,
        position: Vec3,
        volume: f32,
    },
    /// Шаги: loop включён/выключен
    Footsteps { entity: Entity, playing: bool },
    /// Host спавнит эффект и удаляет через `lifetime` секунд
    SpawnVfx {
        cue: VfxCue,
        position: Vec3,
        rotation: Quat,
        lifetime: f32,
    },
    ShowPrompt { entity: Entity, position: Vec3 },
    HidePrompt { entity: Entity },
    /// Health bar: новое значение
    HealthChanged { entity: Entity, current: u32, max: u32 },
}

/// Имя float параметра скорости в аниматоре
pub const ANIM_BLEND: &str = "Blend";
pub const ANIM_OPEN: &str = "Open";

pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<PresentationEvent>();
    }
}
