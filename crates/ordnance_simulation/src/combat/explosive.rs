//! Explosive lifecycle: Armed → Exploded (терминальное)
//!
//! Граната: контакт (impact), вход в trigger volume, опциональный fuse.
//! Мина: вход актора (или любого коллайдера) в её trigger volume.
//!
//! `detonate()` — единственное место, где ставится write-once флаг.
//! Любой триггер после взрыва — no-op, поэтому повторные/одновременные
//! события дают ровно одну `Detonation`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Enemy, Player};
use crate::physics::{trigger_volume, ColliderOwners, CollisionStarted, TriggerEntered};

/// Параметры взрыва (общие для гранаты и мины)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct BlastConfig {
    pub radius: f32,
    pub force: f32,
    /// Слои, которые задевает взрыв (bits rapier Group, u32::MAX — все)
    pub affect_layers: u32,
    pub spawn_vfx: bool,
    /// Через сколько секунд host удаляет VFX (0 — не удалять)
    pub vfx_lifetime: f32,
    pub play_sound: bool,
    /// Громкость взрыва, clamp в [0, 2]
    pub sfx_volume: f32,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            radius: 4.0,
            force: 400.0,
            affect_layers: u32::MAX,
            spawn_vfx: true,
            vfx_lifetime: 3.0,
            play_sound: true,
            sfx_volume: 1.0,
        }
    }
}

/// Мина (стационарный trigger volume)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct MineConfig {
    /// false — взрывается только от коллайдеров игрока/врагов
    pub trigger_on_any: bool,
    /// Радиус trigger volume
    pub trigger_radius: f32,
    pub blast: BlastConfig,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            trigger_on_any: false,
            trigger_radius: 0.5,
            blast: BlastConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ExplosiveKind {
    Grenade { explode_on_impact: bool },
    Mine { trigger_on_any: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ExplosiveState {
    #[default]
    Armed,
    Exploded,
}

/// Взрывчатка (граната или мина)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Explosive {
    pub kind: ExplosiveKind,
    pub blast: BlastConfig,
    pub state: ExplosiveState,
    /// Время (Time<Fixed>::elapsed_secs) срабатывания fuse
    pub fuse_deadline: Option<f32>,
}

/// Explosive перешёл в Exploded → ExplosionResolver
#[derive(Event, Debug, Clone, PartialEq)]
pub struct Detonation {
    pub explosive: Entity,
    pub center: Vec3,
    pub blast: BlastConfig,
}

impl Explosive {
    /// Граната; fuse взводится только при `use_fuse_fallback`
    pub fn grenade(explode_on_impact: bool, fuse: Option<f32>, blast: BlastConfig, now: f32) -> Self {
        Self {
            kind: ExplosiveKind::Grenade { explode_on_impact },
            blast,
            state: ExplosiveState::Armed,
            fuse_deadline: fuse.map(|delay| now + delay.max(0.0)),
        }
    }

    pub fn mine(config: &MineConfig) -> Self {
        Self {
            kind: ExplosiveKind::Mine {
                trigger_on_any: config.trigger_on_any,
            },
            blast: config.blast.clone(),
            state: ExplosiveState::Armed,
            fuse_deadline: None,
        }
    }

    pub fn is_exploded(&self) -> bool {
        self.state == ExplosiveState::Exploded
    }

    /// Armed → Exploded. true только для первого вызова; fuse отменяется.
    pub fn detonate(&mut self) -> bool {
        if self.is_exploded() {
            return false;
        }
        self.state = ExplosiveState::Exploded;
        self.fuse_deadline = None;
        true
    }

    /// Контакт с любым не-игнорируемым коллайдером или землёй
    pub fn on_impact(&mut self) -> bool {
        match self.kind {
            ExplosiveKind::Grenade { explode_on_impact: true } => self.detonate(),
            _ => false,
        }
    }

    /// Что-то вошло в trigger volume. `by_actor` — коллайдер принадлежит игроку/врагу.
    pub fn on_trigger_enter(&mut self, by_actor: bool) -> bool {
        match self.kind {
            ExplosiveKind::Grenade { explode_on_impact } if explode_on_impact => self.detonate(),
            ExplosiveKind::Mine { trigger_on_any } if trigger_on_any || by_actor => self.detonate(),
            _ => false,
        }
    }

    /// Проверка fuse на текущем времени
    pub fn on_fuse_tick(&mut self, now: f32) -> bool {
        match self.fuse_deadline {
            Some(deadline) if now >= deadline => self.detonate(),
            _ => false,
        }
    }
}

fn detonation(explosive: Entity, explosive_state: &Explosive, transform: &Transform) -> Detonation {
    Detonation {
        explosive,
        center: transform.translation,
        blast: explosive_state.blast.clone(),
    }
}

/// Система: контакт гранаты → impact
pub fn detonate_on_contact(
    mut contacts: EventReader<CollisionStarted>,
    mut explosives: Query<(&mut Explosive, &Transform)>,
    mut detonations: EventWriter<Detonation>,
) {
    for contact in contacts.read() {
        let Ok((mut explosive, transform)) = explosives.get_mut(contact.reporter) else {
            continue;
        };
        if explosive.on_impact() {
            detonations.write(detonation(contact.reporter, &explosive, transform));
        }
    }
}

/// Система: trigger volumes
///
/// Мина — её volume задет коллайдером (актор определяется по владельцу коллайдера).
/// Граната — она сама вошла в чей-то volume.
pub fn detonate_on_trigger(
    mut entered: EventReader<TriggerEntered>,
    owners: ColliderOwners,
    actors: Query<(), Or<(With<Player>, With<Enemy>)>>,
    mut explosives: Query<(&mut Explosive, &Transform)>,
    mut detonations: EventWriter<Detonation>,
) {
    for event in entered.read() {
        if let Ok((mut explosive, transform)) = explosives.get_mut(event.volume) {
            if explosive.on_trigger_enter(actors.contains(owners.owner_of(event.other))) {
                detonations.write(detonation(event.volume, &explosive, transform));
            }
        }

        if let Ok((mut explosive, transform)) = explosives.get_mut(event.other) {
            if explosive.on_trigger_enter(false) {
                detonations.write(detonation(event.other, &explosive, transform));
            }
        }
    }
}

/// Система: fuse fallback
pub fn tick_fuses(
    time: Res<Time>,
    mut explosives: Query<(Entity, &mut Explosive, &Transform)>,
    mut detonations: EventWriter<Detonation>,
) {
    let now = time.elapsed_secs();
    for (entity, mut explosive, transform) in explosives.iter_mut() {
        if explosive.on_fuse_tick(now) {
            detonations.write(detonation(entity, &explosive, transform));
        }
    }
}

/// Спавн мины (Sensor volume на слое Triggers)
pub fn spawn_mine(commands: &mut Commands, position: Vec3, config: &MineConfig) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            trigger_volume(config.trigger_radius),
            Explosive::mine(config),
        ))
        .id()
}
