//! Physics события (контакты и trigger volumes)
//!
//! Rapier `CollisionEvent` переводится в игровые события: контакт
//! репортера (коллайдер с `ActiveEvents::COLLISION_EVENTS`) и вход/выход
//! из Sensor volume.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ActiveEvents, CollisionEvent, Sensor};

use super::colliders::Ground;

/// С чем произошёл контакт
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactTarget {
    /// Плита земли
    Ground,
    Collider(Entity),
}

/// Начало контакта (только для коллайдеров с `ActiveEvents::COLLISION_EVENTS`)
#[derive(Event, Debug, Clone, Copy)]
pub struct CollisionStarted {
    pub reporter: Entity,
    pub other: ContactTarget,
}

/// Коллайдер вошёл в trigger volume (Sensor)
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerEntered {
    pub volume: Entity,
    pub other: Entity,
}

/// Коллайдер покинул trigger volume
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerExited {
    pub volume: Entity,
    pub other: Entity,
}

/// Пара с сенсором: (volume, other)
fn sensor_pair(sensors: &Query<(), With<Sensor>>, a: Entity, b: Entity) -> Option<(Entity, Entity)> {
    if sensors.contains(a) {
        Some((a, b))
    } else if sensors.contains(b) {
        Some((b, a))
    } else {
        None
    }
}

/// Система: rapier `CollisionEvent` → CollisionStarted / TriggerEntered / TriggerExited
pub fn route_collision_events(
    mut collisions: EventReader<CollisionEvent>,
    sensors: Query<(), With<Sensor>>,
    ground: Query<(), With<Ground>>,
    reporters: Query<&ActiveEvents>,
    mut started: EventWriter<CollisionStarted>,
    mut entered: EventWriter<TriggerEntered>,
    mut exited: EventWriter<TriggerExited>,
) {
    let reports = |entity: Entity| {
        reporters
            .get(entity)
            .is_ok_and(|events| events.contains(ActiveEvents::COLLISION_EVENTS))
    };

    for collision in collisions.read() {
        match *collision {
            CollisionEvent::Started(a, b, _) => {
                if let Some((volume, other)) = sensor_pair(&sensors, a, b) {
                    entered.write(TriggerEntered { volume, other });
                    continue;
                }

                for (reporter, other) in [(a, b), (b, a)] {
                    if !reports(reporter) {
                        continue;
                    }
                    let other = if ground.contains(other) {
                        ContactTarget::Ground
                    } else {
                        ContactTarget::Collider(other)
                    };
                    started.write(CollisionStarted { reporter, other });
                }
            }
            CollisionEvent::Stopped(a, b, _) => {
                if let Some((volume, other)) = sensor_pair(&sensors, a, b) {
                    exited.write(TriggerExited { volume, other });
                }
            }
        }
    }
}
