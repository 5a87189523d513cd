//! Общие helpers для integration тестов

#![allow(dead_code)]

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, ColliderDisabled};
use ordnance_simulation::ai::EnemyHandles;
use ordnance_simulation::combat::{spawn_projectile, GrenadeConfig, ThrowRequest};
use ordnance_simulation::physics::owned_colliders;
use ordnance_simulation::player::PlayerHandles;
use ordnance_simulation::*;

/// Выполнить spawn через Commands мира и сразу применить
pub fn spawn_with<T>(app: &mut App, spawn: impl FnOnce(&mut Commands) -> T) -> T {
    let world = app.world_mut();
    let result = spawn(&mut world.commands());
    world.flush();
    result
}

pub fn spawn_test_player(app: &mut App, position: Vec3, config: PlayerConfig) -> PlayerHandles {
    spawn_with(app, |commands| spawn_player(commands, position, 0.0, &config))
}

pub fn spawn_test_enemy(app: &mut App, position: Vec3, config: EnemyConfig) -> EnemyHandles {
    let navigation = FlatNavMesh::open_ground(500.0);
    spawn_with(app, |commands| spawn_enemy(commands, &navigation, position, &config))
}

/// Граната "в руке": спавн с исключением коллайдеров бросающего
pub fn spawn_test_grenade(app: &mut App, thrower: Entity, position: Vec3, velocity: Vec3, config: &GrenadeConfig) -> Entity {
    let now = elapsed(app);
    let world = app.world_mut();

    let mut colliders = world.query_filtered::<(Entity, Option<&Attached>), (With<Collider>, Without<ColliderDisabled>)>();
    let excluded = owned_colliders(colliders.iter(world), thrower);

    let grenade = spawn_projectile(
        &mut world.commands(),
        ThrowRequest {
            thrower,
            position,
            velocity,
        },
        excluded,
        config,
        now,
    );
    world.flush();
    grenade
}

pub fn run_ticks(app: &mut App, ticks: u32) {
    for _ in 0..ticks {
        app.update();
    }
}

pub fn elapsed(app: &App) -> f32 {
    app.world().resource::<Time<Fixed>>().elapsed_secs()
}

pub fn set_input(app: &mut App, input: InputSnapshot) {
    *app.world_mut().resource_mut::<InputSnapshot>() = input;
}

pub fn health(app: &App, entity: Entity) -> Health {
    *app.world().get::<Health>(entity).expect("entity has Health")
}

pub fn position(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).expect("entity has Transform").translation
}

pub fn teleport(app: &mut App, entity: Entity, position: Vec3) {
    app.world_mut()
        .get_mut::<Transform>(entity)
        .expect("entity has Transform")
        .translation = position;
}

/// Все presentation события, ещё лежащие в буферах
pub fn presentation_events(app: &App) -> Vec<PresentationEvent> {
    let events = app.world().resource::<Events<PresentationEvent>>();
    events.get_cursor().read(events).cloned().collect()
}
