//! Chest → door flow integration tests

mod common;

use bevy::prelude::*;
use common::*;
use ordnance_simulation::interaction::{Interactable, SolidBody};
use ordnance_simulation::*;

fn press_interact(app: &mut App) {
    set_input(
        app,
        InputSnapshot {
            interact_pressed: true,
            ..Default::default()
        },
    );
    app.update();
}

fn in_range(app: &App, entity: Entity) -> bool {
    app.world()
        .get::<Interactable>(entity)
        .is_some_and(|interactable| interactable.player_in_range)
}

#[test]
fn test_prompt_follows_player_range() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    let chest = spawn_with(&mut app, |commands| spawn_chest(commands, Vec3::new(0.0, 0.0, 1.0)));

    // Trigger в Physics, реакция в Update следующего тика
    run_ticks(&mut app, 2);
    assert!(in_range(&app, chest));

    let shown = presentation_events(&app).into_iter().any(|event| {
        event
            == PresentationEvent::ShowPrompt {
                entity: chest,
                position: Vec3::new(0.0, 1.6, 1.0),
            }
    });
    assert!(shown);

    teleport(&mut app, player, Vec3::new(0.0, 0.0, 20.0));
    run_ticks(&mut app, 2);
    assert!(!in_range(&app, chest));
    assert!(presentation_events(&app)
        .into_iter()
        .any(|event| event == PresentationEvent::HidePrompt { entity: chest }));
}

#[test]
fn test_locked_door_without_key() {
    let mut app = create_headless_app();

    spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default());
    let door = spawn_with(&mut app, |commands| spawn_door(commands, Vec3::new(0.0, 0.0, 1.0)));

    run_ticks(&mut app, 2);
    assert!(in_range(&app, door));

    press_interact(&mut app);

    let session = app.world().resource::<SessionState>();
    assert!(session.is_running());
    assert!(!session.has_key);
    assert!(app.world().get::<Interactable>(door).is_some_and(|door| !door.completed));
}

#[test]
fn test_chest_then_door_wins_session() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    let chest = spawn_with(&mut app, |commands| spawn_chest(commands, Vec3::new(0.0, 0.0, 1.0)));
    let door = spawn_with(&mut app, |commands| spawn_door(commands, Vec3::new(0.0, 0.0, -20.0)));

    run_ticks(&mut app, 2);
    press_interact(&mut app);

    assert!(app.world().resource::<SessionState>().has_key);
    assert!(app.world().get::<Interactable>(chest).is_some_and(|chest| chest.completed));
    assert!(presentation_events(&app).into_iter().any(|event| {
        event
            == PresentationEvent::AnimTrigger {
                entity: chest,
                trigger: "Open",
            }
    }));

    // Edge flag сброшен в конце тика: повторный interact не нужен сундуку
    assert!(!app.world().resource::<InputSnapshot>().interact_pressed);

    teleport(&mut app, player, Vec3::new(0.0, 0.0, -19.0));
    run_ticks(&mut app, 2);
    assert!(in_range(&app, door));
    assert!(!in_range(&app, chest));

    press_interact(&mut app);

    let session = app.world().resource::<SessionState>();
    assert_eq!(session.outcome, Some(SessionOutcome::Won));
    assert!(app.world().get::<Interactable>(door).is_some_and(|door| door.completed));

    // Открытая дверь больше не блокирует проход
    let door_bodies = app
        .world_mut()
        .query_filtered::<&Attached, With<SolidBody>>()
        .iter(app.world())
        .filter(|attached| attached.owner == door)
        .count();
    assert_eq!(door_bodies, 0);

    // Сессия закончена: движение остановлено
    let before = position(&app, player);
    set_input(
        &mut app,
        InputSnapshot {
            axes: Vec2::Y,
            ..Default::default()
        },
    );
    run_ticks(&mut app, 20);
    assert_eq!(position(&app, player), before);
}
