//! Locomotion / camera / enemy movement integration tests

mod common;

use bevy::prelude::*;
use common::*;
use ordnance_simulation::components::CameraRig;
use ordnance_simulation::*;

fn forward_input() -> InputSnapshot {
    InputSnapshot {
        axes: Vec2::Y,
        ..Default::default()
    }
}

fn passive_enemy() -> EnemyConfig {
    EnemyConfig {
        grenade: None,
        ..Default::default()
    }
}

#[test]
fn test_player_moves_along_camera_forward() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;

    set_input(&mut app, forward_input());
    run_ticks(&mut app, 60);

    let position = position(&app, player);
    assert!(position.z > 2.0, "moved only to {:?}", position);
    assert!(position.x.abs() < 1e-3);
    // Controller держит капсулу на земле (с зазором skin)
    assert!(position.y.abs() < 0.05, "height {}", position.y);

    // За 1 с не дальше max_speed
    let max_speed = PlayerConfig::default().locomotion.max_speed;
    assert!(position.z <= max_speed + 1e-3);
}

#[test]
fn test_turning_camera_changes_move_direction() {
    let mut app = create_headless_app();
    let handles = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default());

    // yaw += 90: камера смотрит вдоль +X
    set_input(
        &mut app,
        InputSnapshot {
            pointer_delta: Vec2::new(-45.0, 0.0),
            ..Default::default()
        },
    );
    app.update();
    assert!((app.world().get::<CameraRig>(handles.actor).map_or(0.0, |rig| rig.yaw) - 90.0).abs() < 1e-4);

    set_input(&mut app, forward_input());
    run_ticks(&mut app, 60);

    let position = position(&app, handles.actor);
    assert!(position.x > 2.0, "moved to {:?}", position);
    assert!(position.z.abs() < 1e-2);

    // Корпус развернулся по направлению движения
    let facing = app.world().get::<Transform>(handles.actor).map(|t| t.rotation * Vec3::Z);
    assert!(facing.is_some_and(|f| f.distance(Vec3::X) < 0.05));
}

#[test]
fn test_player_is_blocked_by_enemy_capsule() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    spawn_test_enemy(
        &mut app,
        Vec3::new(0.0, 0.0, 2.0),
        EnemyConfig {
            chase_speed: 0.0,
            ..passive_enemy()
        },
    );

    set_input(&mut app, forward_input());
    run_ticks(&mut app, 90);

    // Две капсулы по 0.4: центры не ближе 0.8
    let position = position(&app, player);
    assert!(position.z > 1.0, "stopped early at {:?}", position);
    assert!(position.z <= 1.25, "walked into enemy: {:?}", position);
}

#[test]
fn test_player_is_blocked_by_chest() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    spawn_with(&mut app, |commands| spawn_chest(commands, Vec3::new(0.0, 0.0, 2.0)));

    set_input(&mut app, forward_input());
    run_ticks(&mut app, 90);

    // Передняя грань сундука на z = 1.65
    let position = position(&app, player);
    assert!(position.z <= 1.3, "walked into chest: {:?}", position);
}

#[test]
fn test_camera_pitch_stays_clamped() {
    let mut app = create_headless_app();
    let handles = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default());

    for _ in 0..20 {
        set_input(
            &mut app,
            InputSnapshot {
                pointer_delta: Vec2::new(0.0, -50.0),
                ..Default::default()
            },
        );
        app.update();
    }

    let rig = app.world().get::<CameraRig>(handles.actor).cloned().expect("rig");
    assert_eq!(rig.pitch, rig.config.max_pitch);

    // Камера на distance от pivot и смотрит на него
    let camera = *app.world().get::<Transform>(handles.camera).expect("camera transform");
    let pivot = position(&app, handles.actor) + rig.config.pivot_offset;
    assert!((camera.translation.distance(pivot) - rig.config.distance).abs() < 1e-4);
    assert!(camera.translation.y > pivot.y);
}

#[test]
fn test_inverted_pitch_limits_do_not_stop_the_tick() {
    let mut app = create_headless_app();
    let mut config = PlayerConfig::default();
    config.camera.min_pitch = 50.0;
    config.camera.max_pitch = 20.0;
    let handles = spawn_test_player(&mut app, Vec3::ZERO, config);

    set_input(
        &mut app,
        InputSnapshot {
            pointer_delta: Vec2::new(0.0, 30.0),
            ..Default::default()
        },
    );
    run_ticks(&mut app, 3);

    let rig = app.world().get::<CameraRig>(handles.actor).cloned().expect("rig");
    assert_eq!(rig.pitch, 20.0);
}

#[test]
fn test_enemy_detection_hysteresis() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::new(0.0, 0.0, 10.0), PlayerConfig::default()).actor;
    let enemy = spawn_test_enemy(
        &mut app,
        Vec3::ZERO,
        EnemyConfig {
            chase_speed: 0.0,
            ..passive_enemy()
        },
    )
    .actor;

    let state = |app: &App| app.world().get::<EnemyBrain>(enemy).map(|brain| brain.state);

    app.update();
    assert_eq!(state(&app), Some(EnemyState::Chasing));

    // Между detection и lose — погоня продолжается
    teleport(&mut app, player, Vec3::new(0.0, 0.0, 13.0));
    run_ticks(&mut app, 3);
    assert_eq!(state(&app), Some(EnemyState::Chasing));

    teleport(&mut app, player, Vec3::new(0.0, 0.0, 14.5));
    app.update();
    assert_eq!(state(&app), Some(EnemyState::Returning));

    // Уже на origin: следующий тик — Idle
    run_ticks(&mut app, 3);
    assert_eq!(state(&app), Some(EnemyState::Idle));

    // Из Idle снова ловит на detection_radius
    teleport(&mut app, player, Vec3::new(0.0, 0.0, 12.0));
    app.update();
    assert_eq!(state(&app), Some(EnemyState::Chasing));
}

#[test]
fn test_enemy_chases_then_returns_home() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::new(0.0, 0.0, 10.0), PlayerConfig::default()).actor;
    let origin = Vec3::new(0.0, 0.0, 0.0);
    let enemy = spawn_test_enemy(&mut app, origin, passive_enemy()).actor;

    run_ticks(&mut app, 60);
    let chased = position(&app, enemy);
    assert!(chased.z > 2.0, "enemy stayed at {:?}", chased);

    // Игрок убегает за lose_radius
    teleport(&mut app, player, Vec3::new(0.0, 0.0, 80.0));
    run_ticks(&mut app, 240);

    let home = position(&app, enemy);
    let stopping = EnemyConfig::default().stopping_distance;
    assert!(home.distance(origin) <= stopping + 1e-3, "enemy at {:?}", home);
    assert_eq!(
        app.world().get::<EnemyBrain>(enemy).map(|brain| brain.state),
        Some(EnemyState::Idle)
    );
}
