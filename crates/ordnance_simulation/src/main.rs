//! Headless симуляция ORDNANCE
//!
//! Сцена: игрок, враг, мина, сундук и дверь. Скриптованный ввод,
//! без рендера. Опционально: путь к RON tuning первым аргументом.

use bevy::ecs::system::RunSystemOnce;
use bevy::prelude::*;
use ordnance_simulation::combat::spawn_mine;
use ordnance_simulation::input::{axes_from_keys, InputSnapshot};
use ordnance_simulation::*;

fn main() {
    let tuning = match std::env::args().nth(1) {
        Some(path) => match GameTuning::from_file(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                eprintln!("Failed to load tuning from {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => GameTuning::default(),
    };
    let layout = tuning.key_layout;

    println!("Starting ORDNANCE headless simulation");

    let mut app = create_headless_app_with(tuning);

    let scene = app.world_mut().run_system_once(
        |mut commands: Commands, navigation: Res<Navigation>, tuning: Res<GameTuning>| {
            let player = spawn_player(&mut commands, Vec3::ZERO, 0.0, &tuning.player);
            spawn_enemy(&mut commands, navigation.service.as_ref(), Vec3::new(0.0, 0.0, 11.0), &tuning.enemy);
            spawn_mine(&mut commands, Vec3::new(4.0, 0.0, 3.0), &tuning.mine);
            spawn_chest(&mut commands, Vec3::new(-5.0, 0.0, 1.0));
            spawn_door(&mut commands, Vec3::new(-5.0, 0.0, -6.0));
            player.actor
        },
    );
    let player = match scene {
        Ok(player) => player,
        Err(err) => {
            eprintln!("Failed to build scene: {}", err);
            std::process::exit(1);
        }
    };

    // Запускаем 1200 тиков (20 секунд)
    for tick in 0..1200u32 {
        {
            let mut input = app.world_mut().resource_mut::<InputSnapshot>();
            // Влево к сундуку, затем назад к двери
            input.axes = match tick {
                0..=239 => axes_from_keys(layout, &['q', 'a']),
                240..=479 => axes_from_keys(layout, &['s']),
                _ => Vec2::ZERO,
            };
            input.pointer_delta = Vec2::new(0.02, 0.0);
            input.throw_pressed = tick % 90 == 45;
            input.interact_pressed = tick % 30 == 0;
        }

        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            let health = world.get::<Health>(player).copied();
            let position = world.get::<Transform>(player).map(|t| t.translation);
            println!(
                "Tick {}: {} entities, player {:?} at {:?}",
                tick,
                world.entities().len(),
                health,
                position
            );
        }

        let session = app.world().resource::<SessionState>();
        if let Some(outcome) = session.outcome {
            println!("Session finished at tick {}: {:?}", tick, outcome);
            break;
        }
    }

    println!("Simulation complete!");
}
