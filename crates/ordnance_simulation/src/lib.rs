//! ORDNANCE Simulation Core
//!
//! Headless ECS-симуляция на Bevy 0.16: third-person locomotion + камера,
//! гранаты и мины, враг с баллистическим броском, сундук/дверь.
//!
//! Host (движок) владеет рендером, звуком и анимацией:
//! - пишет `InputSnapshot` каждый тик
//! - читает `PresentationEvent` (анимация, звук, VFX, подсказки)
//! - отдаёт navmesh через `NavigationService`
//!
//! Тик (FixedUpdate, 60 Hz) разбит на фазы `TickPhase`:
//! Sync → Update → Physics → Combat → Late → Cleanup.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;

// Публичные модули
pub mod ai;
pub mod camera;
pub mod combat;
pub mod components;
pub mod config;
pub mod input;
pub mod interaction;
pub mod logger;
pub mod math;
pub mod navigation;
pub mod physics;
pub mod player;
pub mod presentation;
pub mod session;

// Re-export основных типов
pub use ai::{spawn_enemy, AIPlugin, EnemyBrain, EnemyConfig, EnemyState};
pub use camera::CameraRigPlugin;
pub use combat::{CombatPlugin, DamageDealt, Dead, Detonation, EntityDied, Explosive, GrenadeConfig, MineConfig};
pub use components::*;
pub use config::{ConfigError, GameTuning};
pub use input::InputSnapshot;
pub use interaction::{spawn_chest, spawn_door, InteractionPlugin};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter};
pub use navigation::{FlatNavMesh, Navigation, NavigationService};
pub use physics::{PhysicsPlugin, PhysicsSettings};
pub use player::{spawn_player, PlayerConfig, PlayerPlugin};
pub use presentation::{PresentationEvent, PresentationPlugin};
pub use session::{SessionOutcome, SessionState};

use input::consume_input_edges;
use session::session_running;

/// Длительность одного тика (60 Hz)
pub const TICK: Duration = Duration::from_nanos(1_000_000_000 / 60);

/// Фазы тика (FixedUpdate), выполняются строго по порядку
///
/// Update..Late останавливаются, когда сессия завершена (победа/смерть).
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickPhase {
    /// Attachments, гравитация из настроек
    Sync,
    /// Input, locomotion, AI, interaction
    Update,
    /// Rapier шаг, character controller, контакты, триггеры
    Physics,
    /// Взрывы, урон, смерть
    Combat,
    /// Камера (после финальных transform'ов акторов)
    Late,
    /// Сброс edge-флагов ввода
    Cleanup,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz
            .insert_resource(Time::<Fixed>::from_duration(TICK))
            .init_resource::<InputSnapshot>()
            .init_resource::<SessionState>()
            .init_resource::<Navigation>()
            .init_resource::<GameTuning>()
            .configure_sets(
                FixedUpdate,
                (
                    TickPhase::Sync,
                    TickPhase::Update.run_if(session_running),
                    TickPhase::Physics.run_if(session_running),
                    TickPhase::Combat.run_if(session_running),
                    TickPhase::Late.run_if(session_running),
                    TickPhase::Cleanup,
                )
                    .chain(),
            )
            // Подсистемы
            .add_plugins((
                PresentationPlugin,
                PhysicsPlugin,
                CombatPlugin,
                PlayerPlugin,
                AIPlugin,
                CameraRigPlugin,
                InteractionPlugin,
            ))
            .add_systems(FixedUpdate, consume_input_edges.in_set(TickPhase::Cleanup));
    }
}

/// Minimal Bevy App для headless симуляции (дефолтный tuning)
pub fn create_headless_app() -> App {
    create_headless_app_with(GameTuning::default())
}

/// Headless App: каждый `app.update()` — ровно один тик
pub fn create_headless_app_with(tuning: GameTuning) -> App {
    init_logger();

    let mut app = App::new();
    // TransformPlugin: rapier читает GlobalTransform
    app.add_plugins((MinimalPlugins, TransformPlugin, SimulationPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(TICK))
        .insert_resource(tuning.physics.clone())
        .insert_resource(tuning);

    // Первый update: Time<Real> инициализируется с нулевым delta
    app.update();

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity для детерминизма
    entities.sort_by_key(|(entity, _)| *entity);

    // Сериализуем через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.to_bits().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
