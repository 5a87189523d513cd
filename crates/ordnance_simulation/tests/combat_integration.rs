//! Combat integration tests
//!
//! Полный тик: physics события → Explosive → resolver → урон/смерть.

mod common;

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, ColliderDisabled, GravityScale, RigidBody};
use ordnance_simulation::physics::layers::actor_groups;
use common::*;
use ordnance_simulation::combat::{spawn_mine, GrenadeConfig, MineConfig, Projectile};
use ordnance_simulation::math::{solve_launch_velocity, SolutionKind};
use ordnance_simulation::navigation::NavAgent;
use ordnance_simulation::physics::layers::ragdoll_groups;
use ordnance_simulation::physics::RagdollRig;
use ordnance_simulation::player::ThrowCooldown;
use ordnance_simulation::presentation::{SoundCue, VfxCue};
use ordnance_simulation::*;

fn tough_player() -> PlayerConfig {
    PlayerConfig {
        max_health: 1000,
        ..Default::default()
    }
}

#[test]
fn test_enemy_throw_cadence_follows_cooldown_and_solver() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, tough_player()).actor;
    // chase_speed 0: враг не сокращает дистанцию ниже min_throw_range
    let enemy_config = EnemyConfig {
        chase_speed: 0.0,
        ..Default::default()
    };
    let enemy = spawn_test_enemy(&mut app, Vec3::new(0.0, 0.0, 10.0), enemy_config.clone()).actor;

    let mut throws: Vec<(u32, Entity, Projectile)> = Vec::new();
    for tick in 0..360u32 {
        app.update();

        let mut projectiles = app.world_mut().query::<(Entity, &Projectile)>();
        for (entity, projectile) in projectiles.iter(app.world()) {
            if projectile.thrower == enemy && !throws.iter().any(|(_, seen, _)| *seen == entity) {
                throws.push((tick, entity, projectile.clone()));
            }
        }
    }

    // Первый бросок сразу, затем раз в 2.5 с (150 тиков)
    assert_eq!(throws.len(), 3, "throws at ticks {:?}", throws.iter().map(|t| t.0).collect::<Vec<_>>());
    assert_eq!(throws[0].0, 0);
    for pair in throws.windows(2) {
        let interval = pair[1].0 - pair[0].0;
        assert!((150..=151).contains(&interval), "interval {} ticks", interval);
    }

    let params = enemy_config.ballistic_params(PhysicsSettings::default().gravity);
    for (_, _, projectile) in &throws {
        let expected = solve_launch_velocity(projectile.spawn_position, Vec3::ZERO, &params);
        assert_eq!(expected.kind, SolutionKind::Ballistic);
        assert!(
            projectile.launch_velocity.distance(expected.velocity) < 1e-3,
            "launch {:?} vs solver {:?}",
            projectile.launch_velocity,
            expected.velocity
        );
        assert!(!projectile.excluded_colliders.is_empty());
    }

    // Гранаты долетают до игрока; враг себя не подрывает
    assert!(health(&app, player).current < 1000);
    assert_eq!(health(&app, enemy).current, 2);
}

fn enemy_throws(app: &App) -> usize {
    let world = app.world();
    world
        .iter_entities()
        .filter(|entity| entity.get::<Projectile>().is_some())
        .count()
}

#[test]
fn test_enemy_first_throw_waits_for_cooldown_from_start() {
    let mut app = create_headless_app();

    spawn_test_player(&mut app, Vec3::ZERO, tough_player());
    spawn_test_enemy(
        &mut app,
        Vec3::new(0.0, 0.0, 10.0),
        EnemyConfig {
            chase_speed: 0.0,
            cooldown_from_start: true,
            ..Default::default()
        },
    );

    let mut first_throw_at = None;
    for _ in 0..200 {
        app.update();
        if enemy_throws(&app) > 0 {
            first_throw_at = Some(elapsed(&app));
            break;
        }
    }

    let first_throw_at = first_throw_at.expect("enemy throws after cooldown");
    assert!(first_throw_at >= 2.5 - 1e-3, "first throw at {}", first_throw_at);
    assert!(first_throw_at < 2.6, "first throw at {}", first_throw_at);
}

#[test]
fn test_enemy_ignores_dead_player() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, tough_player()).actor;
    let enemy = spawn_test_enemy(&mut app, Vec3::new(0.0, 0.0, 8.0), EnemyConfig::default()).actor;
    app.world_mut().entity_mut(player).insert(Dead);

    run_ticks(&mut app, 120);

    assert_eq!(app.world().get::<EnemyBrain>(enemy).map(|b| b.state), Some(EnemyState::Idle));
    assert_eq!(enemy_throws(&app), 0);
    assert!(position(&app, enemy).distance(Vec3::new(0.0, 0.0, 8.0)) < 0.05);
}

#[test]
fn test_thrower_colliders_are_ignored_at_spawn() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    app.update();

    let grenade = spawn_test_grenade(&mut app, player, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, &GrenadeConfig::default());
    app.world_mut().entity_mut(grenade).insert(GravityScale(0.0));

    assert_eq!(
        app.world().get::<Projectile>(grenade).map(|p| p.excluded_colliders.clone()),
        Some(vec![player])
    );

    // Rapier шаги с гранатой внутри капсулы: контакт отфильтрован hook'ом
    run_ticks(&mut app, 5);
    let explosive = app.world().get::<Explosive>(grenade).expect("grenade stays armed");
    assert!(!explosive.is_exploded());
}

#[test]
fn test_contact_with_thrower_is_ignored_but_blast_hits_thrower() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    app.update();

    let config = GrenadeConfig {
        use_fuse_fallback: true,
        fuse_time: 0.5,
        ..Default::default()
    };
    // Внутри капсулы бросающего, без гравитации
    let grenade = spawn_test_grenade(&mut app, player, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, &config);
    app.world_mut().entity_mut(grenade).insert(GravityScale(0.0));

    run_ticks(&mut app, 10);
    assert!(app.world().get::<Explosive>(grenade).is_some(), "owner contact must not detonate");
    assert_eq!(health(&app, player).current, 2);

    // Fuse: area damage не исключает бросающего
    run_ticks(&mut app, 30);
    assert!(app.world().get::<Explosive>(grenade).is_none());
    assert_eq!(health(&app, player).current, 1);
}

#[test]
fn test_contact_with_other_actor_detonates() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    let enemy = spawn_test_enemy(
        &mut app,
        Vec3::new(30.0, 0.0, 0.0),
        EnemyConfig {
            grenade: None,
            ..Default::default()
        },
    )
    .actor;
    app.update();

    // Бросил враг, но граната внутри игрока
    let grenade = spawn_test_grenade(&mut app, enemy, Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO, &GrenadeConfig::default());
    app.update();

    assert!(app.world().get::<Explosive>(grenade).is_none());
    assert_eq!(health(&app, player).current, 1);
    assert_eq!(health(&app, enemy).current, 2);
}

#[test]
fn test_coincident_triggers_detonate_once() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    app.update();

    // Земля + капсула игрока + истёкший fuse в одном тике
    let config = GrenadeConfig {
        use_fuse_fallback: true,
        fuse_time: 0.0,
        ..Default::default()
    };
    let grenade = spawn_test_grenade(&mut app, Entity::PLACEHOLDER, Vec3::new(0.0, 0.05, 0.0), Vec3::ZERO, &config);
    app.update();

    assert!(app.world().get::<Explosive>(grenade).is_none());
    assert_eq!(health(&app, player).current, 1);

    let explosion_sounds = presentation_events(&app)
        .into_iter()
        .filter(|event| matches!(event, PresentationEvent::PlaySound { cue: SoundCue::Explosion, .. }))
        .count();
    assert_eq!(explosion_sounds, 1);
}

#[test]
fn test_actor_with_two_hurtboxes_takes_damage_once() {
    let mut app = create_headless_app();

    let player = spawn_test_player(
        &mut app,
        Vec3::ZERO,
        PlayerConfig {
            max_health: 5,
            ..Default::default()
        },
    )
    .actor;
    // Вторая hurtbox (голова) на том же акторе
    let head = spawn_with(&mut app, |commands| {
        commands
            .spawn((
                Attached::new(player, Vec3::Y * 1.6),
                Transform::from_translation(Vec3::Y * 1.6),
                Hurtbox,
                Collider::ball(0.2),
                actor_groups(),
                RigidBody::KinematicPositionBased,
            ))
            .id()
    });
    app.update();

    let config = GrenadeConfig {
        use_fuse_fallback: true,
        fuse_time: 0.0,
        explode_on_impact: false,
        ..Default::default()
    };
    let grenade = spawn_test_grenade(&mut app, player, Vec3::new(1.0, 1.0, 0.0), Vec3::ZERO, &config);
    app.update();

    assert!(app.world().get::<Explosive>(grenade).is_none());
    assert!(app.world().get::<Hurtbox>(head).is_some());
    assert_eq!(health(&app, player).current, 4);
}

#[test]
fn test_explosion_vfx_lands_on_ground() {
    let mut app = create_headless_app();

    let config = GrenadeConfig {
        use_fuse_fallback: true,
        fuse_time: 0.0,
        explode_on_impact: false,
        ..Default::default()
    };
    spawn_test_grenade(&mut app, Entity::PLACEHOLDER, Vec3::new(20.0, 0.6, 0.0), Vec3::ZERO, &config);
    app.update();

    let vfx: Vec<(Vec3, Quat)> = presentation_events(&app)
        .into_iter()
        .filter_map(|event| match event {
            PresentationEvent::SpawnVfx {
                cue: VfxCue::Explosion,
                position,
                rotation,
                ..
            } => Some((position, rotation)),
            _ => None,
        })
        .collect();

    assert_eq!(vfx.len(), 1);
    let (position, rotation) = vfx[0];
    assert!(position.y.abs() < 1e-3, "vfx at {:?}", position);
    assert!((position.x - 20.0).abs() < 1e-3);
    assert!((rotation * Vec3::Y).distance(Vec3::Y) < 1e-4);
}

#[test]
fn test_player_walking_into_mine_detonates_it() {
    let mut app = create_headless_app();

    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;
    let mine = spawn_with(&mut app, |commands| {
        spawn_mine(commands, Vec3::new(0.0, 0.0, 1.5), &MineConfig::default())
    });

    set_input(
        &mut app,
        InputSnapshot {
            axes: Vec2::Y,
            ..Default::default()
        },
    );
    run_ticks(&mut app, 60);

    assert!(app.world().get::<Explosive>(mine).is_none());
    assert_eq!(health(&app, player).current, 1);
}

#[test]
fn test_mine_ignores_non_actor_colliders() {
    let mut app = create_headless_app();

    let mine = spawn_with(&mut app, |commands| spawn_mine(commands, Vec3::ZERO, &MineConfig::default()));
    spawn_with(&mut app, |commands| {
        commands.spawn((
            Transform::from_translation(Vec3::new(0.0, 0.5, 0.0)),
            RigidBody::Dynamic,
            Collider::ball(0.3),
            GravityScale(0.0),
            ragdoll_groups(),
        ));
    });

    run_ticks(&mut app, 10);

    let explosive = app.world().get::<Explosive>(mine).expect("mine stays armed");
    assert!(!explosive.is_exploded());
}

#[test]
fn test_player_death_halts_session() {
    let mut app = create_headless_app();

    let player = spawn_test_player(
        &mut app,
        Vec3::ZERO,
        PlayerConfig {
            max_health: 1,
            ..Default::default()
        },
    )
    .actor;
    spawn_with(&mut app, |commands| spawn_mine(commands, Vec3::ZERO, &MineConfig::default()));

    run_ticks(&mut app, 2);

    let session = app.world().resource::<SessionState>();
    assert_eq!(session.outcome, Some(SessionOutcome::PlayerDied));
    assert!(app.world().get::<Dead>(player).is_some());
    assert!(health(&app, player).dead);

    // Update..Late больше не выполняются: ввод игнорируется
    let before = position(&app, player);
    set_input(
        &mut app,
        InputSnapshot {
            axes: Vec2::Y,
            ..Default::default()
        },
    );
    run_ticks(&mut app, 30);
    assert_eq!(position(&app, player), before);
}

#[test]
fn test_enemy_death_enables_ragdoll() {
    let mut app = create_headless_app();

    let handles = spawn_test_enemy(
        &mut app,
        Vec3::new(5.0, 0.0, 0.0),
        EnemyConfig {
            max_health: 1,
            ..Default::default()
        },
    );
    let enemy = handles.actor;

    // До смерти: части kinematic, их коллайдеры выключены
    for &part in &handles.ragdoll_parts {
        assert!(app.world().get::<ColliderDisabled>(part).is_some());
    }

    spawn_with(&mut app, |commands| {
        spawn_mine(commands, Vec3::new(5.0, 0.0, 0.0), &MineConfig::default())
    });
    run_ticks(&mut app, 2);

    let world = app.world();
    assert!(world.get::<Dead>(enemy).is_some());
    assert_eq!(world.get::<EnemyBrain>(enemy).map(|b| b.state), Some(EnemyState::Dead));
    assert_eq!(world.get::<NavAgent>(enemy).map(|a| a.enabled), Some(false));
    assert!(world.get::<RagdollRig>(enemy).is_some_and(|rig| rig.active));
    assert!(world.get::<ColliderDisabled>(enemy).is_some());

    for &part in &handles.ragdoll_parts {
        assert!(world.get::<ColliderDisabled>(part).is_none());
        assert_eq!(world.get::<RigidBody>(part), Some(&RigidBody::Dynamic));
    }

    let animator_disabled = presentation_events(&app).into_iter().any(|event| {
        event
            == PresentationEvent::AnimatorEnabled {
                entity: enemy,
                enabled: false,
            }
    });
    assert!(animator_disabled);

    // Сессия продолжается: смерть врага не финал
    assert!(app.world().resource::<SessionState>().is_running());
}

#[test]
fn test_player_throw_respects_cooldown() {
    let mut app = create_headless_app();
    let player = spawn_test_player(&mut app, Vec3::ZERO, PlayerConfig::default()).actor;

    let throw = InputSnapshot {
        throw_pressed: true,
        ..Default::default()
    };
    let last_throw = |app: &App| app.world().get::<ThrowCooldown>(player).and_then(|c| c.last_throw);

    set_input(&mut app, throw);
    app.update();
    let first = last_throw(&app).expect("first throw is immediate");

    let mut projectiles = app.world_mut().query::<&Projectile>();
    let thrown: Vec<Projectile> = projectiles
        .iter(app.world())
        .filter(|projectile| projectile.thrower == player)
        .cloned()
        .collect();
    assert_eq!(thrown.len(), 1);
    // Origin по умолчанию — камера позади игрока
    assert!(thrown[0].spawn_position.z < -2.0);
    assert!(thrown[0].launch_velocity.z > 0.0 && thrown[0].launch_velocity.y > 0.0);
    assert!(presentation_events(&app)
        .iter()
        .any(|event| matches!(event, PresentationEvent::PlaySound { cue: SoundCue::Throw, .. })));

    // В пределах cooldown нажатие игнорируется
    set_input(&mut app, throw);
    app.update();
    assert_eq!(last_throw(&app), Some(first));

    run_ticks(&mut app, 75);
    set_input(&mut app, throw);
    app.update();
    assert!(last_throw(&app).is_some_and(|t| t > first));
}
