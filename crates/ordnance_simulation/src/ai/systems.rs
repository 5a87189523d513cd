//! Enemy AI systems: спавн, FSM + throw gate, смерть.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, ColliderDisabled, ExternalImpulse, RigidBody, Velocity};

use super::enemy::{aim_throw_point, throw_spawn_position, EnemyBrain, EnemyConfig, EnemyState, RAGDOLL_PARTS};
use crate::combat::{spawn_projectile, Dead, EntityDied, ThrowRequest};
use crate::components::{default_throw_point_height, Attached, Enemy, Health, Hurtbox, Player, ThrowPoint};
use crate::math::{estimate_flat_landing, solve_launch_velocity, SolutionKind};
use crate::navigation::{place_on_navmesh, NavAgent, Navigation, NavigationService, ON_MESH_TOLERANCE};
use crate::physics::layers::{actor_groups, ragdoll_groups};
use crate::physics::{standing_capsule, ColliderOwners, PhysicsSettings, RagdollRig};
use crate::presentation::PresentationEvent;

/// Entity врага и его вспомогательных частей
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyHandles {
    pub actor: Entity,
    pub throw_point: Entity,
    pub ragdoll_parts: Vec<Entity>,
}

/// Спавн врага: navmesh placement, throw point, ragdoll rig (выключен)
pub fn spawn_enemy(
    commands: &mut Commands,
    navigation: &dyn NavigationService,
    position: Vec3,
    config: &EnemyConfig,
) -> EnemyHandles {
    let origin = match place_on_navmesh(navigation, position) {
        Some(placed) => placed,
        None => {
            crate::log_warning(&format!(
                "Enemy origin {:?} is not on navmesh. Move the enemy onto navigable ground.",
                position
            ));
            position
        }
    };

    let mut agent = NavAgent::new(config.return_speed, config.stopping_distance);
    agent.set_destination(origin);

    let actor = commands
        .spawn((
            Enemy,
            Transform::from_translation(origin),
            Health::new(config.max_health),
            Hurtbox,
            (
                standing_capsule(config.capsule_radius, config.capsule_height),
                actor_groups(),
                RigidBody::KinematicPositionBased,
            ),
            config.clone(),
            EnemyBrain::new(origin),
            agent,
        ))
        .id();

    let throw_offset = config
        .throw_point_offset
        .unwrap_or(Vec3::Y * default_throw_point_height(config.capsule_height));
    let throw_point = commands
        .spawn((
            Attached::new(actor, throw_offset),
            Transform::from_translation(origin + throw_offset),
        ))
        .id();

    let ragdoll_parts: Vec<Entity> = RAGDOLL_PARTS
        .iter()
        .map(|&(offset, radius)| {
            commands
                .spawn((
                    Attached::new(actor, offset),
                    Transform::from_translation(origin + offset),
                    Collider::ball(radius),
                    ragdoll_groups(),
                    RigidBody::KinematicPositionBased,
                    Velocity::zero(),
                    ExternalImpulse::default(),
                    ColliderDisabled,
                ))
                .id()
        })
        .collect();

    commands.entity(actor).insert((
        ThrowPoint { entity: throw_point },
        RagdollRig {
            bodies: ragdoll_parts.clone(),
            part_colliders: ragdoll_parts.clone(),
            root_collider: Some(actor),
            active: false,
        },
    ));

    crate::log_info(&format!("Enemy {:?} spawned at {:?}", actor, origin));

    EnemyHandles {
        actor,
        throw_point,
        ragdoll_parts,
    }
}

/// Система: FSM врага (detection/chase/return) + throw gate
///
/// Навигацию исполняет `steer_agents` следом; здесь только цель и скорость.
pub fn update_enemy_ai(
    mut commands: Commands,
    time: Res<Time>,
    navigation: Res<Navigation>,
    settings: Res<PhysicsSettings>,
    owners: ColliderOwners,
    mut enemies: Query<
        (
            Entity,
            &EnemyConfig,
            &mut EnemyBrain,
            &mut NavAgent,
            &mut Transform,
            Option<&ThrowPoint>,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    players: Query<&Transform, (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut throw_points: Query<&mut Transform, (With<Attached>, Without<Enemy>, Without<Player>)>,
) {
    // Нет живого игрока — AI ждёт
    let Ok(target) = players.single().map(|transform| transform.translation) else {
        return;
    };

    let now = time.elapsed_secs();
    let service = navigation.service.as_ref();

    for (entity, config, mut brain, mut agent, mut transform, throw_point) in enemies.iter_mut() {
        if brain.state == EnemyState::Dead || !agent.enabled {
            continue;
        }

        // Агент вне navmesh: пробуем вернуться, иначе пропускаем тик
        if service.sample_position(transform.translation, ON_MESH_TOLERANCE).is_none() {
            match place_on_navmesh(service, transform.translation) {
                Some(recovered) => transform.translation = recovered,
                None => {
                    crate::log_warning(&format!(
                        "Enemy {:?} is off navmesh at {:?}, skipping AI tick",
                        entity, transform.translation
                    ));
                    continue;
                }
            }
        }

        let distance = transform.translation.distance(target);

        if let Some((from, to)) = brain.observe_target(distance, config) {
            crate::log_info(&format!(
                "Enemy {:?}: {:?} → {:?} (distance {:.2})",
                entity, from, to, distance
            ));
        }

        match brain.state {
            EnemyState::Chasing => {
                agent.speed = config.chase_speed;
                agent.set_destination(target);

                if !brain.can_throw(now, distance, config) {
                    continue;
                }
                let Some(grenade) = config.grenade.as_ref() else {
                    continue;
                };

                // Throw point (или сам враг) смотрит на цель
                let point_transform = match throw_point {
                    Some(point) => throw_points.get_mut(point.entity).ok(),
                    None => None,
                };
                let origin = match point_transform {
                    Some(mut point_transform) => {
                        point_transform.rotation =
                            aim_throw_point(point_transform.translation, point_transform.rotation, target);
                        throw_spawn_position(point_transform.translation, point_transform.rotation)
                    }
                    None => {
                        let rotation = aim_throw_point(transform.translation, transform.rotation, target);
                        throw_spawn_position(transform.translation, rotation)
                    }
                };

                let solution = solve_launch_velocity(origin, target, &config.ballistic_params(settings.gravity));

                let planar = Vec2::new(target.x - origin.x, target.z - origin.z);
                let landing = estimate_flat_landing(origin, solution.velocity, settings.gravity);
                crate::log(&format!(
                    "[Grenade] planar_distance={:.2}, height_delta={:.2}, velocity={:?}, est_landing_xz=({:.2}, {:.2}){}",
                    planar.length(),
                    target.y - origin.y,
                    solution.velocity,
                    landing.x,
                    landing.z,
                    if solution.kind == SolutionKind::Fallback {
                        " [fallback]"
                    } else {
                        ""
                    }
                ));

                let projectile = spawn_projectile(
                    &mut commands,
                    ThrowRequest {
                        thrower: entity,
                        position: origin,
                        velocity: solution.velocity,
                    },
                    owners.owned_by(entity),
                    grenade,
                    now,
                );
                brain.last_attack = Some(now);

                crate::log_info(&format!("Enemy {:?} threw grenade {:?}", entity, projectile));
            }
            EnemyState::Returning => {
                agent.speed = config.return_speed;
                agent.set_destination(brain.origin);

                if agent.has_arrived() {
                    agent.stop();
                    brain.state = EnemyState::Idle;
                    crate::log(&format!("Enemy {:?}: back at origin, Idle", entity));
                }
            }
            EnemyState::Idle | EnemyState::Dead => {}
        }
    }
}

/// Система: смерть врага → AI/навигация off, ragdoll on
pub fn handle_enemy_death(
    mut commands: Commands,
    mut death_events: EventReader<EntityDied>,
    mut enemies: Query<(&mut EnemyBrain, &mut NavAgent, Option<&mut RagdollRig>), With<Enemy>>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    for event in death_events.read() {
        let Ok((mut brain, mut agent, ragdoll)) = enemies.get_mut(event.entity) else {
            continue;
        };
        if brain.state == EnemyState::Dead {
            continue;
        }

        brain.state = EnemyState::Dead;
        agent.stop();
        agent.enabled = false;

        if let Some(mut ragdoll) = ragdoll {
            ragdoll.set_active(&mut commands, true);
        }

        presentation.write(PresentationEvent::AnimatorEnabled {
            entity: event.entity,
            enabled: false,
        });

        if let Ok(mut entity) = commands.get_entity(event.entity) {
            entity.insert(Dead);
        }

        crate::log_info(&format!("Enemy {:?} died (killer: {:?})", event.entity, event.killer));
    }
}
