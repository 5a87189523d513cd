//! Navigation: внешний сервис навигации + NavAgent steering
//!
//! Построение navmesh — забота host'а. Симуляция видит только
//! `NavigationService` (sample + steer). Headless backend — `FlatNavMesh`
//! из прямоугольных регионов на фиксированной высоте.

use bevy::prelude::*;

use crate::logger;
use crate::math::{heading_to_yaw, yaw_rotation};

/// Радиус поиска navmesh при спавне и восстановлении агента
pub const NAV_SAMPLE_RADIUS: f32 = 2.0;

/// Допуск "агент стоит на navmesh"
pub const ON_MESH_TOLERANCE: f32 = 0.05;

/// Сервис навигации (navmesh host'а)
pub trait NavigationService: Send + Sync {
    /// Ближайшая навигируемая точка в пределах `max_distance`
    fn sample_position(&self, position: Vec3, max_distance: f32) -> Option<Vec3>;

    /// Новая позиция агента после шага `speed·delta` к цели
    fn steer(&self, from: Vec3, to: Vec3, speed: f32, delta: f32) -> Vec3;
}

/// Прямоугольный регион navmesh (XZ) на высоте `height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavRegion {
    pub min: Vec2,
    pub max: Vec2,
    pub height: f32,
}

impl NavRegion {
    pub fn new(min: Vec2, max: Vec2, height: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
            height,
        }
    }

    fn closest_point(&self, position: Vec3) -> Vec3 {
        let planar = Vec2::new(position.x, position.z).clamp(self.min, self.max);
        Vec3::new(planar.x, self.height, planar.y)
    }
}

/// Плоский navmesh из прямоугольников
#[derive(Debug, Clone, Default)]
pub struct FlatNavMesh {
    pub regions: Vec<NavRegion>,
}

impl FlatNavMesh {
    pub fn new(regions: Vec<NavRegion>) -> Self {
        Self { regions }
    }

    /// Квадрат `half_extent` вокруг начала координат на высоте 0
    pub fn open_ground(half_extent: f32) -> Self {
        Self::new(vec![NavRegion::new(
            Vec2::splat(-half_extent),
            Vec2::splat(half_extent),
            0.0,
        )])
    }

    fn closest(&self, position: Vec3) -> Option<Vec3> {
        self.regions
            .iter()
            .map(|region| region.closest_point(position))
            .min_by(|a, b| a.distance_squared(position).total_cmp(&b.distance_squared(position)))
    }
}

impl NavigationService for FlatNavMesh {
    fn sample_position(&self, position: Vec3, max_distance: f32) -> Option<Vec3> {
        self.closest(position)
            .filter(|point| point.distance(position) <= max_distance)
    }

    fn steer(&self, from: Vec3, to: Vec3, speed: f32, delta: f32) -> Vec3 {
        let planar = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
        let distance = planar.length();
        let step = (speed * delta).max(0.0).min(distance);
        let candidate = from + planar.normalize_or_zero() * step;

        // Шаг за край navmesh прижимается к ближайшей навигируемой точке
        self.closest(candidate).unwrap_or(from)
    }
}

/// Resource с активным сервисом навигации
#[derive(Resource)]
pub struct Navigation {
    pub service: Box<dyn NavigationService>,
}

impl Navigation {
    pub fn new(service: impl NavigationService + 'static) -> Self {
        Self {
            service: Box::new(service),
        }
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(FlatNavMesh::open_ground(500.0))
    }
}

/// Навигационный агент (враги)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub speed: f32,
    pub stopping_distance: f32,
    /// Путь к новой цели ещё не посчитан (до следующего steering тика)
    pub path_pending: bool,
    /// Горизонтальная дистанция до цели
    pub remaining_distance: f32,
    pub enabled: bool,
}

impl NavAgent {
    pub fn new(speed: f32, stopping_distance: f32) -> Self {
        Self {
            destination: None,
            speed,
            stopping_distance,
            path_pending: false,
            remaining_distance: 0.0,
            enabled: true,
        }
    }

    pub fn set_destination(&mut self, destination: Vec3) {
        if self.destination != Some(destination) {
            self.destination = Some(destination);
            self.path_pending = true;
        }
    }

    /// Агент дошёл (путь посчитан и осталось не больше stopping distance)
    pub fn has_arrived(&self) -> bool {
        !self.path_pending && self.remaining_distance <= self.stopping_distance
    }

    pub fn stop(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
    }
}

/// Поставить точку на navmesh (спавн): None — рядом нет navmesh
pub fn place_on_navmesh(service: &dyn NavigationService, position: Vec3) -> Option<Vec3> {
    service.sample_position(position, NAV_SAMPLE_RADIUS)
}

/// Система: двигает агентов к цели
///
/// Агент вне navmesh пытается вернуться (sample в радиусе 2).
/// Не вышло — warning и пропуск тика.
pub fn steer_agents(
    time: Res<Time>,
    navigation: Res<Navigation>,
    mut agents: Query<(Entity, &mut NavAgent, &mut Transform)>,
) {
    let delta = time.delta_secs();
    let service = navigation.service.as_ref();

    for (entity, mut agent, mut transform) in agents.iter_mut() {
        if !agent.enabled {
            continue;
        }

        let position = transform.translation;
        if service.sample_position(position, ON_MESH_TOLERANCE).is_none() {
            match place_on_navmesh(service, position) {
                Some(recovered) => {
                    logger::log(&format!("NavAgent {:?} warped back to navmesh at {:?}", entity, recovered));
                    transform.translation = recovered;
                }
                None => {
                    logger::log_warning(&format!(
                        "NavAgent {:?} is not on navmesh at {:?}, skipping movement",
                        entity, position
                    ));
                    continue;
                }
            }
        }

        let Some(destination) = agent.destination else {
            agent.path_pending = false;
            continue;
        };

        let from = transform.translation;
        let remaining = Vec2::new(destination.x - from.x, destination.z - from.z).length();

        if remaining > agent.stopping_distance {
            let next = service.steer(from, destination, agent.speed, delta);
            let moved = next - from;
            if moved.x.abs() > f32::EPSILON || moved.z.abs() > f32::EPSILON {
                transform.rotation = yaw_rotation(heading_to_yaw(moved));
            }
            transform.translation = next;
        }

        let after = transform.translation;
        agent.remaining_distance = Vec2::new(destination.x - after.x, destination.z - after.z).length();
        agent.path_pending = false;
    }
}
