//! Interaction: сундук с ключом и запертая дверь
//!
//! Trigger volume вокруг объекта: вход игрока показывает подсказку,
//! выход прячет. Interact в зоне:
//! - сундук: выдаёт ключ (один раз), trigger "Open"
//! - дверь: с ключом открывается и завершает сессию победой, без ключа — ничего
//!
//! Корпус сундука и полотно двери — отдельные твёрдые коллайдеры
//! (Attached к объекту), в них упирается игрок. Отпертая дверь корпус теряет.

use bevy::prelude::*;

use crate::components::{Attached, Player};
use crate::input::InputSnapshot;
use crate::physics::{solid_block, trigger_volume, ColliderOwners, TriggerEntered, TriggerExited};
use crate::presentation::{PresentationEvent, ANIM_OPEN};
use crate::session::{SessionOutcome, SessionState};
use crate::TickPhase;

/// Радиус trigger volume по умолчанию
pub const INTERACTION_RADIUS: f32 = 1.5;

pub const CHEST_PROMPT_OFFSET: Vec3 = Vec3::new(0.0, 1.6, 0.0);
pub const DOOR_PROMPT_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 0.0);

/// Половины размеров корпуса сундука и полотна двери
pub const CHEST_HALF_EXTENTS: Vec3 = Vec3::new(0.5, 0.4, 0.35);
pub const DOOR_HALF_EXTENTS: Vec3 = Vec3::new(0.75, 1.1, 0.1);

/// Marker: твёрдый корпус интерактивного объекта
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct SolidBody;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum InteractableKind {
    /// Выдаёт ключ
    Chest,
    /// Требует ключ, открытие завершает сессию
    Door,
}

#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Interactable {
    pub kind: InteractableKind,
    /// Подсказка рисуется в `position + prompt_offset`
    pub prompt_offset: Vec3,
    pub player_in_range: bool,
    /// Сундук открыт / дверь отперта
    pub completed: bool,
}

impl Interactable {
    pub fn chest() -> Self {
        Self::new(InteractableKind::Chest, CHEST_PROMPT_OFFSET)
    }

    pub fn door() -> Self {
        Self::new(InteractableKind::Door, DOOR_PROMPT_OFFSET)
    }

    pub fn new(kind: InteractableKind, prompt_offset: Vec3) -> Self {
        Self {
            kind,
            prompt_offset,
            player_in_range: false,
            completed: false,
        }
    }
}

/// Результат нажатия interact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// Уже использован
    Ignored,
    KeyGranted,
    Unlocked,
    /// Дверь без ключа
    Locked,
}

/// Применить interact к объекту (без ECS)
pub fn interact(interactable: &mut Interactable, session: &mut SessionState) -> InteractionOutcome {
    if interactable.completed {
        return InteractionOutcome::Ignored;
    }

    match interactable.kind {
        InteractableKind::Chest => {
            interactable.completed = true;
            session.has_key = true;
            InteractionOutcome::KeyGranted
        }
        InteractableKind::Door if session.has_key => {
            interactable.completed = true;
            session.finish(SessionOutcome::Won);
            InteractionOutcome::Unlocked
        }
        InteractableKind::Door => InteractionOutcome::Locked,
    }
}

/// Спавн интерактивного объекта с trigger volume
pub fn spawn_interactable(commands: &mut Commands, position: Vec3, interactable: Interactable, radius: f32) -> Entity {
    commands
        .spawn((
            Transform::from_translation(position),
            trigger_volume(radius),
            interactable,
        ))
        .id()
}

/// Твёрдый корпус, привязанный к объекту
pub fn spawn_solid_body(commands: &mut Commands, owner: Entity, position: Vec3, half_extents: Vec3) -> Entity {
    commands
        .spawn((
            SolidBody,
            Attached::new(owner, Vec3::ZERO),
            Transform::from_translation(position),
            solid_block(half_extents),
        ))
        .id()
}

pub fn spawn_chest(commands: &mut Commands, position: Vec3) -> Entity {
    let chest = spawn_interactable(commands, position, Interactable::chest(), INTERACTION_RADIUS);
    spawn_solid_body(commands, chest, position, CHEST_HALF_EXTENTS);
    chest
}

pub fn spawn_door(commands: &mut Commands, position: Vec3) -> Entity {
    let door = spawn_interactable(commands, position, Interactable::door(), INTERACTION_RADIUS);
    spawn_solid_body(commands, door, position, DOOR_HALF_EXTENTS);
    door
}

/// Система: игрок входит/выходит из зоны → подсказка
pub fn track_interaction_range(
    mut entered: EventReader<TriggerEntered>,
    mut exited: EventReader<TriggerExited>,
    owners: ColliderOwners,
    players: Query<(), With<Player>>,
    mut interactables: Query<(&mut Interactable, &Transform)>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    let is_player = |collider: Entity| players.contains(owners.owner_of(collider));

    for event in entered.read() {
        if !is_player(event.other) {
            continue;
        }
        let Ok((mut interactable, transform)) = interactables.get_mut(event.volume) else {
            continue;
        };

        interactable.player_in_range = true;
        if !interactable.completed {
            presentation.write(PresentationEvent::ShowPrompt {
                entity: event.volume,
                position: transform.translation + interactable.prompt_offset,
            });
        }
    }

    for event in exited.read() {
        if !is_player(event.other) {
            continue;
        }
        let Ok((mut interactable, _)) = interactables.get_mut(event.volume) else {
            continue;
        };

        interactable.player_in_range = false;
        presentation.write(PresentationEvent::HidePrompt { entity: event.volume });
    }
}

/// Система: interact edge в зоне объекта
pub fn handle_interactions(
    mut commands: Commands,
    input: Res<InputSnapshot>,
    mut session: ResMut<SessionState>,
    mut interactables: Query<(Entity, &mut Interactable)>,
    bodies: Query<(Entity, &Attached), With<SolidBody>>,
    mut presentation: EventWriter<PresentationEvent>,
) {
    if !input.interact_pressed {
        return;
    }

    for (entity, mut interactable) in interactables.iter_mut() {
        if !interactable.player_in_range {
            continue;
        }

        match interact(&mut interactable, &mut session) {
            InteractionOutcome::KeyGranted => {
                presentation.write(PresentationEvent::HidePrompt { entity });
                presentation.write(PresentationEvent::AnimTrigger {
                    entity,
                    trigger: ANIM_OPEN,
                });
                crate::log_info("Chest opened: key acquired.");
            }
            InteractionOutcome::Unlocked => {
                presentation.write(PresentationEvent::HidePrompt { entity });
                presentation.write(PresentationEvent::AnimTrigger {
                    entity,
                    trigger: ANIM_OPEN,
                });
                for (body, attached) in bodies.iter() {
                    if attached.owner == entity {
                        commands.entity(body).despawn();
                    }
                }
                crate::log_info("Door unlocked. Session won.");
            }
            InteractionOutcome::Locked => {
                crate::log("Door is locked: the key is in the chest.");
            }
            InteractionOutcome::Ignored => {}
        }
    }
}

/// Interaction Plugin (TickPhase::Update)
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (track_interaction_range, handle_interactions)
                .chain()
                .in_set(TickPhase::Update),
        );
    }
}
