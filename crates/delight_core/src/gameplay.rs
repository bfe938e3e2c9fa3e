use bevy::prelude::*;
use bevy::utils::HashSet;
use tracing::{info, warn};

use crate::enemy::{DamageOutcome, EnemyHealth};
use crate::host::{EngineHost, Placement, Prefab};
use crate::pickup::{GameItem, PickupOutcome, PickupTarget, PlayerHealth, PlayerMovement, Tag};
use crate::simulation::{configure_fixed_time, SimulationParams, SimulationRng};
use crate::spawner::ItemSpawner;

/// Bevy side of the gameplay rules: spawn requests, trigger contacts,
/// pickups and enemy damage all flow through events so tests and scenes can
/// drive them without input devices.
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<SimulationParams>() {
            app.insert_resource(SimulationParams::from_env());
        }

        app.init_resource::<SimulationRng>()
            .init_resource::<ActiveContacts>()
            .add_event::<SpawnItems>()
            .add_event::<PlaceItem>()
            .add_event::<TriggerEntered>()
            .add_event::<DamageEnemy>()
            .add_event::<EnemyDied>()
            .add_systems(Startup, configure_fixed_time)
            .add_systems(Update, handle_spawn_requests)
            .add_systems(
                FixedUpdate,
                (
                    detect_trigger_contacts,
                    resolve_pickups,
                    apply_enemy_damage,
                    despawn_dead_enemies,
                )
                    .chain(),
            );
    }
}

/// Bulk spawn under the spawner entity.
#[derive(Event, Clone, Copy, Debug)]
pub struct SpawnItems {
    pub spawner: Entity,
    pub count: usize,
}

/// Bounds-checked placement of one item.
#[derive(Event, Clone, Copy, Debug)]
pub struct PlaceItem {
    pub spawner: Entity,
    pub position: Vec2,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerEntered {
    pub item: Entity,
    pub other: Entity,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct DamageEnemy {
    pub target: Entity,
    pub amount: f32,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyDied {
    pub entity: Entity,
}

/// Axis-aligned trigger volume centred on the entity's translation.
#[derive(Component, Clone, Copy, Debug)]
pub struct TriggerCollider {
    pub half_extents: Vec2,
}

impl TriggerCollider {
    pub fn from_size(size: Vec2) -> Self {
        Self {
            half_extents: size * 0.5,
        }
    }

    fn overlaps(&self, at: Vec2, other: &TriggerCollider, other_at: Vec2) -> bool {
        let delta = (at - other_at).abs();
        let reach = self.half_extents + other.half_extents;
        delta.x <= reach.x && delta.y <= reach.y
    }
}

/// Item/other pairs currently overlapping, so enter fires once per contact.
#[derive(Resource, Default, Debug)]
struct ActiveContacts {
    pairs: HashSet<(Entity, Entity)>,
}

/// [`EngineHost`] backed by Bevy commands.
pub struct CommandsHost<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
}

impl<'a, 'w, 's> CommandsHost<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>) -> Self {
        Self { commands }
    }
}

impl EngineHost for CommandsHost<'_, '_, '_> {
    type Handle = Entity;

    fn instantiate(&mut self, prefab: &Prefab, placement: Placement<Entity>) -> Entity {
        let transform = match placement {
            Placement::Child(_) => Transform::default(),
            Placement::World(position) => Transform::from_xyz(position.x, position.y, 0.1),
        };
        let mut entity = self.commands.spawn((
            Name::new(prefab.instance_name()),
            Sprite {
                color: prefab.color,
                custom_size: Some(prefab.size),
                ..default()
            },
            transform,
            TriggerCollider::from_size(prefab.size),
        ));
        if let Some(effect) = prefab.pickup.clone() {
            entity.insert(GameItem::new(effect));
        }
        let id = entity.id();
        if let Placement::Child(parent) = placement {
            self.commands.entity(parent).add_child(id);
        }
        id
    }

    fn destroy(&mut self, handle: Entity) {
        if let Some(entity) = self.commands.get_entity(handle) {
            entity.despawn_recursive();
        }
    }
}

fn handle_spawn_requests(
    mut commands: Commands,
    mut bulk: EventReader<SpawnItems>,
    mut single: EventReader<PlaceItem>,
    spawners: Query<&ItemSpawner>,
) {
    let mut host = CommandsHost::new(&mut commands);

    for request in bulk.read() {
        let Ok(spawner) = spawners.get(request.spawner) else {
            warn!(target: "delight_core.spawner", spawner = ?request.spawner, "spawn request for unknown spawner");
            continue;
        };
        match spawner.spawn_items(&mut host, request.spawner, request.count) {
            Ok(spawned) => info!(
                target: "delight_core.spawner",
                requested = request.count,
                spawned = spawned.len(),
                "items spawned"
            ),
            Err(err) => warn!(target: "delight_core.spawner", spawner = ?request.spawner, "{err}"),
        }
    }

    for request in single.read() {
        let Ok(spawner) = spawners.get(request.spawner) else {
            warn!(target: "delight_core.spawner", spawner = ?request.spawner, "placement for unknown spawner");
            continue;
        };
        if let Err(err) = spawner.spawn_item(&mut host, request.position) {
            warn!(target: "delight_core.spawner", spawner = ?request.spawner, "{err}");
        }
    }
}

fn detect_trigger_contacts(
    mut contacts: ResMut<ActiveContacts>,
    mut entered: EventWriter<TriggerEntered>,
    items: Query<(Entity, &GlobalTransform, &TriggerCollider), With<GameItem>>,
    others: Query<(Entity, &GlobalTransform, &TriggerCollider), Without<GameItem>>,
) {
    let mut current = HashSet::default();
    for (item, item_transform, item_collider) in items.iter() {
        let item_at = item_transform.translation().truncate();
        for (other, other_transform, other_collider) in others.iter() {
            let other_at = other_transform.translation().truncate();
            if item_collider.overlaps(item_at, other_collider, other_at) {
                current.insert((item, other));
            }
        }
    }

    let mut fresh: Vec<_> = current.difference(&contacts.pairs).copied().collect();
    fresh.sort();
    for (item, other) in fresh {
        entered.send(TriggerEntered { item, other });
    }
    contacts.pairs = current;
}

fn resolve_pickups(
    mut commands: Commands,
    mut entered: EventReader<TriggerEntered>,
    mut items: Query<&mut GameItem>,
    mut targets: Query<(Option<&Tag>, Option<&mut PlayerHealth>, Option<&mut PlayerMovement>)>,
) {
    for contact in entered.read() {
        let Ok(mut item) = items.get_mut(contact.item) else {
            continue;
        };
        let Ok((tag, health, movement)) = targets.get_mut(contact.other) else {
            continue;
        };
        let target = PickupTarget {
            health: health.map(Mut::into_inner),
            movement: movement.map(Mut::into_inner),
        };
        if item.on_trigger_enter(tag, target) == PickupOutcome::Consumed {
            info!(target: "delight_core.pickup", item = ?contact.item, effect = ?item.effect(), "pickup consumed");
            CommandsHost::new(&mut commands).destroy(contact.item);
        }
    }
}

fn apply_enemy_damage(
    mut hits: EventReader<DamageEnemy>,
    mut died: EventWriter<EnemyDied>,
    mut enemies: Query<&mut EnemyHealth>,
) {
    for hit in hits.read() {
        let Ok(mut enemy) = enemies.get_mut(hit.target) else {
            continue;
        };
        match enemy.apply_damage(hit.amount) {
            DamageOutcome::Died => {
                died.send(EnemyDied { entity: hit.target });
            }
            DamageOutcome::Survived { remaining } => {
                info!(target: "delight_core.enemy", enemy = ?hit.target, remaining, "enemy hit");
            }
            DamageOutcome::AlreadyDead => {}
        }
    }
}

fn despawn_dead_enemies(mut commands: Commands, mut died: EventReader<EnemyDied>) {
    let mut host = CommandsHost::new(&mut commands);
    for event in died.read() {
        info!(target: "delight_core.enemy", enemy = ?event.entity, "removing dead enemy");
        host.destroy(event.entity);
    }
}
