use bevy::prelude::*;
use delight_core::enemy::EnemyHealth;
use delight_core::gameplay::{DamageEnemy, PlaceItem, SpawnItems, TriggerCollider};
use delight_core::host::Prefab;
use delight_core::pickup::{PickupEffect, PlayerMovement, Tag};
use delight_core::simulation::SimulationRng;
use delight_core::spawner::ItemSpawner;
use delight_core::GameplayConfig;
use std::path::PathBuf;

const PIXELS_PER_SPEED_UNIT: f32 = 40.0;
const PLAYER_SIZE: f32 = 28.0;
const ENEMY_SIZE: f32 = 32.0;
const STRIKE_DAMAGE: f32 = 1.0;

/// Demo level: a player, two pickup spawners and a row of enemies.
pub struct ScenePlugin {
    config_path: PathBuf,
}

impl Default for ScenePlugin {
    fn default() -> Self {
        Self {
            config_path: GameplayConfig::env_path(),
        }
    }
}

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        let config = match GameplayConfig::from_path(&self.config_path) {
            Ok(config) => {
                info!(target: "scene", "Loaded gameplay config from {}", self.config_path.display());
                config
            }
            Err(err) => {
                warn!(target: "scene", "{err}; using default gameplay config");
                GameplayConfig::default()
            }
        };
        app.insert_resource(LevelConfig(config))
            .add_systems(Startup, (spawn_player, spawn_spawners, spawn_enemies))
            .add_systems(PostStartup, scatter_pickups)
            .add_systems(Update, (move_player, patrol_enemies, strike_enemies));
    }
}

#[derive(Resource, Debug)]
struct LevelConfig(GameplayConfig);

#[derive(Component)]
struct ControlledPlayer;

/// Horizontal walk direction, `1.0` or `-1.0`.
#[derive(Component, Debug)]
struct Patrol {
    direction: f32,
}

fn spawn_player(mut commands: Commands, level: Res<LevelConfig>) {
    let center = level.0.spawner.bounds.center();
    commands.spawn((
        Name::new("Player"),
        Tag::player(),
        ControlledPlayer,
        level.0.player_health(),
        level.0.player_movement(),
        Sprite {
            color: Color::srgb(0.95, 0.78, 0.35),
            custom_size: Some(Vec2::splat(PLAYER_SIZE)),
            ..default()
        },
        Transform::from_xyz(center.x, center.y, 0.3),
        TriggerCollider::from_size(Vec2::splat(PLAYER_SIZE)),
    ));
}

fn spawn_spawners(mut commands: Commands, level: Res<LevelConfig>) {
    let config = &level.0;
    let meatball = Prefab::new("Meatball")
        .with_look(Vec2::splat(18.0), Color::srgb(0.62, 0.25, 0.16))
        .with_pickup(PickupEffect::Health(config.health_boost()));
    let noodle = Prefab::new("Noodle")
        .with_look(Vec2::new(24.0, 8.0), Color::srgb(0.98, 0.9, 0.55))
        .with_pickup(PickupEffect::Speed(config.speed_boost()));

    // Bulk-spawned items sit at the spawner, so keep it in a corner away
    // from the player.
    let corner = config.spawner.bounds.min();
    for prefab in [meatball, noodle] {
        commands.spawn((
            Name::new(format!("{} Spawner", prefab.name)),
            config.spawner(prefab),
            Transform::from_xyz(corner.x, corner.y, 0.1),
            Visibility::default(),
        ));
    }
}

fn spawn_enemies(mut commands: Commands, level: Res<LevelConfig>) {
    let config = &level.0;
    let bounds = config.spawner.bounds;
    let count = config.enemy.count.max(1);
    let step = (bounds.max().x - bounds.min().x) / (count as f32 + 1.0);
    for idx in 0..config.enemy.count {
        let mut enemy = config.enemy();
        enemy.on_death(move || info!(target: "scene", "Enemy #{idx} defeated"));
        let x = bounds.min().x + step * (idx as f32 + 1.0);
        let y = bounds.max().y - ENEMY_SIZE;
        commands.spawn((
            Name::new(format!("Enemy #{idx}")),
            Tag("Enemy".into()),
            enemy,
            Patrol {
                direction: if idx % 2 == 0 { 1.0 } else { -1.0 },
            },
            Sprite {
                color: Color::srgb(0.45, 0.8, 0.35),
                custom_size: Some(Vec2::splat(ENEMY_SIZE)),
                ..default()
            },
            Transform::from_xyz(x, y, 0.2),
        ));
    }
}

fn scatter_pickups(
    level: Res<LevelConfig>,
    mut rng: ResMut<SimulationRng>,
    spawners: Query<Entity, With<ItemSpawner>>,
    mut batches: EventWriter<SpawnItems>,
    mut placements: EventWriter<PlaceItem>,
) {
    let bounds = level.0.spawner.bounds;
    // A margin past the bounds exercises the rejection path.
    let margin = (bounds.max() - bounds.min()) * 0.125;
    let (lo, hi) = (bounds.min() - margin, bounds.max() + margin);
    let spawners: Vec<Entity> = spawners.iter().collect();
    if spawners.is_empty() {
        return;
    }
    if level.0.spawner.initial_count > 0 {
        for &spawner in &spawners {
            batches.send(SpawnItems {
                spawner,
                count: level.0.spawner.initial_count,
            });
        }
    }
    for idx in 0..level.0.pickups.count {
        placements.send(PlaceItem {
            spawner: spawners[idx % spawners.len()],
            position: rng.gen_point(lo, hi),
        });
    }
}

fn move_player(
    time: Res<Time>,
    keys: Res<ButtonInput<KeyCode>>,
    mut players: Query<(&mut Transform, &PlayerMovement), With<ControlledPlayer>>,
) {
    let mut direction = Vec2::ZERO;
    if keys.pressed(KeyCode::ArrowLeft) {
        direction.x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) {
        direction.x += 1.0;
    }
    if keys.pressed(KeyCode::ArrowUp) {
        direction.y += 1.0;
    }
    if keys.pressed(KeyCode::ArrowDown) {
        direction.y -= 1.0;
    }
    let Some(direction) = direction.try_normalize() else {
        return;
    };
    for (mut transform, movement) in players.iter_mut() {
        let step = direction * movement.current_speed * PIXELS_PER_SPEED_UNIT * time.delta_secs();
        transform.translation += step.extend(0.0);
    }
}

fn patrol_enemies(
    time: Res<Time>,
    level: Res<LevelConfig>,
    mut enemies: Query<(&mut Transform, &mut Patrol, &EnemyHealth)>,
) {
    let bounds = level.0.spawner.bounds;
    for (mut transform, mut patrol, enemy) in enemies.iter_mut() {
        let travel = enemy.speed() * PIXELS_PER_SPEED_UNIT * time.delta_secs();
        let (x, direction) = patrol_step(
            transform.translation.x,
            patrol.direction,
            travel,
            bounds.min().x,
            bounds.max().x,
        );
        transform.translation.x = x;
        patrol.direction = direction;
    }
}

/// Advances `x` by `travel` and turns around at either end of `[min_x, max_x]`.
fn patrol_step(x: f32, direction: f32, travel: f32, min_x: f32, max_x: f32) -> (f32, f32) {
    let next = x + direction * travel;
    if next <= min_x {
        (min_x, 1.0)
    } else if next >= max_x {
        (max_x, -1.0)
    } else {
        (next, direction)
    }
}

fn strike_enemies(
    keys: Res<ButtonInput<KeyCode>>,
    enemies: Query<Entity, With<EnemyHealth>>,
    mut hits: EventWriter<DamageEnemy>,
) {
    if !keys.just_pressed(KeyCode::Space) {
        return;
    }
    for target in enemies.iter() {
        hits.send(DamageEnemy {
            target,
            amount: STRIKE_DAMAGE,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patrol_moves_by_enemy_speed() {
        let enemy = GameplayConfig::default().enemy();
        let (x, direction) = patrol_step(0.0, 1.0, enemy.speed(), -100.0, 100.0);
        assert_eq!(3.0, x);
        assert_eq!(1.0, direction);
    }

    #[test]
    fn patrol_turns_at_bounds() {
        assert_eq!((100.0, -1.0), patrol_step(98.0, 1.0, 5.0, -100.0, 100.0));
        assert_eq!((-100.0, 1.0), patrol_step(-98.0, -1.0, 5.0, -100.0, 100.0));
        assert_eq!((40.0, -1.0), patrol_step(45.0, -1.0, 5.0, -100.0, 100.0));
    }
}
