use bevy::prelude::*;

use crate::enemy::EnemyHealth;
use crate::pickup::{GameItem, PlayerHealth, PlayerMovement};
use crate::simulation::SimulationParams;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb_u8(24, 14, 10)))
            .add_systems(Startup, spawn_debug_hud)
            .add_systems(Update, update_debug_hud);
    }
}

#[derive(Component)]
struct DebugHud;

fn spawn_debug_hud(mut commands: Commands) {
    commands.spawn(Camera2d);

    commands.spawn((
        Text::new("Setting the table…"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.93, 0.8)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
        DebugHud,
    ));
}

fn update_debug_hud(
    mut text: Query<&mut Text, With<DebugHud>>,
    params: Option<Res<SimulationParams>>,
    player: Query<(&PlayerHealth, &PlayerMovement)>,
    items: Query<(), With<GameItem>>,
    enemies: Query<&EnemyHealth>,
) {
    let Ok(mut text) = text.get_single_mut() else {
        return;
    };
    let seed = params.map(|p| p.seed).unwrap_or_default();
    let (health, max_health, speed) = player
        .get_single()
        .map(|(health, movement)| {
            (
                health.current_health,
                health.max_health,
                movement.current_speed,
            )
        })
        .unwrap_or_default();
    let alive = enemies.iter().filter(|enemy| !enemy.is_dead()).count();
    let content = format!(
        "Pastafarian's Delight\nseed: {seed}\nhealth: {health:.0}/{max_health:.0}\nspeed: {speed:.1}\npickups: {}\nenemies: {alive}",
        items.iter().count()
    );
    content.clone_into(&mut **text);
}
