use bevy::diagnostic::{
    Diagnostic, DiagnosticPath, Diagnostics, LogDiagnosticsPlugin, RegisterDiagnostic,
};
use bevy::prelude::*;

use crate::enemy::EnemyHealth;
use crate::pickup::GameItem;

pub const LIVE_ITEMS: DiagnosticPath = DiagnosticPath::const_new("gameplay/live_items");
pub const LIVE_ENEMIES: DiagnosticPath = DiagnosticPath::const_new("gameplay/live_enemies");

pub struct DiagnosticsPlugin;

impl Plugin for DiagnosticsPlugin {
    fn build(&self, app: &mut App) {
        app.register_diagnostic(Diagnostic::new(LIVE_ITEMS))
            .register_diagnostic(Diagnostic::new(LIVE_ENEMIES))
            .add_plugins(LogDiagnosticsPlugin::default())
            .add_systems(Update, measure_population);
    }
}

fn measure_population(
    mut diagnostics: Diagnostics,
    items: Query<(), With<GameItem>>,
    enemies: Query<(), With<EnemyHealth>>,
) {
    diagnostics.add_measurement(&LIVE_ITEMS, || items.iter().count() as f64);
    diagnostics.add_measurement(&LIVE_ENEMIES, || enemies.iter().count() as f64);
}
