mod scene;

use bevy::prelude::*;
use bevy::window::PresentMode;
use delight_core::diagnostics::DiagnosticsPlugin;
use delight_core::ui::UiPlugin;
use delight_core::GameplayPlugin;
use scene::ScenePlugin;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

const TITLE: &str = "Pastafarian's Delight";

#[cfg_attr(target_arch = "wasm32", wasm_bindgen(start))]
pub fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(primary_window()),
            ..default()
        }))
        .add_plugins((
            GameplayPlugin,
            UiPlugin,
            DiagnosticsPlugin,
            ScenePlugin::default(),
        ))
        .run();
}

/// Fills the page canvas on the web; a resizable 1280x720 window elsewhere.
fn primary_window() -> Window {
    let window = Window {
        title: TITLE.into(),
        present_mode: PresentMode::AutoVsync,
        ..default()
    };

    #[cfg(target_arch = "wasm32")]
    let window = Window {
        canvas: Some("#bevy-canvas".into()),
        fit_canvas_to_parent: true,
        ..window
    };

    #[cfg(not(target_arch = "wasm32"))]
    let window = Window {
        resolution: bevy::window::WindowResolution::new(1280.0, 720.0),
        resizable: true,
        ..window
    };

    window
}
