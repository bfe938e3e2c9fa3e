//! Gameplay rules for Pastafarian's Delight: enemy health, item spawning and
//! pickups, plus the Bevy plugin that hosts them.

pub mod config;
pub mod diagnostics;
pub mod enemy;
pub mod error;
pub mod gameplay;
pub mod host;
pub mod pickup;
pub mod scenario;
pub mod simulation;
pub mod spawner;
pub mod ui;

pub use config::GameplayConfig;
pub use error::GameplayError;
pub use gameplay::GameplayPlugin;
