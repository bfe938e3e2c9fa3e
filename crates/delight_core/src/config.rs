use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::enemy::{DifficultyMode, EnemyHealth, DEFAULT_ENEMY_HEALTH, DEFAULT_ENEMY_SPEED};
use crate::error::{GameplayError, Result};
use crate::host::Prefab;
use crate::pickup::{
    HealthBoost, PlayerHealth, PlayerMovement, SpeedBoost, DEFAULT_HEALTH_BOOST,
    DEFAULT_SPEED_BOOST,
};
use crate::spawner::{ItemSpawner, SpawnBounds, DEFAULT_MAX_ITEMS};

pub const DEFAULT_CONFIG_PATH: &str = "config/gameplay.toml";

/// Tuning values for a level, usually read from `config/gameplay.toml`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameplayConfig {
    #[serde(default)]
    pub spawner: SpawnerConfig,
    #[serde(default)]
    pub enemy: EnemyConfig,
    #[serde(default)]
    pub pickups: PickupConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

impl GameplayConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| GameplayError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: GameplayConfig =
            toml::from_str(&data).map_err(|source| GameplayError::ParseConfig {
                path: path.to_path_buf(),
                source,
            })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Path from `DELIGHT_CONFIG`, falling back to [`DEFAULT_CONFIG_PATH`].
    pub fn env_path() -> PathBuf {
        std::env::var("DELIGHT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = &self.spawner.bounds;
        let numbers = [
            ("spawner.bounds.x", bounds.x),
            ("spawner.bounds.y", bounds.y),
            ("spawner.bounds.width", bounds.width),
            ("spawner.bounds.height", bounds.height),
            ("enemy.health", self.enemy.health),
            ("enemy.speed", self.enemy.speed),
            ("pickups.health_boost", self.pickups.health_boost),
            ("pickups.speed_boost", self.pickups.speed_boost),
            ("player.max_health", self.player.max_health),
            ("player.current_health", self.player.current_health),
            ("player.base_speed", self.player.base_speed),
        ];
        if let Some((label, _)) = numbers.iter().find(|(_, value)| !value.is_finite()) {
            return Err(GameplayError::InvalidConfig(format!("{label} must be finite")));
        }
        if self.spawner.limit_enabled && self.spawner.max_items == 0 {
            return Err(GameplayError::InvalidConfig(
                "spawner.max_items must be positive when the limit is enabled".into(),
            ));
        }
        Ok(())
    }

    pub fn spawner(&self, prefab: Prefab) -> ItemSpawner {
        ItemSpawner {
            item_prefab: Some(prefab),
            bounds: self.spawner.bounds,
            limit_enabled: self.spawner.limit_enabled,
            max_items: self.spawner.max_items,
        }
    }

    pub fn enemy(&self) -> EnemyHealth {
        EnemyHealth::with_stats(self.enemy.mode, self.enemy.health, self.enemy.speed)
    }

    pub fn health_boost(&self) -> HealthBoost {
        HealthBoost {
            boost_amount: self.pickups.health_boost,
        }
    }

    pub fn speed_boost(&self) -> SpeedBoost {
        SpeedBoost {
            boost_amount: self.pickups.speed_boost,
        }
    }

    pub fn player_health(&self) -> PlayerHealth {
        PlayerHealth {
            max_health: self.player.max_health,
            current_health: self.player.current_health,
        }
    }

    pub fn player_movement(&self) -> PlayerMovement {
        PlayerMovement {
            base_speed: self.player.base_speed,
            current_speed: self.player.base_speed,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SpawnerConfig {
    pub bounds: SpawnBounds,
    pub limit_enabled: bool,
    pub max_items: usize,
    pub initial_count: usize,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            bounds: SpawnBounds::default(),
            limit_enabled: false,
            max_items: DEFAULT_MAX_ITEMS,
            initial_count: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnemyConfig {
    pub mode: DifficultyMode,
    pub health: f32,
    pub speed: f32,
    pub count: usize,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            mode: DifficultyMode::default(),
            health: DEFAULT_ENEMY_HEALTH,
            speed: DEFAULT_ENEMY_SPEED,
            count: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PickupConfig {
    pub health_boost: f32,
    pub speed_boost: f32,
    pub count: usize,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            health_boost: DEFAULT_HEALTH_BOOST,
            speed_boost: DEFAULT_SPEED_BOOST,
            count: 8,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: f32,
    pub current_health: f32,
    pub base_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let health = PlayerHealth::default();
        let movement = PlayerMovement::default();
        Self {
            max_health: health.max_health,
            current_health: health.current_health,
            base_speed: movement.base_speed,
        }
    }
}
