use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = GameplayError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum GameplayError {
    /// A spawner was asked to instantiate items without a prefab configured.
    #[error("item spawner has no prefab configured")]
    MissingPrefab,
    #[error("failed to read gameplay config at {}", path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse gameplay config at {}", path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid gameplay config: {0}")]
    InvalidConfig(String),
}
