use std::path::PathBuf;
use thiserror::Error;

/// Failures while building an [`AppConfig`](super::AppConfig) from its layers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Merging defaults, the config file and `SRENITY_*` variables failed.
    #[error("cannot merge srenity config layers (defaults, config file, SRENITY_* env): {0}")]
    Load(String),

    #[error("srenity config file {0} does not exist")]
    FileNotFound(PathBuf),

    /// The built-in defaults could not be turned into a config layer.
    #[error("cannot encode built-in srenity defaults: {0}")]
    Parse(String),

    #[error("invalid srenity config: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Load(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
