use thiserror::Error;

use crate::core::types::CardId;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Unknown card: {0}")]
    UnknownCard(CardId),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
