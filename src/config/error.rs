use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid import extension: `{0}`")]
    InvalidExtension(String),

    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    ParseError { path: PathBuf, source: ParseError },

    #[error("failed to parse config text: {0}")]
    TextError(ParseError),

    #[error("invalid path: {0}")]
    InvalidPath(PathBuf),

    #[error("invalid folder mask '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Format-specific deserializer failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
