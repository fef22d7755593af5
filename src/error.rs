use crate::config::ConfigError;
use thiserror::Error;

/// Top-level error type for the dragon-collections library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("immutable violation: {0}")]
    ImmutableViolation(String),

    #[error("plug-in '{0}' does not exist")]
    UnknownPlugin(String),
}
