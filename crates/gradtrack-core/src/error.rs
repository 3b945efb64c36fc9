use thiserror::Error;

/// Top-level error type for GradTrack.
///
/// Subsystem crates define their own error types for the failures they
/// absorb or surface, and convert into this one where a shared concern
/// (configuration, I/O, serialization) is involved.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradtrackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl From<toml::de::Error> for GradtrackError {
    fn from(err: toml::de::Error) -> Self {
        GradtrackError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for GradtrackError {
    fn from(err: toml::ser::Error) -> Self {
        GradtrackError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for GradtrackError {
    fn from(err: serde_json::Error) -> Self {
        GradtrackError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for GradTrack operations.
pub type Result<T> = std::result::Result<T, GradtrackError>;
