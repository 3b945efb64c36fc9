//! Error types for the assistant.

use gradtrack_core::error::GradtrackError;
use gradtrack_data::FetchError;

/// Errors from response resolution and conversation setup.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("response failed: {0}")]
    ResponseFailed(String),
    #[error("data client error: {0}")]
    DataClient(#[from] FetchError),
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<GradtrackError> for ChatError {
    fn from(err: GradtrackError) -> Self {
        ChatError::Config(err.to_string())
    }
}
