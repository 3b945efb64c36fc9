//! Tracing subscriber setup for hosts embedding the assistant.

use tracing_subscriber::EnvFilter;

use crate::error::{GradtrackError, Result};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Fails instead of
/// panicking when a global subscriber is already installed.
pub fn init_tracing(default_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| GradtrackError::Telemetry(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| GradtrackError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_error() {
        // Another test may have installed a subscriber first; either way the
        // second call in this process must fail without panicking.
        let _ = init_tracing("debug");
        let err = init_tracing("debug").unwrap_err();
        assert!(matches!(err, GradtrackError::Telemetry(_)));
    }
}
