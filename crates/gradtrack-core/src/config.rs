use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GradtrackError, Result};

/// Environment variable that overrides [`BackendConfig::base_url`].
pub const BACKEND_URL_ENV: &str = "GRADTRACK_BACKEND_URL";

/// Top-level configuration for the GradTrack assistant.
///
/// Loaded from a TOML file. Each section corresponds to one crate of the
/// workspace; missing sections and fields fall back to their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GradtrackConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

impl GradtrackConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: GradtrackConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| GradtrackError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Apply overrides from the process environment.
    ///
    /// Only `GRADTRACK_BACKEND_URL` is recognised; empty values are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BACKEND_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                info!(backend_url = url, "Backend URL overridden from environment");
                self.backend.base_url = url.to_string();
            }
        }
    }
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Backend API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL the resource keys are appended to.
    pub base_url: String,
    /// Default per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Default cache time-to-live in milliseconds.
    pub cache_ttl_ms: u64,
    /// Timeout for the health check in milliseconds.
    pub health_timeout_ms: u64,
    /// Whether fetches consult and populate the cache by default.
    pub use_cache: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_ms: 10_000,
            cache_ttl_ms: 60_000,
            health_timeout_ms: 3_000,
            use_cache: true,
        }
    }
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Lower bound of the simulated typing delay in milliseconds.
    pub typing_delay_min_ms: u64,
    /// Upper bound of the simulated typing delay in milliseconds.
    /// Setting both bounds to 0 disables the delay.
    pub typing_delay_max_ms: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_min_ms: 800,
            typing_delay_max_ms: 1_200,
        }
    }
}

impl ChatConfig {
    /// A configuration without the simulated delay.
    pub fn instant() -> Self {
        Self {
            typing_delay_min_ms: 0,
            typing_delay_max_ms: 0,
        }
    }

    /// Delay bounds as an ordered `(min, max)` pair.
    pub fn typing_delay_bounds(&self) -> (Duration, Duration) {
        let lo = self.typing_delay_min_ms.min(self.typing_delay_max_ms);
        let hi = self.typing_delay_min_ms.max(self.typing_delay_max_ms);
        (Duration::from_millis(lo), Duration::from_millis(hi))
    }
}
