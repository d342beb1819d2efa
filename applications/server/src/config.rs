/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tilawa_client::{OpenAiConfig, QuranCloudConfig};
use tilawa_core::{
    audio::{DEFAULT_AUDIO_HOST, DEFAULT_RECITER},
    AudioSource,
};

/// Default config file, read if present
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub quran: QuranCloudConfig,

    #[serde(default)]
    pub audio: AudioSettings,

    #[serde(default)]
    pub rate_limit: RateLimitSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    #[serde(default = "default_audio_host")]
    pub host: String,

    #[serde(default = "default_reciter")]
    pub reciter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitSettings {
    /// Range parse requests allowed per caller per window
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl AudioSettings {
    pub fn source(&self) -> AudioSource {
        AudioSource::new(self.host.clone(), self.reciter.clone())
    }
}

impl RateLimitSettings {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl ServerConfig {
    /// Load configuration from `config.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from the given file (or `config.toml`) and environment
    ///
    /// Environment variables use the `TILAWA_` prefix with `__` between
    /// section and key (e.g. `TILAWA_SERVER__PORT`). The plain `PORT` and
    /// `OPENAI_API_KEY` variables take precedence over everything else.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path).required(true));
            }
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (prefixed with TILAWA_)
        settings = settings.add_source(
            config::Environment::with_prefix("TILAWA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        settings = settings
            .set_override_option("server.port", std::env::var("PORT").ok())
            .and_then(|s| {
                s.set_override_option("openai.api_key", std::env::var("OPENAI_API_KEY").ok())
            })
            .map_err(|e| ServerError::Config(e.to_string()))?;

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration for serving
    pub fn validate(&self) -> Result<()> {
        if self.openai.api_key.trim().is_empty() {
            return Err(ServerError::Config(
                "OpenAI API key is required (set OPENAI_API_KEY or TILAWA_OPENAI__API_KEY)"
                    .to_string(),
            ));
        }

        if self.rate_limit.max_requests == 0 {
            return Err(ServerError::Config(
                "rate_limit.max_requests must be at least 1".to_string(),
            ));
        }

        if self.rate_limit.window_secs == 0 {
            return Err(ServerError::Config(
                "rate_limit.window_secs must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_audio_host() -> String {
    DEFAULT_AUDIO_HOST.to_string()
}

fn default_reciter() -> String {
    DEFAULT_RECITER.to_string()
}

fn default_max_requests() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    60
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            host: default_audio_host(),
            reciter: default_reciter(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}
