//! Display and submission client configuration
//!
//! Layered with the `config` crate: an optional `board-client.{toml,json,yaml}`
//! file in the working directory, then `BOARD_*` environment variables
//! (`BOARD_API_URL`, `BOARD_WINDOW_SIZE`, ...).

use serde::Deserialize;

use super::ConfigError;

/// How emoji animations are loaded by the display board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStrategy {
    /// Fetch all five animations concurrently before the first paint
    #[default]
    Eager,
    /// Fetch each animation the first time its rating is shown
    Lazy,
}

/// Client-side configuration shared by the board and the submission form
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default)]
    pub animation_strategy: AnimationStrategy,
    #[serde(default = "default_animation_base_url")]
    pub animation_base_url: String,
    #[serde(default = "default_reconnect_initial_ms")]
    pub reconnect_initial_ms: u64,
    #[serde(default = "default_reconnect_max_ms")]
    pub reconnect_max_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_gateway_url() -> String {
    "ws://127.0.0.1:8081/gateway".to_string()
}

fn default_window_size() -> usize {
    board_core::DEFAULT_WINDOW_SIZE
}

fn default_animation_base_url() -> String {
    "https://fonts.gstatic.com/s/e/notoemoji/latest".to_string()
}

fn default_reconnect_initial_ms() -> u64 {
    500
}

fn default_reconnect_max_ms() -> u64 {
    30_000
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            gateway_url: default_gateway_url(),
            window_size: default_window_size(),
            animation_strategy: AnimationStrategy::default(),
            animation_base_url: default_animation_base_url(),
            reconnect_initial_ms: default_reconnect_initial_ms(),
            reconnect_max_ms: default_reconnect_max_ms(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl ClientConfig {
    /// Config file looked up in the working directory (extension optional)
    pub const FILE_NAME: &'static str = "board-client";

    /// Load from the optional config file and `BOARD_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(config::File::with_name(Self::FILE_NAME).required(false))
            .add_source(config::Environment::with_prefix("BOARD").try_parsing(true))
            .build()?;

        Self::from_settings(settings)
    }

    /// Deserialize and validate already-built settings
    pub fn from_settings(settings: config::Config) -> Result<Self, ConfigError> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // The API never returns more than this in one read
        if self.window_size == 0 || self.window_size > board_core::MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidValue(
                "BOARD_WINDOW_SIZE",
                format!("{} (must be 1..={})", self.window_size, board_core::MAX_PAGE_SIZE),
            ));
        }
        if self.reconnect_initial_ms == 0 || self.reconnect_initial_ms > self.reconnect_max_ms {
            return Err(ConfigError::InvalidValue(
                "BOARD_RECONNECT_INITIAL_MS",
                format!(
                    "{} (must be 1..={})",
                    self.reconnect_initial_ms, self.reconnect_max_ms
                ),
            ));
        }
        Ok(())
    }

    /// REST base for feedback endpoints
    pub fn feedback_endpoint(&self) -> String {
        format!("{}/api/v1/feedback", self.api_url.trim_end_matches('/'))
    }
}
