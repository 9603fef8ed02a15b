//! # board-common
//!
//! Shared utilities including configuration, error handling, telemetry,
//! and the gateway wire protocol spoken by both the server and display clients.

pub mod config;
pub mod error;
pub mod protocol;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AnimationStrategy, AppConfig, AppSettings, BoardConfig, ClientConfig, ConfigError,
    CorsConfig, DatabaseConfig, Environment, RedisConfig, ServerConfig, SnowflakeConfig,
};
pub use error::{AppError, AppResult, ErrorResponse};
pub use telemetry::{
    shutdown_signal, try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
