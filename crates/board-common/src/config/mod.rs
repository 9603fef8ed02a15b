//! Configuration structs

mod app_config;
mod client_config;

pub use app_config::{
    AppConfig, AppSettings, BoardConfig, ConfigError, CorsConfig, DatabaseConfig, Environment,
    RedisConfig, ServerConfig, SnowflakeConfig,
};
pub use client_config::{AnimationStrategy, ClientConfig};
