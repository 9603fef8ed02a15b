//! Telemetry, tracing setup and process signals

mod shutdown;
mod tracing_setup;

pub use shutdown::shutdown_signal;
pub use tracing_setup::{
    try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError,
};
