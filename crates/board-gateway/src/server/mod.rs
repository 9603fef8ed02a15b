//! Gateway server setup
//!
//! Provides the main WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::broadcast::{EventDispatcher, EventDispatcherConfig};
use crate::connection::ConnectionManager;
use axum::{routing::get, Router};
use board_common::protocol::GatewayMessage;
use board_common::{shutdown_signal, AppConfig, AppError, AppResult};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// How long open boards get to see Reconnect and disconnect on shutdown
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize the connection registry and the Redis feed
pub async fn create_gateway_state(config: AppConfig) -> AppResult<GatewayState> {
    let connection_manager = ConnectionManager::new_shared();

    tracing::info!("Subscribing to Redis feedback channel...");
    let dispatcher_config = EventDispatcherConfig {
        redis_url: config.redis.url.clone(),
        ..Default::default()
    };

    let event_dispatcher = EventDispatcher::new(dispatcher_config, connection_manager.clone())
        .await
        .map_err(|e| AppError::Cache(format!("Failed to create event dispatcher: {e}")))?;

    let event_dispatcher = Arc::new(event_dispatcher);
    event_dispatcher.clone().start();

    Ok(GatewayState::new(connection_manager, config).with_event_dispatcher(event_dispatcher))
}

/// Stop pulling events and ask every board to reconnect elsewhere
pub fn begin_shutdown(state: &GatewayState) {
    if let Some(dispatcher) = state.event_dispatcher() {
        dispatcher.stop();
    }
    let notified = state
        .connection_manager()
        .broadcast(&GatewayMessage::reconnect());
    tracing::info!(boards = notified, "Sent Reconnect to connected boards");
}

/// Serve the gateway until `shutdown` resolves, then drain open boards
pub async fn run_server<F>(
    state: GatewayState,
    listener: TcpListener,
    shutdown: F,
) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    let app = create_app(state.clone());
    let shutdown_state = state.clone();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            begin_shutdown(&shutdown_state);
        })
        .await?;

    let remaining = state.connection_manager().drain(DRAIN_TIMEOUT).await;
    if remaining > 0 {
        tracing::warn!(remaining = remaining, "Boards still connected at shutdown");
    }

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> AppResult<()> {
    let address = config.gateway.address();
    let addr: SocketAddr = address
        .parse()
        .map_err(|e| AppError::config(format!("Invalid gateway address {address}: {e}")))?;

    let state = create_gateway_state(config).await?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::config(format!("Failed to bind to {addr}: {e}")))?;

    run_server(state, listener, shutdown_signal()).await
}
