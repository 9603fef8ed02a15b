//! Gateway state
//!
//! Application state for the gateway server.

use crate::broadcast::EventDispatcher;
use crate::connection::ConnectionManager;
use board_common::AppConfig;
use std::sync::Arc;
use std::time::Duration;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Redis feed; absent when the gateway is driven in-process
    event_dispatcher: Option<Arc<EventDispatcher>>,
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(connection_manager: Arc<ConnectionManager>, config: AppConfig) -> Self {
        Self {
            connection_manager,
            event_dispatcher: None,
            config: Arc::new(config),
        }
    }

    /// Attach the Redis event dispatcher
    #[must_use]
    pub fn with_event_dispatcher(mut self, dispatcher: Arc<EventDispatcher>) -> Self {
        self.event_dispatcher = Some(dispatcher);
        self
    }

    /// Get the event dispatcher, if one is attached
    pub fn event_dispatcher(&self) -> Option<&Arc<EventDispatcher>> {
        self.event_dispatcher.as_ref()
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &Arc<ConnectionManager> {
        &self.connection_manager
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Interval advertised in Hello
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.config.board.heartbeat_interval_ms)
    }

    /// Silence after which a board is closed: one and a half intervals
    pub fn heartbeat_timeout(&self) -> Duration {
        self.heartbeat_interval() * 3 / 2
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("event_dispatcher", &self.event_dispatcher)
            .field("config", &"AppConfig")
            .finish()
    }
}
