//! Heartbeat handler (op 1)

use super::HandlerResult;
use crate::connection::Connection;
use board_common::protocol::GatewayMessage;

/// Handles heartbeat messages
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Handle a heartbeat from the board
    ///
    /// `last_sequence` is the last Dispatch sequence the board has seen. The
    /// returned ACK is written straight back on the socket.
    pub fn handle(
        connection: &Connection,
        last_sequence: Option<u64>,
    ) -> HandlerResult<Option<GatewayMessage>> {
        connection.record_heartbeat();

        tracing::trace!(
            connection_id = %connection.id(),
            client_seq = ?last_sequence,
            server_seq = connection.current_sequence(),
            "Heartbeat received"
        );

        Ok(Some(GatewayMessage::heartbeat_ack()))
    }
}
