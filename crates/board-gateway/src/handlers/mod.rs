//! Op code handlers
//!
//! Decodes frames sent by boards and handles them by operation code.

mod error;
mod heartbeat;

pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;

use crate::connection::Connection;
use board_common::protocol::{GatewayMessage, OpCode};
use serde_json::Value;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Decode a text frame into a client message
    ///
    /// Malformed JSON (or a frame without a numeric `op`) is a decode error;
    /// a well-formed frame carrying an op boards may not send is an
    /// unknown-opcode error.
    pub fn decode(text: &str) -> HandlerResult<GatewayMessage> {
        let value: Value = serde_json::from_str(text)?;

        let op = value
            .get("op")
            .and_then(Value::as_u64)
            .ok_or_else(|| HandlerError::Decode("missing numeric op".to_string()))?;

        let op_code = u8::try_from(op)
            .ok()
            .and_then(OpCode::from_u8)
            .filter(|code| code.is_client_op())
            .ok_or(HandlerError::UnknownOpcode(op))?;

        let message: GatewayMessage = serde_json::from_value(value)
            .map_err(|e| HandlerError::InvalidPayload(format!("{op_code}: {e}")))?;

        Ok(message)
    }

    /// Handle an incoming client message, returning an optional direct reply
    pub fn dispatch(
        connection: &Connection,
        message: &GatewayMessage,
    ) -> HandlerResult<Option<GatewayMessage>> {
        match message.op {
            OpCode::Heartbeat => {
                let seq = message.as_heartbeat_seq().ok_or_else(|| {
                    HandlerError::InvalidPayload("Invalid Heartbeat payload".to_string())
                })?;

                HeartbeatHandler::handle(connection, seq)
            }
            // decode() never lets server ops through
            op => {
                tracing::error!(op = %op, "Unhandled client op code");
                Err(HandlerError::UnknownOpcode(u64::from(op.as_u8())))
            }
        }
    }
}
