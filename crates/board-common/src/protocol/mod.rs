//! Gateway protocol definitions
//!
//! The WebSocket protocol between the gateway and display boards: op codes,
//! the message envelope, close codes, and payloads.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, FEEDBACK_CREATE};
