//! Handler error types

use board_common::protocol::CloseCode;
use thiserror::Error;

/// Handler error type
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame was not a JSON object with a numeric `op`
    #[error("Failed to decode frame: {0}")]
    Decode(String),

    /// Op code unknown, or one only the server may send
    #[error("Unexpected op code: {0}")]
    UnknownOpcode(u64),

    /// Payload did not match the op code
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Close code sent to the board before the socket is dropped
    pub fn to_close_code(&self) -> CloseCode {
        match self {
            Self::Decode(_) | Self::InvalidPayload(_) => CloseCode::DecodeError,
            Self::UnknownOpcode(_) => CloseCode::UnknownOpcode,
            Self::Internal(_) => CloseCode::UnknownError,
        }
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;
