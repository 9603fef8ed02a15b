//! WebSocket handler
//!
//! Runs one board connection: Hello, heartbeats, and pushed dispatches.

use crate::connection::Connection;
use crate::handlers::MessageDispatcher;
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use board_common::protocol::{CloseCode, GatewayMessage, HelloPayload, OpCode};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

/// Channel buffer size for outgoing messages
const MESSAGE_BUFFER_SIZE: usize = 100;

/// Floor for the heartbeat-timeout check period
const MIN_CHECK_PERIOD: Duration = Duration::from_millis(5);

type WsSink = SplitSink<WebSocket, Message>;

/// How a connection loop ended
#[derive(Debug)]
enum Exit {
    /// Close the socket with a gateway close code
    Close(CloseCode),
    /// Close normally (Reconnect sent, or the queue was shut)
    Normal,
    /// The board went away; nothing left to send
    Gone,
}

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let (tx, mut rx) = mpsc::channel::<GatewayMessage>(MESSAGE_BUFFER_SIZE);
    let connection = state.connection_manager().add_connection(tx);

    tracing::info!(connection_id = %connection.id(), "WebSocket connection established");

    let (mut ws_sink, mut ws_stream) = socket.split();

    let interval_ms = state.config().board.heartbeat_interval_ms;
    let hello = GatewayMessage::hello(HelloPayload::with_interval(interval_ms));
    if send_message(&mut ws_sink, &hello).await.is_err() {
        tracing::warn!(connection_id = %connection.id(), "Failed to send Hello message");
        cleanup_connection(&state, &connection);
        return;
    }

    let timeout = state.heartbeat_timeout();
    let mut check_interval = interval((state.heartbeat_interval() / 4).max(MIN_CHECK_PERIOD));
    check_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let exit = loop {
        tokio::select! {
            incoming = ws_stream.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match handle_text_message(&connection, &text) {
                        Ok(Some(reply)) => {
                            if send_message(&mut ws_sink, &reply).await.is_err() {
                                break Exit::Gone;
                            }
                        }
                        Ok(None) => {}
                        Err(code) => break Exit::Close(code),
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    tracing::debug!(connection_id = %connection.id(), "Binary messages not supported");
                    break Exit::Close(CloseCode::DecodeError);
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // Pong is handled automatically by axum
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!(connection_id = %connection.id(), "Client closed connection");
                    break Exit::Gone;
                }
                Some(Err(e)) => {
                    tracing::warn!(connection_id = %connection.id(), error = %e, "WebSocket error");
                    break Exit::Gone;
                }
            },
            outgoing = rx.recv() => match outgoing {
                Some(msg) => {
                    if send_message(&mut ws_sink, &msg).await.is_err() {
                        tracing::warn!(connection_id = %connection.id(), "Failed to send message to WebSocket");
                        break Exit::Gone;
                    }
                    if msg.op == OpCode::Reconnect {
                        break Exit::Normal;
                    }
                }
                None => break Exit::Normal,
            },
            _ = check_interval.tick() => {
                let time_since = connection.time_since_heartbeat();
                if time_since > timeout {
                    tracing::warn!(
                        connection_id = %connection.id(),
                        time_since_ms = time_since.as_millis(),
                        "Connection timed out (no heartbeat)"
                    );
                    break Exit::Close(CloseCode::SessionTimeout);
                }
            }
        }
    };

    match exit {
        Exit::Close(code) => {
            tracing::debug!(connection_id = %connection.id(), close_code = %code, "Closing connection");
            let frame = CloseFrame {
                code: code.as_u16(),
                reason: code.description().into(),
            };
            let _ = ws_sink.send(Message::Close(Some(frame))).await;
        }
        Exit::Normal => {
            let _ = ws_sink.close().await;
        }
        Exit::Gone => {}
    }

    cleanup_connection(&state, &connection);
}

/// Handle a text frame from the board, returning a reply to write back
fn handle_text_message(
    connection: &Connection,
    text: &str,
) -> Result<Option<GatewayMessage>, CloseCode> {
    let message = MessageDispatcher::decode(text).map_err(|e| {
        tracing::debug!(connection_id = %connection.id(), error = %e, "Rejected frame");
        e.to_close_code()
    })?;

    tracing::trace!(connection_id = %connection.id(), op = %message.op, "Received message");

    MessageDispatcher::dispatch(connection, &message).map_err(|e| {
        tracing::warn!(connection_id = %connection.id(), error = %e, "Handler error");
        e.to_close_code()
    })
}

async fn send_message(sink: &mut WsSink, message: &GatewayMessage) -> Result<(), axum::Error> {
    match message.to_json() {
        Ok(json) => sink.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode gateway message");
            Ok(())
        }
    }
}

/// Clean up a connection on disconnect
fn cleanup_connection(state: &GatewayState, connection: &Connection) {
    tracing::info!(
        connection_id = %connection.id(),
        age_ms = connection.age().as_millis(),
        "Cleaning up connection"
    );
    state.connection_manager().remove_connection(connection.id());
}
