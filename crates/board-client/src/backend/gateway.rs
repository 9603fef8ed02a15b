//! Gateway listener
//!
//! Keeps one WebSocket open to `/gateway`, heartbeats on the interval the
//! server advertises, and forwards every `FEEDBACK_CREATE` dispatch into a
//! subscription. Dropped connections are retried with capped exponential
//! backoff; records published while disconnected are not recovered.

use super::{Backoff, BackendResult, SubscriptionSink};
use board_common::protocol::{CloseCode, GatewayMessage, OpCode, FEEDBACK_CREATE};
use board_core::Feedback;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// How long to wait for Hello after the socket opens
const HELLO_TIMEOUT: Duration = Duration::from_secs(10);

/// Why one connection attempt ended
#[derive(Debug, PartialEq, Eq)]
enum SessionEnd {
    /// The subscription was cancelled; stop for good
    Cancelled,
    /// The socket went away; try again after a delay
    Dropped,
}

/// Feed `sink` from the gateway at `url` until the subscription is cancelled
pub(crate) async fn run(url: String, mut backoff: Backoff, sink: SubscriptionSink) {
    loop {
        match session(&url, &sink, &mut backoff).await {
            Ok(SessionEnd::Cancelled) => break,
            Ok(SessionEnd::Dropped) => {
                tracing::info!(url = %url, "Gateway connection dropped");
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Gateway connection failed");
            }
        }

        let delay = backoff.next_delay();
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Reconnecting to gateway");

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = sink.cancelled() => break,
        }
    }

    tracing::debug!(url = %url, "Gateway listener stopped");
}

/// One connection: Hello, then heartbeats and dispatches until it ends
async fn session(
    url: &str,
    sink: &SubscriptionSink,
    backoff: &mut Backoff,
) -> BackendResult<SessionEnd> {
    let (socket, _) = tokio::select! {
        connected = connect_async(url) => connected?,
        () = sink.cancelled() => return Ok(SessionEnd::Cancelled),
    };
    let (mut write, mut read) = socket.split();

    let hello = tokio::select! {
        hello = tokio::time::timeout(HELLO_TIMEOUT, async {
            while let Some(frame) = read.next().await {
                if let Message::Text(text) = frame? {
                    if let Some(hello) = GatewayMessage::from_json(&text)?.as_hello() {
                        return Ok(Some(hello));
                    }
                }
            }
            BackendResult::Ok(None)
        }) => hello,
        () = sink.cancelled() => return Ok(SessionEnd::Cancelled),
    };

    let Ok(hello) = hello else {
        tracing::warn!(url = %url, "Gateway sent no Hello");
        return Ok(SessionEnd::Dropped);
    };
    let Some(hello) = hello? else {
        return Ok(SessionEnd::Dropped);
    };

    backoff.reset();
    let period = Duration::from_millis(hello.heartbeat_interval.max(1));
    tracing::info!(url = %url, heartbeat_interval_ms = hello.heartbeat_interval, "Connected to gateway");

    let mut heartbeat = interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_sequence: Option<u64> = None;

    loop {
        tokio::select! {
            () = sink.cancelled() => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(SessionEnd::Cancelled);
            }
            _ = heartbeat.tick() => {
                write
                    .send(Message::Text(GatewayMessage::heartbeat(last_sequence).to_json()?))
                    .await?;
            }
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let message = GatewayMessage::from_json(&text)?;
                    match message.op {
                        OpCode::Dispatch => {
                            if let Some(seq) = message.s {
                                last_sequence = Some(seq);
                            }
                            if let Some(feedback) = decode_dispatch(&message) {
                                if !sink.send(feedback).await {
                                    return Ok(SessionEnd::Cancelled);
                                }
                            }
                        }
                        OpCode::Heartbeat => {
                            // Server asked for an immediate heartbeat
                            write
                                .send(Message::Text(GatewayMessage::heartbeat(last_sequence).to_json()?))
                                .await?;
                        }
                        OpCode::Reconnect => {
                            tracing::info!(url = %url, "Gateway asked us to reconnect");
                            return Ok(SessionEnd::Dropped);
                        }
                        OpCode::HeartbeatAck | OpCode::Hello => {}
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    if let Some(frame) = frame {
                        let code = u16::from(frame.code);
                        tracing::info!(
                            code = code,
                            reason = CloseCode::from_u16(code).map_or("", CloseCode::description),
                            "Gateway closed the connection"
                        );
                    }
                    return Ok(SessionEnd::Dropped);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(SessionEnd::Dropped),
            },
        }
    }
}

/// Record carried by a `FEEDBACK_CREATE` dispatch; anything else is skipped
fn decode_dispatch(message: &GatewayMessage) -> Option<Feedback> {
    let (event, data) = message.as_dispatch()?;
    if event != FEEDBACK_CREATE {
        tracing::debug!(event = %event, "Ignoring dispatch");
        return None;
    }
    match serde_json::from_value(data.clone()) {
        Ok(feedback) => Some(feedback),
        Err(e) => {
            tracing::warn!(error = %e, "Malformed feedback dispatch");
            None
        }
    }
}
