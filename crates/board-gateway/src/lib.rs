//! # board-gateway
//!
//! WebSocket gateway that pushes newly stored feedback to display boards.
//!
//! Each board connects to `/gateway`, receives Hello with the heartbeat
//! interval, and then gets every `FEEDBACK_CREATE` published on the Redis
//! `feedback` channel as a Dispatch frame with its own sequence number.

pub mod broadcast;
pub mod connection;
pub mod handlers;
pub mod server;

pub use server::{create_app, create_gateway_state, run, run_server, GatewayState};
