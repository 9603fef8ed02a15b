//! Connection management
//!
//! Tracks live board connections and routes outgoing frames to them.

mod connection;
mod manager;

pub use connection::Connection;
pub use manager::ConnectionManager;
