//! WebSocket infrastructure for the realtime task feed.
//!
//! Provides tenant-scoped connection management, heartbeat monitoring, and
//! the authenticated HTTP upgrade handler.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use manager::WsManager;
