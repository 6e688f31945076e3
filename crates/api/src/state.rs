use std::sync::Arc;

use leadflow_core::access::ServiceRole;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: leadflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Event bus for task notifications.
    pub event_bus: Arc<leadflow_events::EventBus>,
    /// Realtime WebSocket connections.
    pub ws_manager: Arc<WsManager>,
    /// Credential for the elevated task-creation path. Never derived from a
    /// request.
    pub service: Arc<ServiceRole>,
}
