use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/realtime`.
///
/// ```text
/// GET    /tasks     -> WebSocket upgrade, task.created feed for the caller's tenant
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/tasks", get(ws::ws_handler))
}
