use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use leadflow_core::access::Caller;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Upgrade an authenticated request to the realtime task feed.
///
/// The connection is bound to the caller's tenant and only ever receives
/// that tenant's events. Callers whose session facts do not resolve are
/// refused before the upgrade.
pub async fn ws_handler(
    user: AuthUser,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let caller = user.caller_for_write()?;
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, caller, state.ws_manager))
        .into_response())
}

/// Manage a single connection after upgrade.
///
/// Registers with the manager, forwards queued outbound messages on a
/// spawned task, and drains inbound frames until the client goes away.
async fn handle_socket(socket: WebSocket, caller: Caller, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        conn_id = %conn_id,
        tenant_id = %caller.tenant_id,
        user_id = %caller.user_id,
        "Realtime client connected",
    );

    let mut rx = ws_manager
        .add(conn_id.clone(), caller.tenant_id, caller.user_id)
        .await;

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "Realtime sink closed");
                break;
            }
        }
    });

    // The feed is server-push only; inbound data frames are ignored.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Realtime receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Realtime client disconnected");
}
