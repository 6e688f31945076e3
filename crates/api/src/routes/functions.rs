//! Internal function routes, mounted at `/functions/v1`.
//!
//! These sit outside the `/api/v1` CORS policy and answer with their own
//! permissive cross-origin headers.

use axum::routing::post;
use axum::Router;

use crate::handlers::create_task;
use crate::state::AppState;

/// Routes mounted at `/functions/v1`.
///
/// ```text
/// POST    /create-task   -> create_task
/// OPTIONS /create-task   -> preflight (204)
/// *       /create-task   -> 405, Allow: POST, OPTIONS
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-task",
            post(create_task::create_task)
                .options(create_task::preflight)
                .fallback(create_task::method_not_allowed),
        )
        .layer(axum::middleware::map_response(create_task::cors_headers))
}
