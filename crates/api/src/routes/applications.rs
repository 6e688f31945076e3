//! Route definitions for the `/applications` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::applications;
use crate::state::AppState;

/// Routes mounted at `/applications`.
///
/// ```text
/// GET    /          -> list (?lead_id)
/// POST   /          -> create
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update
/// DELETE /{id}      -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(applications::list).post(applications::create))
        .route(
            "/{id}",
            get(applications::get_by_id)
                .put(applications::update)
                .delete(applications::delete),
        )
}
