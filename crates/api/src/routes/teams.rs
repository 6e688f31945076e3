//! Route definitions for the `/teams` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::teams;
use crate::state::AppState;

/// Routes mounted at `/teams`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create (admin)
/// GET    /mine                      -> mine
/// GET    /{id}/members              -> list_members
/// POST   /{id}/members              -> add_member (admin)
/// DELETE /{id}/members/{user_id}    -> remove_member (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(teams::list).post(teams::create))
        .route("/mine", get(teams::mine))
        .route(
            "/{id}/members",
            get(teams::list_members).post(teams::add_member),
        )
        .route("/{id}/members/{user_id}", delete(teams::remove_member))
}
