use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET    /today     -> today (?tz_offset_minutes)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/today", get(dashboard::today))
}
