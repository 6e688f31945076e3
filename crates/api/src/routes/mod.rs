pub mod applications;
pub mod dashboard;
pub mod functions;
pub mod health;
pub mod leads;
pub mod realtime;
pub mod tasks;
pub mod teams;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer token.
///
/// Route hierarchy:
///
/// ```text
/// /realtime/tasks                                  WebSocket task feed
///
/// /leads                                           list, create
/// /leads/{id}                                      get, update, delete (admin)
///
/// /applications                                    list (?lead_id), create
/// /applications/{id}                               get, update, delete
///
/// /tasks                                           list (?application_id)
/// /tasks/{id}                                      get, update, delete
/// /tasks/{id}/complete                             mark completed (POST)
///
/// /dashboard/today                                 open tasks due today (?tz_offset_minutes)
///
/// /teams                                           list, create (admin)
/// /teams/mine                                      teams the caller belongs to
/// /teams/{id}/members                              list, add (admin)
/// /teams/{id}/members/{user_id}                    remove (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Realtime task feed.
        .nest("/realtime", realtime::router())
        // Lead, application, and task resources.
        .nest("/leads", leads::router())
        .nest("/applications", applications::router())
        .nest("/tasks", tasks::router())
        // Counselor dashboard.
        .nest("/dashboard", dashboard::router())
        // Teams and memberships.
        .nest("/teams", teams::router())
}
