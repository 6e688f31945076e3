//! Handler for the counselor dashboard's "today" view.

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use leadflow_core::schedule::{offset_from_minutes, DayWindow, MAX_OFFSET_MINUTES, MIN_OFFSET_MINUTES};
use leadflow_core::types::Timestamp;
use leadflow_db::models::task::Task;
use leadflow_db::repositories::TaskRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query params for `GET /dashboard/today`.
#[derive(Debug, Deserialize)]
pub struct TodayQuery {
    /// Caller's UTC offset in minutes east of UTC. Defaults to UTC.
    pub tz_offset_minutes: Option<i32>,
}

/// Response for `GET /dashboard/today`.
#[derive(Debug, Serialize)]
pub struct TodayResponse {
    pub window_start: Timestamp,
    pub window_end: Timestamp,
    pub data: Vec<Task>,
}

/// GET /api/v1/dashboard/today
///
/// Open tasks due in the caller's local day, earliest first.
pub async fn today(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TodayQuery>,
) -> AppResult<Json<TodayResponse>> {
    let minutes = params.tz_offset_minutes.unwrap_or(0);
    let offset = offset_from_minutes(minutes).ok_or_else(|| {
        AppError::BadRequest(format!(
            "tz_offset_minutes must be between {MIN_OFFSET_MINUTES} and {MAX_OFFSET_MINUTES}"
        ))
    })?;
    let window = DayWindow::containing(Utc::now(), offset);

    let data = match user.caller() {
        Some(caller) => TaskRepo::list_due_in_window(&state.pool, &caller, &window).await?,
        None => Vec::new(),
    };

    Ok(Json(TodayResponse {
        window_start: window.start,
        window_end: window.end,
        data,
    }))
}
