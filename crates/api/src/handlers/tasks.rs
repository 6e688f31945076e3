//! Handlers for the `/tasks` resource.
//!
//! Tasks are created only through the task creation function; this
//! resource covers reading, editing, completing, and deleting them under
//! the caller's own tenant.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use leadflow_core::access::can_update_tenant_row;
use leadflow_core::types::DbId;
use leadflow_db::models::task::{Task, UpdateTask};
use leadflow_db::repositories::TaskRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query params for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub application_id: Option<DbId>,
}

/// GET /api/v1/tasks
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListQuery>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let data = match user.caller() {
        Some(caller) => {
            TaskRepo::list_for_caller(&state.pool, &caller, params.application_id).await?
        }
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    let caller = user.caller().ok_or(AppError::not_found("Task", id))?;
    let task = TaskRepo::find_for_caller(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Task", id))?;
    Ok(Json(task))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    let caller = user.caller_for_write()?;
    let before = TaskRepo::find_for_caller(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Task", id))?;

    let after_tenant = input.tenant_id.unwrap_or(before.tenant_id);
    if !can_update_tenant_row(&user.facts, before.tenant_id, after_tenant) {
        tracing::warn!(task_id = %id, user_id = %caller.user_id, "Task update refused");
        return Err(AppError::denied());
    }

    let task = TaskRepo::update(&state.pool, &caller, id, &input)
        .await?
        .ok_or(AppError::not_found("Task", id))?;
    Ok(Json(task))
}

/// POST /api/v1/tasks/{id}/complete
///
/// Idempotent: completing an already-completed task returns it again.
pub async fn complete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    let caller = user.caller_for_write()?;
    let task = TaskRepo::mark_completed(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Task", id))?;
    tracing::info!(task_id = %id, user_id = %caller.user_id, "Task completed");
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let caller = user.caller_for_write()?;
    if TaskRepo::delete(&state.pool, &caller, id).await? {
        tracing::info!(task_id = %id, "Task deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Task", id))
    }
}
