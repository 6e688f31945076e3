//! The task creation function.
//!
//! Runs under the elevated [`ServiceRole`](leadflow_core::access::ServiceRole)
//! held in `AppState` and makes no end-user authorization decision of its
//! own. When `SERVICE_API_KEY` is configured, callers must present it. Input is validated field by field and every failure is reported in
//! one response. The new task inherits its tenant from the referenced
//! application, never from the request.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use leadflow_core::error::CoreError;
use leadflow_core::types::DbId;
use leadflow_core::validation::{
    parse_application_id, parse_due_at, parse_task_type, resolve_title, FieldError, FieldErrors,
    FIELD_APPLICATION_ID, FIELD_BODY, MSG_APPLICATION_NOT_FOUND,
};
use leadflow_db::models::task::CreateTask;
use leadflow_db::repositories::{ApplicationRepo, TaskRepo};
use leadflow_events::task_created;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Methods the function answers.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";
/// Request headers browsers may send to the function.
pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Candidate task as submitted. Fields are kept loose so that a wrong JSON
/// type is reported against its field instead of failing the whole body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskRequest {
    pub application_id: Option<Value>,
    pub task_type: Option<Value>,
    pub due_at: Option<Value>,
    pub title: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub success: bool,
    pub task_id: DbId,
}

/// POST /functions/v1/create-task
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> AppResult<Json<CreateTaskResponse>> {
    if let Some(expected) = state.config.service_api_key.as_deref() {
        if presented_key(&headers) != Some(expected) {
            tracing::warn!("Task creation refused: missing or wrong service key");
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid service key".into(),
            )));
        }
    }

    let Json(input) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Unreadable task creation body");
        AppError::Validation(vec![FieldError::new(
            FIELD_BODY,
            "body must be a JSON object",
        )])
    })?;

    let application_id = text(&input.application_id);
    let task_type = text(&input.task_type);
    let due_at = text(&input.due_at);
    let title = text(&input.title);

    let now = Utc::now();
    let mut errors = FieldErrors::default();

    let application = match errors.take(parse_application_id(application_id.as_deref())) {
        Some(id) => {
            let found = ApplicationRepo::find_by_id_elevated(&state.pool, &state.service, id).await?;
            if found.is_none() {
                errors.push(FieldError::new(FIELD_APPLICATION_ID, MSG_APPLICATION_NOT_FOUND));
            }
            found
        }
        None => None,
    };
    let task_type = errors.take(parse_task_type(task_type.as_deref()));
    let due_at = errors.take(parse_due_at(due_at.as_deref(), now));

    let (Some(application), Some(task_type), Some(due_at)) = (application, task_type, due_at)
    else {
        tracing::info!(errors = ?errors, "Task creation rejected");
        return Err(AppError::Validation(errors.into_vec()));
    };

    let input = CreateTask {
        application_id: application.id,
        title: resolve_title(title.as_deref(), task_type),
        task_type,
        due_at,
        created_at: now,
    };
    // The application can vanish between the lookup and the insert.
    let task = TaskRepo::create_elevated(&state.pool, &state.service, &input)
        .await?
        .ok_or_else(|| {
            AppError::Validation(vec![FieldError::new(
                FIELD_APPLICATION_ID,
                MSG_APPLICATION_NOT_FOUND,
            )])
        })?;

    tracing::info!(
        task_id = %task.id,
        application_id = %task.application_id,
        tenant_id = %task.tenant_id,
        task_type = %task_type,
        service = state.service.label(),
        "Task created",
    );
    state
        .event_bus
        .publish(task_created(task.id, task_type, task.due_at, task.tenant_id));

    Ok(Json(CreateTaskResponse {
        success: true,
        task_id: task.id,
    }))
}

/// OPTIONS /functions/v1/create-task
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Any other method on the function path.
pub async fn method_not_allowed() -> Response {
    let body = json!({
        "error": "Method not allowed",
        "code": "METHOD_NOT_ALLOWED",
    });
    let mut response = (StatusCode::METHOD_NOT_ALLOWED, Json(body)).into_response();
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Attach the function's permissive cross-origin headers to every response.
pub async fn cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    response
}

/// The key from an `apikey` header, or else from `Authorization: Bearer`.
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(key) = headers.get("apikey").and_then(|v| v.to_str().ok()) {
        return Some(key);
    }
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Strings pass through, `null` counts as absent, anything else is kept as
/// its JSON text so the field validator reports it.
fn text(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}
