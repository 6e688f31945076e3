//! Handlers for the `/applications` resource.
//!
//! Applications are isolated by tenant only; role and ownership play no
//! part. A new application takes its tenant from the lead it belongs to.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use leadflow_core::access::{can_access_tenant_row, can_update_tenant_row};
use leadflow_core::types::DbId;
use leadflow_core::validation::FieldError;
use leadflow_db::models::application::{Application, CreateApplication, UpdateApplication};
use leadflow_db::repositories::{ApplicationRepo, LeadRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /applications`.
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    pub lead_id: DbId,
    pub program_id: Option<DbId>,
    pub intake_id: Option<DbId>,
    pub stage: Option<String>,
    pub status: Option<String>,
}

/// Query params for `GET /applications`.
#[derive(Debug, Deserialize)]
pub struct ApplicationListQuery {
    pub lead_id: Option<DbId>,
}

/// POST /api/v1/applications
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<Application>)> {
    let caller = user.caller_for_write()?;
    let lead = LeadRepo::find_in_tenant(&state.pool, &caller, input.lead_id)
        .await?
        .ok_or_else(|| AppError::Validation(vec![FieldError::new("lead_id", "Lead not found")]))?;

    if !can_access_tenant_row(&user.facts, lead.tenant_id) {
        return Err(AppError::denied());
    }

    let application = ApplicationRepo::create(
        &state.pool,
        &CreateApplication {
            tenant_id: lead.tenant_id,
            lead_id: lead.id,
            program_id: input.program_id,
            intake_id: input.intake_id,
            stage: input.stage,
            status: input.status,
        },
    )
    .await?;

    tracing::info!(
        application_id = %application.id,
        lead_id = %lead.id,
        tenant_id = %application.tenant_id,
        "Application created",
    );
    Ok((StatusCode::CREATED, Json(application)))
}

/// GET /api/v1/applications
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ApplicationListQuery>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    let data = match user.caller() {
        Some(caller) => ApplicationRepo::list_for_caller(&state.pool, &caller, params.lead_id).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/applications/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Application>> {
    let caller = user.caller().ok_or(AppError::not_found("Application", id))?;
    let application = ApplicationRepo::find_for_caller(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Application", id))?;
    Ok(Json(application))
}

/// PUT /api/v1/applications/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateApplication>,
) -> AppResult<Json<Application>> {
    let caller = user.caller_for_write()?;
    let before = ApplicationRepo::find_for_caller(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Application", id))?;

    let after_tenant = input.tenant_id.unwrap_or(before.tenant_id);
    if !can_update_tenant_row(&user.facts, before.tenant_id, after_tenant) {
        tracing::warn!(application_id = %id, user_id = %caller.user_id, "Application update refused");
        return Err(AppError::denied());
    }

    let application = ApplicationRepo::update(&state.pool, &caller, id, &input)
        .await?
        .ok_or(AppError::not_found("Application", id))?;
    Ok(Json(application))
}

/// DELETE /api/v1/applications/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let caller = user.caller_for_write()?;
    if ApplicationRepo::delete(&state.pool, &caller, id).await? {
        tracing::info!(application_id = %id, "Application deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Application", id))
    }
}
