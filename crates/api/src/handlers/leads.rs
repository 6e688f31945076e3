//! Handlers for the `/leads` resource.
//!
//! Reads are filtered by the lead visibility rule in SQL. Writes load the
//! pre-image through the same visibility scope (invisible rows are 404) and
//! then ask the access predicates (refusals are a generic 403).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leadflow_core::access::{can_create_lead, can_delete_lead, can_update_lead, Caller};
use leadflow_core::types::DbId;
use leadflow_core::validation::FieldError;
use leadflow_db::models::lead::{CreateLead, Lead, UpdateLead};
use leadflow_db::repositories::{LeadRepo, TeamRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /leads`.
///
/// `tenant_id` and `owner_id` default to the caller's own.
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub tenant_id: Option<DbId>,
    pub owner_id: Option<DbId>,
    pub team_id: Option<DbId>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub stage: Option<String>,
    pub source: Option<String>,
}

/// POST /api/v1/leads
pub async fn create(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLeadRequest>,
) -> AppResult<(StatusCode, Json<Lead>)> {
    let caller = user.caller_for_write()?;
    let tenant_id = input.tenant_id.unwrap_or(caller.tenant_id);
    if !can_create_lead(&user.facts, tenant_id) {
        tracing::warn!(user_id = %caller.user_id, %tenant_id, "Lead create refused");
        return Err(AppError::denied());
    }
    if let Some(team_id) = input.team_id {
        ensure_team_in_tenant(&state, &caller, team_id).await?;
    }

    let lead = LeadRepo::create(
        &state.pool,
        &CreateLead {
            tenant_id,
            owner_id: input.owner_id.unwrap_or(caller.user_id),
            team_id: input.team_id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            phone: input.phone,
            stage: input.stage,
            source: input.source,
        },
    )
    .await?;

    tracing::info!(lead_id = %lead.id, tenant_id = %lead.tenant_id, "Lead created");
    Ok((StatusCode::CREATED, Json(lead)))
}

/// GET /api/v1/leads
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Lead>>>> {
    let data = match user.caller() {
        Some(caller) => LeadRepo::list_visible(&state.pool, &caller).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/leads/{id}
pub async fn get_by_id(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Lead>> {
    let caller = user.caller().ok_or(AppError::not_found("Lead", id))?;
    let lead = LeadRepo::find_visible(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;
    Ok(Json(lead))
}

/// PUT /api/v1/leads/{id}
pub async fn update(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLead>,
) -> AppResult<Json<Lead>> {
    let caller = user.caller_for_write()?;
    let before = LeadRepo::find_visible(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;

    let after_tenant = input.tenant_id.unwrap_or(before.tenant_id);
    if !can_update_lead(&user.facts, &before.access_facts(), after_tenant) {
        tracing::warn!(lead_id = %id, user_id = %caller.user_id, "Lead update refused");
        return Err(AppError::denied());
    }
    if let Some(Some(team_id)) = input.team_id {
        ensure_team_in_tenant(&state, &caller, team_id).await?;
    }

    let lead = LeadRepo::update(&state.pool, &caller, id, &input)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;
    Ok(Json(lead))
}

/// DELETE /api/v1/leads/{id}
pub async fn delete(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let caller = user.caller_for_write()?;
    let lead = LeadRepo::find_visible(&state.pool, &caller, id)
        .await?
        .ok_or(AppError::not_found("Lead", id))?;

    if !can_delete_lead(&user.facts, &lead.access_facts()) {
        tracing::warn!(lead_id = %id, user_id = %caller.user_id, "Lead delete refused");
        return Err(AppError::denied());
    }

    if LeadRepo::delete(&state.pool, &caller, id).await? {
        tracing::info!(lead_id = %id, "Lead deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Lead", id))
    }
}

async fn ensure_team_in_tenant(state: &AppState, caller: &Caller, team_id: DbId) -> AppResult<()> {
    match TeamRepo::find_in_tenant(&state.pool, caller, team_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::Validation(vec![FieldError::new(
            "team_id",
            "Team not found",
        )])),
    }
}
