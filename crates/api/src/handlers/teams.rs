//! Handlers for the `/teams` resource.
//!
//! Teams drive counselor lead visibility. Any caller may list the teams of
//! their tenant; managing teams and memberships is admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leadflow_core::access::Caller;
use leadflow_core::types::DbId;
use leadflow_db::models::team::{CreateTeam, Team, TeamMember};
use leadflow_db::repositories::TeamRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /teams`.
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// Request body for `POST /teams/{id}/members`.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: DbId,
}

/// POST /api/v1/teams
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTeamRequest>,
) -> AppResult<(StatusCode, Json<Team>)> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("Team name must not be empty".into()));
    }
    let team = TeamRepo::create(
        &state.pool,
        &CreateTeam {
            tenant_id: admin.tenant_id,
            name: name.to_string(),
        },
    )
    .await?;
    tracing::info!(team_id = %team.id, tenant_id = %team.tenant_id, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/v1/teams
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Team>>>> {
    let data = match user.caller() {
        Some(caller) => TeamRepo::list_in_tenant(&state.pool, &caller).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/teams/mine
pub async fn mine(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Team>>>> {
    let data = match user.caller() {
        Some(caller) => TeamRepo::list_for_member(&state.pool, &caller).await?,
        None => Vec::new(),
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/teams/{id}/members
pub async fn list_members(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TeamMember>>>> {
    let caller = user.caller().ok_or(AppError::not_found("Team", id))?;
    require_team(&state, &caller, id).await?;
    let data = TeamRepo::list_members(&state.pool, id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/teams/{id}/members
///
/// Adding an existing member is a no-op that still answers 200.
pub async fn add_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AddMemberRequest>,
) -> AppResult<StatusCode> {
    require_team(&state, &admin, id).await?;
    match TeamRepo::add_member(&state.pool, id, input.user_id).await? {
        Some(_) => {
            tracing::info!(team_id = %id, user_id = %input.user_id, "Team member added");
            Ok(StatusCode::CREATED)
        }
        None => Ok(StatusCode::OK),
    }
}

/// DELETE /api/v1/teams/{id}/members/{user_id}
pub async fn remove_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, user_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    require_team(&state, &admin, id).await?;
    if TeamRepo::remove_member(&state.pool, id, user_id).await? {
        tracing::info!(team_id = %id, %user_id, "Team member removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("TeamMember", user_id))
    }
}

async fn require_team(state: &AppState, caller: &Caller, id: DbId) -> AppResult<Team> {
    TeamRepo::find_in_tenant(&state.pool, caller, id)
        .await?
        .ok_or(AppError::not_found("Team", id))
}
