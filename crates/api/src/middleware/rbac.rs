//! Role-based access control (RBAC) extractors.
//!
//! Wraps [`AuthUser`] and rejects requests whose caller is unresolved or
//! lacks the required role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use leadflow_core::access::Caller;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires a resolved caller with the `admin` role. Rejects with 403 otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(caller): RequireAdmin) -> AppResult<Json<()>> {
///     // caller is guaranteed to be an admin of caller.tenant_id here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub Caller);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        match user.caller() {
            Some(caller) if caller.is_admin() => Ok(RequireAdmin(caller)),
            _ => Err(AppError::denied()),
        }
    }
}
