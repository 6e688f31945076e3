//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use leadflow_core::access::{Caller, CallerFacts};
use leadflow_core::error::CoreError;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT Bearer token in the `Authorization` header.
///
/// Authentication only proves the token is genuine. The facts inside may
/// still be incomplete, in which case [`AuthUser::caller`] returns `None`
/// and every access decision denies.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     let Some(caller) = user.caller() else { return Err(AppError::denied()) };
///     tracing::info!(user_id = %caller.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub facts: CallerFacts,
}

impl AuthUser {
    /// The resolved caller, if tenant, role, and identity are all usable.
    pub fn caller(&self) -> Option<Caller> {
        self.facts.resolve()
    }

    /// The resolved caller, or the generic 403 used for refused writes.
    pub fn caller_for_write(&self) -> Result<Caller, AppError> {
        self.caller().ok_or_else(AppError::denied)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            facts: claims.caller_facts(),
        })
    }
}
