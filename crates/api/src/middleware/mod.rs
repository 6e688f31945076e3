//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller's session facts from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires a resolved caller with the `admin` role.

pub mod auth;
pub mod rbac;
