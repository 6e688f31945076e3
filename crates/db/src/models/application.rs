//! Application entity model and DTOs.

use leadflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `applications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Application {
    pub id: DbId,
    pub tenant_id: DbId,
    pub lead_id: DbId,
    pub program_id: Option<DbId>,
    pub intake_id: Option<DbId>,
    pub stage: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting an application. `tenant_id` is copied from the lead.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplication {
    pub tenant_id: DbId,
    pub lead_id: DbId,
    pub program_id: Option<DbId>,
    pub intake_id: Option<DbId>,
    /// Defaults to `draft` if omitted.
    pub stage: Option<String>,
    /// Defaults to `pending` if omitted.
    pub status: Option<String>,
}

/// DTO for updating an application. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApplication {
    pub tenant_id: Option<DbId>,
    pub program_id: Option<DbId>,
    pub intake_id: Option<DbId>,
    pub stage: Option<String>,
    pub status: Option<String>,
}
