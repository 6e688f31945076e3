//! Repository for the `applications` table.

use leadflow_core::access::{Caller, ServiceRole};
use leadflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::application::{Application, CreateApplication, UpdateApplication};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, tenant_id, lead_id, program_id, intake_id, stage, status, created_at, updated_at";

/// Provides tenant-isolated CRUD operations for applications.
pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Insert a new application, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateApplication,
    ) -> Result<Application, sqlx::Error> {
        let query = format!(
            "INSERT INTO applications (tenant_id, lead_id, program_id, intake_id, stage, status)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'draft'), COALESCE($6, 'pending'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(input.tenant_id)
            .bind(input.lead_id)
            .bind(input.program_id)
            .bind(input.intake_id)
            .bind(&input.stage)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// List the caller's tenant applications, optionally for one lead.
    pub async fn list_for_caller(
        pool: &PgPool,
        caller: &Caller,
        lead_id: Option<DbId>,
    ) -> Result<Vec<Application>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM applications
             WHERE tenant_id = $1 AND ($2::uuid IS NULL OR lead_id = $2)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(caller.tenant_id)
            .bind(lead_id)
            .fetch_all(pool)
            .await
    }

    /// Find an application by ID within the caller's tenant.
    pub async fn find_for_caller(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1 AND tenant_id = $2");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an application by ID across all tenants.
    pub async fn find_by_id_elevated(
        pool: &PgPool,
        service: &ServiceRole,
        id: DbId,
    ) -> Result<Option<Application>, sqlx::Error> {
        tracing::debug!(service = service.label(), application_id = %id, "Elevated application lookup");
        let query = format!("SELECT {COLUMNS} FROM applications WHERE id = $1");
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an application. Only non-`None` fields in `input` are applied;
    /// `tenant_id` is never written.
    ///
    /// Returns `None` if no row with the given `id` exists in the caller's tenant.
    pub async fn update(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
        input: &UpdateApplication,
    ) -> Result<Option<Application>, sqlx::Error> {
        let query = format!(
            "UPDATE applications SET
                program_id = COALESCE($3, program_id),
                intake_id = COALESCE($4, intake_id),
                stage = COALESCE($5, stage),
                status = COALESCE($6, status)
             WHERE id = $1 AND tenant_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .bind(input.program_id)
            .bind(input.intake_id)
            .bind(&input.stage)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an application (cascading to its tasks). Returns `true` if a
    /// row was removed.
    pub async fn delete(pool: &PgPool, caller: &Caller, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(caller.tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
