//! Repository for the `leads` table.

use leadflow_core::access::Caller;
use leadflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::lead::{CreateLead, Lead, UpdateLead};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tenant_id, owner_id, team_id, first_name, last_name, email, phone, \
                       stage, source, created_at, updated_at";

/// Lead read predicate. Binds `$1` tenant, `$2` role name, `$3` caller id.
///
/// Must stay equivalent to `leadflow_core::access::can_read_lead`.
const VISIBLE: &str = "leads.tenant_id = $1 AND (
        $2 = 'admin'
        OR leads.owner_id = $3
        OR ($2 = 'counselor' AND leads.team_id IS NOT NULL AND EXISTS (
            SELECT 1 FROM team_members tm
            WHERE tm.team_id = leads.team_id AND tm.user_id = $3
        ))
    )";

/// Provides scoped CRUD operations for leads.
pub struct LeadRepo;

impl LeadRepo {
    /// Insert a new lead, returning the created row.
    ///
    /// If `stage` is `None` in the input, defaults to `new`.
    pub async fn create(pool: &PgPool, input: &CreateLead) -> Result<Lead, sqlx::Error> {
        let query = format!(
            "INSERT INTO leads
                (tenant_id, owner_id, team_id, first_name, last_name, email, phone, stage, source)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 'new'), $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(input.tenant_id)
            .bind(input.owner_id)
            .bind(input.team_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.stage)
            .bind(&input.source)
            .fetch_one(pool)
            .await
    }

    /// List every lead the caller may read, most recently created first.
    pub async fn list_visible(pool: &PgPool, caller: &Caller) -> Result<Vec<Lead>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM leads WHERE {VISIBLE} ORDER BY created_at DESC");
        sqlx::query_as::<_, Lead>(&query)
            .bind(caller.tenant_id)
            .bind(caller.role.as_str())
            .bind(caller.user_id)
            .fetch_all(pool)
            .await
    }

    /// Find a lead by ID if the caller may read it.
    pub async fn find_visible(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE {VISIBLE} AND leads.id = $4");
        sqlx::query_as::<_, Lead>(&query)
            .bind(caller.tenant_id)
            .bind(caller.role.as_str())
            .bind(caller.user_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a lead by ID within the caller's tenant, ignoring role and
    /// ownership.
    ///
    /// Write paths use this to obtain the pre-image and then decide with the
    /// access predicates.
    pub async fn find_in_tenant(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM leads WHERE id = $1 AND tenant_id = $2");
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a lead. Only non-`None` fields in `input` are applied;
    /// `team_id: Some(None)` clears the team.
    ///
    /// `tenant_id` is never written. Returns `None` if no row with the given
    /// `id` exists in the caller's tenant.
    pub async fn update(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
        input: &UpdateLead,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let query = format!(
            "UPDATE leads SET
                owner_id = COALESCE($3, owner_id),
                team_id = CASE WHEN $11 THEN $4 ELSE team_id END,
                first_name = COALESCE($5, first_name),
                last_name = COALESCE($6, last_name),
                email = COALESCE($7, email),
                phone = COALESCE($8, phone),
                stage = COALESCE($9, stage),
                source = COALESCE($10, source)
             WHERE id = $1 AND tenant_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lead>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .bind(input.owner_id)
            .bind(input.team_id.flatten())
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.stage)
            .bind(&input.source)
            .bind(input.team_id.is_some())
            .fetch_optional(pool)
            .await
    }

    /// Delete a lead (cascading to its applications and tasks). Returns
    /// `true` if a row was removed.
    pub async fn delete(pool: &PgPool, caller: &Caller, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(caller.tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
