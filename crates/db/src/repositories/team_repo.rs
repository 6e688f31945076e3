//! Repository for the `teams` and `team_members` tables.

use leadflow_core::access::Caller;
use leadflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::team::{CreateTeam, Team, TeamMember};

const COLUMNS: &str = "id, tenant_id, name, created_at";

/// Provides team management and the membership lookup used by lead
/// visibility.
pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (tenant_id, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(input.tenant_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// List all teams in the caller's tenant, ordered by name.
    pub async fn list_in_tenant(pool: &PgPool, caller: &Caller) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE tenant_id = $1 ORDER BY name");
        sqlx::query_as::<_, Team>(&query)
            .bind(caller.tenant_id)
            .fetch_all(pool)
            .await
    }

    /// Find a team by ID within the caller's tenant.
    pub async fn find_in_tenant(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1 AND tenant_id = $2");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Teams in the caller's tenant that the caller belongs to.
    pub async fn list_for_member(pool: &PgPool, caller: &Caller) -> Result<Vec<Team>, sqlx::Error> {
        sqlx::query_as::<_, Team>(
            "SELECT t.id, t.tenant_id, t.name, t.created_at
             FROM teams t
             JOIN team_members tm ON tm.team_id = t.id
             WHERE t.tenant_id = $1 AND tm.user_id = $2
             ORDER BY t.name",
        )
        .bind(caller.tenant_id)
        .bind(caller.user_id)
        .fetch_all(pool)
        .await
    }

    /// IDs of every team the caller belongs to, as a [`TeamMembership`] for
    /// `can_read_lead`.
    ///
    /// [`TeamMembership`]: leadflow_core::access::TeamMembership
    pub async fn team_ids_for_member(
        pool: &PgPool,
        caller: &Caller,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT team_id FROM team_members WHERE user_id = $1")
            .bind(caller.user_id)
            .fetch_all(pool)
            .await
    }

    /// Add a user to a team. Returns `None` if they were already a member.
    pub async fn add_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<Option<TeamMember>, sqlx::Error> {
        sqlx::query_as::<_, TeamMember>(
            "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)
             ON CONFLICT (team_id, user_id) DO NOTHING
             RETURNING team_id, user_id, created_at",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// List members of a team, oldest membership first.
    pub async fn list_members(pool: &PgPool, team_id: DbId) -> Result<Vec<TeamMember>, sqlx::Error> {
        sqlx::query_as::<_, TeamMember>(
            "SELECT team_id, user_id, created_at FROM team_members
             WHERE team_id = $1 ORDER BY created_at",
        )
        .bind(team_id)
        .fetch_all(pool)
        .await
    }

    /// Remove a user from a team. Returns `true` if a membership was removed.
    pub async fn remove_member(
        pool: &PgPool,
        team_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
            .bind(team_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
