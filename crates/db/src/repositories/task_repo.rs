//! Repository for the `tasks` table.

use leadflow_core::access::{Caller, ServiceRole};
use leadflow_core::schedule::DayWindow;
use leadflow_core::task::{TaskStatus, TaskType};
use leadflow_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, tenant_id, application_id, title, task_type, status, due_at, created_at, updated_at";

/// Provides tenant-isolated operations for tasks, plus the elevated insert
/// used by the task creation function.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task, inheriting `tenant_id` from the referenced application.
    ///
    /// Returns `None` if the application does not exist (e.g. it was deleted
    /// between validation and insert).
    pub async fn create_elevated(
        pool: &PgPool,
        service: &ServiceRole,
        input: &CreateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        tracing::debug!(
            service = service.label(),
            application_id = %input.application_id,
            "Elevated task insert"
        );
        let query = format!(
            "INSERT INTO tasks
                (tenant_id, application_id, title, task_type, due_at, created_at, updated_at)
             SELECT a.tenant_id, a.id, $2, $3, $4, $5, $5
             FROM applications a
             WHERE a.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.application_id)
            .bind(&input.title)
            .bind(input.task_type.as_str())
            .bind(input.due_at)
            .bind(input.created_at)
            .fetch_optional(pool)
            .await
    }

    /// List the caller's tenant tasks ordered by due time, optionally for one
    /// application.
    pub async fn list_for_caller(
        pool: &PgPool,
        caller: &Caller,
        application_id: Option<DbId>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE tenant_id = $1 AND ($2::uuid IS NULL OR application_id = $2)
             ORDER BY due_at ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(caller.tenant_id)
            .bind(application_id)
            .fetch_all(pool)
            .await
    }

    /// Open (not completed) tasks due inside `window`, earliest first.
    pub async fn list_due_in_window(
        pool: &PgPool,
        caller: &Caller,
        window: &DayWindow,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE tenant_id = $1
               AND due_at >= $2 AND due_at < $3
               AND status <> $4
             ORDER BY due_at ASC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(caller.tenant_id)
            .bind(window.start)
            .bind(window.end)
            .bind(TaskStatus::Completed.as_str())
            .fetch_all(pool)
            .await
    }

    /// Find a task by ID within the caller's tenant.
    pub async fn find_for_caller(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND tenant_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .fetch_optional(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied;
    /// `tenant_id` is never written.
    pub async fn update(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($3, title),
                task_type = COALESCE($4, task_type),
                status = COALESCE($5, status),
                due_at = COALESCE($6, due_at)
             WHERE id = $1 AND tenant_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .bind(&input.title)
            .bind(input.task_type.map(TaskType::as_str))
            .bind(input.status.map(TaskStatus::as_str))
            .bind(input.due_at)
            .fetch_optional(pool)
            .await
    }

    /// Set a task's status to `completed` and refresh `updated_at`.
    ///
    /// Idempotent: completing an already-completed task succeeds again.
    /// Returns `None` if the task is not in the caller's tenant.
    pub async fn mark_completed(
        pool: &PgPool,
        caller: &Caller,
        id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $3, updated_at = NOW()
             WHERE id = $1 AND tenant_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(caller.tenant_id)
            .bind(TaskStatus::Completed.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, caller: &Caller, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(caller.tenant_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
