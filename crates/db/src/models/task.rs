//! Task entity model and DTOs.

use leadflow_core::task::{TaskStatus, TaskType};
use leadflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
///
/// `task_type` and `status` are stored as constrained text; see
/// [`TaskType`] and [`TaskStatus`] for the allowed values.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub tenant_id: DbId,
    pub application_id: DbId,
    pub title: String,
    pub task_type: String,
    pub status: String,
    pub due_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a task through the elevated creation path.
///
/// There is no tenant field: the tenant is always taken from the
/// referenced application.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub application_id: DbId,
    pub title: String,
    pub task_type: TaskType,
    pub due_at: Timestamp,
    /// The instant `due_at` was validated against; stored as `created_at`
    /// so `ck_tasks_due_after_created` sees the same clock.
    pub created_at: Timestamp,
}

/// DTO for updating a task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub tenant_id: Option<DbId>,
    pub title: Option<String>,
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub due_at: Option<Timestamp>,
}
