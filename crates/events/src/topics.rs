//! Well-known event types and their constructors.

use leadflow_core::task::TaskType;
use leadflow_core::types::{DbId, Timestamp};
use serde_json::json;

use crate::bus::PlatformEvent;

/// Published after the task creation function inserts a task.
pub const TASK_CREATED: &str = "task.created";

/// Build the `task.created` notification.
///
/// The payload names the task, its type, its due time, and its tenant so
/// subscribers need no further lookup.
pub fn task_created(
    task_id: DbId,
    task_type: TaskType,
    due_at: Timestamp,
    tenant_id: DbId,
) -> PlatformEvent {
    PlatformEvent::new(TASK_CREATED)
        .with_tenant(tenant_id)
        .with_source("task", task_id)
        .with_payload(json!({
            "task_id": task_id,
            "task_type": task_type,
            "due_at": due_at,
            "tenant_id": tenant_id,
        }))
}
