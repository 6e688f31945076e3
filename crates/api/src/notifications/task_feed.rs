//! Tenant-scoped delivery of task events to realtime clients.

use std::sync::Arc;

use axum::extract::ws::Message;
use leadflow_events::{PlatformEvent, TASK_CREATED};
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Forwards task events from the bus to WebSocket connections.
///
/// Events without a tenant are dropped: there is no connection they may be
/// shown to.
pub struct TaskFeed {
    ws_manager: Arc<WsManager>,
}

impl TaskFeed {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the delivery loop until the [`EventBus`](leadflow_events::EventBus)
    /// is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    self.deliver(&event).await;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Task feed lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, task feed shutting down");
                    break;
                }
            }
        }
    }

    /// Push one event to its tenant's connections. Returns the number of
    /// connections reached.
    pub async fn deliver(&self, event: &PlatformEvent) -> usize {
        if event.event_type != TASK_CREATED {
            return 0;
        }
        let Some(tenant_id) = event.tenant_id else {
            tracing::warn!(event_type = %event.event_type, "Task event without tenant dropped");
            return 0;
        };

        let ws_msg = Message::Text(feed_message(event).to_string().into());
        let sent = self.ws_manager.send_to_tenant(tenant_id, ws_msg).await;
        tracing::debug!(
            event_type = %event.event_type,
            tenant_id = %tenant_id,
            sent,
            "Task event delivered",
        );
        sent
    }
}

/// Wire shape pushed to realtime clients.
pub fn feed_message(event: &PlatformEvent) -> serde_json::Value {
    serde_json::json!({
        "type": event.event_type,
        "payload": event.payload,
        "timestamp": event.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use leadflow_core::task::TaskType;
    use leadflow_events::{task_created, EventBus};
    use uuid::Uuid;

    #[tokio::test]
    async fn delivers_only_to_the_event_tenant() {
        let manager = Arc::new(WsManager::new());
        let tenant_a = Uuid::new_v4();
        let tenant_b = Uuid::new_v4();
        let mut rx_a = manager.add("a".into(), tenant_a, Uuid::new_v4()).await;
        let mut rx_b = manager.add("b".into(), tenant_b, Uuid::new_v4()).await;

        let feed = TaskFeed::new(Arc::clone(&manager));
        let event = task_created(Uuid::new_v4(), TaskType::Call, Utc::now(), tenant_a);
        assert_eq!(feed.deliver(&event).await, 1);

        let Some(Message::Text(text)) = rx_a.recv().await else {
            panic!("tenant A should receive a text frame");
        };
        let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(value["type"], "task.created");
        assert_eq!(value["payload"]["task_type"], "call");
        assert!(rx_b.try_recv().is_err(), "tenant B must not see tenant A's task");
    }

    #[tokio::test]
    async fn run_forwards_bus_events_until_the_bus_closes() {
        let manager = Arc::new(WsManager::new());
        let tenant = Uuid::new_v4();
        let mut rx = manager.add("a".into(), tenant, Uuid::new_v4()).await;

        let bus = EventBus::default();
        let handle = tokio::spawn(TaskFeed::new(Arc::clone(&manager)).run(bus.subscribe()));
        bus.publish(task_created(Uuid::new_v4(), TaskType::Email, Utc::now(), tenant));
        drop(bus);

        tokio::time::timeout(std::time::Duration::from_secs(5), handle)
            .await
            .expect("feed should stop once the bus is dropped")
            .unwrap();
        assert!(matches!(rx.try_recv(), Ok(Message::Text(_))));
    }

    #[tokio::test]
    async fn tenantless_and_foreign_events_are_skipped() {
        let manager = Arc::new(WsManager::new());
        let tenant = Uuid::new_v4();
        let mut rx = manager.add("a".into(), tenant, Uuid::new_v4()).await;
        let feed = TaskFeed::new(Arc::clone(&manager));

        assert_eq!(feed.deliver(&PlatformEvent::new(TASK_CREATED)).await, 0);
        assert_eq!(
            feed.deliver(&PlatformEvent::new("lead.created").with_tenant(tenant)).await,
            0
        );
        assert!(rx.try_recv().is_err());
    }
}
