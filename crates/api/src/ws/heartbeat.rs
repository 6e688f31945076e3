//! Keep-alive pings for realtime connections.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::ws::manager::WsManager;

/// Default interval between heartbeat rounds.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn the heartbeat loop.
///
/// Every `period` each open realtime connection gets a Ping frame; rounds
/// with no connections are skipped. The loop ends when `shutdown` flips to
/// `true` or its sender is dropped, so `main` can await the handle instead
/// of aborting it.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let count = ws_manager.connection_count().await;
                    if count == 0 {
                        continue;
                    }
                    tracing::debug!(count, "Realtime heartbeat");
                    ws_manager.ping_all().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        tracing::debug!("Realtime heartbeat stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::ws::Message;
    use uuid::Uuid;

    #[tokio::test]
    async fn pings_open_connections_and_stops_on_shutdown() {
        let manager = Arc::new(WsManager::new());
        let mut rx = manager.add("a".into(), Uuid::new_v4(), Uuid::new_v4()).await;
        let (stop, shutdown) = watch::channel(false);

        let handle = start_heartbeat(Arc::clone(&manager), Duration::from_millis(10), shutdown);

        let frame = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("a ping should arrive");
        assert!(matches!(frame, Some(Message::Ping(_))));

        stop.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("heartbeat should stop")
            .unwrap();
    }

    #[tokio::test]
    async fn dropping_the_sender_stops_the_loop() {
        let (stop, shutdown) = watch::channel(false);
        let handle = start_heartbeat(Arc::new(WsManager::new()), Duration::from_secs(60), shutdown);
        drop(stop);

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("heartbeat should stop")
            .unwrap();
    }
}
