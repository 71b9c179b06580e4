//! Event Bus - 进程内事件广播
//!
//! 基于 tokio broadcast 的同步、尽力而为分发：
//! 没有订阅者或订阅者落后都不影响命令结果。
//!
//! ```text
//! EconomyService (after commit)
//!        │
//!        └── EventBus (broadcast)
//!               ├── GamificationWorker (achievement re-evaluation)
//!               └── external listeners (analytics, cache invalidation)
//! ```

use shared::economy::EconomyEvent;
use tokio::sync::broadcast;

#[derive(Clone, Debug)]
pub struct EventBus {
    tx: broadcast::Sender<EconomyEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EconomyEvent> {
        self.tx.subscribe()
    }

    /// Broadcast one event. Best-effort: a send error only means there
    /// are currently no subscribers.
    pub fn broadcast(&self, event: EconomyEvent) {
        let event_type = event.event_type.clone();
        if self.tx.send(event).is_err() {
            tracing::debug!(event = %event_type, "No event subscribers, dropping");
        }
    }

    pub fn broadcast_all(&self, events: &[EconomyEvent]) {
        for event in events {
            self.broadcast(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::economy::{EconomyEventType, EventPayload};

    fn credited(user_id: i64) -> EconomyEvent {
        EconomyEvent::new(
            "cmd".into(),
            EconomyEventType::PointsCredited,
            EventPayload::PointsCredited {
                user_id,
                points: 10,
                new_balance: 10,
                action: "PRODUCT_SCAN".into(),
            },
        )
    }

    #[tokio::test]
    async fn subscribers_receive_broadcast_events() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();
        bus.broadcast(credited(1));
        let event = rx.recv().await.unwrap();
        assert_eq!(event.subject_user(), Some(1));
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_does_not_panic() {
        let bus = EventBus::new(16);
        bus.broadcast(credited(2));
    }
}
