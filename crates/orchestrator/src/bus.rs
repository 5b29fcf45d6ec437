//! Broadcast fan-out for settlement events.
//!
//! The notification and real-time broadcast layers are external; they
//! attach as subscribers and the orchestrator never waits on them.

use tipster_core::events::SettlementEvent;
use tokio::sync::broadcast;

/// Shared broadcast channel for settlement pipeline events.
#[derive(Debug, Clone)]
pub struct SettlementEventBus {
    tx: broadcast::Sender<SettlementEvent>,
}

impl SettlementEventBus {
    /// Creates a bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Attaches a new subscriber.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SettlementEvent> {
        self.tx.subscribe()
    }

    /// Publishes an event to all current subscribers.
    ///
    /// A send error only means nobody is subscribed right now; events are
    /// fire-and-forget.
    pub fn publish(&self, event: SettlementEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("No subscribers attached, settlement event dropped");
        }
    }
}

impl Default for SettlementEventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_event() -> SettlementEvent {
        SettlementEvent::ExpertStatisticsRecalculated {
            expert_id: 7,
            previous_streak: None,
            current_streak: 1,
            previous_rank: None,
            current_rank: None,
            recalculated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = SettlementEventBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(sample_event());

        let received = rx.recv().await.unwrap();
        match received {
            SettlementEvent::ExpertStatisticsRecalculated { expert_id, .. } => {
                assert_eq!(expert_id, 7);
            }
            SettlementEvent::PositionSettled { .. } => panic!("wrong variant"),
        }
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = SettlementEventBus::new(16);
        bus.publish(sample_event());
    }
}
