//! In-process event bus for domain events.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use syb5e_domain::DomainEvent;
use tokio::sync::broadcast;

use crate::infrastructure::ports::{ClockPort, EventBusPort};

/// Default broadcast buffer per bus.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A published event with its name and publication time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub time: DateTime<Utc>,
    pub kind: String,
    pub event: DomainEvent,
}

/// Broadcast bus. Lagging subscribers lose the oldest events; publishing with
/// no subscribers is not an error.
pub struct InProcessEventBus {
    tx: broadcast::Sender<EventEnvelope>,
    clock: Arc<dyn ClockPort>,
}

impl InProcessEventBus {
    pub fn new(capacity: usize, clock: Arc<dyn ClockPort>) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx, clock }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventBusPort for InProcessEventBus {
    fn publish(&self, event: DomainEvent) {
        let envelope = EventEnvelope {
            time: self.clock.now(),
            kind: event.name().to_string(),
            event,
        };
        if self.tx.send(envelope).is_err() {
            tracing::trace!("No subscribers for domain event");
        }
    }
}
