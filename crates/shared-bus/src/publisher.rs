//! # Event Publisher
//!
//! The voting core publishes through [`EventPublisher`]. Deployments pick the
//! sink: [`InMemoryEventBus`] fans events out to in-process observers, while
//! [`NoopPublisher`] discards them.

use crate::events::{EventFilter, GovernanceEvent};
use crate::subscriber::{EventStream, Subscription};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use shared_types::Address;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::debug;

/// Sink for committed governance events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish one event, returning how many observers it reached.
    async fn publish(&self, event: GovernanceEvent) -> usize;

    /// Events handed to this publisher so far.
    fn events_published(&self) -> u64;
}

/// Broadcast bus for in-process observers.
///
/// Every subscriber receives every event and applies its own
/// [`EventFilter`] on receive. A subscriber that falls more than `capacity`
/// events behind skips the oldest ones.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<GovernanceEvent>,
    published: AtomicU64,
    unobserved: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering at most `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            published: AtomicU64::new(0),
            unobserved: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(
            topics = ?filter.topics,
            proposals = filter.proposals.len(),
            "Subscription opened"
        );
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Subscribe to every event about one proposal.
    #[must_use]
    pub fn watch(&self, proposal: Address) -> Subscription {
        self.subscribe(EventFilter::for_proposals(vec![proposal]))
    }

    /// Stream of events matching `filter`.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        self.subscribe(filter).into_stream()
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Events published while nobody was subscribed.
    #[must_use]
    pub fn events_unobserved(&self) -> u64 {
        self.unobserved.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: GovernanceEvent) -> usize {
        let topic = event.topic();
        let proposal = event.proposal();
        self.published.fetch_add(1, Ordering::Relaxed);

        if let Ok(receivers) = self.sender.send(event) {
            debug!(?topic, %proposal, receivers, "Event published");
            receivers
        } else {
            self.unobserved.fetch_add(1, Ordering::Relaxed);
            debug!(?topic, %proposal, "Event published with no subscribers");
            0
        }
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

/// Publisher that discards every event.
#[derive(Debug, Default)]
pub struct NoopPublisher {
    published: AtomicU64,
}

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: GovernanceEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);
        0
    }

    fn events_published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
