//! # Event Subscriber
//!
//! A [`Subscription`] is one observer's view of the bus: a broadcast receiver
//! plus the [`EventFilter`] applied to everything it receives. Events skipped
//! because the observer fell behind are logged and counted, never silently
//! lost.

use crate::events::{EventFilter, GovernanceEvent};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The bus was dropped.
    #[error("Event bus closed")]
    Closed,
}

/// Filtered receiver over the bus.
pub struct Subscription {
    receiver: broadcast::Receiver<GovernanceEvent>,
    filter: EventFilter,
    skipped: u64,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<GovernanceEvent>, filter: EventFilter) -> Self {
        Self {
            receiver,
            filter,
            skipped: 0,
        }
    }

    /// Next matching event; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<GovernanceEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(RecvError::Lagged(count)) => self.note_lag(count),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered matching event, without waiting.
    pub fn try_recv(&mut self) -> Result<Option<GovernanceEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) => {}
                Err(TryRecvError::Lagged(count)) => self.note_lag(count),
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Closed) => return Err(SubscriptionError::Closed),
            }
        }
    }

    /// Every buffered event that matches the filter.
    pub fn drain(&mut self) -> Vec<GovernanceEvent> {
        let mut events = Vec::new();
        while let Ok(Some(event)) = self.try_recv() {
            events.push(event);
        }
        events
    }

    /// Events this subscription missed by falling behind.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Convert into an async stream with the same filter.
    #[must_use]
    pub fn into_stream(self) -> EventStream {
        EventStream {
            inner: BroadcastStream::new(self.receiver),
            filter: self.filter,
            skipped: self.skipped,
        }
    }

    fn note_lag(&mut self, count: u64) {
        self.skipped += count;
        warn!(
            skipped = count,
            proposals = ?self.filter.proposals,
            "Subscriber fell behind, events skipped"
        );
    }
}

/// Filtered event stream, woken by the broadcast channel.
pub struct EventStream {
    inner: BroadcastStream<GovernanceEvent>,
    filter: EventFilter,
    skipped: u64,
}

impl EventStream {
    #[must_use]
    pub fn event_filter(&self) -> &EventFilter {
        &self.filter
    }

    /// Events this stream missed by falling behind.
    #[must_use]
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Stream for EventStream {
    type Item = GovernanceEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) if this.filter.matches(&event) => {
                    return Poll::Ready(Some(event))
                }
                Poll::Ready(Some(Ok(_))) => {}
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(count)))) => {
                    this.skipped += count;
                    warn!(
                        skipped = count,
                        proposals = ?this.filter.proposals,
                        "Event stream fell behind, events skipped"
                    );
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
