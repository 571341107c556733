//! Event bus for cache notifications
//!
//! Uses tokio broadcast channel for pub/sub so front ends can re-render
//! when cached data changes.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

use super::query::QueryKey;
use super::tags::Tag;

/// Default channel capacity
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    /// A fetch for `key` completed
    Fetched { key: QueryKey, ok: bool },
    /// A mutation invalidated `tags`; `refetched` are the mounted queries re-issued
    Invalidated { tags: Vec<Tag>, refetched: Vec<QueryKey> },
    /// Last subscriber left, or the entry was invalidated while unmounted
    Evicted { key: QueryKey },
    /// Everything dropped (logout)
    Reset,
}

impl CacheEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Fetched { .. } => "fetched",
            CacheEvent::Invalidated { .. } => "invalidated",
            CacheEvent::Evicted { .. } => "evicted",
            CacheEvent::Reset => "reset",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheEventMessage {
    pub event: CacheEvent,
    pub timestamp: DateTime<Utc>,
}

/// Broadcasts cache events to every subscriber
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CacheEventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn publish(&self, event: CacheEvent) {
        let event_type = event.event_type();
        let message = CacheEventMessage {
            event,
            timestamp: Utc::now(),
        };
        match self.sender.send(message) {
            Ok(count) => trace!(event_type, subscribers = count, "Cache event published"),
            // nobody listening is the common case
            Err(_) => trace!(event_type, "Cache event published (no subscribers)"),
        }
    }

    pub fn subscribe(&self) -> EventSubscriber {
        debug!("New cache event subscriber");
        EventSubscriber {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

pub struct EventSubscriber {
    receiver: broadcast::Receiver<CacheEventMessage>,
}

impl EventSubscriber {
    /// Drain whatever is already queued without waiting
    pub fn drain(&mut self) -> Vec<CacheEventMessage> {
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => out.push(msg),
                Err(broadcast::error::TryRecvError::Lagged(count)) => {
                    warn!("Cache subscriber lagged, {} events missed", count);
                }
                Err(_) => return out,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(CacheEvent::Evicted {
            key: QueryKey::new("getAllCompanies", ""),
        });

        assert_eq!(first.drain()[0].event.event_type(), "evicted");
        assert_eq!(second.drain().len(), 1);
        assert!(first.drain().is_empty());
    }

    #[test]
    fn lagging_subscriber_keeps_the_newest_events() {
        let bus = EventBus::with_capacity(2);
        let mut sub = bus.subscribe();
        for _ in 0..3 {
            bus.publish(CacheEvent::Reset);
        }
        assert_eq!(sub.drain().len(), 2);
    }
}
