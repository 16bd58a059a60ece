//! Topic-based event bus implementation.

use async_trait::async_trait;
use rules_core::{DamageRecord, ResolutionRecord};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::api::{ResultSink, SinkError};
use crate::config::RuntimeConfig;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Finalized rolls
    Resolution,
    /// Damage inflicted by exchanges
    Damage,
}

/// Event wrapper that carries the typed payload of its topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Resolution(Box<ResolutionRecord>),
    Damage(DamageRecord),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Resolution(_) => Topic::Resolution,
            Event::Damage(_) => Topic::Damage,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow receivers lag and
/// lose the oldest events.
#[derive(Clone)]
pub struct EventBus {
    resolution: broadcast::Sender<Event>,
    damage: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            resolution: broadcast::channel(capacity).0,
            damage: broadcast::channel(capacity).0,
        }
    }

    /// Creates a bus sized by `event_buffer_size`
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self::with_capacity(config.event_buffer_size)
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Resolution => &self.resolution,
            Topic::Damage => &self.damage,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to every topic at once
    pub fn subscribe_all(&self) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        [Topic::Resolution, Topic::Damage]
            .into_iter()
            .map(|topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSink for EventBus {
    async fn publish_resolution(&self, record: &ResolutionRecord) -> Result<(), SinkError> {
        self.publish(Event::Resolution(Box::new(record.clone())));
        Ok(())
    }

    async fn publish_damage(&self, record: &DamageRecord) -> Result<(), SinkError> {
        self.publish(Event::Damage(record.clone()));
        Ok(())
    }
}
