//! Topic-based event bus for runtime events.
//!
//! Resolutions and damage records are published to separate topics, and
//! consumers subscribe only to the topics they need. The bus is itself a
//! [`ResultSink`](crate::api::ResultSink), so it can be handed straight to
//! the runtime.

mod bus;

pub use bus::{Event, EventBus, Topic};
