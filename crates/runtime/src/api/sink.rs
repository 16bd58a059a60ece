//! Asynchronous destination for finished rolls and damage.
//!
//! Hosts plug in a [`ResultSink`] to display or persist what the rules
//! produced: a chat card, a log line, a websocket push.
use std::sync::Mutex;

use async_trait::async_trait;
use rules_core::{DamageRecord, ResolutionRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("result sink is closed")]
    Closed,

    #[error("result sink lock was poisoned")]
    LockPoisoned,

    #[error("result sink failed: {0}")]
    Failed(String),
}

/// Receiver of every finalized resolution and every damage record.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Called once per finalized roll, including threshold results.
    async fn publish_resolution(&self, record: &ResolutionRecord) -> Result<(), SinkError>;

    /// Called once per exchange step that inflicted damage, after the
    /// wound track was updated.
    async fn publish_damage(&self, record: &DamageRecord) -> Result<(), SinkError>;
}

/// One entry captured by [`MemorySink`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SinkRecord {
    Resolution(Box<ResolutionRecord>),
    Damage(DamageRecord),
}

/// Sink that keeps everything in order of arrival.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<SinkRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Result<Vec<SinkRecord>, SinkError> {
        let records = self.records.lock().map_err(|_| SinkError::LockPoisoned)?;
        Ok(records.clone())
    }

    pub fn resolutions(&self) -> Result<Vec<ResolutionRecord>, SinkError> {
        Ok(self
            .records()?
            .into_iter()
            .filter_map(|record| match record {
                SinkRecord::Resolution(resolution) => Some(*resolution),
                SinkRecord::Damage(_) => None,
            })
            .collect())
    }

    pub fn damages(&self) -> Result<Vec<DamageRecord>, SinkError> {
        Ok(self
            .records()?
            .into_iter()
            .filter_map(|record| match record {
                SinkRecord::Damage(damage) => Some(damage),
                SinkRecord::Resolution(_) => None,
            })
            .collect())
    }

    fn push(&self, record: SinkRecord) -> Result<(), SinkError> {
        let mut records = self.records.lock().map_err(|_| SinkError::LockPoisoned)?;
        records.push(record);
        Ok(())
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn publish_resolution(&self, record: &ResolutionRecord) -> Result<(), SinkError> {
        self.push(SinkRecord::Resolution(Box::new(record.clone())))
    }

    async fn publish_damage(&self, record: &DamageRecord) -> Result<(), SinkError> {
        self.push(SinkRecord::Damage(record.clone()))
    }
}
