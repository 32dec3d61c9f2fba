// ============================================================================
// Event Handler Interface
// Defines the contract for handling detection and ingestion events
// ============================================================================

use chrono::{DateTime, Utc};
use crossbeam::queue::SegQueue;
use rust_decimal::Decimal;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the detector
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AnomalyEvent {
    /// A single price was judged and appended to the item's history
    PriceJudged {
        item_id: String,
        price: Decimal,
        anomaly: bool,
        cached: bool,
        timestamp: DateTime<Utc>,
    },

    /// A bulk history was classified and stored
    HistoryClassified {
        batch_id: Uuid,
        item_id: String,
        outliers: usize,
        non_outliers: usize,
        timestamp: DateTime<Utc>,
    },

    /// A check or lookup referenced an unknown item
    ItemNotFound {
        item_id: String,
        timestamp: DateTime<Utc>,
    },

    /// A bulk upload was rejected before anything was stored
    IngestionRejected {
        line: usize,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Event handler trait for processing detector events
/// Implementations can handle logging, metrics, auditing, etc.
pub trait EventHandler: Send + Sync {
    /// Handle an event
    fn on_event(&self, event: AnomalyEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<AnomalyEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op event handler for testing
pub struct NoOpEventHandler;

impl EventHandler for NoOpEventHandler {
    fn on_event(&self, _event: AnomalyEvent) {}
}

/// Logging event handler
pub struct LoggingEventHandler;

impl EventHandler for LoggingEventHandler {
    fn on_event(&self, event: AnomalyEvent) {
        tracing::debug!("Price anomaly event: {:?}", event);
    }
}

/// Keeps every event in a lock-free queue until drained
#[derive(Default)]
pub struct RecordingEventHandler {
    events: SegQueue<AnomalyEvent>,
}

impl RecordingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all recorded events in arrival order
    pub fn drain(&self) -> Vec<AnomalyEvent> {
        let mut drained = Vec::with_capacity(self.events.len());
        while let Some(event) = self.events.pop() {
            drained.push(event);
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventHandler for RecordingEventHandler {
    fn on_event(&self, event: AnomalyEvent) {
        self.events.push(event);
    }
}
