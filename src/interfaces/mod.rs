// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod anomaly_judge;
mod event_handler;
mod repository;

pub use anomaly_judge::{AcceptanceBand, AnomalyJudge, Judgment};
pub use event_handler::{
    AnomalyEvent, EventHandler, LoggingEventHandler, NoOpEventHandler, RecordingEventHandler,
};
pub use repository::ItemRepository;
