// ============================================================================
// Domain Models Module
// Contains all core domain entities and value objects
// ============================================================================

pub mod config;
pub mod item;
pub mod observation;

pub use config::{AlgorithmConfig, DetectorConfig, JudgeType};
pub use item::{ClassifiedHistory, PriceLog, TrackedItem};
pub use observation::{
    validate_price, ObservationError, PriceObservation, PriceSeries, MIN_PRICE,
};
