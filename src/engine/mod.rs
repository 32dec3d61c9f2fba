// ============================================================================
// Engine Module
// Contains the statistical core and the detector service
// ============================================================================

mod classifier;
mod detector;
mod errors;
mod iqr_judge;
mod window_judge;

pub mod factory;
pub mod outlier_filter;
pub mod stats;
pub mod window;

pub use classifier::HistoryClassifier;
pub use detector::{IngestionReport, PriceAnomalyDetector};
pub use errors::{AnomalyError, InvalidInput};
pub use factory::{create_from_config, create_judge, DetectorBuilder};
pub use iqr_judge::IqrJudge;
pub use outlier_filter::remove_outliers;
pub use stats::{IqrBounds, QuartileMethod};
pub use window::{Window, WindowSelector};
pub use window_judge::WindowJudge;
