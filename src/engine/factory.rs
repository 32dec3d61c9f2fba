// ============================================================================
// Detector Factory
// Creates price anomaly detectors with proper configuration
// ============================================================================

use crate::domain::{DetectorConfig, JudgeType};
use crate::engine::{IqrJudge, PriceAnomalyDetector, WindowJudge};
use crate::interfaces::{AnomalyJudge, EventHandler, ItemRepository};
use crate::storage::InMemoryItemRepository;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a detector from configuration
///
/// # Arguments
/// * `config` - Detector configuration
/// * `repository` - Item store shared with other components
/// * `event_handler` - Event handler for detection and ingestion events
///
/// # Returns
/// * `Result<PriceAnomalyDetector, String>` - Configured detector or error
///
/// # Example
/// ```
/// use price_anomaly::prelude::*;
/// use price_anomaly::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let detector = create_from_config(
///     DetectorConfig::default(),
///     Arc::new(InMemoryItemRepository::new()),
///     Arc::new(NoOpEventHandler),
/// )
/// .unwrap();
/// assert_eq!(detector.judge_name(), "MovingWindow");
/// ```
pub fn create_from_config(
    config: DetectorConfig,
    repository: Arc<dyn ItemRepository>,
    event_handler: Arc<dyn EventHandler>,
) -> Result<PriceAnomalyDetector, String> {
    config.validate()?;

    let judge = create_judge(&config)?;

    Ok(PriceAnomalyDetector::new(config, judge, repository, event_handler))
}

/// Creates the judge selected by the configuration
pub fn create_judge(config: &DetectorConfig) -> Result<Box<dyn AnomalyJudge>, String> {
    match config.judge {
        JudgeType::MovingWindow => {
            config.algorithm.validate()?;
            Ok(Box::new(WindowJudge::new(config.algorithm)))
        },

        JudgeType::Quartile => Ok(Box::new(IqrJudge::new())),
    }
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating detectors with fluent API
///
/// # Example
/// ```
/// use price_anomaly::prelude::*;
/// use std::sync::Arc;
/// use std::time::Duration;
/// use rust_decimal::Decimal;
///
/// let detector = DetectorBuilder::new()
///     .moving_window_judge()
///     .window_size(20)
///     .k_factor(Decimal::from(3))
///     .with_cache_ttl(Duration::from_secs(60))
///     .build(Arc::new(NoOpEventHandler))
///     .unwrap();
/// assert_eq!(detector.config().algorithm.window_size, 20);
/// ```
pub struct DetectorBuilder {
    config: DetectorConfig,
    repository: Option<Arc<dyn ItemRepository>>,
}

impl DetectorBuilder {
    /// Create a builder with default configuration and an in-memory store
    pub fn new() -> Self {
        Self::from_config(DetectorConfig::default())
    }

    /// Start from an existing configuration
    pub fn from_config(config: DetectorConfig) -> Self {
        Self {
            config,
            repository: None,
        }
    }

    /// Start from `key=value` properties text
    pub fn from_properties(text: &str) -> Result<Self, String> {
        Ok(Self::from_config(DetectorConfig::from_properties(text)?))
    }

    // ========================================================================
    // Judge Configuration
    // ========================================================================

    /// Judge new prices against the trailing window (default)
    pub fn moving_window_judge(mut self) -> Self {
        self.config.judge = JudgeType::MovingWindow;
        self
    }

    /// Judge new prices against Tukey fences of the whole history
    pub fn quartile_judge(mut self) -> Self {
        self.config.judge = JudgeType::Quartile;
        self
    }

    // ========================================================================
    // Algorithm Configuration
    // ========================================================================

    pub fn window_size(mut self, window_size: usize) -> Self {
        self.config.algorithm.window_size = window_size;
        self
    }

    pub fn k_factor(mut self, k_factor: Decimal) -> Self {
        self.config.algorithm.k_factor = k_factor;
        self
    }

    // ========================================================================
    // Collaborators
    // ========================================================================

    /// Memoize judgments for `ttl`
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = Some(ttl);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.config.cache_ttl = None;
        self
    }

    /// Use a caller-supplied item store instead of a fresh in-memory one
    pub fn with_repository(mut self, repository: Arc<dyn ItemRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the detector
    pub fn build(self, event_handler: Arc<dyn EventHandler>) -> Result<PriceAnomalyDetector, String> {
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemoryItemRepository::new()));
        create_from_config(self.config, repository, event_handler)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &DetectorConfig {
        &self.config
    }
}

impl Default for DetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
