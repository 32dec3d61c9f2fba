// ============================================================================
// Detector Configuration
// Algorithm parameters, judge selection and cache settings
// ============================================================================

use rust_decimal::Decimal;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Environment variable holding the window size
pub const ENV_WINDOW_SIZE: &str = "PRICE_ANOMALY_WINDOW_SIZE";

/// Environment variable holding the k-factor
pub const ENV_K_FACTOR: &str = "PRICE_ANOMALY_K_FACTOR";

// ============================================================================
// Algorithm Configuration
// ============================================================================

/// Parameters shared by the window selector and both moving-window paths.
///
/// Loaded once per process and never mutated during a classification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AlgorithmConfig {
    /// Number of prices in a window
    pub window_size: usize,

    /// Standard deviations on each side of the SMA that are still normal
    pub k_factor: Decimal,
}

impl AlgorithmConfig {
    pub fn new(window_size: usize, k_factor: Decimal) -> Self {
        Self {
            window_size,
            k_factor,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.window_size == 0 {
            return Err("Window size must be positive".to_string());
        }

        if self.k_factor <= Decimal::ZERO {
            return Err("K-factor must be positive".to_string());
        }

        Ok(())
    }

    /// Read overrides from `PRICE_ANOMALY_WINDOW_SIZE` and
    /// `PRICE_ANOMALY_K_FACTOR`, falling back to defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var(ENV_WINDOW_SIZE) {
            config.window_size = parse_window_size(&raw)?;
        }
        if let Ok(raw) = std::env::var(ENV_K_FACTOR) {
            config.k_factor = parse_k_factor(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            k_factor: Decimal::TWO,
        }
    }
}

// ============================================================================
// Judge Type
// ============================================================================

/// Which single-price judge the detector uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JudgeType {
    /// SMA ± k·stddev over the trailing window of pre-filtered prices
    #[default]
    MovingWindow,

    /// Q1 − 1.5·IQR .. Q3 + 1.5·IQR over the whole accepted history
    Quartile,
}

impl FromStr for JudgeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moving-window" | "moving_window" | "window" | "sma" => Ok(JudgeType::MovingWindow),
            "quartile" | "iqr" => Ok(JudgeType::Quartile),
            other => Err(format!("Unknown judge type: {}", other)),
        }
    }
}

// ============================================================================
// Complete Detector Configuration
// ============================================================================

/// Everything needed to assemble a detector
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    /// Window and k-factor
    pub algorithm: AlgorithmConfig,

    /// Judge used for single-price checks
    pub judge: JudgeType,

    /// Optional: time-to-live of memoized judgments
    /// None disables the judgment cache
    pub cache_ttl: Option<Duration>,
}

impl DetectorConfig {
    /// Default time-to-live for cached judgments
    pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(600);

    pub fn new(algorithm: AlgorithmConfig, judge: JudgeType) -> Self {
        Self {
            algorithm,
            judge,
            cache_ttl: None,
        }
    }

    /// Builder method: Set the window size
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.algorithm.window_size = window_size;
        self
    }

    /// Builder method: Set the k-factor
    pub fn with_k_factor(mut self, k_factor: Decimal) -> Self {
        self.algorithm.k_factor = k_factor;
        self
    }

    /// Builder method: Enable the judgment cache
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Builder method: Disable the judgment cache
    pub fn without_cache(mut self) -> Self {
        self.cache_ttl = None;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        self.algorithm.validate()?;

        if let Some(ttl) = self.cache_ttl {
            if ttl.is_zero() {
                return Err("Cache TTL must be positive".to_string());
            }
        }

        Ok(())
    }

    /// Parse `key=value` properties text.
    ///
    /// Recognized keys: `algorithm.window-size`, `algorithm.k-value`,
    /// `algorithm.judge`, `cache.ttl-seconds` (0 disables the cache).
    /// Blank lines and lines starting with `#` are skipped; unknown keys are
    /// ignored so a shared properties file can carry other settings.
    ///
    /// # Example
    /// ```
    /// use price_anomaly::domain::DetectorConfig;
    ///
    /// let config = DetectorConfig::from_properties(
    ///     "algorithm.window-size=3\nalgorithm.k-value=2.5\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.algorithm.window_size, 3);
    /// ```
    pub fn from_properties(text: &str) -> Result<Self, String> {
        let mut config = Self::default();

        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| format!("Line {}: expected key=value", number + 1))?;
            let value = value.trim();

            match key.trim() {
                "algorithm.window-size" => config.algorithm.window_size = parse_window_size(value)?,
                "algorithm.k-value" => config.algorithm.k_factor = parse_k_factor(value)?,
                "algorithm.judge" => config.judge = value.parse()?,
                "cache.ttl-seconds" => {
                    let seconds: u64 = value
                        .parse()
                        .map_err(|_| format!("Invalid cache TTL: {}", value))?;
                    config.cache_ttl = (seconds > 0).then(|| Duration::from_secs(seconds));
                },
                _ => {},
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmConfig::default(),
            judge: JudgeType::MovingWindow,
            cache_ttl: Some(Self::DEFAULT_CACHE_TTL),
        }
    }
}

fn parse_window_size(raw: &str) -> Result<usize, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("Invalid window size: {}", raw))
}

fn parse_k_factor(raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw.trim()).map_err(|_| format!("Invalid k-factor: {}", raw))
}
