// ============================================================================
// Logging Setup
// tracing-subscriber installation for binaries and demos
// ============================================================================

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive
pub const ENV_LOG_FILTER: &str = "PRICE_ANOMALY_LOG";

/// Filter used when `PRICE_ANOMALY_LOG` is unset or invalid
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install a global fmt subscriber filtered by `PRICE_ANOMALY_LOG`.
///
/// Fails if a global subscriber is already set.
pub fn init() -> Result<(), String> {
    let filter = EnvFilter::try_from_env(ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    install(filter)
}

/// Install a global fmt subscriber with an explicit filter directive.
pub fn init_with_filter(directive: &str) -> Result<(), String> {
    let filter = EnvFilter::try_new(directive).map_err(|e| format!("Invalid log filter: {}", e))?;
    install(filter)
}

fn install(filter: EnvFilter) -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| format!("Logging already initialized: {}", e))
}
