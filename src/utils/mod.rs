// ============================================================================
// Utilities Module
// Process-level helpers
// ============================================================================

#[cfg(feature = "logging")]
pub mod logging;

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
