// ============================================================================
// Storage Module
// In-memory item store and judgment memoization
// ============================================================================

mod cache;
mod memory;

pub use cache::{CacheStats, JudgmentCache, JudgmentKey};
pub use memory::InMemoryItemRepository;
