// ============================================================================
// Judgment Cache
// Memoization of pure judgments, keyed by baseline generation
// ============================================================================

use crate::interfaces::Judgment;
use moka::sync::Cache;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Cache key: the judgment for `price` is only reusable while the item's
/// accepted history is at the same generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JudgmentKey {
    item_id: String,
    generation: u64,
    price: Decimal,
}

impl JudgmentKey {
    pub fn new(item_id: impl Into<String>, generation: u64, price: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            generation,
            price: price.normalize(),
        }
    }
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: u64,
}

/// TTL- and size-bounded memo of judgments.
///
/// Only the verdict is stored. Recording the observation and persisting the
/// item happen on every request, hit or miss.
pub struct JudgmentCache {
    ttl: Duration,
    entries: Cache<JudgmentKey, Judgment>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl JudgmentCache {
    /// Maximum number of memoized judgments
    pub const DEFAULT_CAPACITY: u64 = 10_000;

    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();

        Self {
            ttl,
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &JudgmentKey) -> Option<Judgment> {
        let found = self.entries.get(key);
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    pub fn insert(&self, key: JudgmentKey, judgment: Judgment) {
        self.entries.insert(key, judgment);
    }

    /// Drop every judgment for `item_id`, whatever its generation.
    pub fn invalidate(&self, item_id: &str) {
        let item_id = item_id.to_string();
        if let Err(err) = self
            .entries
            .invalidate_entries_if(move |key, _| key.item_id == item_id)
        {
            tracing::warn!(error = ?err, "judgment cache invalidation rejected");
        }
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    pub fn stats(&self) -> CacheStats {
        self.entries.run_pending_tasks();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.entry_count(),
        }
    }
}
