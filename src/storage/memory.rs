// ============================================================================
// In-Memory Item Repository
// Concurrent map of tracked items with per-item locking
// ============================================================================

use crate::domain::TrackedItem;
use crate::interfaces::ItemRepository;
use crossbeam_skiplist::SkipMap;
use parking_lot::Mutex;

/// Thread-safe repository keeping every item in memory.
///
/// The map itself is lock-free; each item sits behind its own mutex, so
/// `modify` on one id never blocks work on another, and two `modify` calls on
/// the same id are serialized.
#[derive(Default)]
pub struct InMemoryItemRepository {
    items: SkipMap<String, Mutex<TrackedItem>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all stored items, in ascending order
    pub fn ids(&self) -> Vec<String> {
        self.items.iter().map(|entry| entry.key().clone()).collect()
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn load(&self, id: &str) -> Option<TrackedItem> {
        self.items.get(id).map(|entry| entry.value().lock().clone())
    }

    fn save(&self, mut item: TrackedItem) -> TrackedItem {
        let entry = self
            .items
            .get_or_insert_with(item.id.clone(), || Mutex::new(TrackedItem::new(item.id.clone())));
        let mut stored = entry.value().lock();
        item.supersede(stored.generation());
        *stored = item.clone();
        item
    }

    fn modify(&self, id: &str, mutate: &mut dyn FnMut(&mut TrackedItem)) -> Option<TrackedItem> {
        let entry = self.items.get(id)?;
        let mut item = entry.value().lock();
        mutate(&mut item);
        Some(item.clone())
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
