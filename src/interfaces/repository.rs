// ============================================================================
// Item Repository Interface
// Defines the contract for persisting tracked items
// ============================================================================

use crate::domain::TrackedItem;

/// Storage for tracked items, keyed by item id.
///
/// The detector relies on `modify` for its judge-append-persist step.
/// Implementations that can be shared between threads must make `modify`
/// atomic per item id; the default body is a plain load-mutate-save and is
/// only safe with a single writer per item.
pub trait ItemRepository: Send + Sync {
    /// Fetch a copy of the item, if it exists
    fn load(&self, id: &str) -> Option<TrackedItem>;

    /// Insert or replace the item, returning what was stored.
    ///
    /// The stored copy must carry a generation past the one it replaces;
    /// call [`TrackedItem::supersede`] with the previous generation (0 for a
    /// new id). Cached judgments are keyed by generation.
    fn save(&self, item: TrackedItem) -> TrackedItem;

    /// Read-modify-write one item. Returns the stored item after `mutate`
    /// ran, or `None` when the id is unknown (and `mutate` was not called).
    fn modify(&self, id: &str, mutate: &mut dyn FnMut(&mut TrackedItem)) -> Option<TrackedItem> {
        let mut item = self.load(id)?;
        mutate(&mut item);
        Some(self.save(item))
    }

    /// Number of stored items
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceObservation;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    /// Store that only implements the required methods
    #[derive(Default)]
    struct MapRepository {
        items: Mutex<HashMap<String, TrackedItem>>,
    }

    impl ItemRepository for MapRepository {
        fn load(&self, id: &str) -> Option<TrackedItem> {
            self.items.lock().get(id).cloned()
        }

        fn save(&self, mut item: TrackedItem) -> TrackedItem {
            let mut items = self.items.lock();
            let previous = items.get(&item.id).map_or(0, TrackedItem::generation);
            item.supersede(previous);
            items.insert(item.id.clone(), item.clone());
            item
        }

        fn len(&self) -> usize {
            self.items.lock().len()
        }
    }

    #[test]
    fn test_default_modify_persists() {
        let repo = MapRepository::default();
        repo.save(TrackedItem::new("MLA-1"));

        let observation = PriceObservation::now(dec!(10)).unwrap();
        let updated = repo
            .modify("MLA-1", &mut |item| item.record(observation, false))
            .unwrap();

        assert_eq!(updated.non_outliers.len(), 1);
        assert_eq!(updated.generation(), 3);
        assert_eq!(repo.load("MLA-1"), Some(updated));
    }

    #[test]
    fn test_default_modify_unknown_id() {
        let repo = MapRepository::default();
        assert!(repo.modify("missing", &mut |_| {}).is_none());
        assert!(repo.is_empty());
    }
}
