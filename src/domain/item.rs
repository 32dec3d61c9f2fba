// ============================================================================
// Tracked Item Domain Model
// Per-item accepted/rejected price logs and bulk classification results
// ============================================================================

use super::PriceObservation;
use rust_decimal::Decimal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Price Log
// ============================================================================

/// Append-only log of observations.
///
/// There is no removal or in-place edit; the only mutation is `append`, so
/// the length doubles as a revision number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PriceLog {
    entries: Vec<PriceObservation>,
}

impl PriceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, observation: PriceObservation) {
        self.entries.push(observation);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[PriceObservation] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.entries.iter()
    }

    /// Prices in append order.
    pub fn prices(&self) -> Vec<Decimal> {
        self.entries.iter().map(|obs| obs.price()).collect()
    }
}

impl From<Vec<PriceObservation>> for PriceLog {
    fn from(entries: Vec<PriceObservation>) -> Self {
        Self { entries }
    }
}

// ============================================================================
// Tracked Item
// ============================================================================

/// An item whose price history has been classified.
///
/// Created by bulk classification on first ingestion, then grown one
/// observation at a time by the incremental check.
///
/// `generation` identifies the contents of the accepted history. It moves
/// forward whenever that history may have changed: on every accepted
/// `record`, and on every repository `save` (see [`TrackedItem::supersede`]).
/// Recording an outlier leaves it alone.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackedItem {
    pub id: String,
    pub non_outliers: PriceLog,
    pub outliers: PriceLog,
    #[cfg_attr(feature = "serde", serde(default))]
    generation: u64,
}

impl TrackedItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            non_outliers: PriceLog::new(),
            outliers: PriceLog::new(),
            generation: 0,
        }
    }

    /// Append a judged observation to the matching log.
    pub fn record(&mut self, observation: PriceObservation, anomaly: bool) {
        if anomaly {
            self.outliers.append(observation);
        } else {
            self.non_outliers.append(observation);
            self.generation += 1;
        }
    }

    /// Total observations ever recorded. Strictly increases with each
    /// `record`.
    #[inline]
    pub fn revision(&self) -> u64 {
        (self.non_outliers.len() + self.outliers.len()) as u64
    }

    /// Generation of the accepted history. Judges read nothing else, so a
    /// verdict computed at one generation holds for as long as it is current.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stamp `self` as the replacement of a stored item at generation
    /// `previous`. Repositories call this in `save`, so a replaced history
    /// never reuses a generation, even when it has the same length.
    pub fn supersede(&mut self, previous: u64) {
        self.generation = self.generation.max(previous) + 1;
    }
}

// ============================================================================
// Classified History
// ============================================================================

/// Partition of one item's price series into outliers and non-outliers.
///
/// Every source observation lands in exactly one side; each side keeps the
/// series order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassifiedHistory {
    pub item_id: String,
    pub outliers: Vec<PriceObservation>,
    pub non_outliers: Vec<PriceObservation>,
}

impl ClassifiedHistory {
    pub fn empty(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            outliers: Vec::new(),
            non_outliers: Vec::new(),
        }
    }

    /// Number of classified observations across both partitions
    pub fn total(&self) -> usize {
        self.outliers.len() + self.non_outliers.len()
    }

    pub fn into_tracked_item(self) -> TrackedItem {
        TrackedItem {
            id: self.item_id,
            non_outliers: PriceLog::from(self.non_outliers),
            outliers: PriceLog::from(self.outliers),
            generation: 0,
        }
    }
}
