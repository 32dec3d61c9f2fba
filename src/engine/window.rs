// ============================================================================
// Window Selector
// Bounded baselines around a position in a chronological price sequence
// ============================================================================

use rust_decimal::Decimal;
use smallvec::SmallVec;

/// Prices selected for one centered window. Stays inline for the usual
/// window sizes.
pub type Window = SmallVec<[Decimal; 16]>;

/// Picks the baseline prices a judgment is made against.
///
/// # Example
/// ```text
/// prices:   p0 p1 p2 p3 p4 p5        window_size = 3
///
/// trailing:       [p1 p2 p3]         (p5 excluded, start = 6 - 3 - 1)
/// centered(2): [p1    p3]            (±1 around index 2, self excluded)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSelector {
    window_size: usize,
}

impl WindowSelector {
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    #[inline]
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Up to `window_size` most recent prices, excluding the very last one.
    ///
    /// Selects `[max(0, n − window_size − 1), n − 1)`. Empty when `n <= 1`.
    pub fn trailing<'a>(&self, prices: &'a [Decimal]) -> &'a [Decimal] {
        let n = prices.len();
        if n <= 1 {
            return &[];
        }
        let start = n.saturating_sub(self.window_size.saturating_add(1));
        &prices[start..n - 1]
    }

    /// Prices within `window_size / 2` positions of `index`, excluding
    /// `index` itself, clipped to the sequence.
    pub fn centered(&self, prices: &[Decimal], index: usize) -> Window {
        let half = self.window_size / 2;
        let start = index.saturating_sub(half);
        let end = prices.len().min(index.saturating_add(half).saturating_add(1));

        (start..end)
            .filter(|&j| j != index)
            .map(|j| prices[j])
            .collect()
    }
}
