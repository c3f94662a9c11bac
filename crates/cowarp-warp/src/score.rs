//! Warping score newtype wrapper.

use std::cmp::Ordering;
use std::fmt;

/// Sum of per-segment Pearson correlations along an optimal warping path.
///
/// Each segment contributes a value in `[-1, 1]`, so a perfect alignment of
/// `n` segments scores `n`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct WarpScore(f64);

impl WarpScore {
    /// Create a new score from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw score value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Mean correlation per segment.
    #[must_use]
    pub fn per_segment(self, segments: usize) -> f64 {
        if segments == 0 {
            return 0.0;
        }
        self.0 / segments as f64
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for WarpScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
