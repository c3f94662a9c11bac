//! Feasible boundary windows under a global slack budget.

use crate::math::{cumsum, vector_diff};
use crate::segment::SegmentPlan;

/// Closed window `[lower[b], upper[b]]` of sample positions for every boundary `b`.
///
/// Boundary `b` may drift at most `slack * b` from its nominal position (to stay
/// reachable from the origin) and at most `slack * (segments - b)` (to still
/// reach the terminal boundary). Windows are clamped to the signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bounds {
    lower: Vec<i64>,
    upper: Vec<i64>,
}

impl Bounds {
    /// Compute windows for every boundary of `plan` on a signal of `len` points.
    #[must_use]
    pub fn compute(plan: &SegmentPlan, slack: usize, len: usize) -> Self {
        let nominal = plan.sample_offsets();
        let segments = plan.segment_count() as i64;
        let slack = slack as i64;
        let last = len as i64 - 1;

        let (lower, upper) = nominal
            .iter()
            .enumerate()
            .map(|(b, &c)| {
                let (b, c) = (b as i64, c as i64);
                let remaining = segments - b;
                let lo = (c - slack * b).max(c - slack * remaining);
                let hi = (c + slack * b).min(c + slack * remaining);
                (lo.clamp(0, last), hi.clamp(0, last))
            })
            .unzip();

        Self { lower, upper }
    }

    /// Return the number of boundaries (segments + 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lower.len()
    }

    /// Return true if there are no boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    /// Return the lowest feasible position for boundary `b`.
    #[must_use]
    pub fn lower(&self, b: usize) -> i64 {
        self.lower[b]
    }

    /// Return the highest feasible position for boundary `b`.
    #[must_use]
    pub fn upper(&self, b: usize) -> i64 {
        self.upper[b]
    }

    /// Return true if `position` lies inside boundary `b`'s window.
    #[must_use]
    pub fn contains(&self, b: usize, position: i64) -> bool {
        (self.lower[b]..=self.upper[b]).contains(&position)
    }

    /// Number of candidate positions per boundary.
    #[must_use]
    pub fn widths(&self) -> Vec<usize> {
        vector_diff(&self.lower, &self.upper)
            .into_iter()
            .map(|span| (span + 1) as usize)
            .collect()
    }

    /// Flattened node-id offsets: boundary `b` owns ids
    /// `table_index[b]..table_index[b + 1]`; the last entry is the table size.
    #[must_use]
    pub fn table_index(&self) -> Vec<usize> {
        let mut with_origin = vec![0];
        with_origin.extend(self.widths());
        cumsum(&with_origin)
    }
}
