//! Forward dynamic program over the warping table.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::bounds::Bounds;
use crate::interp::InterpolationData;
use crate::math::{diff, norm2};
use crate::segment::SegmentPlan;
use crate::table::WarpingTable;

/// Relative threshold below which a segment's spread counts as zero.
pub const NUMERICAL_EPS: f64 = 1e-10;

/// What a segment pair with zero variance contributes to a path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DegeneratePolicy {
    /// The edge is kept and contributes a correlation of 0.
    #[default]
    ZeroScore,
    /// The edge is excluded from the search.
    Reject,
}

/// Centered reference segment, shared by every node of one DP column.
struct ReferenceSegment {
    centered: Vec<f64>,
    norm: f64,
    degenerate: bool,
}

impl ReferenceSegment {
    fn new(values: &[f64]) -> Self {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let centered: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let norm = norm2(&centered);
        let energy = norm2(values);
        Self {
            centered,
            norm,
            degenerate: norm <= NUMERICAL_EPS * energy.max(1.0),
        }
    }
}

/// Read-only inputs of one DP column.
struct Column<'a> {
    segment: usize,
    sample_len: i64,
    sample: &'a [f64],
    derivative: &'a [f64],
    reference: &'a ReferenceSegment,
    interp: &'a InterpolationData,
    policy: DegeneratePolicy,
}

impl Column<'_> {
    /// Pearson correlation between the reference segment and the sample
    /// segment warped onto `position` with shift row `row`.
    ///
    /// `None` means the edge is excluded.
    fn correlation(&self, position: i64, row: usize) -> Option<f64> {
        let indexes = self.interp.indexes().row(row);
        let coefficients = self.interp.coefficients().row(row);
        let n = indexes.len() as f64;

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut cross = 0.0;
        let columns = indexes.iter().zip(coefficients).zip(&self.reference.centered);
        for ((&index, &c), &t) in columns {
            let i = (position + index - self.sample_len) as usize;
            let x = self.sample[i] + c * self.derivative[i];
            sum += x;
            sum_sq += x * x;
            cross += t * x;
        }

        let mean = sum / n;
        let spread = (sum_sq - n * mean * mean).max(0.0).sqrt();
        let degenerate =
            self.reference.degenerate || spread <= NUMERICAL_EPS * sum_sq.sqrt().max(1.0);
        if degenerate {
            return match self.policy {
                DegeneratePolicy::ZeroScore => Some(0.0),
                DegeneratePolicy::Reject => None,
            };
        }
        Some(cross / (self.reference.norm * spread))
    }

    /// Best incoming edge for the node at `position` on boundary `segment + 1`.
    fn best_incoming(
        &self,
        table: &WarpingTable,
        bounds: &Bounds,
        position: i64,
    ) -> Option<(f64, usize)> {
        let mut best: Option<(f64, usize)> = None;
        for row in 0..self.interp.shift_count() {
            if !self.interp.is_admissible(row) {
                continue;
            }
            let previous = position - (self.interp.shift(row) + self.sample_len);
            if !bounds.contains(self.segment, previous) {
                continue;
            }
            let pred = table.node_of(self.segment, bounds.lower(self.segment), previous);
            if !table.is_reachable(pred) {
                continue;
            }
            let Some(corr) = self.correlation(position, row) else {
                continue;
            };
            let candidate = table.score(pred) + corr;
            // strict comparison keeps the most negative shift on ties
            if best.is_none_or(|(score, _)| candidate > score) {
                best = Some((candidate, pred));
            }
        }
        best
    }
}

/// Fill `table` left to right, one boundary at a time.
///
/// Column `k` reads only scores of boundary `k`, so nodes within a column are
/// evaluated in parallel while columns stay sequential.
#[instrument(skip_all, fields(segments = plan.segment_count(), nodes = table.len()))]
pub fn run_forward(
    table: &mut WarpingTable,
    bounds: &Bounds,
    plan: &SegmentPlan,
    interp: &[Arc<InterpolationData>],
    sample: &[f64],
    reference: &[f64],
    policy: DegeneratePolicy,
) {
    let derivative = diff(sample);
    let offsets = plan.reference_offsets();

    for segment in 0..plan.segment_count() {
        let reference_segment =
            ReferenceSegment::new(&reference[offsets[segment]..=offsets[segment + 1]]);
        let column = Column {
            segment,
            sample_len: plan.sample_lengths()[segment] as i64,
            sample,
            derivative: &derivative,
            reference: &reference_segment,
            interp: &interp[segment],
            policy,
        };

        let boundary = segment + 1;
        let lower = bounds.lower(boundary);
        let shared: &WarpingTable = table;
        let nodes = shared.nodes(boundary);
        let first = nodes.start;
        let updates: Vec<(usize, Option<(f64, usize)>)> = nodes
            .into_par_iter()
            .map(|node| {
                let position = lower + (node - first) as i64;
                (node, column.best_incoming(shared, bounds, position))
            })
            .collect();

        let mut reached = 0_usize;
        for (node, best) in updates {
            if let Some((score, pred)) = best {
                table.set(node, score, pred);
                reached += 1;
            }
        }
        debug!(segment, reached, "DP column complete");
    }
}
