//! Slack and interpolation-coefficient precomputation.
//!
//! For every segment and every admissible slack shift, the DP needs to know how
//! to resample the warped sample segment onto the reference segment's grid.
//! Each grid column `j` resolves to a pair `(index, coefficient)` so the warped
//! value is `v[i] + coefficient * (v[i + 1] - v[i])` with `i` derived from
//! `index` and the candidate boundary position. Computing these once per
//! segment shape keeps the inner DP loop free of searches.

use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::math::find_bin;
use crate::segment::SegmentPlan;

/// Dense row-major matrix with one row per slack shift.
///
/// Access is bounds-checked against the logical shape, not just the flat buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftMatrix<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> ShiftMatrix<T> {
    pub(crate) fn filled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Return the number of rows (shifts).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Return the number of columns (reference-segment positions).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Return the element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows` or `col >= cols`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.row(row)[col]
    }

    /// Return one row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.rows, "row index {row} out of bounds for {} rows", self.rows);
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }
}

/// Interpolation tables for one segment shape.
///
/// Row `r` corresponds to shift `r - slack`. Rows whose shift would collapse
/// the warped segment to fewer than two points are marked not admissible and
/// hold zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationData {
    slack: usize,
    coefficients: ShiftMatrix<f64>,
    indexes: ShiftMatrix<i64>,
    admissible: Vec<bool>,
}

impl InterpolationData {
    /// Compute tables for a segment with `reference_len` reference intervals
    /// and `sample_len` sample intervals.
    ///
    /// For shift `s`, the warped segment has `m = s + sample_len + 1` points.
    /// Column `j` of `0..=reference_len` sits at `x = j * (m - 1) / reference_len + 1`
    /// on the 1-based grid `1..=m`; its bin is clamped into `0..=m - 2`, the
    /// coefficient is `x - bin - 1` and the index is `bin - s`.
    #[must_use]
    pub fn compute(reference_len: usize, sample_len: usize, slack: usize) -> Self {
        let shifts = 2 * slack + 1;
        let cols = reference_len + 1;
        let mut coefficients = ShiftMatrix::filled(shifts, cols);
        let mut indexes = ShiftMatrix::filled(shifts, cols);
        let mut admissible = vec![false; shifts];

        for row in 0..shifts {
            let shift = row as i64 - slack as i64;
            let stretched = shift + sample_len as i64 + 1;
            if stretched < 2 {
                continue;
            }
            admissible[row] = true;

            let m = stretched as f64;
            let edges: Vec<f64> = (1..=stretched).map(|e| e as f64).collect();
            let coef_row = coefficients.row_mut(row);
            let idx_row = indexes.row_mut(row);

            for j in 0..cols {
                let x = j as f64 * (m - 1.0) / reference_len as f64 + 1.0;
                let bin = if x < 1.0 {
                    0
                } else if x >= m {
                    stretched - 2
                } else {
                    // x is inside [1, m) so a bin always exists
                    find_bin(&edges, x).map_or(0, |b| b as i64)
                };
                coef_row[j] = x - bin as f64 - 1.0;
                idx_row[j] = bin - shift;
            }
        }

        Self {
            slack,
            coefficients,
            indexes,
            admissible,
        }
    }

    /// Return the slack the tables were built for.
    #[must_use]
    pub fn slack(&self) -> usize {
        self.slack
    }

    /// Return the number of shifts (`2 * slack + 1`).
    #[must_use]
    pub fn shift_count(&self) -> usize {
        self.admissible.len()
    }

    /// Return the shift value for a row.
    #[must_use]
    pub fn shift(&self, row: usize) -> i64 {
        row as i64 - self.slack as i64
    }

    /// Return true if the shift in `row` keeps at least two warped points.
    #[must_use]
    pub fn is_admissible(&self, row: usize) -> bool {
        self.admissible[row]
    }

    /// Return the fractional blend coefficients.
    #[must_use]
    pub fn coefficients(&self) -> &ShiftMatrix<f64> {
        &self.coefficients
    }

    /// Return the source-bin indexes relative to the shift.
    #[must_use]
    pub fn indexes(&self) -> &ShiftMatrix<i64> {
        &self.indexes
    }
}

/// Build interpolation tables for every segment of `plan`.
///
/// Segments with the same `(reference_len, sample_len)` shape share one table,
/// which in auto mode means all interior segments share a single computation.
/// Distinct shapes are computed in parallel.
#[instrument(skip(plan), fields(segments = plan.segment_count()))]
pub fn interpolation_tables(plan: &SegmentPlan, slack: usize) -> Vec<Arc<InterpolationData>> {
    let shapes: Vec<(usize, usize)> = plan
        .reference_lengths()
        .iter()
        .copied()
        .zip(plan.sample_lengths().iter().copied())
        .collect();

    let mut distinct: Vec<(usize, usize)> = shapes.clone();
    distinct.sort_unstable();
    distinct.dedup();

    let computed: HashMap<(usize, usize), Arc<InterpolationData>> = distinct
        .into_par_iter()
        .map(|shape| {
            let data = InterpolationData::compute(shape.0, shape.1, slack);
            (shape, Arc::new(data))
        })
        .collect();
    debug!(distinct = computed.len(), "interpolation tables computed");

    shapes.iter().map(|shape| Arc::clone(&computed[shape])).collect()
}
