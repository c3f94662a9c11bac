//! Lower-triangular matrix of pairwise dissimilarities.

use std::ops::Index;

use rayon::prelude::*;
use tracing::instrument;

use crate::error::DissimError;
use crate::measure::Measure;

/// Symmetric dissimilarity matrix stored as a lower-triangular flat vector.
///
/// For `n` vectors, stores `n*(n-1)/2` values. Access is symmetric:
/// `get(i, j) == get(j, i)`. Diagonal is always zero.
#[derive(Debug, Clone)]
pub struct DissimilarityMatrix {
    n: usize,
    measure: Measure,
    data: Vec<f64>,
}

impl DissimilarityMatrix {
    /// `data[row*(row-1)/2 + col]` holds the pair `row > col`.
    pub(crate) fn from_raw(n: usize, measure: Measure, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), n * n.saturating_sub(1) / 2);
        Self { n, measure, data }
    }

    /// Return the number of vectors in the matrix.
    #[must_use]
    pub fn len(&self) -> usize {
        self.n
    }

    /// Return true if the matrix is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Return the measure the matrix was computed with.
    #[must_use]
    pub fn measure(&self) -> Measure {
        self.measure
    }

    /// Return the dissimilarity between vectors `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n` or `j >= n`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n, "row index {i} out of bounds for matrix of size {}", self.n);
        assert!(j < self.n, "column index {j} out of bounds for matrix of size {}", self.n);
        if i == j {
            return 0.0;
        }
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        self.data[row * (row - 1) / 2 + col]
    }

    /// Iterate over all unique pairs `(i, j, value)` where `i > j`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (1..self.n).flat_map(move |i| (0..i).map(move |j| (i, j, self.data[i * (i - 1) / 2 + j])))
    }

    /// Return the full row `i`, diagonal included.
    #[must_use]
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.n).map(|j| self.get(i, j)).collect()
    }

    /// Return the dense `n x n` matrix.
    #[must_use]
    pub fn to_dense(&self) -> Vec<Vec<f64>> {
        (0..self.n).map(|i| self.row(i)).collect()
    }
}

impl Index<(usize, usize)> for DissimilarityMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        // only off-diagonal entries are stored
        assert!(i != j, "cannot index diagonal, use get() instead");
        let (row, col) = if i > j { (i, j) } else { (j, i) };
        &self.data[row * (row - 1) / 2 + col]
    }
}

/// Compute `measure` for every unordered pair of `vectors`, in parallel.
///
/// # Errors
///
/// Returns the first error raised by [`Measure::distance`] for any pair.
#[instrument(skip(vectors), fields(n = vectors.len(), measure = measure.name()))]
pub fn pairwise<V>(vectors: &[V], measure: Measure) -> Result<DissimilarityMatrix, DissimError>
where
    V: AsRef<[f64]> + Sync,
{
    let n = vectors.len();
    let total_pairs = n * n.saturating_sub(1) / 2;

    let data = (0..total_pairs)
        .into_par_iter()
        .map(|flat_idx| {
            // flat_idx = i*(i-1)/2 + j with i > j
            let mut i = ((1.0 + (1.0 + 8.0 * flat_idx as f64).sqrt()) / 2.0).floor() as usize;
            if i * (i - 1) / 2 > flat_idx {
                i -= 1;
            }
            let j = flat_idx - i * (i - 1) / 2;
            measure.distance(vectors[i].as_ref(), vectors[j].as_ref())
        })
        .collect::<Result<Vec<f64>, DissimError>>()?;

    Ok(DissimilarityMatrix::from_raw(n, measure, data))
}
