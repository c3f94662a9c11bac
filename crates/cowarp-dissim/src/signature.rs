//! Sparse signatures of active positions and their histogram distances.

/// Positions and magnitudes of the strictly positive entries of a vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    positions: Vec<usize>,
    magnitudes: Vec<f64>,
}

impl Signature {
    /// Collect the strictly positive entries of `values`, in position order.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        let (positions, magnitudes) = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > 0.0)
            .map(|(i, &v)| (i, v))
            .unzip();
        Self {
            positions,
            magnitudes,
        }
    }

    /// Return the active positions.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Return the magnitude at each active position.
    #[must_use]
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Return the number of active positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Return true if no entry is positive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Merge two signatures onto the union of their positions.
    ///
    /// A position active in only one signature gets magnitude 0 in the other.
    /// Positions present after either signature runs out are kept.
    #[must_use]
    pub fn extend(left: &Self, right: &Self) -> ExtendedSignature {
        let capacity = left.len() + right.len();
        let mut merged = ExtendedSignature {
            positions: Vec::with_capacity(capacity),
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
        };

        let (mut i, mut j) = (0, 0);
        while i < left.len() || j < right.len() {
            let l = left.positions.get(i).copied();
            let r = right.positions.get(j).copied();
            match (l, r) {
                (Some(p), Some(q)) if p == q => {
                    merged.push(p, left.magnitudes[i], right.magnitudes[j]);
                    i += 1;
                    j += 1;
                }
                (Some(p), Some(q)) if p < q => {
                    merged.push(p, left.magnitudes[i], 0.0);
                    i += 1;
                }
                (Some(p), None) => {
                    merged.push(p, left.magnitudes[i], 0.0);
                    i += 1;
                }
                (_, Some(q)) => {
                    merged.push(q, 0.0, right.magnitudes[j]);
                    j += 1;
                }
                (None, None) => break,
            }
        }
        merged
    }
}

/// Two signatures aligned on a shared, increasing position list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedSignature {
    positions: Vec<usize>,
    left: Vec<f64>,
    right: Vec<f64>,
}

impl ExtendedSignature {
    fn push(&mut self, position: usize, left: f64, right: f64) {
        self.positions.push(position);
        self.left.push(left);
        self.right.push(right);
    }

    /// Return the merged positions.
    #[must_use]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    /// Return the first signature's magnitudes on the merged positions.
    #[must_use]
    pub fn left(&self) -> &[f64] {
        &self.left
    }

    /// Return the second signature's magnitudes on the merged positions.
    #[must_use]
    pub fn right(&self) -> &[f64] {
        &self.right
    }

    /// Unordered histogram distance: `Σ |left[i] - right[i]|`.
    #[must_use]
    pub fn nominal_distance(&self) -> f64 {
        self.left
            .iter()
            .zip(&self.right)
            .map(|(a, b)| (a - b).abs())
            .sum()
    }

    /// Ordered histogram distance.
    ///
    /// Accumulates the running mass difference `p` and weights `|p|` by the gap
    /// to the next merged position; the last position has no successor and
    /// contributes nothing.
    #[must_use]
    pub fn ordinal_distance(&self) -> f64 {
        let mut p = 0.0;
        let mut total = 0.0;
        for (i, gap) in self.positions.windows(2).map(|w| w[1] - w[0]).enumerate() {
            p += self.left[i] - self.right[i];
            total += gap as f64 * f64::abs(p);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_keeps_positive_entries() {
        let s = Signature::from_values(&[0.0, 2.0, -1.0, 0.5, 0.0]);
        assert_eq!(s.positions(), &[1, 3]);
        assert_eq!(s.magnitudes(), &[2.0, 0.5]);
        assert!(Signature::from_values(&[0.0, -3.0]).is_empty());
    }

    #[test]
    fn extend_fills_missing_with_zero() {
        let a = Signature::from_values(&[1.0, 0.0, 3.0, 0.0]);
        let b = Signature::from_values(&[2.0, 5.0, 0.0, 0.0]);
        let e = Signature::extend(&a, &b);
        assert_eq!(e.positions(), &[0, 1, 2]);
        assert_eq!(e.left(), &[1.0, 0.0, 3.0]);
        assert_eq!(e.right(), &[2.0, 5.0, 0.0]);
    }

    #[test]
    fn extend_keeps_tails() {
        let a = Signature::from_values(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        let b = Signature::from_values(&[0.0, 0.0, 0.0, 4.0, 6.0]);
        let e = Signature::extend(&a, &b);
        assert_eq!(e.positions(), &[0, 3, 4]);
        assert_eq!(e.left(), &[1.0, 0.0, 0.0]);
        assert_eq!(e.right(), &[0.0, 4.0, 6.0]);
    }

    #[test]
    fn nominal_distance_sums_differences() {
        let a = Signature::from_values(&[1.0, 0.0, 3.0]);
        let b = Signature::from_values(&[2.0, 5.0, 0.0]);
        // |1-2| + |0-5| + |3-0|
        assert_eq!(Signature::extend(&a, &b).nominal_distance(), 9.0);
    }

    #[test]
    fn ordinal_distance_weights_by_gap() {
        let a = Signature::from_values(&[1.0, 0.0, 0.0, 2.0]);
        let b = Signature::from_values(&[0.0, 0.0, 3.0, 0.0]);
        // positions [0, 2, 3]; p = 1 then 1 - 3 = -2
        // 2 * |1| + 1 * |-2| = 4
        assert_eq!(Signature::extend(&a, &b).ordinal_distance(), 4.0);
    }

    #[test]
    fn empty_signatures_have_zero_distance() {
        let a = Signature::from_values(&[0.0, 0.0]);
        let e = Signature::extend(&a, &a);
        assert!(e.positions().is_empty());
        assert_eq!(e.nominal_distance(), 0.0);
        assert_eq!(e.ordinal_distance(), 0.0);
    }
}
