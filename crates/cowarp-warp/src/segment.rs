//! Segment planning: turning boundary sequences into per-segment lengths.

use crate::error::WarpError;

/// How sample and reference are cut into segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segmentation {
    /// Equal-length segments of `segment_size` points (consecutive segments
    /// share an endpoint); the last segment absorbs the remainder.
    Auto {
        /// Target number of points per segment, at least 2.
        segment_size: usize,
    },
    /// Explicit breakpoints for sample and reference, same cardinality.
    Explicit {
        /// Sample breakpoints.
        sample: Vec<usize>,
        /// Reference breakpoints.
        reference: Vec<usize>,
    },
}

impl Segmentation {
    /// Interpret raw boundary sequences.
    ///
    /// A single-element reference sequence selects [`Segmentation::Auto`] with
    /// that element as the segment size; anything else is explicit.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::TooFewBoundaries`] | `reference` is empty |
    /// | [`WarpError::BoundaryCountMismatch`] | `sample.len() != reference.len()` |
    pub fn from_boundaries(sample: &[usize], reference: &[usize]) -> Result<Self, WarpError> {
        if sample.len() != reference.len() {
            return Err(WarpError::BoundaryCountMismatch {
                sample: sample.len(),
                reference: reference.len(),
            });
        }
        match reference {
            [] => Err(WarpError::TooFewBoundaries),
            [segment_size] => Ok(Self::Auto {
                segment_size: *segment_size,
            }),
            _ => Ok(Self::Explicit {
                sample: sample.to_vec(),
                reference: reference.to_vec(),
            }),
        }
    }

    /// Derive segment lengths for signals of `len` points.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::InvalidSegmentSize`] | auto mode with `segment_size < 2` or larger than `len` |
    /// | [`WarpError::BoundaryCountMismatch`] | explicit sequences differ in cardinality |
    /// | [`WarpError::TooFewBoundaries`] | explicit sequences with fewer than two breakpoints |
    /// | [`WarpError::NonIncreasingBoundaries`] | explicit breakpoints not strictly increasing |
    /// | [`WarpError::BoundarySpanMismatch`] | explicit breakpoints do not span `len - 1` |
    pub fn plan(&self, len: usize) -> Result<SegmentPlan, WarpError> {
        match self {
            Self::Auto { segment_size } => plan_auto(*segment_size, len),
            Self::Explicit { sample, reference } => plan_explicit(sample, reference, len),
        }
    }
}

/// Per-segment lengths (in intervals, so a segment of length `l` covers `l + 1` points).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    sample_lengths: Vec<usize>,
    reference_lengths: Vec<usize>,
    auto: bool,
}

impl SegmentPlan {
    /// Return the number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.reference_lengths.len()
    }

    /// Return the sample-side segment lengths.
    #[must_use]
    pub fn sample_lengths(&self) -> &[usize] {
        &self.sample_lengths
    }

    /// Return the reference-side segment lengths.
    #[must_use]
    pub fn reference_lengths(&self) -> &[usize] {
        &self.reference_lengths
    }

    /// Return true if the plan came from auto mode.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.auto
    }

    /// Offsets of each reference boundary: `[0, l0, l0 + l1, ...]`.
    #[must_use]
    pub fn reference_offsets(&self) -> Vec<usize> {
        offsets(&self.reference_lengths)
    }

    /// Offsets of each sample boundary: `[0, l0, l0 + l1, ...]`.
    #[must_use]
    pub fn sample_offsets(&self) -> Vec<usize> {
        offsets(&self.sample_lengths)
    }
}

fn offsets(lengths: &[usize]) -> Vec<usize> {
    let mut with_origin = Vec::with_capacity(lengths.len() + 1);
    with_origin.push(0);
    with_origin.extend_from_slice(lengths);
    crate::math::cumsum(&with_origin)
}

fn plan_auto(segment_size: usize, len: usize) -> Result<SegmentPlan, WarpError> {
    let invalid = WarpError::InvalidSegmentSize { segment_size, len };
    if segment_size < 2 || len < 2 {
        return Err(invalid);
    }
    let step = segment_size - 1;
    let count = (len - 1) / step;
    if count == 0 {
        return Err(invalid);
    }
    let mut lengths = vec![step; count];
    lengths[count - 1] += (len - 1) % step;
    Ok(SegmentPlan {
        sample_lengths: lengths.clone(),
        reference_lengths: lengths,
        auto: true,
    })
}

fn plan_explicit(
    sample: &[usize],
    reference: &[usize],
    len: usize,
) -> Result<SegmentPlan, WarpError> {
    if sample.len() != reference.len() {
        return Err(WarpError::BoundaryCountMismatch {
            sample: sample.len(),
            reference: reference.len(),
        });
    }
    if reference.len() < 2 {
        return Err(WarpError::TooFewBoundaries);
    }
    Ok(SegmentPlan {
        sample_lengths: lengths_of(sample, len)?,
        reference_lengths: lengths_of(reference, len)?,
        auto: false,
    })
}

fn lengths_of(boundaries: &[usize], len: usize) -> Result<Vec<usize>, WarpError> {
    for (position, pair) in boundaries.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(WarpError::NonIncreasingBoundaries {
                position: position + 1,
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    let span = boundaries[boundaries.len() - 1] - boundaries[0];
    if span + 1 != len {
        return Err(WarpError::BoundarySpanMismatch {
            span,
            expected: len.saturating_sub(1),
        });
    }
    Ok(crate::math::diff(boundaries))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_mode_remainder_goes_to_last_segment() {
        // (50 - 1) / (10 - 1) = 5 segments, remainder 49 % 9 = 4
        let plan = Segmentation::Auto { segment_size: 10 }.plan(50).unwrap();
        assert_eq!(plan.segment_count(), 5);
        assert_eq!(plan.reference_lengths(), &[9, 9, 9, 9, 13]);
        assert_eq!(plan.sample_lengths(), plan.reference_lengths());
        assert!(plan.is_auto());
        assert_eq!(plan.reference_offsets(), vec![0, 9, 18, 27, 36, 49]);
    }

    #[test]
    fn auto_mode_exact_division() {
        let plan = Segmentation::Auto { segment_size: 4 }.plan(10).unwrap();
        assert_eq!(plan.reference_lengths(), &[3, 3, 3]);
    }

    #[test]
    fn auto_mode_rejects_degenerate_sizes() {
        for size in [0, 1, 12] {
            let result = Segmentation::Auto { segment_size: size }.plan(10);
            assert!(
                matches!(result, Err(WarpError::InvalidSegmentSize { .. })),
                "size {size}: {result:?}"
            );
        }
    }

    #[test]
    fn explicit_mode_uses_differences_independently() {
        let seg = Segmentation::Explicit {
            sample: vec![0, 4, 9],
            reference: vec![1, 6, 10],
        };
        let plan = seg.plan(10).unwrap();
        assert_eq!(plan.sample_lengths(), &[4, 5]);
        assert_eq!(plan.reference_lengths(), &[5, 4]);
        assert_eq!(plan.sample_offsets(), vec![0, 4, 9]);
        assert!(!plan.is_auto());
    }

    #[test]
    fn explicit_mode_rejects_non_increasing() {
        let seg = Segmentation::Explicit {
            sample: vec![0, 5, 5, 9],
            reference: vec![0, 3, 6, 9],
        };
        assert!(matches!(
            seg.plan(10),
            Err(WarpError::NonIncreasingBoundaries { position: 2, previous: 5, next: 5 })
        ));
    }

    #[test]
    fn explicit_mode_rejects_partial_span() {
        let seg = Segmentation::Explicit {
            sample: vec![0, 5, 8],
            reference: vec![0, 5, 9],
        };
        assert!(matches!(
            seg.plan(10),
            Err(WarpError::BoundarySpanMismatch { span: 8, expected: 9 })
        ));
    }

    #[test]
    fn from_boundaries_selects_mode() {
        assert_eq!(
            Segmentation::from_boundaries(&[0], &[15]).unwrap(),
            Segmentation::Auto { segment_size: 15 }
        );
        assert!(matches!(
            Segmentation::from_boundaries(&[0, 9], &[0, 9]).unwrap(),
            Segmentation::Explicit { .. }
        ));
    }

    #[test]
    fn from_boundaries_rejects_cardinality_mismatch() {
        let result = Segmentation::from_boundaries(&[0, 5, 9], &[0, 9]);
        assert!(matches!(
            result,
            Err(WarpError::BoundaryCountMismatch { sample: 3, reference: 2 })
        ));
        assert!(matches!(
            Segmentation::from_boundaries(&[], &[]),
            Err(WarpError::TooFewBoundaries)
        ));
    }
}
