//! Correlation Optimized Warping (COW) alignment.
//!
//! Pure math library, zero I/O. A sample signal is cut into segments, each
//! segment boundary may move within a slack budget, and a dynamic program picks
//! the boundary positions that maximize the summed Pearson correlation between
//! warped sample segments and reference segments. The sample is then linearly
//! resampled onto the reference grid.
//!
//! Start with [`CowConfig`] for typed inputs, or [`cow_align`] for the flat
//! slice convention.

mod backtrace;
mod bounds;
mod config;
mod error;
mod forward;
mod interp;
pub mod math;
mod reference;
mod score;
mod segment;
mod series;
mod table;

pub use backtrace::{AlignedSignal, Alignment, TerminalSample, WarpedBoundaries};
pub use bounds::Bounds;
pub use config::{BatchOutcome, CowConfig, FallbackPolicy};
pub use error::WarpError;
pub use forward::{DegeneratePolicy, NUMERICAL_EPS};
pub use interp::{InterpolationData, ShiftMatrix, interpolation_tables};
pub use reference::ReferenceStrategy;
pub use score::WarpScore;
pub use segment::{SegmentPlan, Segmentation};
pub use series::{Signal, SignalView};
pub use table::WarpingTable;

/// Outcome of [`cow_align`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlignStatus {
    /// `out` holds the aligned signal.
    Aligned {
        /// Cumulative correlation of the optimal path.
        score: WarpScore,
    },
    /// No feasible warp; `out` was not written.
    Infeasible {
        /// First segment the search could not get past.
        segment: usize,
    },
}

/// Align `sample` onto `reference` using raw boundary sequences, writing the
/// result into `out`.
///
/// `sample_boundaries` and `reference_boundaries` follow the flat convention of
/// [`Segmentation::from_boundaries`]: a single reference element is the auto
/// segment size; otherwise both list explicit breakpoints. Arguments are
/// checked in this order before any computation starts.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`WarpError::LengthMismatch`] | `sample` and `reference` differ in length |
/// | [`WarpError::SlackTooSmall`] | `slack <= 1` |
/// | [`WarpError::EmptySeries`] | signals are empty |
/// | [`WarpError::NonFiniteValue`] | a signal contains NaN or infinity |
/// | [`WarpError::BoundaryCountMismatch`] | boundary sequences differ in cardinality |
/// | [`WarpError::TooFewBoundaries`] | boundary sequences are empty or have a single explicit breakpoint |
/// | [`WarpError::InvalidSegmentSize`] | auto segment size does not fit the signal |
/// | [`WarpError::NonIncreasingBoundaries`] | explicit breakpoints not strictly increasing |
/// | [`WarpError::BoundarySpanMismatch`] | explicit breakpoints do not cover the signal |
/// | [`WarpError::OutputLength`] | `out.len() != reference.len()` |
pub fn cow_align(
    sample: &[f64],
    sample_boundaries: &[usize],
    reference: &[f64],
    reference_boundaries: &[usize],
    slack: usize,
    out: &mut [f64],
) -> Result<AlignStatus, WarpError> {
    if sample.len() != reference.len() {
        return Err(WarpError::LengthMismatch {
            sample: sample.len(),
            reference: reference.len(),
        });
    }
    if slack <= 1 {
        return Err(WarpError::SlackTooSmall { slack });
    }
    let sample = SignalView::new(sample)?;
    let reference = SignalView::new(reference)?;

    let segmentation = Segmentation::from_boundaries(sample_boundaries, reference_boundaries)?;
    segmentation.plan(reference.len())?;
    if out.len() != reference.len() {
        return Err(WarpError::OutputLength {
            expected: reference.len(),
            got: out.len(),
        });
    }

    let config = CowConfig::new(slack, segmentation)?;
    Ok(match config.align(sample, reference)? {
        Alignment::Aligned(aligned) => {
            out.copy_from_slice(&aligned.values);
            AlignStatus::Aligned {
                score: aligned.score,
            }
        }
        Alignment::Infeasible { segment } => AlignStatus::Infeasible { segment },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_bumps(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.3).sin().powi(2) + i as f64 * 0.01).collect()
    }

    #[test]
    fn validation_order() {
        let v = ramp_bumps(20);
        let short = ramp_bumps(19);
        let mut out = vec![0.0; 20];

        // length mismatch wins over a bad slack
        assert_eq!(
            cow_align(&v, &[0], &short, &[5], 1, &mut out),
            Err(WarpError::LengthMismatch { sample: 20, reference: 19 })
        );
        // slack wins over mismatched boundaries
        assert_eq!(
            cow_align(&v, &[0, 19], &v, &[0, 9, 19], 1, &mut out),
            Err(WarpError::SlackTooSmall { slack: 1 })
        );
        // boundaries win over the output buffer
        assert_eq!(
            cow_align(&v, &[0, 19], &v, &[0, 9, 19], 2, &mut [0.0; 3]),
            Err(WarpError::BoundaryCountMismatch { sample: 2, reference: 3 })
        );
        assert_eq!(
            cow_align(&v, &[0], &v, &[5], 2, &mut [0.0; 3]),
            Err(WarpError::OutputLength { expected: 20, got: 3 })
        );
    }

    #[test]
    fn identity_alignment_writes_reference() {
        let v = ramp_bumps(37);
        let mut out = vec![0.0; 37];
        let status = cow_align(&v, &[0], &v, &[10], 3, &mut out).unwrap();
        let AlignStatus::Aligned { score } = status else {
            panic!("expected alignment, got {status:?}");
        };
        assert!((score.value() - 4.0).abs() < 1e-9);
        for i in 0..36 {
            assert!((out[i] - v[i]).abs() < 1e-12, "out[{i}]");
        }
        assert_eq!(out[36], out[35]);
    }

    #[test]
    fn explicit_boundaries_accept_one_based_positions() {
        let v = ramp_bumps(21);
        let mut zero_based = vec![0.0; 21];
        let mut one_based = vec![0.0; 21];
        cow_align(&v, &[0, 7, 20], &v, &[0, 10, 20], 2, &mut zero_based).unwrap();
        cow_align(&v, &[1, 8, 21], &v, &[1, 11, 21], 2, &mut one_based).unwrap();
        assert_eq!(zero_based, one_based);
    }

    #[test]
    fn degenerate_reference_follows_policy() {
        let v = ramp_bumps(21);
        let flat = vec![0.5; 21];
        let segmentation = Segmentation::Auto { segment_size: 6 };
        let config = CowConfig::new(2, segmentation)
            .unwrap()
            .with_degenerate_policy(DegeneratePolicy::Reject);
        let alignment = config
            .align(SignalView::new(&v).unwrap(), SignalView::new(&flat).unwrap())
            .unwrap();
        assert!(!alignment.is_aligned());

        // the flat entry point uses the zero-score default and still aligns
        let mut out = vec![-7.0; 21];
        let status = cow_align(&v, &[0], &flat, &[6], 2, &mut out).unwrap();
        assert_eq!(status, AlignStatus::Aligned { score: WarpScore::new(0.0) });
        assert!(out.iter().all(|&x| x != -7.0));
    }
}
