//! Alignment configuration and the single-sample and batch entry points.

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::backtrace::{self, AlignedSignal, Alignment, TerminalSample, TracedPath};
use crate::bounds::Bounds;
use crate::error::WarpError;
use crate::forward::{self, DegeneratePolicy};
use crate::interp::interpolation_tables;
use crate::segment::Segmentation;
use crate::series::{Signal, SignalView};
use crate::table::WarpingTable;

/// What a batch does with a sample that has no feasible warp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Keep the unaligned sample values and log a warning.
    #[default]
    KeepOriginal,
    /// Report the sample as infeasible.
    Report,
}

/// Per-sample result of [`CowConfig::align_batch`].
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    /// The sample was aligned.
    Aligned(AlignedSignal),
    /// No feasible warp; the original values are carried through.
    Fallback {
        /// The unaligned sample values.
        values: Vec<f64>,
        /// First segment the search could not get past.
        segment: usize,
    },
    /// No feasible warp and no fallback requested.
    Infeasible {
        /// First segment the search could not get past.
        segment: usize,
    },
}

impl BatchOutcome {
    /// Values to use downstream: aligned if possible, original on fallback.
    #[must_use]
    pub fn values(&self) -> Option<&[f64]> {
        match self {
            Self::Aligned(aligned) => Some(&aligned.values),
            Self::Fallback { values, .. } => Some(values),
            Self::Infeasible { .. } => None,
        }
    }

    /// Return true if the sample was actually warped.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }
}

/// Configuration for Correlation Optimized Warping.
///
/// Construct via [`CowConfig::new`], then chain `with_*` methods to override defaults.
///
/// # Defaults
///
/// | Parameter           | Default                               |
/// |---------------------|---------------------------------------|
/// | `degenerate_policy` | `DegeneratePolicy::ZeroScore`         |
/// | `terminal_sample`   | `TerminalSample::DuplicatePrevious`   |
/// | `fallback`          | `FallbackPolicy::KeepOriginal`        |
#[derive(Debug, Clone)]
pub struct CowConfig {
    slack: usize,
    segmentation: Segmentation,
    degenerate_policy: DegeneratePolicy,
    terminal_sample: TerminalSample,
    fallback: FallbackPolicy,
}

impl CowConfig {
    /// Create a configuration with the given slack and segmentation.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::SlackTooSmall`] | `slack <= 1` |
    pub fn new(slack: usize, segmentation: Segmentation) -> Result<Self, WarpError> {
        if slack <= 1 {
            return Err(WarpError::SlackTooSmall { slack });
        }
        Ok(Self {
            slack,
            segmentation,
            degenerate_policy: DegeneratePolicy::default(),
            terminal_sample: TerminalSample::default(),
            fallback: FallbackPolicy::default(),
        })
    }

    /// Set how zero-variance segment pairs are scored.
    #[must_use]
    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.degenerate_policy = policy;
        self
    }

    /// Set how the final output sample is produced.
    #[must_use]
    pub fn with_terminal_sample(mut self, terminal: TerminalSample) -> Self {
        self.terminal_sample = terminal;
        self
    }

    /// Set what batch alignment does with infeasible samples.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Return the slack.
    #[must_use]
    pub fn slack(&self) -> usize {
        self.slack
    }

    /// Return the segmentation.
    #[must_use]
    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }

    /// Return the degenerate-variance policy.
    #[must_use]
    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.degenerate_policy
    }

    /// Return the terminal-sample rule.
    #[must_use]
    pub fn terminal_sample(&self) -> TerminalSample {
        self.terminal_sample
    }

    /// Return the batch fallback policy.
    #[must_use]
    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Warp `sample` onto `reference`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::LengthMismatch`] | `sample` and `reference` differ in length |
    /// | [`WarpError::InvalidSegmentSize`] | auto segment size does not fit the signal |
    /// | [`WarpError::BoundaryCountMismatch`] | explicit boundary sequences differ in cardinality |
    /// | [`WarpError::TooFewBoundaries`] | explicit boundaries with fewer than two elements |
    /// | [`WarpError::NonIncreasingBoundaries`] | explicit boundaries not strictly increasing |
    /// | [`WarpError::BoundarySpanMismatch`] | explicit boundaries do not cover the signal |
    /// | [`WarpError::InterpolationOutOfDomain`] | resampling queried outside a segment |
    #[instrument(skip(self, sample, reference), fields(len = reference.len(), slack = self.slack))]
    pub fn align(
        &self,
        sample: SignalView<'_>,
        reference: SignalView<'_>,
    ) -> Result<Alignment, WarpError> {
        if sample.len() != reference.len() {
            return Err(WarpError::LengthMismatch {
                sample: sample.len(),
                reference: reference.len(),
            });
        }

        let plan = self.segmentation.plan(reference.len())?;
        let interp = interpolation_tables(&plan, self.slack);
        let bounds = Bounds::compute(&plan, self.slack, sample.len());
        let mut table = WarpingTable::new(&bounds);
        debug!(segments = plan.segment_count(), nodes = table.len(), "search lattice built");

        forward::run_forward(
            &mut table,
            &bounds,
            &plan,
            &interp,
            sample.as_slice(),
            reference.as_slice(),
            self.degenerate_policy,
        );

        match backtrace::trace(&table, plan.segment_count()) {
            TracedPath::Infeasible { segment } => {
                debug!(segment, "no feasible warp path");
                Ok(Alignment::Infeasible { segment })
            }
            TracedPath::Found {
                boundaries,
                score,
                segment_scores,
            } => {
                let mut values = vec![0.0; reference.len()];
                backtrace::resample(
                    sample.as_slice(),
                    &boundaries,
                    &plan.reference_offsets(),
                    self.terminal_sample,
                    &mut values,
                )?;
                debug!(%score, "alignment complete");
                Ok(Alignment::Aligned(AlignedSignal {
                    values,
                    boundaries,
                    score,
                    segment_scores,
                }))
            }
        }
    }

    /// Align every sample onto the same reference, in parallel.
    ///
    /// Outcomes are returned in input order. Infeasible samples are handled
    /// per [`FallbackPolicy`].
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::EmptyBatch`] | `samples` is empty |
    /// | any variant of [`CowConfig::align`] | raised by the first failing sample |
    #[instrument(skip(self, samples, reference), fields(n = samples.len(), len = reference.len()))]
    pub fn align_batch(
        &self,
        samples: &[Signal],
        reference: &Signal,
    ) -> Result<Vec<BatchOutcome>, WarpError> {
        if samples.is_empty() {
            return Err(WarpError::EmptyBatch);
        }

        let outcomes = samples
            .par_iter()
            .enumerate()
            .map(|(index, sample)| {
                let alignment = self.align(sample.as_view(), reference.as_view())?;
                Ok(match alignment {
                    Alignment::Aligned(aligned) => BatchOutcome::Aligned(aligned),
                    Alignment::Infeasible { segment } => match self.fallback {
                        FallbackPolicy::KeepOriginal => {
                            warn!(index, segment, "alignment infeasible, keeping original sample");
                            BatchOutcome::Fallback {
                                values: sample.as_view().as_slice().to_vec(),
                                segment,
                            }
                        }
                        FallbackPolicy::Report => BatchOutcome::Infeasible { segment },
                    },
                })
            })
            .collect::<Result<Vec<_>, WarpError>>()?;

        let aligned = outcomes.iter().filter(|o| o.is_aligned()).count();
        info!(aligned, total = outcomes.len(), "batch alignment complete");
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(values: Vec<f64>) -> Signal {
        Signal::new(values).unwrap()
    }

    fn wavy(n: usize, phase: f64) -> Vec<f64> {
        (0..n).map(|i| ((i as f64 + phase) * 0.4).sin()).collect()
    }

    #[test]
    fn new_rejects_small_slack() {
        for slack in [0, 1] {
            let err = CowConfig::new(slack, Segmentation::Auto { segment_size: 10 }).unwrap_err();
            assert_eq!(err, WarpError::SlackTooSmall { slack });
        }
    }

    #[test]
    fn builder_sets_fields() {
        let config = CowConfig::new(3, Segmentation::Auto { segment_size: 10 })
            .unwrap()
            .with_degenerate_policy(DegeneratePolicy::Reject)
            .with_terminal_sample(TerminalSample::LastSample)
            .with_fallback(FallbackPolicy::Report);
        assert_eq!(config.slack(), 3);
        assert_eq!(config.degenerate_policy(), DegeneratePolicy::Reject);
        assert_eq!(config.terminal_sample(), TerminalSample::LastSample);
        assert_eq!(config.fallback(), FallbackPolicy::Report);
        assert_eq!(config.segmentation(), &Segmentation::Auto { segment_size: 10 });
    }

    #[test]
    fn align_rejects_length_mismatch() {
        let config = CowConfig::new(2, Segmentation::Auto { segment_size: 5 }).unwrap();
        let a = sig(wavy(20, 0.0));
        let b = sig(wavy(21, 0.0));
        assert_eq!(
            config.align(a.as_view(), b.as_view()).unwrap_err(),
            WarpError::LengthMismatch { sample: 20, reference: 21 }
        );
    }

    #[test]
    fn batch_keeps_order_and_falls_back() {
        // every edge is rejected against a flat reference, so nothing is feasible
        let flat = sig(vec![1.0; 21]);
        let samples = vec![sig(wavy(21, 0.0)), sig(wavy(21, 1.0))];

        let keep = CowConfig::new(2, Segmentation::Auto { segment_size: 6 })
            .unwrap()
            .with_degenerate_policy(DegeneratePolicy::Reject);
        let outcomes = keep.align_batch(&samples, &flat).unwrap();
        assert_eq!(outcomes.len(), 2);
        for (outcome, sample) in outcomes.iter().zip(&samples) {
            assert!(matches!(outcome, BatchOutcome::Fallback { segment: 0, .. }));
            assert_eq!(outcome.values(), Some(sample.as_view().as_slice()));
        }

        let report = keep.with_fallback(FallbackPolicy::Report);
        let outcomes = report.align_batch(&samples, &flat).unwrap();
        assert!(outcomes.iter().all(|o| o.values().is_none()));
    }

    #[test]
    fn batch_aligns_feasible_samples() {
        let reference = sig(wavy(31, 0.0));
        let samples = vec![sig(wavy(31, 0.0)), sig(wavy(31, 1.5))];
        let config = CowConfig::new(3, Segmentation::Auto { segment_size: 7 }).unwrap();
        let outcomes = config.align_batch(&samples, &reference).unwrap();
        assert!(outcomes.iter().all(BatchOutcome::is_aligned));
        assert_eq!(outcomes[0].values().unwrap().len(), 31);
    }

    #[test]
    fn batch_rejects_empty_input() {
        let config = CowConfig::new(2, Segmentation::Auto { segment_size: 5 }).unwrap();
        let reference = sig(wavy(10, 0.0));
        assert_eq!(
            config.align_batch(&[], &reference).unwrap_err(),
            WarpError::EmptyBatch
        );
    }
}
