//! Choosing a common reference for a batch of signals.

use tracing::{debug, instrument};

use crate::error::WarpError;
use crate::series::Signal;

/// How a batch reference is derived from the signals themselves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReferenceStrategy {
    /// Element-wise mean of all signals.
    Mean,
    /// Element-wise median of all signals.
    Median,
    /// The signal whose correlations with every signal sum highest.
    #[default]
    BestCorrelation,
}

impl ReferenceStrategy {
    /// Build the reference for `signals`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::EmptyBatch`] | `signals` is empty |
    /// | [`WarpError::LengthMismatch`] | A signal differs in length from the first |
    #[instrument(skip(signals), fields(n = signals.len()))]
    pub fn select_reference(self, signals: &[Signal]) -> Result<Signal, WarpError> {
        let Some(first) = signals.first() else {
            return Err(WarpError::EmptyBatch);
        };
        let len = first.len();
        if let Some(other) = signals.iter().find(|s| s.len() != len) {
            return Err(WarpError::LengthMismatch {
                sample: other.len(),
                reference: len,
            });
        }

        let values = match self {
            Self::Mean => {
                let n = signals.len() as f64;
                (0..len)
                    .map(|i| signals.iter().map(|s| s.as_view()[i]).sum::<f64>() / n)
                    .collect()
            }
            Self::Median => (0..len)
                .map(|i| median(signals.iter().map(|s| s.as_view()[i]).collect()))
                .collect(),
            Self::BestCorrelation => {
                let best = best_correlated(signals);
                debug!(index = best, "best-correlated signal chosen as reference");
                signals[best].as_view().as_slice().to_vec()
            }
        };
        Signal::new(values)
    }
}

fn median(mut column: Vec<f64>) -> f64 {
    column.sort_unstable_by(f64::total_cmp);
    let mid = column.len() / 2;
    if column.len() % 2 == 0 {
        (column[mid - 1] + column[mid]) / 2.0
    } else {
        column[mid]
    }
}

/// Index of the signal with the largest summed correlation; the first wins ties.
fn best_correlated(signals: &[Signal]) -> usize {
    let n = signals.len();
    let mut totals = vec![0.0; n];
    for i in 0..n {
        for j in i..n {
            let r = if i == j {
                1.0
            } else {
                pearson(signals[i].as_view().as_slice(), signals[j].as_view().as_slice())
            };
            totals[i] += r;
            if i != j {
                totals[j] += r;
            }
        }
    }
    let mut best = 0;
    for (i, &total) in totals.iter().enumerate() {
        if total > totals[best] {
            best = i;
        }
    }
    best
}

/// Pearson correlation; a constant signal correlates 0 with everything.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mx = x.iter().sum::<f64>() / n;
    let my = y.iter().sum::<f64>() / n;
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (&a, &b) in x.iter().zip(y) {
        sxy += (a - mx) * (b - my);
        sxx += (a - mx) * (a - mx);
        syy += (b - my) * (b - my);
    }
    let denom = (sxx * syy).sqrt();
    if denom > 0.0 { sxy / denom } else { 0.0 }
}
