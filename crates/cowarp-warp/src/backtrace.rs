//! Optimal path recovery and resampling onto the reference grid.

use tracing::debug;

use crate::error::WarpError;
use crate::math::interp1q;
use crate::score::WarpScore;
use crate::table::WarpingTable;

/// How the final output sample is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TerminalSample {
    /// The last aligned value repeats the second-to-last one.
    #[default]
    DuplicatePrevious,
    /// The last aligned value is the last sample value.
    LastSample,
}

/// Recovered sample-side boundary positions, 0-based.
///
/// The first element is 0 and the last is the sample length minus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarpedBoundaries(Vec<usize>);

impl WarpedBoundaries {
    /// Return the boundary positions as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Return the number of boundaries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if there are no boundaries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of sample intervals covered by each warped segment.
    #[must_use]
    pub fn spans(&self) -> Vec<usize> {
        crate::math::diff(&self.0)
    }
}

/// A successful alignment.
#[derive(Debug, Clone)]
pub struct AlignedSignal {
    /// The sample resampled onto the reference grid; same length as the reference.
    pub values: Vec<f64>,
    /// Sample boundary positions chosen by the optimal path.
    pub boundaries: WarpedBoundaries,
    /// Cumulative correlation of the optimal path.
    pub score: WarpScore,
    /// Correlation contributed by each segment.
    pub segment_scores: Vec<f64>,
}

/// Outcome of aligning one sample.
#[derive(Debug, Clone)]
pub enum Alignment {
    /// A warp path exists and the sample was resampled.
    Aligned(AlignedSignal),
    /// No slack-bounded path reaches the terminal boundary. `segment` is the
    /// first segment the search could not get past.
    Infeasible {
        /// Zero-based segment index.
        segment: usize,
    },
}

impl Alignment {
    /// Return true for [`Alignment::Aligned`].
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }

    /// Borrow the aligned signal, if any.
    #[must_use]
    pub fn aligned(&self) -> Option<&AlignedSignal> {
        match self {
            Self::Aligned(signal) => Some(signal),
            Self::Infeasible { .. } => None,
        }
    }

    /// Take the aligned signal, if any.
    #[must_use]
    pub fn into_aligned(self) -> Option<AlignedSignal> {
        match self {
            Self::Aligned(signal) => Some(signal),
            Self::Infeasible { .. } => None,
        }
    }
}

/// Result of following predecessors from the terminal node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TracedPath {
    Found {
        boundaries: WarpedBoundaries,
        score: WarpScore,
        segment_scores: Vec<f64>,
    },
    Infeasible {
        segment: usize,
    },
}

/// Follow predecessor pointers once per boundary, back from the terminal node.
pub(crate) fn trace(table: &WarpingTable, segments: usize) -> TracedPath {
    let terminal = table.terminal();
    if !table.is_reachable(terminal) {
        // first boundary with no reachable node; its incoming segment is the blocker
        let blocked = (1..=segments)
            .find(|&b| table.nodes(b).all(|n| !table.is_reachable(n)))
            .unwrap_or(segments);
        return TracedPath::Infeasible {
            segment: blocked - 1,
        };
    }

    let mut nodes = vec![0_usize; segments + 1];
    nodes[segments] = terminal;
    for b in (0..segments).rev() {
        match table.predecessor(nodes[b + 1]) {
            Some(pred) => nodes[b] = pred,
            None => return TracedPath::Infeasible { segment: b },
        }
    }

    let positions: Vec<i64> = nodes.iter().map(|&n| table.position(n)).collect();
    if let Some(segment) = positions.windows(2).position(|w| w[1] <= w[0]) {
        return TracedPath::Infeasible { segment };
    }

    let segment_scores = nodes
        .windows(2)
        .map(|w| table.score(w[1]) - table.score(w[0]))
        .collect();

    TracedPath::Found {
        boundaries: WarpedBoundaries(positions.into_iter().map(|p| p as usize).collect()),
        score: WarpScore::new(table.score(terminal)),
        segment_scores,
    }
}

/// Resample `sample` segment by segment onto the reference grid.
///
/// Segment `k` takes the `span` sample points starting at `warped[k]`, places
/// them on the grid `1..=span` and reads them back at `reference_len[k]`
/// evenly spaced positions from 1 to `span`. Reference offset `k` receives the
/// first of those values; the final output slot is filled per `terminal`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`WarpError::InterpolationOutOfDomain`] | A query falls outside its segment grid |
pub(crate) fn resample(
    sample: &[f64],
    warped: &WarpedBoundaries,
    reference_offsets: &[usize],
    terminal: TerminalSample,
    out: &mut [f64],
) -> Result<(), WarpError> {
    let warped = warped.as_slice();
    for (segment, (w, r)) in warped.windows(2).zip(reference_offsets.windows(2)).enumerate() {
        let span = w[1] - w[0];
        let targets = r[1] - r[0];
        let y = &sample[w[0]..w[1]];
        let grid: Vec<f64> = (1..=span).map(|g| g as f64).collect();
        let step = if targets > 1 {
            (span - 1) as f64 / (targets - 1) as f64
        } else {
            0.0
        };

        for (p, slot) in out[r[0]..r[1]].iter_mut().enumerate() {
            let position = (1.0 + p as f64 * step).clamp(1.0, span as f64);
            *slot = interp1q(&grid, y, position)
                .ok_or(WarpError::InterpolationOutOfDomain { segment, position })?;
        }
        debug!(segment, span, targets, "segment resampled");
    }

    let last = out.len() - 1;
    out[last] = match terminal {
        TerminalSample::DuplicatePrevious if last > 0 => out[last - 1],
        _ => sample[sample.len() - 1],
    };
    Ok(())
}
