//! Error types for COW alignment.

/// Errors from signal validation, segment planning and alignment setup.
///
/// All variants except [`WarpError::InterpolationOutOfDomain`] are caller
/// errors detected before the dynamic program runs. An alignment that is
/// well-formed but has no feasible warp path is not an error; it is reported as [`Alignment::Infeasible`](crate::Alignment::Infeasible).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WarpError {
    /// Returned when an empty slice is provided as a signal.
    #[error("signal must be non-empty")]
    EmptySeries,

    /// Returned when a signal contains NaN, infinity, or negative infinity.
    #[error("signal contains non-finite value at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite value found.
        index: usize,
    },

    /// Returned when sample and reference have different lengths.
    #[error("sample has {sample} points but reference has {reference}; lengths must match")]
    LengthMismatch {
        /// Length of the sample signal.
        sample: usize,
        /// Length of the reference signal.
        reference: usize,
    },

    /// Returned when the slack is not greater than one.
    #[error("slack must be greater than one, got {slack}")]
    SlackTooSmall {
        /// The rejected slack.
        slack: usize,
    },

    /// Returned when sample and reference boundary sequences differ in cardinality.
    #[error("sample has {sample} boundaries but reference has {reference}; counts must match")]
    BoundaryCountMismatch {
        /// Number of sample boundaries.
        sample: usize,
        /// Number of reference boundaries.
        reference: usize,
    },

    /// Returned when a boundary sequence is empty.
    #[error("boundary sequence must contain at least one element")]
    TooFewBoundaries,

    /// Returned when the auto-mode segment size cannot produce a segment.
    #[error("segment size {segment_size} is invalid for a signal of length {len}")]
    InvalidSegmentSize {
        /// The requested segment size.
        segment_size: usize,
        /// Length of the reference signal.
        len: usize,
    },

    /// Returned when an explicit boundary sequence is not strictly increasing.
    #[error("boundaries must be strictly increasing: {previous} is followed by {next} at position {position}")]
    NonIncreasingBoundaries {
        /// Index into the boundary sequence of the offending element.
        position: usize,
        /// Boundary value before the offending element.
        previous: usize,
        /// The offending boundary value.
        next: usize,
    },

    /// Returned when explicit boundaries do not cover the whole signal.
    #[error("boundaries span {span} points but the signal needs {expected}")]
    BoundarySpanMismatch {
        /// `last - first` of the boundary sequence.
        span: usize,
        /// `len - 1` of the signal.
        expected: usize,
    },

    /// Returned when the caller-provided output buffer has the wrong length.
    #[error("output buffer has {got} slots, expected {expected}")]
    OutputLength {
        /// Required length (reference length).
        expected: usize,
        /// Provided length.
        got: usize,
    },

    /// Returned when a batch operation receives no signals.
    #[error("batch must contain at least one signal")]
    EmptyBatch,

    /// Returned when a resampling query falls outside the segment grid.
    #[error("resampling position {position} lies outside segment {segment}")]
    InterpolationOutOfDomain {
        /// Segment being resampled.
        segment: usize,
        /// The rejected query position.
        position: f64,
    },
}
