//! Error types for vector dissimilarities.

/// Errors from dissimilarity computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DissimError {
    /// Returned when an input vector is empty.
    #[error("vectors must be non-empty")]
    Empty,

    /// Returned when the two vectors differ in length.
    #[error("vectors have lengths {left} and {right}; lengths must match")]
    LengthMismatch {
        /// Length of the first vector.
        left: usize,
        /// Length of the second vector.
        right: usize,
    },

    /// Returned when a correlation is requested for a vector with zero variance.
    #[error("correlation is undefined for a constant vector")]
    ConstantVector,
}
