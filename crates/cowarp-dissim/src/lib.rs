//! Dissimilarities between non-negative spectra.
//!
//! Pure math library, zero I/O, independent of the alignment engine. Provides
//! a presence/absence distance, a Pearson correlation distance, and two
//! composite distances that add a histogram term computed on the merged
//! signatures (active positions) of the two vectors.

mod error;
mod matrix;
mod measure;
mod signature;

pub use error::DissimError;
pub use matrix::{DissimilarityMatrix, pairwise};
pub use measure::{Measure, correlation_distance, dnom, dord, presence, presence_distance};
pub use signature::{ExtendedSignature, Signature};

/// Unordered histogram distance between the signatures of `x` and `y`.
#[must_use]
pub fn nominal_distance(x: &[f64], y: &[f64]) -> f64 {
    Signature::extend(&Signature::from_values(x), &Signature::from_values(y)).nominal_distance()
}

/// Ordered histogram distance between the signatures of `x` and `y`.
#[must_use]
pub fn ordinal_distance(x: &[f64], y: &[f64]) -> f64 {
    Signature::extend(&Signature::from_values(x), &Signature::from_values(y)).ordinal_distance()
}
