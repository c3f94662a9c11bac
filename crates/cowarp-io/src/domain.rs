//! Domain types for cowarp-io.

use cowarp_warp::Signal;

use crate::IoError;

/// A sample identifier.
///
/// Wraps the string in the first column of the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleId(String);

impl SampleId {
    pub(crate) fn new(id: String) -> Self {
        Self(id)
    }

    /// Return the sample ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signals with their sample identifiers, in CSV row order.
///
/// `sample_ids[i]` corresponds to `signals[i]`; all signals share one length.
#[derive(Debug)]
pub struct Dataset {
    /// Sample identifiers in insertion order.
    pub sample_ids: Vec<SampleId>,
    /// Validated signals in the same order as `sample_ids`.
    pub signals: Vec<Signal>,
}

impl Dataset {
    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.signals.len()
    }

    /// Return true if there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Return the common signal length.
    #[must_use]
    pub fn signal_len(&self) -> usize {
        self.signals.first().map_or(0, Signal::len)
    }
}
