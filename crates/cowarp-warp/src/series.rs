//! Signal types with validation guarantees.

use std::ops::Index;

use crate::error::WarpError;

/// Owned, validated signal. Guaranteed non-empty with all finite values.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal(Vec<f64>);

impl Signal {
    /// Create a new signal, validating that it is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::EmptySeries`] | `values` is empty |
    /// | [`WarpError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(values: Vec<f64>) -> Result<Self, WarpError> {
        validate(&values)?;
        Ok(Self(values))
    }

    /// Borrow this signal as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> SignalView<'_> {
        SignalView::new_unchecked(&self.0)
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the signal has no samples.
    ///
    /// Always `false` for instances built through [`Signal::new`]; provided
    /// for the `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl AsRef<[f64]> for Signal {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl TryFrom<Vec<f64>> for Signal {
    type Error = WarpError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Borrowed, validated view into a signal.
#[derive(Debug, Clone, Copy)]
pub struct SignalView<'a>(&'a [f64]);

impl<'a> SignalView<'a> {
    /// Create a new view, validating that the slice is non-empty and all values are finite.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WarpError::EmptySeries`] | `slice` is empty |
    /// | [`WarpError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn new(slice: &'a [f64]) -> Result<Self, WarpError> {
        validate(slice)?;
        Ok(Self(slice))
    }

    pub(crate) fn new_unchecked(slice: &'a [f64]) -> Self {
        Self(slice)
    }

    /// Return the underlying slice.
    #[must_use]
    pub fn as_slice(&self) -> &'a [f64] {
        self.0
    }

    /// Return the number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the view has no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<usize> for SignalView<'_> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl AsRef<[f64]> for SignalView<'_> {
    fn as_ref(&self) -> &[f64] {
        self.0
    }
}

fn validate(values: &[f64]) -> Result<(), WarpError> {
    if values.is_empty() {
        return Err(WarpError::EmptySeries);
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(WarpError::NonFiniteValue { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_vec() {
        assert!(matches!(Signal::new(vec![]), Err(WarpError::EmptySeries)));
    }

    #[test]
    fn rejects_nan() {
        let result = Signal::new(vec![1.0, f64::NAN, 3.0]);
        assert!(matches!(result, Err(WarpError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn rejects_neg_infinity() {
        let result = Signal::new(vec![f64::NEG_INFINITY, 2.0]);
        assert!(matches!(result, Err(WarpError::NonFiniteValue { index: 0 })));
    }

    #[test]
    fn view_rejects_infinity() {
        let data = [1.0, f64::INFINITY];
        let result = SignalView::new(&data);
        assert!(matches!(result, Err(WarpError::NonFiniteValue { index: 1 })));
    }

    #[test]
    fn view_indexing() {
        let signal = Signal::new(vec![10.0, 20.0, 30.0]).unwrap();
        let view = signal.as_view();
        assert_eq!(view[0], 10.0);
        assert_eq!(view[2], 30.0);
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn try_from_vec() {
        let signal: Result<Signal, _> = vec![1.0, 2.0].try_into();
        assert_eq!(signal.unwrap().into_inner(), vec![1.0, 2.0]);
    }
}
