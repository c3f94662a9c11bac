//! Presence, correlation and composite dissimilarities between two vectors.

use crate::error::DissimError;

/// Relative threshold below which a vector's spread counts as zero.
const CONSTANT_EPS: f64 = 1e-12;

/// A dissimilarity between two equal-length vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Measure {
    /// Euclidean distance between presence indicators.
    Presence,
    /// One minus the Pearson correlation.
    Correlation,
    /// Composite with the unordered signature histogram term.
    #[default]
    Nominal,
    /// Composite with the ordered signature histogram term.
    Ordinal,
}

impl Measure {
    /// Evaluate this measure on `x` and `y`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DissimError::Empty`] | either vector is empty |
    /// | [`DissimError::LengthMismatch`] | the vectors differ in length |
    /// | [`DissimError::ConstantVector`] | a correlation term sees zero variance |
    pub fn distance(self, x: &[f64], y: &[f64]) -> Result<f64, DissimError> {
        match self {
            Self::Presence => presence_distance(x, y),
            Self::Correlation => correlation_distance(x, y),
            Self::Nominal => dnom(x, y),
            Self::Ordinal => dord(x, y),
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Correlation => "correlation",
            Self::Nominal => "nominal",
            Self::Ordinal => "ordinal",
        }
    }
}

fn check(x: &[f64], y: &[f64]) -> Result<(), DissimError> {
    if x.len() != y.len() {
        return Err(DissimError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(DissimError::Empty);
    }
    Ok(())
}

/// Indicator vector: 1 where `v` is non-zero, 0 elsewhere.
#[must_use]
pub fn presence(v: &[f64]) -> Vec<f64> {
    v.iter().map(|&x| if x != 0.0 { 1.0 } else { 0.0 }).collect()
}

/// Euclidean distance between the presence indicators of `x` and `y`.
///
/// Equals the square root of the number of positions where exactly one of
/// the two vectors is non-zero.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DissimError::Empty`] | either vector is empty |
/// | [`DissimError::LengthMismatch`] | the vectors differ in length |
pub fn presence_distance(x: &[f64], y: &[f64]) -> Result<f64, DissimError> {
    check(x, y)?;
    let px = presence(x);
    let py = presence(y);
    let sum: f64 = px.iter().zip(&py).map(|(a, b)| (a - b) * (a - b)).sum();
    Ok(sum.sqrt())
}

/// Pearson correlation distance, `1 - r`, in `[0, 2]`.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`DissimError::Empty`] | either vector is empty |
/// | [`DissimError::LengthMismatch`] | the vectors differ in length |
/// | [`DissimError::ConstantVector`] | either vector has zero variance |
pub fn correlation_distance(x: &[f64], y: &[f64]) -> Result<f64, DissimError> {
    check(x, y)?;
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

    if is_flat(sxx, x) || is_flat(syy, y) {
        return Err(DissimError::ConstantVector);
    }
    Ok(1.0 - sxy / (sxx * syy).sqrt())
}

fn is_flat(centered_ss: f64, v: &[f64]) -> bool {
    let energy: f64 = v.iter().map(|a| a * a).sum();
    centered_ss.sqrt() <= CONSTANT_EPS * energy.sqrt().max(1.0)
}

/// Nominal composite: `0.5 * presence + 0.25 * correlation + 0.25 * nominal histogram`.
///
/// # Errors
///
/// Same as [`correlation_distance`].
pub fn dnom(x: &[f64], y: &[f64]) -> Result<f64, DissimError> {
    let presence = presence_distance(x, y)?;
    let correlation = correlation_distance(x, y)?;
    let histogram = crate::nominal_distance(x, y);
    Ok(0.5 * presence + 0.25 * correlation + 0.25 * histogram)
}

/// Ordinal composite: `0.5 * presence + 0.25 * correlation + 0.25 * ordinal histogram`.
///
/// # Errors
///
/// Same as [`correlation_distance`].
pub fn dord(x: &[f64], y: &[f64]) -> Result<f64, DissimError> {
    let presence = presence_distance(x, y)?;
    let correlation = correlation_distance(x, y)?;
    let histogram = crate::ordinal_distance(x, y);
    Ok(0.5 * presence + 0.25 * correlation + 0.25 * histogram)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_binarizes() {
        assert_eq!(presence(&[0.0, -2.0, 3.5, 0.0]), vec![0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn presence_distance_counts_disagreements() {
        let d = presence_distance(&[1.0, 0.0, 2.0, 0.0], &[0.0, 0.0, 5.0, 1.0]).unwrap();
        assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(presence_distance(&[1.0, 2.0], &[3.0, 4.0]).unwrap(), 0.0);
    }

    #[test]
    fn correlation_distance_extremes() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [4.0, 3.0, 2.0, 1.0];
        assert!(correlation_distance(&x, &up).unwrap().abs() < 1e-12);
        assert!((correlation_distance(&x, &down).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn correlation_distance_rejects_constant() {
        assert_eq!(
            correlation_distance(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]),
            Err(DissimError::ConstantVector)
        );
    }

    #[test]
    fn inputs_are_validated() {
        assert_eq!(
            dnom(&[1.0, 2.0], &[1.0]),
            Err(DissimError::LengthMismatch { left: 2, right: 1 })
        );
        assert_eq!(dord(&[], &[]), Err(DissimError::Empty));
    }

    #[test]
    fn composites_combine_terms() {
        let x = [1.0, 0.0, 3.0, 0.0];
        let y = [2.0, 5.0, 0.0, 0.0];
        let pres = presence_distance(&x, &y).unwrap();
        let corr = correlation_distance(&x, &y).unwrap();
        let nominal = 9.0;
        // positions [0, 1, 2]: p = -1, then -6; 1*1 + 1*6
        let ordinal = 7.0;
        let expected_nom = 0.5 * pres + 0.25 * corr + 0.25 * nominal;
        let expected_ord = 0.5 * pres + 0.25 * corr + 0.25 * ordinal;
        assert!((dnom(&x, &y).unwrap() - expected_nom).abs() < 1e-12);
        assert!((dord(&x, &y).unwrap() - expected_ord).abs() < 1e-12);
        assert!((Measure::Ordinal.distance(&x, &y).unwrap() - expected_ord).abs() < 1e-12);
    }

    #[test]
    fn identical_vectors_are_at_zero() {
        let x = [0.0, 1.0, 4.0, 2.0, 0.0];
        for measure in [Measure::Presence, Measure::Correlation, Measure::Nominal, Measure::Ordinal] {
            let d = measure.distance(&x, &x).unwrap();
            assert!(d.abs() < 1e-12, "{}: {d}", measure.name());
        }
    }
}
