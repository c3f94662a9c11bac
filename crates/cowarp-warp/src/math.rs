//! Stateless numeric helpers shared by the planner, the DP and the resampler.

use std::ops::{Add, Sub};

/// Running sum: `out[i] == v[0] + ... + v[i]`. Output length equals input length.
#[must_use]
pub fn cumsum<T>(v: &[T]) -> Vec<T>
where
    T: Copy + Add<Output = T>,
{
    let mut out = Vec::with_capacity(v.len());
    let mut iter = v.iter().copied();
    if let Some(first) = iter.next() {
        let mut acc = first;
        out.push(acc);
        for x in iter {
            acc = acc + x;
            out.push(acc);
        }
    }
    out
}

/// Discrete derivative: `out[i] == v[i + 1] - v[i]`, one element shorter than `v`.
///
/// Inputs with fewer than two elements yield an empty vector.
#[must_use]
pub fn diff<T>(v: &[T]) -> Vec<T>
where
    T: Copy + Sub<Output = T>,
{
    v.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Elementwise `y - x`.
///
/// # Panics
///
/// Panics if `x` and `y` differ in length.
#[must_use]
pub fn vector_diff<T>(x: &[T], y: &[T]) -> Vec<T>
where
    T: Copy + Sub<Output = T>,
{
    assert_eq!(x.len(), y.len(), "vector_diff operands must have equal length");
    x.iter().zip(y).map(|(&a, &b)| b - a).collect()
}

/// Euclidean norm.
#[must_use]
pub fn norm2(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Binary search over an ascending slice.
///
/// Returns the index of an element equal to `value`, otherwise the index of
/// the last element strictly below it. `None` when `value` is below `sorted[0]`
/// or the slice is empty.
#[must_use]
pub fn binary_search(sorted: &[f64], value: f64) -> Option<usize> {
    let mut lo = 0_usize;
    let mut hi = sorted.len();
    // invariant: sorted[..lo] < value, sorted[hi..] > value
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if value < sorted[mid] {
            hi = mid;
        } else if value > sorted[mid] {
            lo = mid + 1;
        } else {
            return Some(mid);
        }
    }
    lo.checked_sub(1)
}

/// Locate the bin of `x` among ascending `edges`.
///
/// Returns `i` with `edges[i] <= x`, and `x <= edges[i + 1]` whenever `i` is not
/// the last index. `None` when `x` lies outside `[edges[0], edges[last]]`.
#[must_use]
pub fn find_bin(edges: &[f64], x: f64) -> Option<usize> {
    let (first, last) = (edges.first()?, edges.last()?);
    if x < *first || x > *last {
        return None;
    }
    binary_search(edges, x)
}

/// Quick 1-D linear interpolation of `(x, y)` at `xi`.
///
/// `x` must be ascending and the same length as `y`. Exact at grid points.
/// Returns `None` when `xi` is outside `[x[0], x[last]]`.
///
/// # Panics
///
/// Panics if `x` and `y` differ in length.
#[must_use]
pub fn interp1q(x: &[f64], y: &[f64], xi: f64) -> Option<f64> {
    assert_eq!(x.len(), y.len(), "interp1q grid and values must have equal length");
    let bin = find_bin(x, xi)?;
    if x.len() == 1 {
        return Some(y[0]);
    }
    let r = bin.min(x.len() - 2);
    let u = (xi - x[r]) / (x[r + 1] - x[r]);
    Some(y[r] + (y[r + 1] - y[r]) * u)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumsum_matches_prefix_sums() {
        let v = [1.0, -2.0, 3.5, 0.5];
        let c = cumsum(&v);
        assert_eq!(c.len(), v.len());
        for i in 0..v.len() {
            let expected: f64 = v[..=i].iter().sum();
            assert!((c[i] - expected).abs() < 1e-12, "cumsum[{i}] = {}", c[i]);
        }
    }

    #[test]
    fn cumsum_integers_and_empty() {
        assert_eq!(cumsum(&[1_i64, 9, 9, 9]), vec![1, 10, 19, 28]);
        assert!(cumsum::<f64>(&[]).is_empty());
    }

    #[test]
    fn diff_is_forward_difference() {
        let v = [1.0, 4.0, 9.0, 16.0];
        let d = diff(&v);
        assert_eq!(d.len(), v.len() - 1);
        assert_eq!(d, vec![3.0, 5.0, 7.0]);
        assert!(diff(&[2.0]).is_empty());
    }

    #[test]
    fn vector_diff_is_y_minus_x() {
        assert_eq!(vector_diff(&[1_i64, 2, 3], &[4, 4, 4]), vec![3, 2, 1]);
    }

    #[test]
    #[should_panic(expected = "equal length")]
    fn vector_diff_length_mismatch_panics() {
        let _ = vector_diff(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn norm2_pythagoras() {
        assert!((norm2(&[3.0, 4.0]) - 5.0).abs() < 1e-12);
        assert_eq!(norm2(&[]), 0.0);
    }

    #[test]
    fn binary_search_exact_and_between() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(binary_search(&v, 3.0), Some(2));
        assert_eq!(binary_search(&v, 2.5), Some(1));
        assert_eq!(binary_search(&v, 9.0), Some(3));
        assert_eq!(binary_search(&v, 0.5), None);
    }

    #[test]
    fn find_bin_brackets_value() {
        let v = [0.0, 0.5, 2.0, 7.0, 7.5];
        for &x in &[0.0, 0.1, 0.5, 1.9, 2.0, 6.0, 7.2] {
            let i = find_bin(&v, x).unwrap();
            assert!(v[i] <= x && x <= v[i + 1], "x = {x} got bin {i}");
        }
        assert_eq!(find_bin(&v, 7.5), Some(4));
    }

    #[test]
    fn find_bin_out_of_range() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(find_bin(&v, 0.999), None);
        assert_eq!(find_bin(&v, 3.001), None);
        assert_eq!(find_bin(&[], 1.0), None);
    }

    #[test]
    fn interp1q_exact_at_grid_points() {
        let x = [1.0, 2.0, 4.0, 8.0];
        let y = [10.0, -3.0, 7.5, 0.25];
        for i in 0..x.len() {
            assert_eq!(interp1q(&x, &y, x[i]), Some(y[i]));
        }
    }

    #[test]
    fn interp1q_linear_between_points() {
        let x = [1.0, 2.0, 3.0];
        let y = [0.0, 10.0, 30.0];
        assert!((interp1q(&x, &y, 1.5).unwrap() - 5.0).abs() < 1e-12);
        assert!((interp1q(&x, &y, 2.25).unwrap() - 15.0).abs() < 1e-12);
    }

    #[test]
    fn interp1q_out_of_domain_is_none() {
        let x = [1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0];
        assert_eq!(interp1q(&x, &y, 0.0), None);
        assert_eq!(interp1q(&x, &y, 3.5), None);
    }

    #[test]
    fn interp1q_single_point_grid() {
        assert_eq!(interp1q(&[1.0], &[42.0], 1.0), Some(42.0));
        assert_eq!(interp1q(&[1.0], &[42.0], 1.5), None);
    }
}
