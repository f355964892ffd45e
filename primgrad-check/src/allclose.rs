use primgrad_core::Tensor;

use crate::report::{DiffStats, MismatchReport};
use crate::tolerance::Tolerance;

/// `|actual - desired| <= atol + rtol * |desired|`, with NaNs equal to each
/// other and infinities equal only to the same infinity.
pub fn is_close(actual: f64, desired: f64, tolerance: Tolerance) -> bool {
    if actual.is_nan() || desired.is_nan() {
        return actual.is_nan() && desired.is_nan();
    }
    if actual.is_infinite() || desired.is_infinite() {
        return actual == desired;
    }
    (actual - desired).abs() <= tolerance.atol + tolerance.rtol * desired.abs()
}

/// Difference statistics of two flat arrays of the same length.
pub fn diff_stats(actual: &[f64], desired: &[f64], tolerance: Tolerance) -> DiffStats {
    let mut stats = DiffStats {
        total: desired.len(),
        mismatched: 0,
        max_abs_diff: 0.0,
        max_rel_diff: 0.0,
        first_mismatch: None,
    };
    for (i, (&a, &d)) in actual.iter().zip(desired.iter()).enumerate() {
        if !is_close(a, d, tolerance) {
            stats.mismatched += 1;
            stats.first_mismatch.get_or_insert(i);
        }
        if a.is_nan() || d.is_nan() || a == d {
            continue;
        }
        let abs_diff = (a - d).abs();
        let rel_diff = if d == 0.0 { f64::INFINITY } else { abs_diff / d.abs() };
        stats.max_abs_diff = stats.max_abs_diff.max(abs_diff);
        stats.max_rel_diff = stats.max_rel_diff.max(rel_diff);
    }
    stats
}

/// Checks `actual` against `desired` element-wise.
///
/// Shapes must be equal. Values are compared in f64 after widening, so an
/// F16 or F32 pair is judged on its exact stored values.
///
/// # Errors
/// A `MismatchReport` describing the shape mismatch or the elements outside
/// tolerance.
pub fn assert_allclose(actual: &Tensor, desired: &Tensor, tolerance: Tolerance) -> Result<DiffStats, MismatchReport> {
    if actual.shape() != desired.shape() {
        return Err(MismatchReport::Shape {
            actual: actual.shape(),
            desired: desired.shape(),
        });
    }
    let stats = diff_stats(&actual.to_f64_vec(), &desired.to_f64_vec(), tolerance);
    if stats.mismatched > 0 {
        Err(MismatchReport::Values {
            dtype: desired.dtype(),
            tolerance,
            stats,
        })
    } else {
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "allclose_test.rs"]
mod tests;
