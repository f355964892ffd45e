use std::fmt;

use primgrad_core::DType;

use crate::tolerance::Tolerance;

/// Element-wise difference statistics of two equally shaped arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffStats {
    pub total: usize,
    pub mismatched: usize,
    pub max_abs_diff: f64,
    /// `|a - d| / |d|`, infinite where `d == 0` and `a != d`.
    pub max_rel_diff: f64,
    /// Flat index of the first element outside tolerance.
    pub first_mismatch: Option<usize>,
}

/// Why an allclose check failed.
#[derive(Debug, Clone, PartialEq)]
pub enum MismatchReport {
    Shape {
        actual: Vec<usize>,
        desired: Vec<usize>,
    },
    Values {
        dtype: DType,
        tolerance: Tolerance,
        stats: DiffStats,
    },
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReport::Shape { actual, desired } => {
                write!(f, "(shapes {:?}, {:?} mismatch)", actual, desired)
            }
            MismatchReport::Values {
                dtype,
                tolerance,
                stats,
            } => {
                writeln!(
                    f,
                    "Not equal to tolerance rtol={:e}, atol={:e} ({})",
                    tolerance.rtol, tolerance.atol, dtype
                )?;
                let percent = if stats.total == 0 {
                    0.0
                } else {
                    100.0 * stats.mismatched as f64 / stats.total as f64
                };
                writeln!(
                    f,
                    "Mismatched elements: {} / {} ({:.3}%)",
                    stats.mismatched, stats.total, percent
                )?;
                if let Some(index) = stats.first_mismatch {
                    writeln!(f, "First mismatch at flat index {}", index)?;
                }
                writeln!(f, "Max absolute difference: {:e}", stats.max_abs_diff)?;
                write!(f, "Max relative difference: {:e}", stats.max_rel_diff)
            }
        }
    }
}

/// Summary of a comparison that passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonReport {
    pub scenario: String,
    pub dtype: DType,
    pub shape: Vec<usize>,
    pub tolerance: Tolerance,
    pub stats: DiffStats,
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:?}: {} elements, max abs diff {:e}, max rel diff {:e} (atol={:e}, rtol={:e})",
            self.scenario,
            self.dtype,
            self.shape,
            self.stats.total,
            self.stats.max_abs_diff,
            self.stats.max_rel_diff,
            self.tolerance.atol,
            self.tolerance.rtol
        )
    }
}

/// Result of one harness comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Passed(ComparisonReport),
    /// The device/dtype combination is not supported; counts as success.
    Skipped { reason: String },
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    pub fn report(&self) -> Option<&ComparisonReport> {
        match self {
            Outcome::Passed(report) => Some(report),
            Outcome::Skipped { .. } => None,
        }
    }
}
