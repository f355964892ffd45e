// src/ops/cumulative/mod.rs
// Scans along one axis (cumulative sum and its gradient kernel).

pub mod cumsum;
pub mod cumsum_grad;

pub use cumsum::cumsum_op;
pub use cumsum_grad::cumsum_grad_op;

use crate::ops::traits::PrimNumeric;
use crate::ops::UnaryKernel;

/// Inclusive or exclusive running sum along the middle axis of an
/// `(outer, len, inner)` view, in either direction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScanKernel {
    pub(crate) outer: usize,
    pub(crate) len: usize,
    pub(crate) inner: usize,
    pub(crate) exclusive: bool,
    pub(crate) reverse: bool,
}

impl UnaryKernel for ScanKernel {
    fn run<T: PrimNumeric>(&self, input: &[T]) -> Vec<T> {
        let mut output = vec![T::zero(); input.len()];
        for o in 0..self.outer {
            for i in 0..self.inner {
                let base = o * self.len * self.inner + i;
                let mut acc = T::zero();
                for step in 0..self.len {
                    let k = if self.reverse { self.len - 1 - step } else { step };
                    let idx = base + k * self.inner;
                    if self.exclusive {
                        output[idx] = acc;
                        acc += input[idx];
                    } else {
                        acc += input[idx];
                        output[idx] = acc;
                    }
                }
            }
        }
        output
    }
}
