use std::collections::BTreeSet;

use crate::error::PrimGradError;
use crate::ops::traits::PrimNumeric;
use crate::ops::{apply_unary_kernel, UnaryKernel};
use crate::tensor::utils::{calculate_strides, normalize_axis};
use crate::tensor::Tensor;

/// Resolves and deduplicates flip axes against `rank`.
pub fn normalize_flip_axes(axes: &[isize], rank: usize) -> Result<Vec<usize>, PrimGradError> {
    let mut resolved = BTreeSet::new();
    for &axis in axes {
        resolved.insert(normalize_axis(axis, rank)?);
    }
    Ok(resolved.into_iter().collect())
}

struct FlipKernel {
    shape: Vec<usize>,
    strides: Vec<usize>,
    axes: Vec<usize>,
}

impl UnaryKernel for FlipKernel {
    fn run<T: PrimNumeric>(&self, input: &[T]) -> Vec<T> {
        let mut output = Vec::with_capacity(input.len());
        for flat in 0..input.len() {
            let mut remaining = flat;
            let mut source = 0;
            for (dim, (&size, &stride)) in self.shape.iter().zip(self.strides.iter()).enumerate() {
                let coord = remaining / stride;
                remaining %= stride;
                let src_coord = if self.axes.contains(&dim) { size - 1 - coord } else { coord };
                source += src_coord * stride;
            }
            output.push(input[source]);
        }
        output
    }
}

/// Reverses the order of elements along each of `axes`.
///
/// Negative axes count from the end; duplicates are ignored. The result is
/// a new contiguous tensor of the same shape.
pub fn flip_op(input: &Tensor, axes: &[isize]) -> Result<Tensor, PrimGradError> {
    let shape = input.shape();
    let axes = normalize_flip_axes(axes, shape.len())?;
    let kernel = FlipKernel {
        strides: calculate_strides(&shape),
        shape: shape.clone(),
        axes,
    };
    apply_unary_kernel(input, &kernel, shape)
}

#[cfg(test)]
#[path = "flip_test.rs"]
mod tests;
