use crate::error::PrimGradError;
use crate::ops::arithmetic::add::broadcast_source_indices;
use crate::ops::traits::PrimNumeric;
use crate::ops::{apply_unary_kernel, UnaryKernel};
use crate::tensor::utils::broadcast_shapes;
use crate::tensor::Tensor;

struct SumToKernel {
    target_indices: Vec<usize>,
    target_numel: usize,
}

impl UnaryKernel for SumToKernel {
    fn run<T: PrimNumeric>(&self, input: &[T]) -> Vec<T> {
        let mut output = vec![T::zero(); self.target_numel];
        for (value, &target) in input.iter().zip(self.target_indices.iter()) {
            output[target] += *value;
        }
        output
    }
}

/// Sums `input` down to `shape`, the inverse of broadcasting `shape` up to
/// `input.shape()`.
///
/// Used to reduce the gradient of a broadcast operand back to that operand's
/// shape.
///
/// # Errors
/// `ShapeMismatch` if `shape` does not broadcast to the input shape.
pub fn sum_to_op(input: &Tensor, shape: &[usize]) -> Result<Tensor, PrimGradError> {
    let input_shape = input.shape();
    match broadcast_shapes(shape, &input_shape) {
        Ok(ref broadcast) if *broadcast == input_shape => {}
        _ => {
            return Err(PrimGradError::ShapeMismatch {
                expected: input_shape,
                actual: shape.to_vec(),
                operation: "sum_to".to_string(),
            })
        }
    }
    let kernel = SumToKernel {
        target_indices: broadcast_source_indices(shape, &input_shape),
        target_numel: shape.iter().product(),
    };
    apply_unary_kernel(input, &kernel, shape.to_vec())
}

#[cfg(test)]
#[path = "sum_test.rs"]
mod tests;
