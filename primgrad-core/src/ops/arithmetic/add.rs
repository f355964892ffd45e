use crate::error::PrimGradError;
use crate::ops::traits::PrimNumeric;
use crate::ops::{apply_binary_kernel, BinaryKernel};
use crate::tensor::utils::{broadcast_shapes, calculate_strides};
use crate::tensor::Tensor;

/// Maps every flat index of `output_shape` to the flat index of a
/// broadcast source of `source_shape` (right-aligned, size-1 dims pinned to 0).
pub(crate) fn broadcast_source_indices(source_shape: &[usize], output_shape: &[usize]) -> Vec<usize> {
    let numel: usize = output_shape.iter().product();
    let out_strides = calculate_strides(output_shape);
    let src_strides = calculate_strides(source_shape);
    let rank_diff = output_shape.len() - source_shape.len();
    (0..numel)
        .map(|flat| {
            let mut remaining = flat;
            let mut source = 0;
            for (dim, &stride) in out_strides.iter().enumerate() {
                let coord = remaining / stride;
                remaining %= stride;
                if dim >= rank_diff {
                    let src_dim = dim - rank_diff;
                    if source_shape[src_dim] != 1 {
                        source += coord * src_strides[src_dim];
                    }
                }
            }
            source
        })
        .collect()
}

struct AddKernel {
    a_indices: Vec<usize>,
    b_indices: Vec<usize>,
}

impl BinaryKernel for AddKernel {
    fn run<T: PrimNumeric>(&self, a: &[T], b: &[T]) -> Vec<T> {
        self.a_indices
            .iter()
            .zip(self.b_indices.iter())
            .map(|(&ia, &ib)| a[ia] + b[ib])
            .collect()
    }
}

/// Element-wise `a + b` with NumPy broadcasting.
pub fn add_op(a: &Tensor, b: &Tensor) -> Result<Tensor, PrimGradError> {
    let (a_shape, b_shape) = (a.shape(), b.shape());
    let output_shape = broadcast_shapes(&a_shape, &b_shape)?;
    let kernel = AddKernel {
        a_indices: broadcast_source_indices(&a_shape, &output_shape),
        b_indices: broadcast_source_indices(&b_shape, &output_shape),
    };
    apply_binary_kernel(a, b, &kernel, output_shape, "add")
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
