use crate::error::PrimGradError;
use crate::ops::traits::PrimNumeric;
use crate::ops::{apply_binary_kernel, BinaryKernel};
use crate::tensor::Tensor;

/// Infers the output shape of `matmul(x, y, transpose_x, transpose_y)`.
///
/// `x` has rank >= 2; its last two dims are the matrix and any leading dims
/// are batch dims. `y` is a rank-2 matrix shared by every batch.
pub fn matmul_output_shape(
    x_shape: &[usize],
    y_shape: &[usize],
    transpose_x: bool,
    transpose_y: bool,
) -> Result<Vec<usize>, PrimGradError> {
    if x_shape.len() < 2 || y_shape.len() != 2 {
        return Err(PrimGradError::UnsupportedOperation(format!(
            "matmul expects x of rank >= 2 and y of rank 2, got {:?} and {:?}",
            x_shape, y_shape
        )));
    }
    let rank = x_shape.len();
    let (m, k_x) = if transpose_x {
        (x_shape[rank - 1], x_shape[rank - 2])
    } else {
        (x_shape[rank - 2], x_shape[rank - 1])
    };
    let (k_y, n) = if transpose_y {
        (y_shape[1], y_shape[0])
    } else {
        (y_shape[0], y_shape[1])
    };
    if k_x != k_y {
        return Err(PrimGradError::IncompatibleShapes {
            shape1: x_shape.to_vec(),
            shape2: y_shape.to_vec(),
        });
    }
    let mut output = x_shape[..rank - 2].to_vec();
    output.push(m);
    output.push(n);
    Ok(output)
}

struct MatmulKernel {
    batch: usize,
    m: usize,
    k: usize,
    n: usize,
    transpose_x: bool,
    transpose_y: bool,
}

impl BinaryKernel for MatmulKernel {
    fn run<T: PrimNumeric>(&self, x: &[T], y: &[T]) -> Vec<T> {
        let (m, k, n) = (self.m, self.k, self.n);
        let mut output = vec![T::zero(); self.batch * m * n];
        for b in 0..self.batch {
            let x_base = b * m * k;
            for i in 0..m {
                for j in 0..n {
                    let mut acc = T::zero();
                    for p in 0..k {
                        let x_val = if self.transpose_x {
                            x[x_base + p * m + i]
                        } else {
                            x[x_base + i * k + p]
                        };
                        let y_val = if self.transpose_y { y[j * k + p] } else { y[p * n + j] };
                        acc += x_val * y_val;
                    }
                    output[b * m * n + i * n + j] = acc;
                }
            }
        }
        output
    }
}

/// Matrix product of `x` (optionally batched) and the matrix `y`.
///
/// # Errors
/// * `UnsupportedOperation` for unsupported ranks.
/// * `IncompatibleShapes` when the contraction dims differ.
/// * `DataTypeMismatch` if `x` and `y` have different dtypes.
pub fn matmul_op(
    x: &Tensor,
    y: &Tensor,
    transpose_x: bool,
    transpose_y: bool,
) -> Result<Tensor, PrimGradError> {
    let x_shape = x.shape();
    let output_shape = matmul_output_shape(&x_shape, &y.shape(), transpose_x, transpose_y)?;
    let rank = x_shape.len();
    let kernel = MatmulKernel {
        batch: x_shape[..rank - 2].iter().product(),
        m: output_shape[output_shape.len() - 2],
        k: if transpose_x { x_shape[rank - 2] } else { x_shape[rank - 1] },
        n: output_shape[output_shape.len() - 1],
        transpose_x,
        transpose_y,
    };
    apply_binary_kernel(x, y, &kernel, output_shape, "matmul")
}

#[cfg(test)]
#[path = "matmul_test.rs"]
mod tests;
