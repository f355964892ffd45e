use log::debug;

use crate::error::PrimGradError;
use crate::ops::cumulative::cumsum::cumsum_output_shape;
use crate::ops::cumulative::ScanKernel;
use crate::ops::{apply_unary_kernel, ensure_kernel};
use crate::tensor::utils::{normalize_axis, split_at_axis};
use crate::tensor::Tensor;

/// The monolithic gradient kernel of `cumsum`.
///
/// Given the gradient of a `cumsum(x, axis, exclusive, reverse)` output,
/// returns the gradient with respect to `x`: a single scan in the opposite
/// direction with the same exclusivity, shaped like `x`.
///
/// # Errors
/// * `ShapeMismatch` if `out_grad` is not shaped like the forward output.
/// * `InvalidAxis`, `UnsupportedKernel` as for `cumsum_op`.
pub fn cumsum_grad_op(
    out_grad: &Tensor,
    x_shape: &[usize],
    axis: Option<isize>,
    exclusive: bool,
    reverse: bool,
) -> Result<Tensor, PrimGradError> {
    ensure_kernel("cumsum_grad", out_grad)?;
    let expected = cumsum_output_shape(x_shape, axis)?;
    let grad_shape = out_grad.shape();
    if grad_shape != expected {
        return Err(PrimGradError::ShapeMismatch {
            expected,
            actual: grad_shape,
            operation: "cumsum_grad".to_string(),
        });
    }
    let (outer, len, inner) = match axis {
        None => (1, expected[0], 1),
        Some(axis) => split_at_axis(x_shape, normalize_axis(axis, x_shape.len())?),
    };
    debug!("cumsum_grad: x shape {:?} axis {:?}", x_shape, axis);
    let kernel = ScanKernel {
        outer,
        len,
        inner,
        exclusive,
        reverse: !reverse,
    };
    apply_unary_kernel(out_grad, &kernel, x_shape.to_vec())
}

#[cfg(test)]
#[path = "cumsum_grad_test.rs"]
mod tests;
