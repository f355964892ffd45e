use log::debug;

use crate::error::PrimGradError;
use crate::ops::cumulative::ScanKernel;
use crate::ops::{apply_unary_kernel, ensure_kernel};
use crate::tensor::utils::{normalize_axis, split_at_axis};
use crate::tensor::Tensor;

/// Output shape of `cumsum`: `[numel]` when flattening, otherwise unchanged.
pub fn cumsum_output_shape(
    input_shape: &[usize],
    axis: Option<isize>,
) -> Result<Vec<usize>, PrimGradError> {
    match axis {
        None => Ok(vec![input_shape.iter().product()]),
        Some(axis) => {
            normalize_axis(axis, input_shape.len())?;
            Ok(input_shape.to_vec())
        }
    }
}

/// Computes the cumulative sum of `input` along `axis`.
///
/// # Arguments
/// * `input`: The tensor to scan.
/// * `axis`: The axis to scan along; negative values count from the end.
///   `None` flattens the input first and returns a 1-D tensor.
/// * `exclusive`: When true each output excludes its own element, so the
///   first element of every scan is zero.
/// * `reverse`: When true the scan runs from the last element to the first.
///
/// # Errors
/// * `InvalidAxis` if `axis` is out of range.
/// * `UnsupportedKernel` for float16 inputs (no CPU kernel).
pub fn cumsum_op(
    input: &Tensor,
    axis: Option<isize>,
    exclusive: bool,
    reverse: bool,
) -> Result<Tensor, PrimGradError> {
    ensure_kernel("cumsum", input)?;
    let input_shape = input.shape();
    let output_shape = cumsum_output_shape(&input_shape, axis)?;
    let (outer, len, inner) = match axis {
        None => (1, output_shape[0], 1),
        Some(axis) => split_at_axis(&input_shape, normalize_axis(axis, input_shape.len())?),
    };
    debug!(
        "cumsum: shape {:?} axis {:?} exclusive={} reverse={}",
        input_shape, axis, exclusive, reverse
    );
    let kernel = ScanKernel {
        outer,
        len,
        inner,
        exclusive,
        reverse,
    };
    apply_unary_kernel(input, &kernel, output_shape)
}

#[cfg(test)]
#[path = "cumsum_test.rs"]
mod tests;
