use crate::error::PrimGradError;
use crate::tensor::create::from_f64_values;
use crate::tensor::Tensor;
use crate::types::DType;

/// Converts a tensor to `new_dtype`, returning a new tensor with the converted values.
///
/// Values pass through f64, which holds every f16 and f32 exactly, so the
/// only rounding is the final one into `new_dtype`.
///
/// # Example
/// ```
/// use primgrad_core::{Tensor, DType};
/// use primgrad_core::ops::dtype::cast_op;
/// let t = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![3]).unwrap();
/// let t_f64 = cast_op(&t, DType::F64).unwrap();
/// assert_eq!(t_f64.dtype(), DType::F64);
/// ```
pub fn cast_op(tensor: &Tensor, new_dtype: DType) -> Result<Tensor, PrimGradError> {
    if tensor.dtype() == new_dtype {
        return Ok(tensor.clone()); // No-op if dtypes are the same
    }
    from_f64_values(tensor.to_f64_vec(), tensor.shape(), new_dtype)
}

#[cfg(test)]
#[path = "cast_test.rs"]
mod tests;
