use crate::error::PrimGradError;
use crate::tensor::Tensor;

/// Returns `input` viewed under `shape`, sharing its buffer.
///
/// # Errors
/// `ShapeMismatch` if the element counts differ.
pub fn reshape_op(input: &Tensor, shape: &[usize]) -> Result<Tensor, PrimGradError> {
    let input_shape = input.shape();
    let numel: usize = shape.iter().product();
    if numel != input.numel() {
        return Err(PrimGradError::ShapeMismatch {
            expected: input_shape,
            actual: shape.to_vec(),
            operation: "reshape".to_string(),
        });
    }
    Tensor::from_shared_buffer(input.buffer(), shape.to_vec())
}
