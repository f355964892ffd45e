//! # Tensor Operations Module (`ops`)
//!
//! CPU kernels executed by the [`Executor`](../static_graph/executor/struct.Executor.html).
//! Every static-graph `OpKind` maps onto one `_op` function here.
//!
//! ## Structure:
//!
//! - **`_op` Functions:** the public entry point of each operation. They
//!   validate shapes, check that a kernel exists for the input dtype on the
//!   device, and dispatch on `DType` to a generic kernel.
//! - **Kernels:** private generic functions bounded by
//!   [`PrimNumeric`](traits/numeric/trait.PrimNumeric.html), instantiated for
//!   `f16`, `f32` and `f64`.
//! - Unlike an eager engine there are no `Backward` structs here: gradients
//!   are graph rewrites built by `static_graph::backward`.
//!
//! ## Key Submodules:
//!
//! - [`cumulative`]: cumulative sum and its monolithic gradient kernel.
//! - [`view`]: flip and reshape.
//! - [`linalg`]: matmul.
//! - [`arithmetic`]: broadcasting add.
//! - [`reduction`]: sum back to a broadcast source shape.
//! - [`dtype`]: cast.

use half::f16;

use crate::buffer::Buffer;
use crate::device::StorageDevice;
use crate::error::PrimGradError;
use crate::tensor::Tensor;
use crate::types::DType;

pub mod traits;

pub mod arithmetic;
pub mod cumulative;
pub mod dtype;
pub mod linalg;
pub mod reduction;
pub mod view;

use traits::PrimNumeric;

/// Op types whose CPU kernels are not instantiated for float16.
const CPU_F16_UNSUPPORTED: &[&str] = &["cumsum", "cumsum_grad"];

/// Returns whether a kernel for `op_type` exists for `dtype` on `device`.
pub fn has_kernel(op_type: &str, dtype: DType, device: StorageDevice) -> bool {
    match device {
        StorageDevice::GPU => false,
        StorageDevice::CPU => !(dtype == DType::F16 && CPU_F16_UNSUPPORTED.contains(&op_type)),
    }
}

/// Errors with `UnsupportedKernel` when `has_kernel` is false.
pub(crate) fn ensure_kernel(op_type: &str, tensor: &Tensor) -> Result<(), PrimGradError> {
    let (dtype, device) = (tensor.dtype(), tensor.device());
    if has_kernel(op_type, dtype, device) {
        Ok(())
    } else {
        Err(PrimGradError::UnsupportedKernel {
            op: op_type.to_string(),
            dtype,
            device,
        })
    }
}

/// A kernel over one input slice, written once for every `PrimNumeric`.
pub(crate) trait UnaryKernel {
    fn run<T: PrimNumeric>(&self, input: &[T]) -> Vec<T>;
}

/// A kernel over two input slices of the same dtype.
pub(crate) trait BinaryKernel {
    fn run<T: PrimNumeric>(&self, a: &[T], b: &[T]) -> Vec<T>;
}

fn unary_typed<T: PrimNumeric, K: UnaryKernel>(buffer: &Buffer, kernel: &K) -> Result<Buffer, PrimGradError> {
    let input = T::slice(buffer)?;
    Ok(T::into_buffer(kernel.run(input)))
}

fn binary_typed<T: PrimNumeric, K: BinaryKernel>(
    a: &Buffer,
    b: &Buffer,
    kernel: &K,
) -> Result<Buffer, PrimGradError> {
    Ok(T::into_buffer(kernel.run(T::slice(a)?, T::slice(b)?)))
}

/// Runs `kernel` on `a`'s data after a DType dispatch and wraps the result.
pub(crate) fn apply_unary_kernel<K: UnaryKernel>(
    a: &Tensor,
    kernel: &K,
    output_shape: Vec<usize>,
) -> Result<Tensor, PrimGradError> {
    let buffer = a.buffer();
    let output = match a.dtype() {
        DType::F16 => unary_typed::<f16, K>(&buffer, kernel)?,
        DType::F32 => unary_typed::<f32, K>(&buffer, kernel)?,
        DType::F64 => unary_typed::<f64, K>(&buffer, kernel)?,
    };
    Tensor::from_buffer(output, output_shape)
}

/// Binary counterpart of `apply_unary_kernel`. Both inputs must share a dtype.
pub(crate) fn apply_binary_kernel<K: BinaryKernel>(
    a: &Tensor,
    b: &Tensor,
    kernel: &K,
    output_shape: Vec<usize>,
    op_name: &str,
) -> Result<Tensor, PrimGradError> {
    if a.dtype() != b.dtype() {
        return Err(PrimGradError::DataTypeMismatch {
            expected: a.dtype(),
            actual: b.dtype(),
            operation: op_name.to_string(),
        });
    }
    let (a_buffer, b_buffer) = (a.buffer(), b.buffer());
    let output = match a.dtype() {
        DType::F16 => binary_typed::<f16, K>(&a_buffer, &b_buffer, kernel)?,
        DType::F32 => binary_typed::<f32, K>(&a_buffer, &b_buffer, kernel)?,
        DType::F64 => binary_typed::<f64, K>(&a_buffer, &b_buffer, kernel)?,
    };
    Tensor::from_buffer(output, output_shape)
}
