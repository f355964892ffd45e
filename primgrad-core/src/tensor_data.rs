// src/tensor_data.rs
use std::fmt::Debug;
use std::sync::Arc;

use crate::buffer::Buffer;
use crate::device::StorageDevice;
use crate::error::PrimGradError;
use crate::tensor::utils::calculate_strides;
use crate::types::DType;

/// Internal storage and metadata for a Tensor.
///
/// Holds the typed buffer, shape, contiguous strides, device and dtype.
/// Wrapped in `Arc<RwLock<TensorData>>` by `Tensor` so fetched values and
/// scope entries share one allocation.
#[derive(Debug)]
pub struct TensorData {
    /// The underlying typed buffer, shared between tensors that alias it.
    pub(crate) buffer: Arc<Buffer>,
    /// The device where the buffer resides.
    pub(crate) device: StorageDevice,
    /// The data type of the elements in the buffer.
    pub(crate) dtype: DType,
    /// The shape (dimensions) of the tensor.
    pub(crate) shape: Vec<usize>,
    /// Row-major strides. Tensors are always contiguous.
    pub(crate) strides: Vec<usize>,
}

impl TensorData {
    /// Creates a new `TensorData` on the CPU from a typed buffer and shape.
    ///
    /// # Errors
    /// Returns `PrimGradError::TensorCreationError` if the buffer length does not
    /// match the number of elements of `shape`.
    pub fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, PrimGradError> {
        let numel: usize = shape.iter().product();
        let data_len = buffer.len();
        if data_len != numel {
            return Err(PrimGradError::TensorCreationError { data_len, shape });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            dtype: buffer.dtype(),
            buffer: Arc::new(buffer),
            device: StorageDevice::CPU,
            shape,
            strides,
        })
    }

    /// Same as `from_buffer` but shares an existing buffer.
    pub(crate) fn from_shared(
        buffer: Arc<Buffer>,
        shape: Vec<usize>,
    ) -> Result<Self, PrimGradError> {
        let numel: usize = shape.iter().product();
        if buffer.len() != numel {
            return Err(PrimGradError::TensorCreationError {
                data_len: buffer.len(),
                shape,
            });
        }
        let strides = calculate_strides(&shape);
        Ok(TensorData {
            dtype: buffer.dtype(),
            buffer,
            device: StorageDevice::CPU,
            shape,
            strides,
        })
    }

    /// Provides immutable access to the underlying shared data buffer.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}
