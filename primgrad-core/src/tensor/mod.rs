// src/tensor/mod.rs

use std::fmt;
use std::sync::{Arc, RwLock};

use half::f16;

use crate::buffer::Buffer;
use crate::device::StorageDevice;
use crate::error::PrimGradError;
use crate::tensor_data::TensorData;
use crate::types::DType;

pub mod create;
pub mod utils;

pub use create::{full, rand_uniform, randn, zeros};

/// A concrete multi-dimensional array: the values fed into and fetched out
/// of an `Executor`.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally so that clones are
/// cheap and a fetched tensor can be kept alive while the executor scope
/// still holds it.
pub struct Tensor {
    /// Arc for shared ownership, RwLock for interior access to TensorData.
    pub(crate) data: Arc<RwLock<TensorData>>,
}

impl Tensor {
    /// Creates a new Tensor with the given f32 data and shape on the CPU.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, PrimGradError> {
        Self::from_buffer(Buffer::F32(Arc::new(data_vec)), shape)
    }

    /// Creates a new Tensor with the given f64 data and shape on the CPU.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, PrimGradError> {
        Self::from_buffer(Buffer::F64(Arc::new(data_vec)), shape)
    }

    /// Creates a new Tensor with the given f16 data and shape on the CPU.
    pub fn new_f16(data_vec: Vec<f16>, shape: Vec<usize>) -> Result<Self, PrimGradError> {
        Self::from_buffer(Buffer::F16(Arc::new(data_vec)), shape)
    }

    /// Creates a Tensor from an already typed buffer.
    pub fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, PrimGradError> {
        let tensor_data = TensorData::from_buffer(buffer, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Creates a Tensor that shares `buffer` under a new shape.
    pub(crate) fn from_shared_buffer(
        buffer: Arc<Buffer>,
        shape: Vec<usize>,
    ) -> Result<Self, PrimGradError> {
        let tensor_data = TensorData::from_shared(buffer, shape)?;
        Ok(Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        })
    }

    /// Returns the data type (`DType`) of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.read_data().dtype
    }

    /// Returns the device (`StorageDevice`) where the tensor's data resides.
    pub fn device(&self) -> StorageDevice {
        self.read_data().device
    }

    /// Returns a clone of the tensor's shape.
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns a clone of the tensor's strides.
    pub fn strides(&self) -> Vec<usize> {
        self.read_data().strides.clone()
    }

    /// Returns the rank (number of dimensions) of the tensor.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Acquires a read lock on the tensor's data.
    /// Panics if the RwLock is poisoned.
    pub fn read_data(&self) -> std::sync::RwLockReadGuard<'_, TensorData> {
        self.data.read().expect("RwLock poisoned")
    }

    /// Returns the shared buffer.
    pub fn buffer(&self) -> Arc<Buffer> {
        Arc::clone(&self.read_data().buffer)
    }

    /// Copies the data out as a `Vec<f32>`. Errors unless the tensor is F32.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, PrimGradError> {
        let guard = self.read_data();
        Ok(guard.buffer().try_get_cpu_f32()?.as_ref().clone())
    }

    /// Copies the data out as a `Vec<f64>`. Errors unless the tensor is F64.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, PrimGradError> {
        let guard = self.read_data();
        Ok(guard.buffer().try_get_cpu_f64()?.as_ref().clone())
    }

    /// Copies the data out as a `Vec<f16>`. Errors unless the tensor is F16.
    pub fn get_f16_data(&self) -> Result<Vec<f16>, PrimGradError> {
        let guard = self.read_data();
        Ok(guard.buffer().try_get_cpu_f16()?.as_ref().clone())
    }

    /// Widens every element to f64 regardless of dtype.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.read_data().buffer().to_f64_vec()
    }

    /// Returns true if both handles point to the same `TensorData`.
    pub fn ptr_eq(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl Clone for Tensor {
    /// Shallow clone: shares the underlying `TensorData`.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        f.debug_struct("Tensor")
            .field("shape", &guard.shape)
            .field("dtype", &guard.dtype)
            .field("device", &guard.device)
            .finish()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
