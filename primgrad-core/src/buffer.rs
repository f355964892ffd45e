use std::fmt::Debug;
use std::sync::Arc;

use half::f16;

use crate::error::PrimGradError;
use crate::types::DType;

/// Typed CPU storage for tensor elements.
///
/// The vectors are wrapped in `Arc` so tensors produced by no-op kernels
/// (same-dtype cast, identity reshape) can share storage.
#[derive(Debug, Clone)]
pub enum Buffer {
    F16(Arc<Vec<f16>>),
    F32(Arc<Vec<f32>>),
    F64(Arc<Vec<f64>>),
}

impl Buffer {
    /// The element type stored in this buffer.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F16(_) => DType::F16,
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            Buffer::F16(data) => data.len(),
            Buffer::F32(data) => data.len(),
            Buffer::F64(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to get a reference to the underlying f32 data.
    ///
    /// Returns an error if the buffer holds another type.
    pub fn try_get_cpu_f32(&self) -> Result<&Arc<Vec<f32>>, PrimGradError> {
        match self {
            Buffer::F32(data_arc) => Ok(data_arc),
            other => Err(type_mismatch(DType::F32, other.dtype(), "try_get_cpu_f32")),
        }
    }

    /// Attempts to get a reference to the underlying f64 data.
    pub fn try_get_cpu_f64(&self) -> Result<&Arc<Vec<f64>>, PrimGradError> {
        match self {
            Buffer::F64(data_arc) => Ok(data_arc),
            other => Err(type_mismatch(DType::F64, other.dtype(), "try_get_cpu_f64")),
        }
    }

    /// Attempts to get a reference to the underlying f16 data.
    pub fn try_get_cpu_f16(&self) -> Result<&Arc<Vec<f16>>, PrimGradError> {
        match self {
            Buffer::F16(data_arc) => Ok(data_arc),
            other => Err(type_mismatch(DType::F16, other.dtype(), "try_get_cpu_f16")),
        }
    }

    /// Copies every element out as f64, whatever the stored type.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Buffer::F16(data) => data.iter().map(|&v| v.to_f64()).collect(),
            Buffer::F32(data) => data.iter().map(|&v| v as f64).collect(),
            Buffer::F64(data) => data.as_ref().clone(),
        }
    }
}

fn type_mismatch(expected: DType, actual: DType, operation: &str) -> PrimGradError {
    PrimGradError::DataTypeMismatch {
        expected,
        actual,
        operation: operation.to_string(),
    }
}
