use std::fmt::Debug;
use std::ops::AddAssign;

use half::f16;
use num_traits::Float;

use crate::buffer::Buffer;
use crate::error::PrimGradError;
use crate::types::DType;

/// A trait representing the element types usable in primgrad CPU kernels.
///
/// Generic kernels are written once against this bound and instantiated for
/// `f16`, `f32` and `f64` by the dtype dispatch in each `_op` function.
pub trait PrimNumeric: Float + AddAssign + Debug + Send + Sync + 'static {
    /// The `DType` tag matching this element type.
    const DTYPE: DType;

    /// Borrows the typed slice out of a buffer of the matching dtype.
    fn slice(buffer: &Buffer) -> Result<&[Self], PrimGradError>;

    /// Wraps a result vector into a buffer.
    fn into_buffer(data: Vec<Self>) -> Buffer;

    /// Rounds an f64 to this type.
    fn from_f64_lossy(value: f64) -> Self;

    /// Widens to f64.
    fn as_f64(self) -> f64;
}

impl PrimNumeric for f32 {
    const DTYPE: DType = DType::F32;

    fn slice(buffer: &Buffer) -> Result<&[Self], PrimGradError> {
        Ok(buffer.try_get_cpu_f32()?.as_slice())
    }

    fn into_buffer(data: Vec<Self>) -> Buffer {
        Buffer::F32(data.into())
    }

    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl PrimNumeric for f64 {
    const DTYPE: DType = DType::F64;

    fn slice(buffer: &Buffer) -> Result<&[Self], PrimGradError> {
        Ok(buffer.try_get_cpu_f64()?.as_slice())
    }

    fn into_buffer(data: Vec<Self>) -> Buffer {
        Buffer::F64(data.into())
    }

    fn from_f64_lossy(value: f64) -> Self {
        value
    }

    fn as_f64(self) -> f64 {
        self
    }
}

impl PrimNumeric for f16 {
    const DTYPE: DType = DType::F16;

    fn slice(buffer: &Buffer) -> Result<&[Self], PrimGradError> {
        Ok(buffer.try_get_cpu_f16()?.as_slice())
    }

    fn into_buffer(data: Vec<Self>) -> Buffer {
        Buffer::F16(data.into())
    }

    fn from_f64_lossy(value: f64) -> Self {
        f16::from_f64(value)
    }

    fn as_f64(self) -> f64 {
        self.to_f64()
    }
}
