// src/tensor/create.rs

use half::f16;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rand_distr::Normal;

use crate::buffer::Buffer;
use crate::error::PrimGradError;
use crate::ops::traits::PrimNumeric;
use crate::tensor::Tensor;
use crate::types::DType;

/// Builds a tensor of `dtype` from f64 values, rounding each to the target type.
pub fn from_f64_values(values: Vec<f64>, shape: Vec<usize>, dtype: DType) -> Result<Tensor, PrimGradError> {
    let buffer = match dtype {
        DType::F16 => convert::<f16>(&values),
        DType::F32 => convert::<f32>(&values),
        DType::F64 => Buffer::F64(values.into()),
    };
    Tensor::from_buffer(buffer, shape)
}

fn convert<T: PrimNumeric>(values: &[f64]) -> Buffer {
    T::into_buffer(values.iter().map(|&v| T::from_f64_lossy(v)).collect())
}

/// Creates a new tensor of `dtype` filled with zeros.
pub fn zeros(shape: &[usize], dtype: DType) -> Result<Tensor, PrimGradError> {
    full(shape, dtype, 0.0)
}

/// Creates a new tensor of `dtype` filled with `value`.
pub fn full(shape: &[usize], dtype: DType, value: f64) -> Result<Tensor, PrimGradError> {
    let numel = shape.iter().product();
    from_f64_values(vec![value; numel], shape.to_vec(), dtype)
}

/// Samples `U[low, high)` in f64, then casts to `dtype`.
///
/// Sampling in f64 first keeps an F16/F32 case and its F64 counterpart
/// built from the same seed element-wise identical up to rounding.
pub fn rand_uniform<R: Rng + ?Sized>(
    shape: &[usize],
    dtype: DType,
    low: f64,
    high: f64,
    rng: &mut R,
) -> Result<Tensor, PrimGradError> {
    if !(low < high) {
        return Err(PrimGradError::UnsupportedOperation(format!(
            "rand_uniform requires low < high, got [{}, {})",
            low, high
        )));
    }
    let numel: usize = shape.iter().product();
    let dist = Uniform::new(low, high);
    let values: Vec<f64> = (0..numel).map(|_| dist.sample(rng)).collect();
    from_f64_values(values, shape.to_vec(), dtype)
}

/// Samples `N(mean, std^2)` in f64, then casts to `dtype`.
pub fn randn<R: Rng + ?Sized>(
    shape: &[usize],
    dtype: DType,
    mean: f64,
    std: f64,
    rng: &mut R,
) -> Result<Tensor, PrimGradError> {
    if !(std > 0.0) {
        return Err(PrimGradError::UnsupportedOperation(format!(
            "randn requires std > 0, got {}",
            std
        )));
    }
    let dist = Normal::new(mean, std).map_err(|e| {
        PrimGradError::UnsupportedOperation(format!("randn with std {}: {}", std, e))
    })?;
    let numel: usize = shape.iter().product();
    let values: Vec<f64> = (0..numel).map(|_| dist.sample(rng)).collect();
    from_f64_values(values, shape.to_vec(), dtype)
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
