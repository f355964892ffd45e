use crate::error::PrimGradError;
use crate::static_graph::op_kind::OpKind;
use crate::types::DType;

/// How a parameter is filled by its startup-program op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Initializer {
    /// Every element set to the value.
    Constant(f64),
    /// Uniform in `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Uniform in `[-limit, limit)` with `limit = sqrt(6 / (fan_in + fan_out))`.
    XavierUniform,
    Normal { mean: f64, std: f64 },
}

impl Initializer {
    /// Builds the creation op filling a parameter of `shape` and `dtype`.
    ///
    /// `seed == 0` leaves the random ops unseeded.
    pub(crate) fn to_op_kind(&self, shape: &[usize], dtype: DType, seed: u64) -> Result<OpKind, PrimGradError> {
        let shape = shape.to_vec();
        match *self {
            Initializer::Constant(value) => Ok(OpKind::FillConstant { shape, dtype, value }),
            Initializer::Uniform { low, high } => {
                if !(low < high) {
                    return Err(PrimGradError::UnsupportedOperation(format!(
                        "uniform initializer requires low < high, got [{}, {})",
                        low, high
                    )));
                }
                Ok(OpKind::UniformRandom {
                    shape,
                    dtype,
                    min: low,
                    max: high,
                    seed,
                })
            }
            Initializer::XavierUniform => {
                let (fan_in, fan_out) = fans(&shape)?;
                let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
                Ok(OpKind::UniformRandom {
                    shape,
                    dtype,
                    min: -limit,
                    max: limit,
                    seed,
                })
            }
            Initializer::Normal { mean, std } => {
                if !(std > 0.0) {
                    return Err(PrimGradError::UnsupportedOperation(format!(
                        "normal initializer requires std > 0, got {}",
                        std
                    )));
                }
                Ok(OpKind::GaussianRandom {
                    shape,
                    dtype,
                    mean,
                    std,
                    seed,
                })
            }
        }
    }
}

/// Fan-in and fan-out of a `[in, out, ...]` parameter. A 1-D shape uses its
/// length for both.
fn fans(shape: &[usize]) -> Result<(usize, usize), PrimGradError> {
    let (fan_in, fan_out) = match shape {
        [] => {
            return Err(PrimGradError::UnsupportedOperation(
                "xavier initializer requires a parameter of rank >= 1".to_string(),
            ))
        }
        [n] => (*n, *n),
        [rows, cols, rest @ ..] => {
            let receptive: usize = rest.iter().product();
            (rows * receptive, cols * receptive)
        }
    };
    if fan_in + fan_out == 0 {
        return Err(PrimGradError::UnsupportedOperation(
            "xavier initializer requires a non-empty parameter".to_string(),
        ));
    }
    Ok((fan_in, fan_out))
}

#[cfg(test)]
#[path = "init_test.rs"]
mod tests;
