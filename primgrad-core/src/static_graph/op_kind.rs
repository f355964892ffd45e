use crate::error::PrimGradError;
use crate::ops::cumulative::cumsum::cumsum_output_shape;
use crate::ops::linalg::matmul_output_shape;
use crate::ops::view::flip::normalize_flip_axes;
use crate::tensor::utils::broadcast_shapes;
use crate::types::DType;

/// The operation an `OpDesc` performs, with its attributes.
///
/// Every op has exactly one output.
#[derive(Debug, Clone, PartialEq)]
pub enum OpKind {
    /// Cumulative sum. `axis: None` flattens first.
    Cumsum {
        axis: Option<isize>,
        exclusive: bool,
        reverse: bool,
    },
    /// Monolithic gradient kernel of `Cumsum`; input is the output gradient.
    CumsumGrad {
        x_shape: Vec<usize>,
        axis: Option<isize>,
        exclusive: bool,
        reverse: bool,
    },
    Flip { axes: Vec<isize> },
    Reshape { shape: Vec<usize> },
    Matmul { transpose_x: bool, transpose_y: bool },
    /// Broadcasting element-wise addition.
    Add,
    /// Sums a broadcast tensor back down to `shape`.
    SumTo { shape: Vec<usize> },
    Cast { dtype: DType },
    /// A tensor shaped and typed like the input, filled with `value`.
    FillAnyLike { value: f64 },
    FillConstant {
        shape: Vec<usize>,
        dtype: DType,
        value: f64,
    },
    /// `seed == 0` draws from entropy.
    UniformRandom {
        shape: Vec<usize>,
        dtype: DType,
        min: f64,
        max: f64,
        seed: u64,
    },
    GaussianRandom {
        shape: Vec<usize>,
        dtype: DType,
        mean: f64,
        std: f64,
        seed: u64,
    },
}

impl OpKind {
    /// The registered op type name, as used in kernel lookup and logs.
    pub fn op_type(&self) -> &'static str {
        match self {
            OpKind::Cumsum { .. } => "cumsum",
            OpKind::CumsumGrad { .. } => "cumsum_grad",
            OpKind::Flip { .. } => "flip",
            OpKind::Reshape { .. } => "reshape",
            OpKind::Matmul { .. } => "matmul",
            OpKind::Add => "add",
            OpKind::SumTo { .. } => "sum_to",
            OpKind::Cast { .. } => "cast",
            OpKind::FillAnyLike { .. } => "fill_any_like",
            OpKind::FillConstant { .. } => "fill_constant",
            OpKind::UniformRandom { .. } => "uniform_random",
            OpKind::GaussianRandom { .. } => "gaussian_random",
        }
    }

    /// Number of inputs the op consumes.
    pub fn num_inputs(&self) -> usize {
        match self {
            OpKind::Matmul { .. } | OpKind::Add => 2,
            OpKind::FillConstant { .. }
            | OpKind::UniformRandom { .. }
            | OpKind::GaussianRandom { .. } => 0,
            _ => 1,
        }
    }

    /// Infers the output shape and dtype from the input shapes and dtypes.
    pub fn infer_output(&self, inputs: &[(Vec<usize>, DType)]) -> Result<(Vec<usize>, DType), PrimGradError> {
        if inputs.len() != self.num_inputs() {
            return Err(PrimGradError::InternalError(format!(
                "op '{}' expects {} inputs, got {}",
                self.op_type(),
                self.num_inputs(),
                inputs.len()
            )));
        }
        match self {
            OpKind::Cumsum { axis, .. } => {
                let (shape, dtype) = &inputs[0];
                Ok((cumsum_output_shape(shape, *axis)?, *dtype))
            }
            OpKind::CumsumGrad { x_shape, axis, .. } => {
                let (shape, dtype) = &inputs[0];
                let expected = cumsum_output_shape(x_shape, *axis)?;
                if *shape != expected {
                    return Err(PrimGradError::ShapeMismatch {
                        expected,
                        actual: shape.clone(),
                        operation: "cumsum_grad".to_string(),
                    });
                }
                Ok((x_shape.clone(), *dtype))
            }
            OpKind::Flip { axes } => {
                let (shape, dtype) = &inputs[0];
                normalize_flip_axes(axes, shape.len())?;
                Ok((shape.clone(), *dtype))
            }
            OpKind::Reshape { shape: target } => {
                let (shape, dtype) = &inputs[0];
                if shape.iter().product::<usize>() != target.iter().product::<usize>() {
                    return Err(PrimGradError::ShapeMismatch {
                        expected: shape.clone(),
                        actual: target.clone(),
                        operation: "reshape".to_string(),
                    });
                }
                Ok((target.clone(), *dtype))
            }
            OpKind::Matmul {
                transpose_x,
                transpose_y,
            } => {
                let dtype = same_dtype(inputs, "matmul")?;
                let shape = matmul_output_shape(&inputs[0].0, &inputs[1].0, *transpose_x, *transpose_y)?;
                Ok((shape, dtype))
            }
            OpKind::Add => {
                let dtype = same_dtype(inputs, "add")?;
                Ok((broadcast_shapes(&inputs[0].0, &inputs[1].0)?, dtype))
            }
            OpKind::SumTo { shape: target } => {
                let (shape, dtype) = &inputs[0];
                match broadcast_shapes(target, shape) {
                    Ok(ref broadcast) if broadcast == shape => Ok((target.clone(), *dtype)),
                    _ => Err(PrimGradError::ShapeMismatch {
                        expected: shape.clone(),
                        actual: target.clone(),
                        operation: "sum_to".to_string(),
                    }),
                }
            }
            OpKind::Cast { dtype } => Ok((inputs[0].0.clone(), *dtype)),
            OpKind::FillAnyLike { .. } => Ok(inputs[0].clone()),
            OpKind::FillConstant { shape, dtype, .. }
            | OpKind::UniformRandom { shape, dtype, .. }
            | OpKind::GaussianRandom { shape, dtype, .. } => Ok((shape.clone(), *dtype)),
        }
    }
}

fn same_dtype(inputs: &[(Vec<usize>, DType)], operation: &str) -> Result<DType, PrimGradError> {
    let (expected, actual) = (inputs[0].1, inputs[1].1);
    if expected != actual {
        return Err(PrimGradError::DataTypeMismatch {
            expected,
            actual,
            operation: operation.to_string(),
        });
    }
    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_cumsum() {
        let kind = OpKind::Cumsum {
            axis: Some(-1),
            exclusive: false,
            reverse: false,
        };
        assert_eq!(
            kind.infer_output(&[(vec![10, 10, 10], DType::F32)]).unwrap(),
            (vec![10, 10, 10], DType::F32)
        );
        let flat = OpKind::Cumsum {
            axis: None,
            exclusive: false,
            reverse: false,
        };
        assert_eq!(
            flat.infer_output(&[(vec![2, 3], DType::F64)]).unwrap(),
            (vec![6], DType::F64)
        );
    }

    #[test]
    fn test_infer_matmul_dtype_mismatch() {
        let kind = OpKind::Matmul {
            transpose_x: false,
            transpose_y: false,
        };
        assert!(matches!(
            kind.infer_output(&[(vec![2, 4], DType::F32), (vec![4, 4], DType::F64)]),
            Err(PrimGradError::DataTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_infer_wrong_arity() {
        assert!(matches!(
            OpKind::Add.infer_output(&[(vec![2], DType::F32)]),
            Err(PrimGradError::InternalError(_))
        ));
    }

    #[test]
    fn test_op_type_names() {
        assert_eq!(OpKind::Add.op_type(), "add");
        assert_eq!(OpKind::Cast { dtype: DType::F16 }.op_type(), "cast");
        assert_eq!(OpKind::FillAnyLike { value: 1.0 }.num_inputs(), 1);
    }
}
