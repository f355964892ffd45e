//! Graph-building functions.
//!
//! Each function appends one op to the program its operands belong to and
//! returns the op's output variable. Shapes and dtypes are inferred (and
//! checked) at build time.

use crate::error::PrimGradError;
use crate::static_graph::op_kind::OpKind;
use crate::static_graph::program::Variable;
use crate::types::DType;

/// Cumulative sum along `axis`; `None` scans the flattened input.
///
/// # Example
/// ```
/// use primgrad_core::{program_guard, layers, DType, Program};
///
/// let main = Program::new();
/// let startup = Program::new();
/// let guard = program_guard(&main, &startup);
/// let x = guard.data("x", &[2, 3], DType::F32).unwrap();
/// let y = layers::cumsum(&x, Some(-1), false, false).unwrap();
/// assert_eq!(y.shape(), vec![2, 3]);
/// ```
pub fn cumsum(x: &Variable, axis: Option<isize>, exclusive: bool, reverse: bool) -> Result<Variable, PrimGradError> {
    x.program().append_op(
        OpKind::Cumsum {
            axis,
            exclusive,
            reverse,
        },
        &[x],
    )
}

/// Gradient kernel of `cumsum` applied to `out_grad`, producing a tensor of `x_shape`.
pub fn cumsum_grad(
    out_grad: &Variable,
    x_shape: &[usize],
    axis: Option<isize>,
    exclusive: bool,
    reverse: bool,
) -> Result<Variable, PrimGradError> {
    out_grad.program().append_op(
        OpKind::CumsumGrad {
            x_shape: x_shape.to_vec(),
            axis,
            exclusive,
            reverse,
        },
        &[out_grad],
    )
}

pub fn flip(x: &Variable, axes: &[isize]) -> Result<Variable, PrimGradError> {
    x.program().append_op(OpKind::Flip { axes: axes.to_vec() }, &[x])
}

pub fn reshape(x: &Variable, shape: &[usize]) -> Result<Variable, PrimGradError> {
    x.program().append_op(OpKind::Reshape { shape: shape.to_vec() }, &[x])
}

/// Batched matrix product; `x` has rank >= 2, `y` rank 2.
pub fn matmul(x: &Variable, y: &Variable, transpose_x: bool, transpose_y: bool) -> Result<Variable, PrimGradError> {
    x.program().append_op(
        OpKind::Matmul {
            transpose_x,
            transpose_y,
        },
        &[x, y],
    )
}

/// Element-wise sum with broadcasting.
pub fn add(x: &Variable, y: &Variable) -> Result<Variable, PrimGradError> {
    x.program().append_op(OpKind::Add, &[x, y])
}

/// Reduces `x` to `shape`, summing over the broadcast dimensions.
pub fn sum_to(x: &Variable, shape: &[usize]) -> Result<Variable, PrimGradError> {
    x.program().append_op(OpKind::SumTo { shape: shape.to_vec() }, &[x])
}

pub fn cast(x: &Variable, dtype: DType) -> Result<Variable, PrimGradError> {
    x.program().append_op(OpKind::Cast { dtype }, &[x])
}

/// A variable with the shape and dtype of `x`, every element set to `value`.
pub fn fill_any_like(x: &Variable, value: f64) -> Result<Variable, PrimGradError> {
    x.program().append_op(OpKind::FillAnyLike { value }, &[x])
}
