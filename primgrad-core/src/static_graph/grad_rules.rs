//! Kernel-level vector-Jacobian products.
//!
//! Each rule receives the op, the gradient of its output, and returns one
//! optional gradient per input (in input order). Ops without a rule for an
//! input return `None` there.

use crate::error::PrimGradError;
use crate::static_graph::layers;
use crate::static_graph::op_kind::OpKind;
use crate::static_graph::program::{OpDesc, Program, Variable};

pub(crate) fn kernel_vjp(
    program: &Program,
    op: &OpDesc,
    out_grad: &Variable,
) -> Result<Vec<Option<Variable>>, PrimGradError> {
    let input = |i: usize| program.variable(op.inputs[i]);
    match &op.kind {
        OpKind::Cumsum {
            axis,
            exclusive,
            reverse,
        } => {
            let x = input(0);
            let dx = layers::cumsum_grad(out_grad, &x.shape(), *axis, *exclusive, *reverse)?;
            Ok(vec![Some(dx)])
        }
        // cumsum_grad scans opposite to `reverse`; its adjoint scans along it.
        OpKind::CumsumGrad {
            axis,
            exclusive,
            reverse,
            ..
        } => {
            let g = input(0);
            let scanned = layers::cumsum(out_grad, *axis, *exclusive, *reverse)?;
            Ok(vec![Some(reshape_if_needed(&scanned, &g.shape())?)])
        }
        OpKind::Flip { axes } => Ok(vec![Some(layers::flip(out_grad, axes)?)]),
        OpKind::Reshape { .. } => {
            let x = input(0);
            Ok(vec![Some(layers::reshape(out_grad, &x.shape())?)])
        }
        OpKind::Matmul {
            transpose_x,
            transpose_y,
        } => matmul_vjp(&input(0), &input(1), out_grad, *transpose_x, *transpose_y),
        OpKind::Add => {
            let x = input(0);
            let y = input(1);
            Ok(vec![
                Some(sum_to_if_needed(out_grad, &x.shape())?),
                Some(sum_to_if_needed(out_grad, &y.shape())?),
            ])
        }
        OpKind::SumTo { .. } => {
            let x = input(0);
            let zeros = layers::fill_any_like(&x, 0.0)?;
            Ok(vec![Some(layers::add(&zeros, out_grad)?)])
        }
        OpKind::Cast { .. } => {
            let x = input(0);
            Ok(vec![Some(layers::cast(out_grad, x.dtype())?)])
        }
        OpKind::FillAnyLike { .. } => Ok(vec![None]),
        OpKind::FillConstant { .. } | OpKind::UniformRandom { .. } | OpKind::GaussianRandom { .. } => {
            Ok(Vec::new())
        }
    }
}

/// Gradients of `out = op(x, transpose_x) @ op(y, transpose_y)`.
///
/// Leading dims of `x` are batch dims; `dy` sums over them by folding the
/// batch into the row dimension.
fn matmul_vjp(
    x: &Variable,
    y: &Variable,
    g: &Variable,
    transpose_x: bool,
    transpose_y: bool,
) -> Result<Vec<Option<Variable>>, PrimGradError> {
    let x_shape = x.shape();
    let rank = x_shape.len();
    if transpose_x {
        if rank != 2 {
            return Err(PrimGradError::UnsupportedOperation(format!(
                "matmul gradient with transpose_x requires a rank-2 x, got {:?}",
                x_shape
            )));
        }
        let dx = layers::matmul(y, g, transpose_y, true)?;
        let dy = if transpose_y {
            layers::matmul(g, x, true, true)?
        } else {
            layers::matmul(x, g, false, false)?
        };
        return Ok(vec![Some(dx), Some(dy)]);
    }

    let dx = layers::matmul(g, y, false, !transpose_y)?;
    let g_shape = g.shape();
    let rows: usize = x_shape[..rank - 1].iter().product();
    let x2 = reshape_if_needed(x, &[rows, x_shape[rank - 1]])?;
    let g2 = reshape_if_needed(g, &[rows, g_shape[g_shape.len() - 1]])?;
    let dy = if transpose_y {
        layers::matmul(&g2, &x2, true, false)?
    } else {
        layers::matmul(&x2, &g2, true, false)?
    };
    Ok(vec![Some(dx), Some(dy)])
}

pub(crate) fn reshape_if_needed(v: &Variable, shape: &[usize]) -> Result<Variable, PrimGradError> {
    if v.shape() == shape {
        Ok(v.clone())
    } else {
        layers::reshape(v, shape)
    }
}

fn sum_to_if_needed(g: &Variable, shape: &[usize]) -> Result<Variable, PrimGradError> {
    if g.shape() == shape {
        Ok(g.clone())
    } else {
        layers::sum_to(g, shape)
    }
}
