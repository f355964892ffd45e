//! Decomposed ("prim") backward rules.
//!
//! A composite rule expresses an op's vector-Jacobian product using only
//! primitive forward ops, so the backward graph contains no dedicated
//! gradient kernel for that op.

use crate::error::PrimGradError;
use crate::static_graph::grad_rules::reshape_if_needed;
use crate::static_graph::layers;
use crate::static_graph::op_kind::OpKind;
use crate::static_graph::program::{OpDesc, Program, Variable};

/// Op types with a composite backward rule.
const COMPOSITE_OPS: &[&str] = &["cumsum"];

pub fn has_composite(op_type: &str) -> bool {
    COMPOSITE_OPS.contains(&op_type)
}

/// Returns `None` when the op has no composite rule.
pub(crate) fn composite_vjp(
    program: &Program,
    op: &OpDesc,
    out_grad: &Variable,
) -> Option<Result<Vec<Option<Variable>>, PrimGradError>> {
    match &op.kind {
        OpKind::Cumsum {
            axis,
            exclusive,
            reverse,
        } => {
            let x = program.variable(op.inputs[0]);
            Some(cumsum_composite(&x, out_grad, *axis, *exclusive, *reverse).map(|dx| vec![Some(dx)]))
        }
        _ => None,
    }
}

/// `dx` of `y = cumsum(x, axis, exclusive, reverse)` from `flip` and a forward `cumsum`.
///
/// A forward scan is adjoint to a reversed one (and vice versa), so a reversed
/// forward pass only needs a plain scan of `g`.
fn cumsum_composite(
    x: &Variable,
    g: &Variable,
    axis: Option<isize>,
    exclusive: bool,
    reverse: bool,
) -> Result<Variable, PrimGradError> {
    // With axis None the forward output, and so `g`, is already flat.
    let scan_axis = axis.unwrap_or(0);
    let dx = if reverse {
        layers::cumsum(g, Some(scan_axis), exclusive, false)?
    } else {
        let flipped = layers::flip(g, &[scan_axis])?;
        let scanned = layers::cumsum(&flipped, Some(scan_axis), exclusive, false)?;
        layers::flip(&scanned, &[scan_axis])?
    };
    reshape_if_needed(&dx, &x.shape())
}
