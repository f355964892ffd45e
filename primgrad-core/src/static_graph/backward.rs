use std::collections::{HashMap, HashSet};

use log::debug;

use crate::error::PrimGradError;
use crate::static_graph::composite::{composite_vjp, has_composite};
use crate::static_graph::grad_rules::kernel_vjp;
use crate::static_graph::layers;
use crate::static_graph::program::{VarId, Variable};

/// Controls how `gradients` lowers each op's backward pass.
///
/// The setting is consulted while the backward graph is built; a program
/// built with one set of options is unaffected by later calls with another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradientOptions {
    /// Use composite (decomposed) rules where an op has one.
    pub prim_backward: bool,
    /// Op types that keep their kernel rule even when `prim_backward` is on.
    pub skip_decomposition: HashSet<String>,
}

impl GradientOptions {
    /// Decomposition on for every op with a composite rule.
    pub fn prim() -> Self {
        GradientOptions {
            prim_backward: true,
            skip_decomposition: HashSet::new(),
        }
    }

    /// Monolithic gradient kernels only.
    pub fn kernel() -> Self {
        GradientOptions::default()
    }

    /// Excludes `op_type` from decomposition.
    pub fn skip(mut self, op_type: &str) -> Self {
        self.skip_decomposition.insert(op_type.to_string());
        self
    }

    /// Whether `op_type` is lowered through its composite rule.
    pub fn decomposes(&self, op_type: &str) -> bool {
        self.prim_backward && has_composite(op_type) && !self.skip_decomposition.contains(op_type)
    }
}

/// Appends the backward graph of `targets` with respect to `inputs` and
/// returns one gradient variable per input.
///
/// `target_gradients[i]` seeds the gradient of `targets[i]`; without seeds
/// every target is seeded with ones. Inputs unreachable from the targets, or
/// cut off by `stop_gradient`, get `None`.
///
/// # Errors
/// * `ProgramMismatch` if the variables span several programs.
/// * `ShapeMismatch` / `DataTypeMismatch` for a seed not matching its target.
/// * Any error raised while appending the gradient ops.
pub fn gradients(
    targets: &[Variable],
    inputs: &[Variable],
    target_gradients: Option<&[Variable]>,
    options: &GradientOptions,
) -> Result<Vec<Option<Variable>>, PrimGradError> {
    let program = match targets.first() {
        Some(target) => target.program().clone(),
        None => {
            return Err(PrimGradError::UnsupportedOperation(
                "gradients requires at least one target".to_string(),
            ))
        }
    };
    let mut all: Vec<&Variable> = targets.iter().chain(inputs.iter()).collect();
    if let Some(seeds) = target_gradients {
        if seeds.len() != targets.len() {
            return Err(PrimGradError::UnsupportedOperation(format!(
                "gradients got {} target gradients for {} targets",
                seeds.len(),
                targets.len()
            )));
        }
        all.extend(seeds.iter());
    }
    program.check_owned(&all, "gradients")?;

    let forward_ops = program.ops();
    let vars = program.vars();
    debug!(
        "gradients: {} forward ops, prim_backward={}",
        forward_ops.len(),
        options.prim_backward
    );

    let mut needs_grad: Vec<bool> = vars.iter().map(|v| !v.stop_gradient).collect();
    for op in &forward_ops {
        let out = op.output.0;
        needs_grad[out] = !vars[out].stop_gradient && op.inputs.iter().any(|id| needs_grad[id.0]);
    }

    let mut grads: HashMap<VarId, Variable> = HashMap::new();
    for (i, target) in targets.iter().enumerate() {
        let seed = match target_gradients {
            Some(seeds) => {
                let seed = &seeds[i];
                check_seed(target, seed)?;
                seed.clone()
            }
            None => layers::fill_any_like(target, 1.0)?,
        };
        accumulate(&mut grads, target.id(), seed)?;
    }

    for op in forward_ops.iter().rev() {
        let out_grad = match grads.get(&op.output) {
            Some(g) => g.clone(),
            None => continue,
        };
        if !op.inputs.iter().any(|id| needs_grad[id.0]) {
            continue;
        }
        let op_type = op.kind.op_type();
        let input_grads = if options.decomposes(op_type) {
            debug!("gradients: composite rule for '{}'", op_type);
            match composite_vjp(&program, op, &out_grad) {
                Some(result) => result?,
                None => kernel_vjp(&program, op, &out_grad)?,
            }
        } else {
            kernel_vjp(&program, op, &out_grad)?
        };
        for (id, grad) in op.inputs.iter().zip(input_grads) {
            if let Some(grad) = grad {
                if needs_grad[id.0] {
                    accumulate(&mut grads, *id, grad)?;
                }
            }
        }
    }

    Ok(inputs
        .iter()
        .map(|input| {
            if needs_grad[input.id().0] {
                grads.get(&input.id()).cloned()
            } else {
                None
            }
        })
        .collect())
}

fn check_seed(target: &Variable, seed: &Variable) -> Result<(), PrimGradError> {
    if seed.shape() != target.shape() {
        return Err(PrimGradError::ShapeMismatch {
            expected: target.shape(),
            actual: seed.shape(),
            operation: "gradients".to_string(),
        });
    }
    if seed.dtype() != target.dtype() {
        return Err(PrimGradError::DataTypeMismatch {
            expected: target.dtype(),
            actual: seed.dtype(),
            operation: "gradients".to_string(),
        });
    }
    Ok(())
}

fn accumulate(grads: &mut HashMap<VarId, Variable>, id: VarId, grad: Variable) -> Result<(), PrimGradError> {
    let merged = match grads.remove(&id) {
        Some(existing) => layers::add(&existing, &grad)?,
        None => grad,
    };
    grads.insert(id, merged);
    Ok(())
}

#[cfg(test)]
#[path = "backward_test.rs"]
mod tests;
