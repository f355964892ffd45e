use std::collections::HashMap;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::device::{current_device, StorageDevice};
use crate::error::PrimGradError;
use crate::ops::arithmetic::add_op;
use crate::ops::cumulative::{cumsum_grad_op, cumsum_op};
use crate::ops::dtype::cast_op;
use crate::ops::has_kernel;
use crate::ops::linalg::matmul_op;
use crate::ops::reduction::sum_to_op;
use crate::ops::view::{flip_op, reshape_op};
use crate::static_graph::op_kind::OpKind;
use crate::static_graph::program::{OpDesc, Program, VarDesc, VarKind, VarId, Variable};
use crate::tensor::create::{full, rand_uniform, randn};
use crate::tensor::Tensor;

/// Values for a program's data variables, keyed by variable name.
pub type FeedDict = HashMap<String, Tensor>;

/// Persistable values (parameters) that outlive a single `run`.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars: HashMap<String, Tensor>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.vars.get(name)
    }

    pub fn set(&mut self, name: &str, value: Tensor) {
        self.vars.insert(name.to_string(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Stored names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vars.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Runs programs on a device, keeping parameters in its `Scope`.
///
/// A startup program is run once (with an empty fetch list) to initialize
/// the parameters; the main program then reads them on every run.
#[derive(Debug)]
pub struct Executor {
    device: StorageDevice,
    scope: Scope,
}

impl Default for Executor {
    /// An executor on `current_device()`.
    fn default() -> Self {
        Executor::new(current_device())
    }
}

impl Executor {
    pub fn new(device: StorageDevice) -> Self {
        Executor {
            device,
            scope: Scope::new(),
        }
    }

    pub fn device(&self) -> StorageDevice {
        self.device
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Runs the ops of `program` needed for `fetch_list` and returns the
    /// fetched values in order. An empty fetch list runs every op.
    ///
    /// # Errors
    /// * `UnsupportedOperation` on a non-CPU device.
    /// * `ProgramMismatch` if a fetch variable belongs to another program.
    /// * `MissingFeed` / `FeedMismatch` for absent or ill-typed data.
    /// * `UninitializedParameter` for a parameter the scope does not hold.
    /// * `UnsupportedKernel` when an op has no kernel for its dtype.
    pub fn run(
        &mut self,
        program: &Program,
        feeds: &FeedDict,
        fetch_list: &[Variable],
    ) -> Result<Vec<Tensor>, PrimGradError> {
        if self.device != StorageDevice::CPU {
            return Err(PrimGradError::UnsupportedOperation(format!(
                "no kernels are available on device {}",
                self.device
            )));
        }
        let fetch_refs: Vec<&Variable> = fetch_list.iter().collect();
        program.check_owned(&fetch_refs, "run")?;

        let ops = program.ops();
        let vars = program.vars();
        let fetch_ids: Vec<VarId> = fetch_list.iter().map(|v| v.id()).collect();
        let schedule = prune(&ops, &fetch_ids, vars.len());
        debug!(
            "executor: running {} of {} ops, {} fetches",
            schedule.len(),
            ops.len(),
            fetch_ids.len()
        );

        let mut values: HashMap<VarId, Tensor> = HashMap::new();
        for op in schedule {
            let mut inputs = Vec::with_capacity(op.inputs.len());
            for id in &op.inputs {
                inputs.push(self.value_of(&mut values, &vars, *id, feeds)?);
            }
            let output_desc = &vars[op.output.0];
            let dtype = inputs.first().map(|t| t.dtype()).unwrap_or(output_desc.dtype);
            let op_type = op.kind.op_type();
            if !has_kernel(op_type, dtype, self.device) {
                return Err(PrimGradError::UnsupportedKernel {
                    op: op_type.to_string(),
                    dtype,
                    device: self.device,
                });
            }
            debug!("executor: {} -> {}", op_type, output_desc.name);
            let result = run_kernel(&op.kind, &inputs)?;
            if output_desc.persistable {
                self.scope.set(&output_desc.name, result.clone());
            }
            values.insert(op.output, result);
        }

        fetch_ids
            .iter()
            .map(|id| self.value_of(&mut values, &vars, *id, feeds))
            .collect()
    }

    /// A computed value, or the fed / stored value of a source variable.
    fn value_of(
        &self,
        values: &mut HashMap<VarId, Tensor>,
        vars: &[VarDesc],
        id: VarId,
        feeds: &FeedDict,
    ) -> Result<Tensor, PrimGradError> {
        if let Some(value) = values.get(&id) {
            return Ok(value.clone());
        }
        let desc = &vars[id.0];
        let value = match desc.kind {
            VarKind::Data => {
                let fed = feeds
                    .get(&desc.name)
                    .ok_or_else(|| PrimGradError::MissingFeed(desc.name.clone()))?;
                if fed.shape() != desc.shape || fed.dtype() != desc.dtype {
                    return Err(PrimGradError::FeedMismatch {
                        name: desc.name.clone(),
                        expected_shape: desc.shape.clone(),
                        expected_dtype: desc.dtype,
                        actual_shape: fed.shape(),
                        actual_dtype: fed.dtype(),
                    });
                }
                fed.clone()
            }
            VarKind::Parameter => self
                .scope
                .get(&desc.name)
                .cloned()
                .ok_or_else(|| PrimGradError::UninitializedParameter(desc.name.clone()))?,
            VarKind::Intermediate => {
                return Err(PrimGradError::InternalError(format!(
                    "variable '{}' is read before any op writes it",
                    desc.name
                )))
            }
        };
        values.insert(id, value.clone());
        Ok(value)
    }
}

/// Ops needed to compute `fetch_ids`, in program order.
fn prune<'a>(ops: &'a [OpDesc], fetch_ids: &[VarId], num_vars: usize) -> Vec<&'a OpDesc> {
    if fetch_ids.is_empty() {
        return ops.iter().collect();
    }
    let mut needed = vec![false; num_vars];
    for id in fetch_ids {
        needed[id.0] = true;
    }
    let mut keep = vec![false; ops.len()];
    for (i, op) in ops.iter().enumerate().rev() {
        if needed[op.output.0] {
            keep[i] = true;
            for id in &op.inputs {
                needed[id.0] = true;
            }
        }
    }
    ops.iter().zip(keep).filter(|(_, k)| *k).map(|(op, _)| op).collect()
}

fn op_rng(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(seed)
    }
}

fn run_kernel(kind: &OpKind, inputs: &[Tensor]) -> Result<Tensor, PrimGradError> {
    match kind {
        OpKind::Cumsum {
            axis,
            exclusive,
            reverse,
        } => cumsum_op(&inputs[0], *axis, *exclusive, *reverse),
        OpKind::CumsumGrad {
            x_shape,
            axis,
            exclusive,
            reverse,
        } => cumsum_grad_op(&inputs[0], x_shape, *axis, *exclusive, *reverse),
        OpKind::Flip { axes } => flip_op(&inputs[0], axes),
        OpKind::Reshape { shape } => reshape_op(&inputs[0], shape),
        OpKind::Matmul {
            transpose_x,
            transpose_y,
        } => matmul_op(&inputs[0], &inputs[1], *transpose_x, *transpose_y),
        OpKind::Add => add_op(&inputs[0], &inputs[1]),
        OpKind::SumTo { shape } => sum_to_op(&inputs[0], shape),
        OpKind::Cast { dtype } => cast_op(&inputs[0], *dtype),
        OpKind::FillAnyLike { value } => full(&inputs[0].shape(), inputs[0].dtype(), *value),
        OpKind::FillConstant { shape, dtype, value } => full(shape, *dtype, *value),
        OpKind::UniformRandom {
            shape,
            dtype,
            min,
            max,
            seed,
        } => rand_uniform(shape, *dtype, *min, *max, &mut op_rng(*seed)),
        OpKind::GaussianRandom {
            shape,
            dtype,
            mean,
            std,
            seed,
        } => randn(shape, *dtype, *mean, *std, &mut op_rng(*seed)),
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
