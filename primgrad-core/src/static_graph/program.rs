use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use crate::error::PrimGradError;
use crate::static_graph::op_kind::OpKind;
use crate::types::DType;

/// Index of a variable inside its `Program`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

/// Where a variable's value comes from at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Fed by name on every run.
    Data,
    /// Read from the executor scope; written by the startup program.
    Parameter,
    /// Produced by an op of the same program.
    Intermediate,
}

/// Static description of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDesc {
    pub name: String,
    pub shape: Vec<usize>,
    pub dtype: DType,
    pub kind: VarKind,
    /// Blocks gradient flow through this variable.
    pub stop_gradient: bool,
    /// Value outlives a single run (kept in the executor scope).
    pub persistable: bool,
}

/// One node of the graph: an op reading `inputs` and writing `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct OpDesc {
    pub kind: OpKind,
    pub inputs: Vec<VarId>,
    pub output: VarId,
}

#[derive(Debug, Default)]
pub(crate) struct ProgramDesc {
    vars: Vec<VarDesc>,
    ops: Vec<OpDesc>,
    names: HashMap<String, VarId>,
    name_counters: HashMap<&'static str, usize>,
    random_seed: u64,
}

impl ProgramDesc {
    fn unique_name(&mut self, prefix: &'static str) -> String {
        loop {
            let counter = self.name_counters.entry(prefix).or_insert(0);
            let name = format!("{}_{}.tmp_0", prefix, *counter);
            *counter += 1;
            if !self.names.contains_key(&name) {
                return name;
            }
        }
    }

    fn push_var(&mut self, desc: VarDesc) -> Result<VarId, PrimGradError> {
        if self.names.contains_key(&desc.name) {
            return Err(PrimGradError::DuplicateVariable(desc.name));
        }
        let id = VarId(self.vars.len());
        self.names.insert(desc.name.clone(), id);
        self.vars.push(desc);
        Ok(id)
    }
}

/// A static computation graph.
///
/// Ops are appended in dependency order through the layer functions (or a
/// `ProgramGuard`) and run later by an `Executor`. Cloning a `Program` is
/// shallow: every clone and every `Variable` handle refer to the same graph.
#[derive(Clone, Default)]
pub struct Program {
    inner: Arc<RwLock<ProgramDesc>>,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, ProgramDesc> {
        self.inner.read().expect("RwLock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ProgramDesc> {
        self.inner.write().expect("RwLock poisoned")
    }

    /// Returns true if both handles refer to the same graph.
    pub fn ptr_eq(&self, other: &Program) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Sets the seed random initializer ops derive theirs from.
    /// `0` (the default) means every run draws fresh entropy.
    pub fn set_random_seed(&self, seed: u64) {
        self.write().random_seed = seed;
    }

    pub fn random_seed(&self) -> u64 {
        self.read().random_seed
    }

    /// A deterministic per-op seed, or 0 when the program is unseeded.
    pub(crate) fn next_op_seed(&self) -> u64 {
        let guard = self.read();
        if guard.random_seed == 0 {
            0
        } else {
            guard.random_seed.wrapping_add(guard.ops.len() as u64 + 1)
        }
    }

    pub fn num_ops(&self) -> usize {
        self.read().ops.len()
    }

    pub fn num_vars(&self) -> usize {
        self.read().vars.len()
    }

    /// Snapshot of the op list.
    pub fn ops(&self) -> Vec<OpDesc> {
        self.read().ops.clone()
    }

    /// Op type names in program order.
    pub fn op_types(&self) -> Vec<&'static str> {
        self.read().ops.iter().map(|op| op.kind.op_type()).collect()
    }

    /// Snapshot of the variable list, indexed by `VarId`.
    pub fn vars(&self) -> Vec<VarDesc> {
        self.read().vars.clone()
    }

    /// Looks a variable up by name.
    pub fn find_var(&self, name: &str) -> Option<Variable> {
        let id = self.read().names.get(name).copied()?;
        Some(self.variable(id))
    }

    pub(crate) fn variable(&self, id: VarId) -> Variable {
        Variable {
            program: self.clone(),
            id,
        }
    }

    /// Declares a variable. `name: None` generates a unique `"{prefix}_N.tmp_0"`.
    pub(crate) fn create_var(
        &self,
        name: Option<&str>,
        prefix: &'static str,
        shape: Vec<usize>,
        dtype: DType,
        kind: VarKind,
    ) -> Result<Variable, PrimGradError> {
        let mut guard = self.write();
        let name = match name {
            Some(name) => name.to_string(),
            None => guard.unique_name(prefix),
        };
        let desc = VarDesc {
            name,
            shape,
            dtype,
            kind,
            stop_gradient: kind == VarKind::Data,
            persistable: kind == VarKind::Parameter,
        };
        let id = guard.push_var(desc)?;
        drop(guard);
        Ok(self.variable(id))
    }

    /// Appends an op whose output is a fresh intermediate variable.
    ///
    /// # Errors
    /// * `ProgramMismatch` if an input belongs to another program.
    /// * Any shape/dtype inference error of the op.
    pub(crate) fn append_op(&self, kind: OpKind, inputs: &[&Variable]) -> Result<Variable, PrimGradError> {
        self.check_owned(inputs, kind.op_type())?;
        let input_meta: Vec<(Vec<usize>, DType)> =
            inputs.iter().map(|v| (v.shape(), v.dtype())).collect();
        let (shape, dtype) = kind.infer_output(&input_meta)?;
        let output = self.create_var(None, kind.op_type(), shape, dtype, VarKind::Intermediate)?;
        self.push_op(kind, inputs, &output);
        Ok(output)
    }

    /// Appends an op writing into an already declared variable (initializers).
    pub(crate) fn append_op_into(
        &self,
        kind: OpKind,
        inputs: &[&Variable],
        output: &Variable,
    ) -> Result<(), PrimGradError> {
        self.check_owned(inputs, kind.op_type())?;
        self.check_owned(&[output], kind.op_type())?;
        let input_meta: Vec<(Vec<usize>, DType)> =
            inputs.iter().map(|v| (v.shape(), v.dtype())).collect();
        let (shape, dtype) = kind.infer_output(&input_meta)?;
        if shape != output.shape() {
            return Err(PrimGradError::ShapeMismatch {
                expected: output.shape(),
                actual: shape,
                operation: kind.op_type().to_string(),
            });
        }
        if dtype != output.dtype() {
            return Err(PrimGradError::DataTypeMismatch {
                expected: output.dtype(),
                actual: dtype,
                operation: kind.op_type().to_string(),
            });
        }
        self.push_op(kind, inputs, output);
        Ok(())
    }

    fn push_op(&self, kind: OpKind, inputs: &[&Variable], output: &Variable) {
        let op = OpDesc {
            kind,
            inputs: inputs.iter().map(|v| v.id).collect(),
            output: output.id,
        };
        debug!(
            "append op '{}' -> {} {:?}",
            op.kind.op_type(),
            output.name(),
            output.shape()
        );
        self.write().ops.push(op);
    }

    pub(crate) fn check_owned(&self, vars: &[&Variable], operation: &str) -> Result<(), PrimGradError> {
        if vars.iter().all(|v| v.program.ptr_eq(self)) {
            Ok(())
        } else {
            Err(PrimGradError::ProgramMismatch {
                operation: operation.to_string(),
            })
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read();
        f.debug_struct("Program")
            .field("vars", &guard.vars.len())
            .field("ops", &guard.ops.len())
            .field("random_seed", &guard.random_seed)
            .finish()
    }
}

impl fmt::Display for Program {
    /// One line per op: `out = op_type(in, ...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read();
        for op in &guard.ops {
            let inputs: Vec<&str> = op.inputs.iter().map(|id| guard.vars[id.0].name.as_str()).collect();
            writeln!(
                f,
                "{} = {}({})",
                guard.vars[op.output.0].name,
                op.kind.op_type(),
                inputs.join(", ")
            )?;
        }
        Ok(())
    }
}

/// A symbolic handle to a variable of a `Program`.
#[derive(Clone)]
pub struct Variable {
    program: Program,
    id: VarId,
}

impl Variable {
    pub fn id(&self) -> VarId {
        self.id
    }

    /// The program this variable belongs to.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Snapshot of the variable's description.
    pub fn desc(&self) -> VarDesc {
        self.program.read().vars[self.id.0].clone()
    }

    pub fn name(&self) -> String {
        self.program.read().vars[self.id.0].name.clone()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.program.read().vars[self.id.0].shape.clone()
    }

    pub fn dtype(&self) -> DType {
        self.program.read().vars[self.id.0].dtype
    }

    pub fn kind(&self) -> VarKind {
        self.program.read().vars[self.id.0].kind
    }

    pub fn stop_gradient(&self) -> bool {
        self.program.read().vars[self.id.0].stop_gradient
    }

    /// Marks whether gradients flow through this variable.
    /// Data variables start with `true`, everything else with `false`.
    pub fn set_stop_gradient(&self, stop_gradient: bool) {
        self.program.write().vars[self.id.0].stop_gradient = stop_gradient;
    }

    pub fn persistable(&self) -> bool {
        self.program.read().vars[self.id.0].persistable
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.desc();
        f.debug_struct("Variable")
            .field("name", &desc.name)
            .field("shape", &desc.shape)
            .field("dtype", &desc.dtype)
            .field("kind", &desc.kind)
            .finish()
    }
}

#[cfg(test)]
#[path = "program_test.rs"]
mod tests;
