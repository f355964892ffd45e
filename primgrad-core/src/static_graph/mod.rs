//! # Static Graph (`static_graph`)
//!
//! Declarative graph construction and execution.
//!
//! A [`Program`] records variables and ops; nothing is computed while it is
//! built. Layer functions in [`layers`] append forward ops, [`gradients`]
//! appends the reverse-mode backward graph, and an [`Executor`] runs a
//! program against fed inputs.
//!
//! Backward lowering is chosen per call through [`GradientOptions`]: with
//! `prim_backward` on, ops that have a composite rule are differentiated
//! into primitive forward ops (for `cumsum`: `flip` + `cumsum`), otherwise
//! their monolithic gradient kernel (`cumsum_grad`) is emitted.

pub mod backward;
pub mod composite;
pub mod executor;
pub(crate) mod grad_rules;
pub mod guard;
pub mod layers;
pub mod op_kind;
pub mod program;

pub use backward::{gradients, GradientOptions};
pub use executor::{Executor, FeedDict, Scope};
pub use guard::{program_guard, ProgramGuard};
pub use op_kind::OpKind;
pub use program::{OpDesc, Program, VarDesc, VarId, VarKind, Variable};
