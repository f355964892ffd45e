//! # primgrad-core
//!
//! A small static-graph tensor engine whose reverse-mode gradients can be
//! built two ways: with monolithic gradient kernels, or decomposed into
//! primitive forward ops ("prim" backward).
//!
//! Graphs are declared on a [`Program`] through a [`ProgramGuard`], the
//! backward graph is appended by [`gradients`], and an [`Executor`] runs the
//! result on CPU kernels from [`ops`].

pub mod buffer;
pub mod device;
pub mod error;
pub mod nn;
pub mod ops;
pub mod static_graph;
pub mod tensor;
pub mod tensor_data;
pub mod types;

pub use device::{current_device, StorageDevice};
pub use error::PrimGradError;
pub use static_graph::{
    gradients, layers, program_guard, Executor, FeedDict, GradientOptions, Program, ProgramGuard, Scope,
    Variable,
};
pub use tensor::Tensor;
pub use types::DType;

// Re-export numeric crates used in the public API
pub use half;
pub use num_traits;
