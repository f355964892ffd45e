// src/ops/view/mod.rs
// Layout-changing ops: flip copies, reshape shares the buffer.

pub mod flip;
pub mod reshape;

pub use flip::flip_op;
pub use reshape::reshape_op;
