// src/ops/reduction/mod.rs

pub mod sum;

pub use sum::sum_to_op;
