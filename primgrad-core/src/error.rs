use crate::device::StorageDevice;
use crate::types::DType;
use thiserror::Error;

/// Custom error type for the primgrad engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum PrimGradError {
    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Data type mismatch for operation '{operation}': expected {expected:?}, got {actual:?}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Incompatible shapes for operation: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Cannot broadcast shapes: {shape1:?} and {shape2:?}")]
    BroadcastError {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
    },

    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: isize, rank: usize },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("No {dtype:?} kernel registered for op '{op}' on {device:?}")]
    UnsupportedKernel {
        op: String,
        dtype: DType,
        device: StorageDevice,
    },

    #[error("Variable '{0}' already exists in the program")]
    DuplicateVariable(String),

    #[error("Variable '{0}' not found in the program")]
    UnknownVariable(String),

    #[error("Variables from different programs cannot be combined in '{operation}'")]
    ProgramMismatch { operation: String },

    #[error("No value fed for data variable '{0}'")]
    MissingFeed(String),

    #[error("Feed '{name}' expects shape {expected_shape:?} ({expected_dtype:?}), got {actual_shape:?} ({actual_dtype:?})")]
    FeedMismatch {
        name: String,
        expected_shape: Vec<usize>,
        expected_dtype: DType,
        actual_shape: Vec<usize>,
        actual_dtype: DType,
    },

    #[error("Parameter '{0}' has no value in scope; run the startup program first")]
    UninitializedParameter(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}
