use primgrad_core::PrimGradError;
use thiserror::Error;

use crate::report::MismatchReport;

/// Errors raised by a harness comparison.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HarnessError {
    /// The prim and kernel gradients disagree.
    #[error("Gradients are not close:\n{0}")]
    Mismatch(MismatchReport),

    /// Building or running a program failed.
    #[error("Framework error: {0}")]
    Framework(#[from] PrimGradError),

    #[error("Invalid test case: {0}")]
    InvalidCase(String),
}
