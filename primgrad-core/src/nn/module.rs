use crate::error::PrimGradError;
use crate::static_graph::Variable;

/// A building block of a static-graph network.
pub trait Layer: std::fmt::Debug {
    /// Appends the layer's ops applied to `input` and returns the output variable.
    fn forward(&self, input: &Variable) -> Result<Variable, PrimGradError>;

    /// The layer's parameters, as main-program variables.
    fn parameters(&self) -> Vec<&Variable>;
}
