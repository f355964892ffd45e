use crate::error::PrimGradError;
use crate::nn::init::Initializer;
use crate::nn::module::Layer;
use crate::static_graph::{layers, ProgramGuard, Variable};
use crate::types::DType;

/// Applies `y = x @ W + b`.
///
/// `W` has shape `[in_features, out_features]` and is Xavier-uniform
/// initialized; the optional bias `[out_features]` starts at zero. Inputs
/// may carry any number of leading batch dims.
#[derive(Debug)]
pub struct Linear {
    pub(crate) weight: Variable,
    pub(crate) bias: Option<Variable>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// Declares `{name}.w_0` (and `{name}.b_0`) in the guard's programs.
    pub fn new(
        guard: &ProgramGuard<'_>,
        name: &str,
        in_features: usize,
        out_features: usize,
        has_bias: bool,
        dtype: DType,
    ) -> Result<Self, PrimGradError> {
        let weight = guard.create_parameter(
            &format!("{}.w_0", name),
            &[in_features, out_features],
            dtype,
            Initializer::XavierUniform,
        )?;
        let bias = if has_bias {
            Some(guard.create_parameter(
                &format!("{}.b_0", name),
                &[out_features],
                dtype,
                Initializer::Constant(0.0),
            )?)
        } else {
            None
        };
        Ok(Linear {
            weight,
            bias,
            in_features,
            out_features,
        })
    }

    pub fn in_features(&self) -> usize {
        self.in_features
    }

    pub fn out_features(&self) -> usize {
        self.out_features
    }

    pub fn weight(&self) -> &Variable {
        &self.weight
    }

    pub fn bias(&self) -> Option<&Variable> {
        self.bias.as_ref()
    }
}

impl Layer for Linear {
    fn forward(&self, input: &Variable) -> Result<Variable, PrimGradError> {
        let projected = layers::matmul(input, &self.weight, false, false)?;
        match &self.bias {
            Some(bias) => layers::add(&projected, bias),
            None => Ok(projected),
        }
    }

    fn parameters(&self) -> Vec<&Variable> {
        let mut params = vec![&self.weight];
        if let Some(bias) = &self.bias {
            params.push(bias);
        }
        params
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
