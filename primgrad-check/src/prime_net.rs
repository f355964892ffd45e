use primgrad_core::nn::{Layer, Linear};
use primgrad_core::{layers, DType, GradientOptions, PrimGradError, ProgramGuard, Tensor, Variable};

use crate::case::GradCase;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::harness::{run_vjp, Scenario};

/// `cumsum(Linear(4, 4)(x), axis = -1)`.
#[derive(Debug)]
pub struct PrimeNet {
    fc: Linear,
}

impl PrimeNet {
    pub const FEATURES: usize = 4;

    pub fn new(guard: &ProgramGuard<'_>, dtype: DType) -> Result<Self, PrimGradError> {
        let fc = Linear::new(guard, "fc", Self::FEATURES, Self::FEATURES, true, dtype)?;
        Ok(PrimeNet { fc })
    }
}

impl Layer for PrimeNet {
    fn forward(&self, input: &Variable) -> Result<Variable, PrimGradError> {
        let hidden = self.fc.forward(input)?;
        layers::cumsum(&hidden, Some(-1), false, false)
    }

    fn parameters(&self) -> Vec<&Variable> {
        self.fc.parameters()
    }
}

/// Gradient of a `PrimeNet` input.
///
/// Both lowerings initialize the net from `config.seed`, so their parameters
/// are identical. The case shape must end in `PrimeNet::FEATURES`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimeNetScenario;

impl Scenario for PrimeNetScenario {
    fn name(&self) -> String {
        "prime_net".to_string()
    }

    fn compute(
        &self,
        case: &GradCase,
        options: &GradientOptions,
        config: &HarnessConfig,
    ) -> Result<Tensor, HarnessError> {
        let shape = case.shape();
        if shape.len() < 2 || shape[shape.len() - 1] != PrimeNet::FEATURES {
            return Err(HarnessError::InvalidCase(format!(
                "prime_net expects a [.., {}] input, got {:?}",
                PrimeNet::FEATURES,
                shape
            )));
        }
        if config.seed == 0 {
            return Err(HarnessError::InvalidCase(
                "prime_net needs a non-zero seed to share parameters between runs".to_string(),
            ));
        }
        run_vjp(case, options, config, config.seed, |guard, primal| {
            PrimeNet::new(guard, case.dtype())?.forward(primal)
        })
    }
}
