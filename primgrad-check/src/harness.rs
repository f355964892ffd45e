use log::{info, warn};

use primgrad_core::{
    gradients, layers, program_guard, Executor, FeedDict, GradientOptions, PrimGradError, Program, ProgramGuard,
    Tensor, Variable,
};

use crate::allclose::assert_allclose;
use crate::case::GradCase;
use crate::config::HarnessConfig;
use crate::error::HarnessError;
use crate::report::{ComparisonReport, MismatchReport, Outcome};

/// A gradient computation that can be built with either backward lowering.
///
/// `compute` must build fresh programs on every call so the prim and kernel
/// runs share nothing but the case data.
pub trait Scenario {
    fn name(&self) -> String;

    /// Returns the gradient of the primal for `case.cotangent()`.
    fn compute(
        &self,
        case: &GradCase,
        options: &GradientOptions,
        config: &HarnessConfig,
    ) -> Result<Tensor, HarnessError>;
}

/// `y = cumsum(primal, axis)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CumsumScenario {
    pub axis: isize,
}

impl CumsumScenario {
    pub fn new(axis: isize) -> Self {
        CumsumScenario { axis }
    }
}

impl Scenario for CumsumScenario {
    fn name(&self) -> String {
        format!("cumsum(axis={})", self.axis)
    }

    fn compute(
        &self,
        case: &GradCase,
        options: &GradientOptions,
        config: &HarnessConfig,
    ) -> Result<Tensor, HarnessError> {
        run_vjp(case, options, config, 0, |_, primal| {
            layers::cumsum(primal, Some(self.axis), false, false)
        })
    }
}

/// Builds `forward(primal)` and its VJP seeded with the cotangent, then runs
/// the startup and main programs on a fresh executor.
///
/// `startup_seed` seeds parameter initialization (0 leaves it unseeded).
pub(crate) fn run_vjp<F>(
    case: &GradCase,
    options: &GradientOptions,
    config: &HarnessConfig,
    startup_seed: u64,
    forward: F,
) -> Result<Tensor, HarnessError>
where
    F: FnOnce(&ProgramGuard<'_>, &Variable) -> Result<Variable, PrimGradError>,
{
    let main = Program::new();
    let startup = Program::new();
    startup.set_random_seed(startup_seed);
    let guard = program_guard(&main, &startup);

    let shape = case.shape();
    let primal = guard.data("primal", &shape, case.dtype())?;
    primal.set_stop_gradient(false);
    let cotangent = guard.data("cotangent", &shape, case.dtype())?;
    let y = forward(&guard, &primal)?;
    let grads = gradients(&[y], &[primal], Some(&[cotangent]), options)?;
    let x_cotangent = match grads.into_iter().next().flatten() {
        Some(grad) => grad,
        None => {
            return Err(HarnessError::InvalidCase(
                "primal has no gradient path to the output".to_string(),
            ))
        }
    };

    let mut exe = Executor::new(config.device);
    exe.run(&startup, &FeedDict::new(), &[])?;
    let mut feeds = FeedDict::new();
    feeds.insert("primal".to_string(), case.primal().clone());
    feeds.insert("cotangent".to_string(), case.cotangent().clone());
    let mut fetched = exe.run(&main, &feeds, &[x_cotangent])?;
    Ok(fetched.remove(0))
}

/// Compares the prim and kernel gradients of `scenario` on `case`.
///
/// Combinations listed as unsupported in `config` are skipped and logged.
///
/// # Errors
/// * `Mismatch` if the two gradients are not allclose, or the gradient shape
///   differs from the primal shape.
/// * `Framework` for build or execution errors.
/// * `InvalidCase` if the config has no tolerance for the case dtype.
pub fn compare<S: Scenario + ?Sized>(
    config: &HarnessConfig,
    scenario: &S,
    case: &GradCase,
) -> Result<Outcome, HarnessError> {
    let dtype = case.dtype();
    if config.is_unsupported(dtype) {
        let reason = format!("{} + {} is not supported", config.device, dtype);
        info!("{}: skipped, {}", scenario.name(), reason);
        return Ok(Outcome::Skipped { reason });
    }
    let tolerance = config
        .tolerances
        .get(dtype)
        .ok_or_else(|| HarnessError::InvalidCase(format!("no tolerance for dtype {}", dtype)))?;

    let actual = scenario.compute(case, &GradientOptions::prim(), config)?;
    let desired = scenario.compute(case, &GradientOptions::kernel(), config)?;
    if desired.shape() != case.shape() {
        return Err(HarnessError::Mismatch(MismatchReport::Shape {
            actual: desired.shape(),
            desired: case.shape(),
        }));
    }
    let stats = assert_allclose(&actual, &desired, tolerance).map_err(|report| {
        warn!("{}: {}", scenario.name(), report);
        HarnessError::Mismatch(report)
    })?;

    let report = ComparisonReport {
        scenario: scenario.name(),
        dtype,
        shape: case.shape(),
        tolerance,
        stats,
    };
    info!("passed: {}", report);
    Ok(Outcome::Passed(report))
}
