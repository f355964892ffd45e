use primgrad_check::{
    compare, CumsumScenario, GradCase, HarnessConfig, HarnessError, MismatchReport, Outcome, PrimeNetScenario,
    Scenario,
};
use primgrad_core::{DType, GradientOptions, PrimGradError, StorageDevice, Tensor};

mod common;
use common::seeded_case;

fn run_case(shape: &[usize], dtype: DType) -> Result<Outcome, HarnessError> {
    let config = HarnessConfig::default();
    let case = seeded_case(&config, shape, dtype);
    compare(&config, &CumsumScenario::new(-1), &case)
}

#[test]
fn test_cumsum_grad_comp_float16_is_skipped_on_cpu() {
    let outcome = run_case(&[10, 10, 10], DType::F16).unwrap();
    assert_eq!(
        outcome,
        Outcome::Skipped {
            reason: "cpu + float16 is not supported".to_string()
        }
    );
}

#[test]
fn test_cumsum_grad_comp_float32() {
    let outcome = run_case(&[10, 10, 10], DType::F32).unwrap();
    let report = outcome.report().expect("float32 case must be compared");
    assert_eq!(report.shape, vec![10, 10, 10]);
    assert_eq!(report.stats.total, 1000);
    assert_eq!(report.stats.mismatched, 0);
}

#[test]
fn test_cumsum_grad_comp_float64() {
    let outcome = run_case(&[4, 8, 16, 16], DType::F64).unwrap();
    assert!(outcome.is_passed());
    assert_eq!(outcome.report().map(|r| r.stats.total), Some(4 * 8 * 16 * 16));
}

#[test]
fn test_other_axes_agree() {
    let config = HarnessConfig::default();
    let case = seeded_case(&config, &[3, 5, 7], DType::F64);
    for axis in [0, 1, 2, -2, -3] {
        assert!(compare(&config, &CumsumScenario::new(axis), &case).unwrap().is_passed());
    }
}

#[test]
fn test_float16_without_skip_reports_missing_kernel() {
    let config = HarnessConfig::default().with_unsupported(Vec::new());
    let case = seeded_case(&config, &[4, 4], DType::F16);
    let err = compare(&config, &CumsumScenario::new(-1), &case).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Framework(PrimGradError::UnsupportedKernel {
            dtype: DType::F16,
            device: StorageDevice::CPU,
            ..
        })
    ));
}

#[test]
fn test_prime_net_prim_matches_kernel() {
    let config = HarnessConfig::default();
    for dtype in [DType::F32, DType::F64] {
        let case = seeded_case(&config, &[3, 4], dtype);
        let outcome = compare(&config, &PrimeNetScenario, &case).unwrap();
        assert!(outcome.is_passed(), "{} {:?}", dtype, outcome);
    }
}

#[test]
fn test_prime_net_batched_input() {
    let config = HarnessConfig::default();
    let case = seeded_case(&config, &[2, 5, 4], DType::F64);
    assert!(compare(&config, &PrimeNetScenario, &case).unwrap().is_passed());
}

/// Returns a perturbed gradient on the prim path only.
struct Perturbed;

impl Scenario for Perturbed {
    fn name(&self) -> String {
        "perturbed".to_string()
    }

    fn compute(
        &self,
        case: &GradCase,
        options: &GradientOptions,
        config: &HarnessConfig,
    ) -> Result<Tensor, HarnessError> {
        let grad = CumsumScenario::new(-1).compute(case, options, config)?;
        if !options.prim_backward {
            return Ok(grad);
        }
        let mut values = grad.get_f64_data()?;
        values[3] += 1e-9;
        Ok(Tensor::new_f64(values, grad.shape())?)
    }
}

#[test]
fn test_mismatch_is_reported() {
    let config = HarnessConfig::default();
    let case = seeded_case(&config, &[2, 3], DType::F64);
    match compare(&config, &Perturbed, &case).unwrap_err() {
        HarnessError::Mismatch(MismatchReport::Values { stats, .. }) => {
            assert_eq!(stats.mismatched, 1);
            assert_eq!(stats.first_mismatch, Some(3));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_gpu_device_fails_with_framework_error() {
    let config = HarnessConfig::default().with_device(StorageDevice::GPU);
    let case = seeded_case(&config, &[2, 2], DType::F32);
    let err = compare(&config, &CumsumScenario::new(-1), &case).unwrap_err();
    assert!(matches!(err, HarnessError::Framework(PrimGradError::UnsupportedOperation(_))));
}

/// Flattens the gradient on one lowering only.
struct Flattened {
    on_prim: bool,
}

impl Scenario for Flattened {
    fn name(&self) -> String {
        format!("flattened(prim={})", self.on_prim)
    }

    fn compute(
        &self,
        case: &GradCase,
        options: &GradientOptions,
        config: &HarnessConfig,
    ) -> Result<Tensor, HarnessError> {
        let grad = CumsumScenario::new(-1).compute(case, options, config)?;
        if options.prim_backward != self.on_prim {
            return Ok(grad);
        }
        Ok(Tensor::new_f64(grad.get_f64_data()?, vec![grad.numel()])?)
    }
}

#[test]
fn test_gradient_shape_change_is_reported() {
    let config = HarnessConfig::default();
    let case = seeded_case(&config, &[2, 3], DType::F64);
    for on_prim in [true, false] {
        match compare(&config, &Flattened { on_prim }, &case).unwrap_err() {
            HarnessError::Mismatch(MismatchReport::Shape { actual, desired }) => {
                assert_eq!(actual, vec![6], "prim={}", on_prim);
                assert_eq!(desired, vec![2, 3], "prim={}", on_prim);
            }
            other => panic!("prim={}: unexpected error {:?}", on_prim, other),
        }
    }
}
