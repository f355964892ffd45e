use primgrad_check::{GradCase, HarnessConfig};
use primgrad_core::DType;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Routes `log` output through env_logger; safe to call from every test.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A random case drawn from the config seed.
#[allow(dead_code)]
pub fn seeded_case(config: &HarnessConfig, shape: &[usize], dtype: DType) -> GradCase {
    init_logger();
    let mut rng = StdRng::seed_from_u64(config.seed);
    GradCase::random(shape, dtype, &mut rng).expect("Test case creation failed")
}
