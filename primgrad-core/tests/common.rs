use primgrad_core::{DType, FeedDict, Tensor};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Uniform `[0, 1)` tensor from a fixed seed.
#[allow(dead_code)]
pub fn seeded_uniform(shape: &[usize], dtype: DType, seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    primgrad_core::tensor::rand_uniform(shape, dtype, 0.0, 1.0, &mut rng).expect("Test tensor creation failed")
}

#[allow(dead_code)]
pub fn feed(entries: Vec<(&str, Tensor)>) -> FeedDict {
    entries.into_iter().map(|(name, t)| (name.to_string(), t)).collect()
}
