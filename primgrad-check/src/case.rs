use rand::Rng;

use primgrad_core::ops::dtype::cast_op;
use primgrad_core::tensor::rand_uniform;
use primgrad_core::{DType, Tensor};

use crate::error::HarnessError;

/// Inputs of one comparison: the primal and the cotangent seeding the VJP.
///
/// Both tensors share the case dtype and the same shape.
#[derive(Debug, Clone)]
pub struct GradCase {
    primal: Tensor,
    cotangent: Tensor,
}

impl GradCase {
    /// # Errors
    /// `InvalidCase` if shapes or dtypes of the two tensors differ.
    pub fn new(primal: Tensor, cotangent: Tensor) -> Result<Self, HarnessError> {
        if primal.shape() != cotangent.shape() {
            return Err(HarnessError::InvalidCase(format!(
                "primal shape {:?} differs from cotangent shape {:?}",
                primal.shape(),
                cotangent.shape()
            )));
        }
        if primal.dtype() != cotangent.dtype() {
            return Err(HarnessError::InvalidCase(format!(
                "primal dtype {} differs from cotangent dtype {}",
                primal.dtype(),
                cotangent.dtype()
            )));
        }
        Ok(GradCase { primal, cotangent })
    }

    /// Uniform `[0, 1)` primal and cotangent drawn in f64, then cast to `dtype`.
    pub fn random<R: Rng + ?Sized>(shape: &[usize], dtype: DType, rng: &mut R) -> Result<Self, HarnessError> {
        let primal = rand_uniform(shape, DType::F64, 0.0, 1.0, rng)?;
        let cotangent = rand_uniform(shape, DType::F64, 0.0, 1.0, rng)?;
        GradCase::new(cast_op(&primal, dtype)?, cast_op(&cotangent, dtype)?)
    }

    pub fn primal(&self) -> &Tensor {
        &self.primal
    }

    pub fn cotangent(&self) -> &Tensor {
        &self.cotangent
    }

    pub fn dtype(&self) -> DType {
        self.primal.dtype()
    }

    pub fn shape(&self) -> Vec<usize> {
        self.primal.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_case_is_cast() {
        let mut rng = StdRng::seed_from_u64(0);
        let case = GradCase::random(&[2, 3], DType::F16, &mut rng).unwrap();
        assert_eq!(case.dtype(), DType::F16);
        assert_eq!(case.shape(), vec![2, 3]);
        assert!(case.primal().to_f64_vec().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_same_seed_same_values_across_dtypes() {
        let f32_case = GradCase::random(&[4], DType::F32, &mut StdRng::seed_from_u64(9)).unwrap();
        let f64_case = GradCase::random(&[4], DType::F64, &mut StdRng::seed_from_u64(9)).unwrap();
        let narrow = f32_case.cotangent().get_f32_data().unwrap();
        let wide = f64_case.cotangent().get_f64_data().unwrap();
        for (n, w) in narrow.iter().zip(wide.iter()) {
            assert_eq!(*n, *w as f32);
        }
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let primal = Tensor::new(vec![0.0; 4], vec![4]).unwrap();
        let cotangent = Tensor::new(vec![0.0; 4], vec![2, 2]).unwrap();
        assert!(matches!(
            GradCase::new(primal, cotangent),
            Err(HarnessError::InvalidCase(_))
        ));
    }
}
