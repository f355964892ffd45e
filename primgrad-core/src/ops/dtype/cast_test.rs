use super::*;
use half::f16;

#[test]
fn test_cast_f32_to_f64_exact() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![0.1, -2.5], vec![2])?;
    let r = cast_op(&t, DType::F64)?;
    assert_eq!(r.dtype(), DType::F64);
    assert_eq!(r.get_f64_data()?, vec![0.1f32 as f64, -2.5]);
    Ok(())
}

#[test]
fn test_cast_f64_to_f16_rounds() -> Result<(), PrimGradError> {
    let t = Tensor::new_f64(vec![0.1, 1.0, 65504.0], vec![3])?;
    let r = cast_op(&t, DType::F16)?;
    assert_eq!(
        r.get_f16_data()?,
        vec![f16::from_f64(0.1), f16::ONE, f16::MAX]
    );
    Ok(())
}

#[test]
fn test_cast_same_dtype_shares() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0], vec![2])?;
    let r = cast_op(&t, DType::F32)?;
    assert!(r.ptr_eq(&t));
    Ok(())
}
