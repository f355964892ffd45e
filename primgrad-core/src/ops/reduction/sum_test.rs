use super::*;
use approx::assert_relative_eq;

#[test]
fn test_sum_to_bias_shape() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
    let r = sum_to_op(&t, &[3])?;
    assert_eq!(r.shape(), vec![3]);
    assert_eq!(r.get_f32_data()?, vec![5.0, 7.0, 9.0]);
    Ok(())
}

#[test]
fn test_sum_to_keepdim_shape() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
    let r = sum_to_op(&t, &[2, 1])?;
    assert_eq!(r.get_f32_data()?, vec![6.0, 15.0]);
    Ok(())
}

#[test]
fn test_sum_to_scalar_and_identity() -> Result<(), PrimGradError> {
    let t = Tensor::new_f64(vec![0.25; 8], vec![2, 2, 2])?;
    let all = sum_to_op(&t, &[])?;
    assert_relative_eq!(all.get_f64_data()?[0], 2.0);
    let same = sum_to_op(&t, &[2, 2, 2])?;
    assert_eq!(same.get_f64_data()?, vec![0.25; 8]);
    Ok(())
}

#[test]
fn test_sum_to_rejects_non_broadcast_target() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0; 6], vec![2, 3])?;
    assert!(matches!(
        sum_to_op(&t, &[2]),
        Err(PrimGradError::ShapeMismatch { .. })
    ));
    Ok(())
}
