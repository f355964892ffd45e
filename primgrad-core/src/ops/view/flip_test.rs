use super::*;

#[test]
fn test_flip_1d() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0, 3.0], vec![3])?;
    assert_eq!(flip_op(&t, &[0])?.get_f32_data()?, vec![3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_flip_last_axis_2d() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
    let r = flip_op(&t, &[-1])?;
    assert_eq!(r.shape(), vec![2, 3]);
    assert_eq!(r.get_f32_data()?, vec![3.0, 2.0, 1.0, 6.0, 5.0, 4.0]);
    Ok(())
}

#[test]
fn test_flip_both_axes() -> Result<(), PrimGradError> {
    let t = Tensor::new_f64(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2])?;
    assert_eq!(flip_op(&t, &[0, 1, -1])?.get_f64_data()?, vec![4.0, 3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_flip_is_involution() -> Result<(), PrimGradError> {
    let t = Tensor::new((0..24).map(|x| x as f32).collect(), vec![2, 3, 4])?;
    let twice = flip_op(&flip_op(&t, &[1, 2])?, &[1, 2])?;
    assert_eq!(twice.get_f32_data()?, t.get_f32_data()?);
    Ok(())
}

#[test]
fn test_flip_invalid_axis() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0], vec![2])?;
    assert_eq!(
        flip_op(&t, &[2]).unwrap_err(),
        PrimGradError::InvalidAxis { axis: 2, rank: 1 }
    );
    Ok(())
}
