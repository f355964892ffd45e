use super::*;

#[test]
fn test_new_checks_length() {
    let err = Tensor::new(vec![1.0, 2.0, 3.0], vec![2, 2]).unwrap_err();
    assert_eq!(
        err,
        PrimGradError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2]
        }
    );
}

#[test]
fn test_accessors() -> Result<(), PrimGradError> {
    let t = Tensor::new_f64(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3])?;
    assert_eq!(t.shape(), vec![2, 3]);
    assert_eq!(t.strides(), vec![3, 1]);
    assert_eq!(t.dtype(), DType::F64);
    assert_eq!(t.device(), StorageDevice::CPU);
    assert_eq!(t.rank(), 2);
    assert_eq!(t.numel(), 6);
    assert_eq!(t.get_f64_data()?, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    Ok(())
}

#[test]
fn test_typed_getter_rejects_other_dtype() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0, 2.0], vec![2])?;
    assert!(matches!(
        t.get_f64_data(),
        Err(PrimGradError::DataTypeMismatch {
            expected: DType::F64,
            actual: DType::F32,
            ..
        })
    ));
    Ok(())
}

#[test]
fn test_to_f64_vec_widens_f16() -> Result<(), PrimGradError> {
    let t = Tensor::new_f16(vec![f16::from_f32(0.5), f16::from_f32(-2.0)], vec![2])?;
    assert_eq!(t.to_f64_vec(), vec![0.5, -2.0]);
    Ok(())
}

#[test]
fn test_scalar_tensor() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![3.0], vec![])?;
    assert_eq!(t.numel(), 1);
    assert_eq!(t.rank(), 0);
    Ok(())
}

#[test]
fn test_clone_is_shallow() -> Result<(), PrimGradError> {
    let t = Tensor::new(vec![1.0], vec![1])?;
    let c = t.clone();
    assert!(t.ptr_eq(&c));
    Ok(())
}
