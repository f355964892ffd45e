use super::*;
use crate::ops::cumulative::cumsum_op;
use crate::ops::view::flip_op;

#[test]
fn test_cumsum_grad_ones() -> Result<(), PrimGradError> {
    // d/dx_j sum_i y_i = number of outputs that include x_j
    let g = Tensor::new(vec![1.0; 4], vec![4])?;
    let dx = cumsum_grad_op(&g, &[4], Some(0), false, false)?;
    assert_eq!(dx.get_f32_data()?, vec![4.0, 3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_cumsum_grad_exclusive() -> Result<(), PrimGradError> {
    let g = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![4])?;
    let dx = cumsum_grad_op(&g, &[4], Some(0), true, false)?;
    // y = [0, x0, x0+x1, x0+x1+x2]
    assert_eq!(dx.get_f32_data()?, vec![9.0, 7.0, 4.0, 0.0]);
    Ok(())
}

#[test]
fn test_cumsum_grad_reverse() -> Result<(), PrimGradError> {
    let g = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], vec![4])?;
    let dx = cumsum_grad_op(&g, &[4], Some(0), false, true)?;
    // y_i = sum_{k>=i} x_k  =>  dx_j = sum_{i<=j} g_i
    assert_eq!(dx.get_f32_data()?, vec![1.0, 3.0, 6.0, 10.0]);
    Ok(())
}

#[test]
fn test_cumsum_grad_flatten_restores_shape() -> Result<(), PrimGradError> {
    let g = Tensor::new(vec![1.0; 6], vec![6])?;
    let dx = cumsum_grad_op(&g, &[2, 3], None, false, false)?;
    assert_eq!(dx.shape(), vec![2, 3]);
    assert_eq!(dx.get_f32_data()?, vec![6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    Ok(())
}

#[test]
fn test_cumsum_grad_matches_flip_scan_flip_bitwise() -> Result<(), PrimGradError> {
    let values: Vec<f64> = (0..60).map(|i| ((i * 37) % 17) as f64 / 7.0 + 0.013).collect();
    let g = Tensor::new_f64(values, vec![3, 4, 5])?;
    let kernel = cumsum_grad_op(&g, &[3, 4, 5], Some(-1), false, false)?;
    let flipped = flip_op(&g, &[2])?;
    let scanned = cumsum_op(&flipped, Some(-1), false, false)?;
    let composite = flip_op(&scanned, &[2])?;
    assert_eq!(kernel.get_f64_data()?, composite.get_f64_data()?);
    Ok(())
}

#[test]
fn test_cumsum_grad_shape_mismatch() -> Result<(), PrimGradError> {
    let g = Tensor::new(vec![1.0; 4], vec![4])?;
    assert!(matches!(
        cumsum_grad_op(&g, &[2, 3], Some(1), false, false),
        Err(PrimGradError::ShapeMismatch { .. })
    ));
    Ok(())
}
