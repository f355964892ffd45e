use super::*;
use crate::nn::init::Initializer;
use crate::static_graph::{gradients, layers, program_guard, GradientOptions};
use crate::types::DType;
use approx::assert_relative_eq;

fn feeds(entries: &[(&str, Tensor)]) -> FeedDict {
    entries
        .iter()
        .map(|(name, tensor)| (name.to_string(), tensor.clone()))
        .collect()
}

#[test]
fn test_run_forward_cumsum() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let x = guard.data("x", &[2, 3], DType::F32).unwrap();
    let y = layers::cumsum(&x, Some(-1), false, false).unwrap();

    let mut exe = Executor::new(StorageDevice::CPU);
    let input = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![2, 3]).unwrap();
    let out = exe.run(&main, &feeds(&[("x", input)]), &[y]).unwrap();

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].shape(), vec![2, 3]);
    assert_eq!(out[0].get_f32_data().unwrap(), vec![1.0, 3.0, 6.0, 4.0, 9.0, 15.0]);
}

#[test]
fn test_prim_and_kernel_gradients_agree() {
    let run = |options: GradientOptions| -> Vec<f64> {
        let main = Program::new();
        let startup = Program::new();
        let guard = program_guard(&main, &startup);
        let primal = guard.data("primal", &[3, 4], DType::F64).unwrap();
        let cotangent = guard.data("cotangent", &[3, 4], DType::F64).unwrap();
        primal.set_stop_gradient(false);
        let y = layers::cumsum(&primal, Some(1), false, false).unwrap();
        let grads = gradients(&[y], &[primal], Some(&[cotangent]), &options).unwrap();
        let dx = grads[0].clone().unwrap();

        let values: Vec<f64> = (0..12).map(|i| i as f64 * 0.25).collect();
        let mut exe = Executor::new(StorageDevice::CPU);
        exe.run(&startup, &FeedDict::new(), &[]).unwrap();
        let out = exe
            .run(
                &main,
                &feeds(&[
                    ("primal", Tensor::new_f64(values.clone(), vec![3, 4]).unwrap()),
                    ("cotangent", Tensor::new_f64(values, vec![3, 4]).unwrap()),
                ]),
                &[dx],
            )
            .unwrap();
        out[0].get_f64_data().unwrap()
    };
    let prim = run(GradientOptions::prim());
    let kernel = run(GradientOptions::kernel());
    assert_eq!(prim, kernel);
    // Row 0 cotangent [0, .25, .5, .75] -> suffix sums.
    assert_relative_eq!(prim[0], 1.5);
    assert_relative_eq!(prim[3], 0.75);
}

#[test]
fn test_pruning_skips_unfetched_ops() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let x = guard.data("x", &[2], DType::F32).unwrap();
    let other = guard.data("other", &[2], DType::F32).unwrap();
    let y = layers::flip(&x, &[0]).unwrap();
    layers::flip(&other, &[0]).unwrap();

    let mut exe = Executor::new(StorageDevice::CPU);
    let out = exe
        .run(&main, &feeds(&[("x", Tensor::new(vec![1.0, 2.0], vec![2]).unwrap())]), &[y])
        .unwrap();
    assert_eq!(out[0].get_f32_data().unwrap(), vec![2.0, 1.0]);
}

#[test]
fn test_missing_feed() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let x = guard.data("x", &[2], DType::F32).unwrap();
    let y = layers::flip(&x, &[0]).unwrap();

    let err = Executor::new(StorageDevice::CPU)
        .run(&main, &FeedDict::new(), &[y])
        .unwrap_err();
    assert_eq!(err, PrimGradError::MissingFeed("x".to_string()));
}

#[test]
fn test_feed_mismatch() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let x = guard.data("x", &[2], DType::F32).unwrap();
    let y = layers::flip(&x, &[0]).unwrap();

    let wrong = Tensor::new_f64(vec![1.0, 2.0], vec![2]).unwrap();
    let err = Executor::new(StorageDevice::CPU)
        .run(&main, &feeds(&[("x", wrong)]), &[y])
        .unwrap_err();
    assert!(matches!(
        err,
        PrimGradError::FeedMismatch {
            expected_dtype: DType::F32,
            actual_dtype: DType::F64,
            ..
        }
    ));
}

#[test]
fn test_f16_cumsum_has_no_cpu_kernel() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let x = guard.data("x", &[2], DType::F16).unwrap();
    let y = layers::cumsum(&x, Some(0), false, false).unwrap();

    let input = Tensor::new_f16(vec![half::f16::ONE, half::f16::ONE], vec![2]).unwrap();
    let err = Executor::new(StorageDevice::CPU)
        .run(&main, &feeds(&[("x", input)]), &[y])
        .unwrap_err();
    assert_eq!(
        err,
        PrimGradError::UnsupportedKernel {
            op: "cumsum".to_string(),
            dtype: DType::F16,
            device: StorageDevice::CPU,
        }
    );
}

#[test]
fn test_uninitialized_parameter() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let w = guard
        .create_parameter("w", &[2], DType::F32, Initializer::Constant(1.0))
        .unwrap();
    let y = layers::flip(&w, &[0]).unwrap();

    let err = Executor::new(StorageDevice::CPU)
        .run(&main, &FeedDict::new(), &[y])
        .unwrap_err();
    assert_eq!(err, PrimGradError::UninitializedParameter("w".to_string()));
}

#[test]
fn test_parameter_set_directly_in_scope() {
    let main = Program::new();
    let startup = Program::new();
    let guard = program_guard(&main, &startup);
    let w = guard
        .create_parameter("w", &[3], DType::F32, Initializer::Constant(1.0))
        .unwrap();
    let y = layers::flip(&w, &[0]).unwrap();

    let mut exe = Executor::new(StorageDevice::CPU);
    exe.scope_mut()
        .set("w", Tensor::new(vec![1.0f32, 2.0, 3.0], vec![3]).unwrap());
    assert_eq!(exe.scope().names(), vec!["w".to_string()]);

    let out = exe.run(&main, &FeedDict::new(), &[y]).unwrap();
    assert_eq!(out[0].get_f32_data().unwrap(), vec![3.0, 2.0, 1.0]);
}

#[test]
fn test_startup_fills_scope() {
    let main = Program::new();
    let startup = Program::new();
    startup.set_random_seed(42);
    let guard = program_guard(&main, &startup);
    guard
        .create_parameter("w", &[4, 4], DType::F32, Initializer::XavierUniform)
        .unwrap();
    guard
        .create_parameter("b", &[4], DType::F32, Initializer::Constant(0.0))
        .unwrap();

    let mut exe = Executor::new(StorageDevice::CPU);
    exe.run(&startup, &FeedDict::new(), &[]).unwrap();
    assert_eq!(exe.scope().names(), vec!["b".to_string(), "w".to_string()]);
    let limit = (6.0f32 / 8.0).sqrt();
    let w = exe.scope().get("w").unwrap().get_f32_data().unwrap();
    assert!(w.iter().all(|v| v.abs() <= limit + 1e-6));

    let mut again = Executor::new(StorageDevice::CPU);
    again.run(&startup, &FeedDict::new(), &[]).unwrap();
    assert_eq!(again.scope().get("w").unwrap().get_f32_data().unwrap(), w);
}

#[test]
fn test_gpu_device_is_unsupported() {
    let main = Program::new();
    let err = Executor::new(StorageDevice::GPU)
        .run(&main, &FeedDict::new(), &[])
        .unwrap_err();
    assert!(matches!(err, PrimGradError::UnsupportedOperation(_)));
}

#[test]
fn test_fetch_from_other_program() {
    let main = Program::new();
    let other = Program::new();
    let startup = Program::new();
    let x = program_guard(&other, &startup).data("x", &[2], DType::F32).unwrap();

    let err = Executor::new(StorageDevice::CPU)
        .run(&main, &FeedDict::new(), &[x])
        .unwrap_err();
    assert!(matches!(err, PrimGradError::ProgramMismatch { .. }));
}
