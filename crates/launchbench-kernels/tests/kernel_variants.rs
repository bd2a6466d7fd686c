//! Cross-variant tests for the public kernel API.

use launchbench_common::BenchError;
use launchbench_kernels::{
    Basic, CooperativeAsync, CooperativeBasic, DeviceBuffer, Kernel, LaunchConfig, SharedBuffer,
};
use proptest::prelude::*;

fn variants(block: u32) -> Vec<Box<dyn Kernel<SharedBuffer>>> {
    vec![
        Box::new(Basic::new(block)),
        Box::new(CooperativeBasic::new(block)),
        Box::new(CooperativeAsync::new(block).unwrap()),
    ]
}

fn filled(len: usize, value: i32) -> SharedBuffer {
    let mut buf = SharedBuffer::with_len(len).unwrap();
    buf.fill(value).unwrap();
    buf
}

// ---------------------------------------------------------------------------
// Reference workload
// ---------------------------------------------------------------------------

#[test]
fn every_variant_adds_reference_constants() {
    for kernel in variants(256) {
        let mut result = SharedBuffer::with_len(10_000).unwrap();
        let (lhs, rhs) = (filled(10_000, 4), filled(10_000, 6));
        kernel.launch(&mut result, &lhs, &rhs).unwrap();
        kernel.synchronize().unwrap();
        assert!(
            result.to_host().unwrap().iter().all(|&v| v == 10),
            "{} left a wrong element",
            kernel.name()
        );
    }
}

#[test]
fn repeated_launches_are_idempotent() {
    for kernel in variants(64) {
        let mut result = SharedBuffer::with_len(777).unwrap();
        let (lhs, rhs) = (filled(777, 4), filled(777, 6));
        for _ in 0..5 {
            kernel.launch(&mut result, &lhs, &rhs).unwrap();
        }
        kernel.synchronize().unwrap();
        assert_eq!(result.to_host().unwrap(), vec![10; 777], "{}", kernel.name());
    }
}

#[test]
fn inputs_are_not_mutated() {
    for kernel in variants(32) {
        let mut result = SharedBuffer::with_len(100).unwrap();
        let (lhs, rhs) = (filled(100, 4), filled(100, 6));
        kernel.launch(&mut result, &lhs, &rhs).unwrap();
        kernel.synchronize().unwrap();
        assert_eq!(lhs.to_host().unwrap(), vec![4; 100]);
        assert_eq!(rhs.to_host().unwrap(), vec![6; 100]);
    }
}

#[test]
fn zero_length_launch_is_a_no_op() {
    for kernel in variants(256) {
        let mut result = SharedBuffer::with_len(0).unwrap();
        let (lhs, rhs) = (filled(0, 4), filled(0, 6));
        kernel.launch(&mut result, &lhs, &rhs).unwrap();
        kernel.synchronize().unwrap();
        assert!(result.is_empty());
    }
}

#[test]
fn variant_names_match_registration() {
    let names: Vec<String> = variants(256).iter().map(|k| k.name().to_string()).collect();
    assert_eq!(names, ["Basic", "Cooperative_basic", "Cooperative_async"]);
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn mismatched_lengths_are_rejected_by_every_variant() {
    for kernel in variants(16) {
        let mut result = SharedBuffer::with_len(32).unwrap();
        let (lhs, rhs) = (filled(32, 1), filled(31, 1));
        let err = kernel.launch(&mut result, &lhs, &rhs).unwrap_err();
        assert!(matches!(err, BenchError::LengthMismatch { expected: 32, actual: 31 }));
    }
}

#[test]
fn boxed_kernel_forwards_synchronize() {
    let kernel: Box<dyn Kernel<SharedBuffer>> = Box::new(CooperativeAsync::new(128).unwrap());
    let boxed = Box::new(kernel);
    let mut result = SharedBuffer::with_len(2048).unwrap();
    let (lhs, rhs) = (filled(2048, 4), filled(2048, 6));
    boxed.launch(&mut result, &lhs, &rhs).unwrap();
    boxed.synchronize().unwrap();
    assert_eq!(result.to_host().unwrap(), vec![10; 2048]);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn from_host(values: &[i32]) -> SharedBuffer {
    let mut buf = SharedBuffer::with_len(values.len()).unwrap();
    buf.copy_from_host(values).unwrap();
    buf
}

fn reference(lhs: &[i32], rhs: &[i32]) -> Vec<i32> {
    lhs.iter().zip(rhs).map(|(x, y)| x.wrapping_add(*y)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn cooperative_matches_scalar_reference(
        lhs in prop::collection::vec(any::<i32>(), 0..2048),
        grid in 1u32..16,
        block in 1u32..64,
    ) {
        let rhs: Vec<i32> = lhs.iter().map(|v| v.rotate_left(7)).collect();
        let mut result = SharedBuffer::with_len(lhs.len()).unwrap();
        let kernel = CooperativeBasic::with_config(LaunchConfig { grid, block });
        kernel.launch(&mut result, &from_host(&lhs), &from_host(&rhs)).unwrap();
        prop_assert_eq!(result.to_host().unwrap(), reference(&lhs, &rhs));
    }

    #[test]
    fn async_matches_scalar_reference(
        lhs in prop::collection::vec(any::<i32>(), 0..1024),
        grid in 1u32..8,
        block in 1u32..64,
    ) {
        let rhs: Vec<i32> = lhs.iter().map(|v| v.wrapping_mul(3)).collect();
        let mut result = SharedBuffer::with_len(lhs.len()).unwrap();
        let kernel = CooperativeAsync::with_config(LaunchConfig { grid, block }).unwrap();
        kernel.launch(&mut result, &from_host(&lhs), &from_host(&rhs)).unwrap();
        kernel.synchronize().unwrap();
        prop_assert_eq!(result.to_host().unwrap(), reference(&lhs, &rhs));
    }

    #[test]
    fn basic_matches_scalar_reference(
        lhs in prop::collection::vec(any::<i32>(), 0..2048),
        block in 1u32..300,
    ) {
        let rhs: Vec<i32> = lhs.iter().map(|v| v ^ 0x5555).collect();
        let mut result = SharedBuffer::with_len(lhs.len()).unwrap();
        Basic::new(block).launch(&mut result, &from_host(&lhs), &from_host(&rhs)).unwrap();
        prop_assert_eq!(result.to_host().unwrap(), reference(&lhs, &rhs));
    }
}
