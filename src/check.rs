//! Result verification.

use launchbench_common::{Result, ValidationError};
use launchbench_kernels::DeviceBuffer;
use tracing::{debug, error};

/// Predicate accepting exactly `expected`.
pub fn expect_value(expected: i32) -> impl Fn(i32) -> bool {
    move |value| value == expected
}

/// Scan every element of `buffer` with `predicate`.
///
/// The scan does not stop at the first rejected element; the error carries the
/// total count along with the first offender.
pub fn check_buffer<B: DeviceBuffer>(buffer: &B, predicate: impl Fn(i32) -> bool) -> Result<()> {
    let outcome = buffer.with_host_slice(|data| scan(data, &predicate))?;
    match outcome {
        None => {
            debug!(len = buffer.len(), "result buffer verified");
            Ok(())
        }
        Some(err) => {
            error!(
                mismatches = err.mismatches,
                first_index = err.first_index,
                first_value = err.first_value,
                "result buffer failed verification"
            );
            Err(err.into())
        }
    }
}

fn scan(data: &[i32], predicate: &impl Fn(i32) -> bool) -> Option<ValidationError> {
    let mut first: Option<(usize, i32)> = None;
    let mut mismatches = 0;
    for (index, &value) in data.iter().enumerate() {
        if !predicate(value) {
            mismatches += 1;
            first.get_or_insert((index, value));
        }
    }
    first.map(|(first_index, first_value)| ValidationError {
        len: data.len(),
        mismatches,
        first_index,
        first_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use launchbench_common::BenchError;
    use launchbench_kernels::SharedBuffer;

    fn buffer(values: &[i32]) -> SharedBuffer {
        let mut buf = SharedBuffer::with_len(values.len()).unwrap();
        buf.copy_from_host(values).unwrap();
        buf
    }

    #[test]
    fn uniform_buffer_passes() {
        assert!(check_buffer(&buffer(&[10; 64]), expect_value(10)).is_ok());
    }

    #[test]
    fn empty_buffer_passes() {
        assert!(check_buffer(&buffer(&[]), expect_value(10)).is_ok());
    }

    #[test]
    fn every_mismatch_is_counted() {
        let err = check_buffer(&buffer(&[10, 9, 10, 0, 11]), expect_value(10)).unwrap_err();
        let BenchError::Validation(report) = &err else {
            panic!("expected a validation error, got {err:?}");
        };
        assert_eq!(
            *report,
            ValidationError { len: 5, mismatches: 3, first_index: 1, first_value: 9 }
        );
    }

    #[test]
    fn last_element_is_checked() {
        let mut values = vec![10; 1000];
        values[999] = 0;
        let err = check_buffer(&buffer(&values), expect_value(10)).unwrap_err();
        assert!(err.is_validation());
    }
}
