//! The three launch strategies.
//!
//! | Variant             | Launch               | Returns            |
//! |---------------------|----------------------|--------------------|
//! | `Basic`             | one block per tile   | after completion   |
//! | `CooperativeBasic`  | resident grid-stride | after grid barrier |
//! | `CooperativeAsync`  | resident grid-stride | after enqueue      |

use launchbench_common::{BenchError, Result};

mod basic;
mod cooperative;
mod cooperative_async;

pub use basic::Basic;
pub use cooperative::CooperativeBasic;
pub use cooperative_async::CooperativeAsync;

/// Per-thread body shared by every variant.
#[inline]
fn add_tile(out: &mut [i32], lhs: &[i32], rhs: &[i32]) {
    for ((o, &a), &b) in out.iter_mut().zip(lhs).zip(rhs) {
        *o = a.wrapping_add(b);
    }
}

fn check_lengths(result: usize, lhs: usize, rhs: usize) -> Result<()> {
    if lhs != result {
        return Err(BenchError::LengthMismatch { expected: result, actual: lhs });
    }
    if rhs != result {
        return Err(BenchError::LengthMismatch { expected: result, actual: rhs });
    }
    Ok(())
}
