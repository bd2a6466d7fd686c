//! Elementwise add kernels and the buffers they run on
//!
//! The harness only sees two contracts defined here:
//!
//! | Contract       | Operations                                          |
//! |----------------|-----------------------------------------------------|
//! | `DeviceBuffer` | construct by size, fill, host upload, host view     |
//! | `Kernel`       | `launch(result, lhs, rhs)`, `synchronize()`         |
//!
//! The shipped implementations emulate a device on the host: `SharedBuffer`
//! is memory visible to both sides, blocks of a launch run on the rayon pool
//! and `Stream` queues asynchronous launches on a worker thread.
//!
//! # Usage
//!
//! ```rust
//! use launchbench_kernels::{Basic, DeviceBuffer, Kernel, SharedBuffer};
//!
//! let mut result = SharedBuffer::with_len(1024)?;
//! let mut lhs = SharedBuffer::with_len(1024)?;
//! let mut rhs = SharedBuffer::with_len(1024)?;
//! lhs.fill(4)?;
//! rhs.fill(6)?;
//!
//! let kernel = Basic::new(256);
//! kernel.launch(&mut result, &lhs, &rhs)?;
//! kernel.synchronize()?;
//! assert!(result.to_host()?.iter().all(|&v| v == 10));
//! # Ok::<(), launchbench_common::BenchError>(())
//! ```

use launchbench_common::Result;

pub mod buffer;
pub mod kernels;
pub mod launch;
pub mod stream;

pub use buffer::{DeviceBuffer, SharedBuffer};
pub use kernels::{Basic, CooperativeAsync, CooperativeBasic};
pub use launch::LaunchConfig;
pub use stream::{DEFAULT_QUEUE_DEPTH, Stream};

/// A launch strategy computing `result[i] = lhs[i] + rhs[i]` for every element.
///
/// Any extra launch arguments (geometry, stream) live in the implementing
/// value and are reused unchanged by every launch.
pub trait Kernel<B: DeviceBuffer>: Send + Sync {
    fn name(&self) -> &str;

    /// Launch the kernel once. Asynchronous strategies may return before
    /// `result` holds the final values.
    fn launch(&self, result: &mut B, lhs: &B, rhs: &B) -> Result<()>;

    /// Block until every launch issued so far has completed.
    fn synchronize(&self) -> Result<()> {
        Ok(())
    }
}

impl<B: DeviceBuffer, K: Kernel<B> + ?Sized> Kernel<B> for Box<K> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn launch(&self, result: &mut B, lhs: &B, rhs: &B) -> Result<()> {
        (**self).launch(result, lhs, rhs)
    }

    fn synchronize(&self) -> Result<()> {
        (**self).synchronize()
    }
}
