//! Device buffer contract and the host-shared implementation.

use launchbench_common::{BenchError, ELEMENT_WIDTH, Result};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Capability set a kernel buffer must offer the harness.
pub trait DeviceBuffer: Send + Sync + Sized {
    /// Allocate a zeroed buffer of `len` elements.
    fn with_len(len: usize) -> Result<Self>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `value` to every element.
    fn fill(&mut self, value: i32) -> Result<()>;

    /// Overwrite the elements with `src`, which must have the same length.
    fn copy_from_host(&mut self, src: &[i32]) -> Result<()>;

    /// Run `f` over a host view of the elements.
    ///
    /// Implementations backed by separate device memory copy into a staging
    /// area first. The view reflects completed work only once the kernels that
    /// write this buffer have been synchronized.
    fn with_host_slice<R>(&self, f: impl FnOnce(&[i32]) -> R) -> Result<R>;

    /// Copy the elements back to the host.
    fn to_host(&self) -> Result<Vec<i32>> {
        self.with_host_slice(|data| data.to_vec())
    }
}

/// Memory addressable from the host and from kernels, including kernels that
/// are still running on a stream.
///
/// Intentionally not `Clone`: every buffer has exactly one owner, and only
/// in-flight launches hold extra handles to the storage.
#[derive(Debug)]
pub struct SharedBuffer {
    storage: Arc<RwLock<Vec<i32>>>,
    len: usize,
}

impl SharedBuffer {
    /// Handle to the storage for work that outlives the launch call.
    pub(crate) fn storage(&self) -> Arc<RwLock<Vec<i32>>> {
        Arc::clone(&self.storage)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Vec<i32>> {
        read_storage(&self.storage)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Vec<i32>> {
        write_storage(&self.storage)
    }
}

impl DeviceBuffer for SharedBuffer {
    fn with_len(len: usize) -> Result<Self> {
        let bytes = len.saturating_mul(ELEMENT_WIDTH);
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| BenchError::Allocation { len, bytes })?;
        data.resize(len, 0);
        debug!(len, bytes, "allocated shared buffer");

        Ok(Self { storage: Arc::new(RwLock::new(data)), len })
    }

    fn len(&self) -> usize {
        self.len
    }

    fn fill(&mut self, value: i32) -> Result<()> {
        self.write().fill(value);
        Ok(())
    }

    fn copy_from_host(&mut self, src: &[i32]) -> Result<()> {
        if src.len() != self.len {
            return Err(BenchError::LengthMismatch { expected: self.len, actual: src.len() });
        }
        self.write().copy_from_slice(src);
        Ok(())
    }

    fn with_host_slice<R>(&self, f: impl FnOnce(&[i32]) -> R) -> Result<R> {
        Ok(f(&self.read()))
    }
}

// Recover from poisoned locks: a kernel that panicked mid-launch leaves wrong
// values behind, and verification is what reports those.
pub(crate) fn read_storage(storage: &RwLock<Vec<i32>>) -> RwLockReadGuard<'_, Vec<i32>> {
    storage.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_storage(storage: &RwLock<Vec<i32>>) -> RwLockWriteGuard<'_, Vec<i32>> {
    storage.write().unwrap_or_else(PoisonError::into_inner)
}
