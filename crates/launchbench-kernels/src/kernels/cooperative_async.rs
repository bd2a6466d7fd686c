//! Cooperative launch enqueued on a stream.

use super::check_lengths;
use super::cooperative::grid_stride_add;
use crate::buffer::{DeviceBuffer, SharedBuffer, read_storage, write_storage};
use crate::{Kernel, LaunchConfig, Stream};
use launchbench_common::Result;

/// Same grid-stride body as [`CooperativeBasic`](super::CooperativeBasic), but
/// `launch` only enqueues the work on the kernel's own stream.
///
/// The result buffer is complete only after [`Kernel::synchronize`].
pub struct CooperativeAsync {
    config: LaunchConfig,
    stream: Stream,
}

impl CooperativeAsync {
    pub fn new(block: u32) -> Result<Self> {
        Self::with_config(LaunchConfig::cooperative(block))
    }

    pub fn with_config(config: LaunchConfig) -> Result<Self> {
        Ok(Self { config, stream: Stream::new("cooperative-async")? })
    }

    pub fn config(&self) -> LaunchConfig {
        self.config
    }
}

impl Kernel<SharedBuffer> for CooperativeAsync {
    fn name(&self) -> &str {
        "Cooperative_async"
    }

    fn launch(
        &self,
        result: &mut SharedBuffer,
        lhs: &SharedBuffer,
        rhs: &SharedBuffer,
    ) -> Result<()> {
        check_lengths(result.len(), lhs.len(), rhs.len())?;
        let (out, a, b) = (result.storage(), lhs.storage(), rhs.storage());
        let config = self.config;

        self.stream.submit(move || {
            let mut dst = write_storage(&out);
            grid_stride_add(&mut dst, &read_storage(&a), &read_storage(&b), config);
            Ok(())
        })
    }

    fn synchronize(&self) -> Result<()> {
        self.stream.synchronize()
    }
}
