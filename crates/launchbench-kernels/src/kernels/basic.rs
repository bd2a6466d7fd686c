//! Baseline synchronous launch.

use super::{add_tile, check_lengths};
use crate::buffer::{DeviceBuffer, SharedBuffer};
use crate::{Kernel, LaunchConfig};
use launchbench_common::Result;
use rayon::prelude::*;
use tracing::trace;

/// One block of `block` threads per tile of the buffer; the call returns once
/// every block has finished.
#[derive(Debug, Clone, Copy)]
pub struct Basic {
    block: u32,
}

impl Basic {
    pub fn new(block: u32) -> Self {
        Self { block: block.max(1) }
    }
}

impl Kernel<SharedBuffer> for Basic {
    fn name(&self) -> &str {
        "Basic"
    }

    fn launch(
        &self,
        result: &mut SharedBuffer,
        lhs: &SharedBuffer,
        rhs: &SharedBuffer,
    ) -> Result<()> {
        check_lengths(result.len(), lhs.len(), rhs.len())?;
        let config = LaunchConfig::linear(result.len(), self.block);
        let tile = config.block as usize;
        trace!(grid = config.grid, block = config.block, "basic launch");

        let mut out = result.write();
        let (lhs, rhs) = (lhs.read(), rhs.read());
        out.par_chunks_mut(tile)
            .zip(lhs.par_chunks(tile))
            .zip(rhs.par_chunks(tile))
            .for_each(|((dst, a), b)| add_tile(dst, a, b));
        Ok(())
    }
}
