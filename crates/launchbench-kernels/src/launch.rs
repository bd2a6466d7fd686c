//! Launch geometry for the emulated kernels.

/// Blocks each worker thread keeps resident during a cooperative launch.
pub const BLOCKS_PER_WORKER: u32 = 4;

/// Grid/block dimensions of a 1-D launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    pub grid: u32,
    pub block: u32,
}

impl LaunchConfig {
    /// One thread per element: enough blocks of `block` threads to cover `n`.
    pub fn linear(n: usize, block: u32) -> Self {
        let block = block.max(1);
        let grid = u32::try_from(n.div_ceil(block as usize)).unwrap_or(u32::MAX);
        Self { grid, block }
    }

    /// A grid limited to the blocks that can be resident at once, as a
    /// cooperative launch requires. Threads walk the buffer with a grid stride.
    pub fn cooperative(block: u32) -> Self {
        let workers = u32::try_from(rayon::current_num_threads()).unwrap_or(u32::MAX);
        Self { grid: workers.saturating_mul(BLOCKS_PER_WORKER).max(1), block: block.max(1) }
    }

    /// Total number of threads in the launch.
    pub fn threads(&self) -> usize {
        self.grid as usize * self.block as usize
    }
}
