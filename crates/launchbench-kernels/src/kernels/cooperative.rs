//! Cooperative-group launch: a resident grid walking the buffer.

use super::{add_tile, check_lengths};
use crate::buffer::{DeviceBuffer, SharedBuffer};
use crate::{Kernel, LaunchConfig};
use launchbench_common::Result;

/// Grid-stride elementwise add.
///
/// Tile `t` (of `config.block` elements) belongs to block `t % config.grid`, so
/// each block visits tiles `g, g + grid, g + 2 * grid, ...`. Returns after all
/// blocks reach the end of the scope, which plays the grid-wide barrier.
pub(crate) fn grid_stride_add(out: &mut [i32], lhs: &[i32], rhs: &[i32], config: LaunchConfig) {
    let tile = config.block.max(1) as usize;
    let grid = config.grid.max(1) as usize;
    let stride = grid * tile;

    let mut lanes: Vec<Vec<&mut [i32]>> = (0..grid).map(|_| Vec::new()).collect();
    for (t, chunk) in out.chunks_mut(tile).enumerate() {
        lanes[t % grid].push(chunk);
    }

    rayon::scope(|s| {
        for (g, lane) in lanes.into_iter().enumerate() {
            if lane.is_empty() {
                continue;
            }
            s.spawn(move |_| {
                for (k, chunk) in lane.into_iter().enumerate() {
                    let start = g * tile + k * stride;
                    let end = start + chunk.len();
                    add_tile(chunk, &lhs[start..end], &rhs[start..end]);
                }
            });
        }
    });
}

/// Cooperative launch that returns after the grid barrier.
#[derive(Debug, Clone, Copy)]
pub struct CooperativeBasic {
    config: LaunchConfig,
}

impl CooperativeBasic {
    pub fn new(block: u32) -> Self {
        Self { config: LaunchConfig::cooperative(block) }
    }

    pub fn with_config(config: LaunchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> LaunchConfig {
        self.config
    }
}

impl Kernel<SharedBuffer> for CooperativeBasic {
    fn name(&self) -> &str {
        "Cooperative_basic"
    }

    fn launch(
        &self,
        result: &mut SharedBuffer,
        lhs: &SharedBuffer,
        rhs: &SharedBuffer,
    ) -> Result<()> {
        check_lengths(result.len(), lhs.len(), rhs.len())?;
        let mut out = result.write();
        grid_stride_add(&mut out, &lhs.read(), &rhs.read(), self.config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_stride_visits_every_element_once() {
        let lhs: Vec<i32> = (0..1003).collect();
        let rhs: Vec<i32> = (0..1003).map(|i| 2 * i).collect();
        let mut out = vec![-1; 1003];
        grid_stride_add(&mut out, &lhs, &rhs, LaunchConfig { grid: 3, block: 16 });
        assert!(out.iter().enumerate().all(|(i, &v)| v == 3 * i as i32));
    }

    #[test]
    fn grid_larger_than_buffer() {
        let mut out = vec![0; 5];
        grid_stride_add(&mut out, &[1; 5], &[2; 5], LaunchConfig { grid: 64, block: 256 });
        assert_eq!(out, vec![3; 5]);
    }

    #[test]
    fn empty_buffers() {
        let mut out: Vec<i32> = Vec::new();
        grid_stride_add(&mut out, &[], &[], LaunchConfig::cooperative(256));
        assert!(out.is_empty());
    }
}
