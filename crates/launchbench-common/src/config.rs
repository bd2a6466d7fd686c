//! Run configuration

use crate::{BenchError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Default workload size in elements (2^26).
pub const DEFAULT_SIZE: usize = 1 << 26;

/// Constant written to every element of the first input buffer.
pub const DEFAULT_LHS: i32 = 4;

/// Constant written to every element of the second input buffer.
pub const DEFAULT_RHS: i32 = 6;

/// Threads per block for the emulated launches.
pub const DEFAULT_BLOCK_SIZE: u32 = 256;

/// Width in bytes of one buffer element.
pub const ELEMENT_WIDTH: usize = std::mem::size_of::<i32>();

/// Configuration of one benchmark process, threaded into every fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Element count of each buffer in a run.
    pub size: usize,
    /// Fill value of the first input buffer.
    pub lhs: i32,
    /// Fill value of the second input buffer.
    pub rhs: i32,
    /// Verify the result buffer after each run.
    pub check: bool,
    /// Threads per block handed to the kernel variants.
    pub block_size: u32,
    /// Directory receiving one JSON report per run.
    pub report_dir: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            lhs: DEFAULT_LHS,
            rhs: DEFAULT_RHS,
            check: true,
            block_size: DEFAULT_BLOCK_SIZE,
            report_dir: None,
        }
    }
}

impl BenchConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `LAUNCHBENCH_SIZE`, `LAUNCHBENCH_BLOCK_SIZE` and
    /// `LAUNCHBENCH_REPORT_DIR`. Unset or empty variables keep the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(size) = read_var("LAUNCHBENCH_SIZE") {
            config.size = size
                .parse()
                .map_err(|e| BenchError::Config(format!("LAUNCHBENCH_SIZE={size:?}: {e}")))?;
        }
        if let Some(block) = read_var("LAUNCHBENCH_BLOCK_SIZE") {
            config.block_size = block
                .parse()
                .map_err(|e| BenchError::Config(format!("LAUNCHBENCH_BLOCK_SIZE={block:?}: {e}")))?;
        }
        if let Some(dir) = read_var("LAUNCHBENCH_REPORT_DIR") {
            config.report_dir = Some(PathBuf::from(dir));
        }

        config.validate()?;
        if config != Self::default() {
            debug!(
                size = config.size,
                block_size = config.block_size,
                report_dir = ?config.report_dir,
                "configuration overridden from environment"
            );
        }
        Ok(config)
    }

    /// Set whether runs verify their result buffer.
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Set the workload size in elements.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Value every result element must hold after a correct run.
    pub fn expected(&self) -> i32 {
        self.lhs.wrapping_add(self.rhs)
    }

    /// Bytes occupied by one buffer of `size` elements.
    pub fn buffer_bytes(&self) -> Option<usize> {
        self.size.checked_mul(ELEMENT_WIDTH)
    }

    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(BenchError::Config("block size must be non-zero".into()));
        }
        match self.buffer_bytes() {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
            _ => Err(BenchError::Config(format!(
                "size {} overflows the addressable byte range",
                self.size
            ))),
        }
    }
}

fn read_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_workload() {
        let config = BenchConfig::default();
        assert_eq!(config.size, 1 << 26);
        assert_eq!(config.lhs, 4);
        assert_eq!(config.rhs, 6);
        assert_eq!(config.expected(), 10);
        assert!(config.check);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_block_size_is_rejected() {
        let config = BenchConfig { block_size: 0, ..BenchConfig::default() };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn oversized_workload_is_rejected() {
        let config = BenchConfig::default().with_size(usize::MAX / 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_size_is_valid() {
        let config = BenchConfig::default().with_size(0);
        assert_eq!(config.buffer_bytes(), Some(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn expected_wraps_like_device_arithmetic() {
        let config = BenchConfig { lhs: i32::MAX, rhs: 1, ..BenchConfig::default() };
        assert_eq!(config.expected(), i32::MIN);
    }
}
