//! Execution fixture: one measurement run of one kernel variant.

use crate::check::{check_buffer, expect_value};
use crate::runner::{Runner, TimedRun};
use launchbench_common::{BenchConfig, ELEMENT_WIDTH, Result};
use launchbench_kernels::{DeviceBuffer, Kernel};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Benchmark group every variant is registered under.
pub const GROUP: &str = "Fixture";

/// Benchmark id of the variant called `name`.
pub fn bench_id(name: &str) -> String {
    format!("{GROUP}/{name}")
}

/// Logical bytes moved by `iterations` launches over `size` elements.
///
/// One element-width per element per iteration; saturates instead of
/// wrapping.
pub fn bytes_processed(iterations: u64, size: usize) -> u64 {
    iterations.saturating_mul(size as u64).saturating_mul(ELEMENT_WIDTH as u64)
}

/// Output and input buffers of one run, all `size` elements long.
pub struct BufferSet<B> {
    pub result: B,
    pub input_a: B,
    pub input_b: B,
}

impl<B: DeviceBuffer> BufferSet<B> {
    pub fn allocate(size: usize) -> Result<Self> {
        Ok(Self {
            result: B::with_len(size)?,
            input_a: B::with_len(size)?,
            input_b: B::with_len(size)?,
        })
    }

    pub fn fill_inputs(&mut self, a: i32, b: i32) -> Result<()> {
        self.input_a.fill(a)?;
        self.input_b.fill(b)?;
        debug!(len = self.len(), a, b, "inputs filled");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.result.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of a completed measurement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Variant name, e.g. `Basic`.
    pub name: String,
    /// Elements per buffer.
    pub size: usize,
    pub element_width: usize,
    /// Launches across every call of the timed body.
    pub iterations: u64,
    /// Wall-clock time spent inside the timed body.
    pub elapsed: Duration,
    pub bytes_processed: u64,
    /// Whether the result buffer was checked (and passed).
    pub verified: bool,
}

impl RunReport {
    pub fn mean_iteration_ms(&self) -> Option<f64> {
        (self.iterations > 0).then(|| self.elapsed.as_secs_f64() * 1e3 / self.iterations as f64)
    }

    pub fn throughput_gib_s(&self) -> Option<f64> {
        let secs = self.elapsed.as_secs_f64();
        (secs > 0.0).then(|| self.bytes_processed as f64 / secs / (1u64 << 30) as f64)
    }
}

/// Runs kernel variants over freshly allocated buffers.
#[derive(Debug, Clone)]
pub struct Fixture {
    config: BenchConfig,
}

impl Fixture {
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Measure `kernel` with `runner`.
    ///
    /// Allocation and the input fill happen before the timed body. The body
    /// launches once per iteration without synchronizing. Settling
    /// synchronizes the kernel outside the timing and verifies the result if
    /// checking is enabled; the runner settles before it reports, and the
    /// fixture settles once more if launches were left unsettled.
    pub fn bench<B, K, R>(&self, runner: &mut R, kernel: &K) -> Result<RunReport>
    where
        B: DeviceBuffer,
        K: Kernel<B> + ?Sized,
        R: Runner + ?Sized,
    {
        let name = kernel.name().to_string();
        let id = bench_id(&name);
        let size = self.config.size;

        let mut buffers = BufferSet::<B>::allocate(size)?;
        buffers.fill_inputs(self.config.lhs, self.config.rhs)?;

        let mut run = KernelRun {
            kernel,
            buffers,
            expected: self.config.check.then(|| self.config.expected()),
            iterations: 0,
            elapsed: Duration::ZERO,
            unsettled: false,
        };
        runner.run(&id, bytes_processed(1, size), &mut run)?;
        if run.unsettled {
            run.settle()?;
        }

        let KernelRun { iterations, elapsed, .. } = run;
        let verified = self.config.check && iterations > 0;
        let report = RunReport {
            name,
            size,
            element_width: ELEMENT_WIDTH,
            iterations,
            elapsed,
            bytes_processed: bytes_processed(iterations, size),
            verified,
        };
        info!(
            id = %id,
            iterations,
            elapsed_ms = elapsed.as_secs_f64() * 1e3,
            verified,
            "run complete"
        );
        Ok(report)
    }
}

/// A kernel bound to its buffers for the length of one run.
struct KernelRun<'a, B, K: ?Sized> {
    kernel: &'a K,
    buffers: BufferSet<B>,
    /// Value every element must hold, when checking.
    expected: Option<i32>,
    iterations: u64,
    elapsed: Duration,
    /// Launches issued since the last settle.
    unsettled: bool,
}

impl<B, K> TimedRun for KernelRun<'_, B, K>
where
    B: DeviceBuffer,
    K: Kernel<B> + ?Sized,
{
    fn iterate(&mut self, iters: u64) -> Result<Duration> {
        let BufferSet { result, input_a, input_b } = &mut self.buffers;
        self.unsettled |= iters > 0;
        let start = Instant::now();
        for _ in 0..iters {
            self.kernel.launch(result, input_a, input_b)?;
        }
        let took = start.elapsed();
        self.iterations += iters;
        self.elapsed += took;
        Ok(took)
    }

    fn settle(&mut self) -> Result<()> {
        self.kernel.synchronize()?;
        self.unsettled = false;
        match self.expected {
            Some(expected) if self.iterations > 0 => {
                check_buffer(&self.buffers.result, expect_value(expected))
            }
            _ => Ok(()),
        }
    }
}
