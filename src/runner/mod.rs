//! Adapters between the fixture and a timing engine.
//!
//! The fixture hands a runner a [`TimedRun`]. The runner decides how often to
//! iterate it and what to do with the durations, and settles it before any
//! result is reported.

mod args;
mod engine;

pub use self::args::RunnerArgs;
pub use self::engine::CriterionRunner;

use launchbench_common::{BenchError, Result};
use regex::Regex;
use std::time::Duration;
use tracing::info;

/// One measurement run as seen by a runner.
pub trait TimedRun {
    /// Launch the kernel `iters` times and return the time it took.
    fn iterate(&mut self, iters: u64) -> Result<Duration>;

    /// Wait for outstanding launches and verify the result buffer when
    /// checking is enabled. Not timed.
    fn settle(&mut self) -> Result<()>;
}

/// A timing engine driving measurement runs.
pub trait Runner {
    /// Whether the run registered under `id` should execute at all.
    fn is_enabled(&self, id: &str) -> bool;

    /// Iterate `run` with engine-chosen counts.
    ///
    /// `bytes_per_iteration` is the logical data moved by one iteration. The
    /// runner must call [`TimedRun::settle`] after its last iteration and
    /// before reporting anything for `id`. The first error ends the run and
    /// is returned without a report.
    fn run(&mut self, id: &str, bytes_per_iteration: u64, run: &mut dyn TimedRun) -> Result<()>;

    /// Called once after every run has finished.
    fn finish(&mut self) {}
}

impl<R: Runner + ?Sized> Runner for &mut R {
    fn is_enabled(&self, id: &str) -> bool {
        (**self).is_enabled(id)
    }

    fn run(&mut self, id: &str, bytes_per_iteration: u64, run: &mut dyn TimedRun) -> Result<()> {
        (**self).run(id, bytes_per_iteration, run)
    }

    fn finish(&mut self) {
        (**self).finish()
    }
}

/// Benchmark id selection, with the engine's filter semantics.
#[derive(Debug, Clone, Default)]
pub enum IdFilter {
    #[default]
    All,
    Regex(Regex),
    Exact(String),
}

impl IdFilter {
    /// Build a filter from a positional `FILTER` argument.
    pub fn new(pattern: Option<&str>, exact: bool) -> Result<Self> {
        match pattern {
            None => Ok(Self::All),
            Some(p) if exact => Ok(Self::Exact(p.to_string())),
            Some(p) => Regex::new(p)
                .map(Self::Regex)
                .map_err(|e| BenchError::Config(format!("invalid benchmark filter {p:?}: {e}"))),
        }
    }

    pub fn matches(&self, id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Regex(re) => re.is_match(id),
            Self::Exact(name) => name == id,
        }
    }
}

/// Iterates each run once with a fixed count, then settles it.
///
/// Smoke-test mode: every enabled run executes and is verified, but no
/// statistics are collected. A run is announced as passed only after it
/// settled.
#[derive(Debug, Clone)]
pub struct FixedIterations {
    iterations: u64,
    filter: IdFilter,
}

impl FixedIterations {
    pub fn new(iterations: u64) -> Self {
        Self { iterations, filter: IdFilter::All }
    }

    pub fn with_filter(mut self, filter: IdFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }
}

impl Runner for FixedIterations {
    fn is_enabled(&self, id: &str) -> bool {
        self.filter.matches(id)
    }

    fn run(&mut self, id: &str, _bytes_per_iteration: u64, run: &mut dyn TimedRun) -> Result<()> {
        run.iterate(self.iterations)?;
        run.settle()?;
        info!(id, iterations = self.iterations, "smoke run passed");
        Ok(())
    }
}
