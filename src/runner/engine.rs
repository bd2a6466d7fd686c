//! Criterion-backed runner.
//!
//! Criterion analyses, prints and saves a benchmark as soon as its sampling
//! ends, so every sample is settled (and verified) before it is handed back.
//! A failing sample unwinds out of the sampling loop, which leaves the id
//! without any reported estimate or saved baseline.

use super::{IdFilter, Runner, TimedRun};
use criterion::{Criterion, Throughput};
use launchbench_common::{BenchError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;
use tracing::warn;

/// Unwind payload ending a failed run inside criterion's sampling loop.
struct Aborted;

/// Drives measurement runs through criterion's sampling and analysis.
///
/// Ids have the form `group/function`; each run becomes a one-function
/// benchmark group with byte throughput.
pub struct CriterionRunner {
    criterion: Criterion,
    filter: IdFilter,
}

impl CriterionRunner {
    pub fn new(criterion: Criterion, filter: IdFilter) -> Self {
        Self { criterion, filter }
    }
}

/// One sample: the timed launches, then the untimed settle.
fn sample(run: &mut dyn TimedRun, iters: u64) -> Result<Duration> {
    let took = run.iterate(iters)?;
    run.settle()?;
    Ok(took)
}

impl Runner for CriterionRunner {
    fn is_enabled(&self, id: &str) -> bool {
        self.filter.matches(id)
    }

    fn run(&mut self, id: &str, bytes_per_iteration: u64, run: &mut dyn TimedRun) -> Result<()> {
        let (group_name, function) = id.split_once('/').unwrap_or((id, id));
        let mut failure: Option<BenchError> = None;

        // `resume_unwind` skips the panic hook, so nothing is printed for it.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut group = self.criterion.benchmark_group(group_name);
            group.throughput(Throughput::Bytes(bytes_per_iteration));
            group.bench_function(function, |b| {
                b.iter_custom(|iters| match sample(&mut *run, iters) {
                    Ok(took) => took,
                    Err(err) => {
                        failure = Some(err);
                        panic::resume_unwind(Box::new(Aborted))
                    }
                })
            });
            group.finish();
        }));

        match (outcome, failure) {
            (_, Some(err)) => {
                warn!(id, error = %err, "run failed; no result reported");
                Err(err)
            }
            (Err(payload), None) => panic::resume_unwind(payload),
            (Ok(()), None) => Ok(()),
        }
    }

    fn finish(&mut self) {
        self.criterion.final_summary();
    }
}
