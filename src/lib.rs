//! Launch-strategy micro-benchmark harness
//!
//! Measures an elementwise `result = lhs + rhs` over large buffers with each
//! registered kernel variant, reports byte throughput and verifies the result
//! unless `--no-check` was given.
//!
//! The pieces, in the order a run uses them:
//!
//! - [`cli`] strips `--no-check` from the command line
//! - [`runner`] turns the rest into a timing engine
//! - [`registry`] walks the variants and hands each to the [`fixture`]
//! - [`check`] verifies the result buffer before the runner reports
//! - [`report`] prints the comparison and writes JSON reports

pub mod check;
pub mod cli;
pub mod fixture;
pub mod registry;
pub mod report;
pub mod runner;

pub use check::{check_buffer, expect_value};
pub use cli::{FilteredArgs, NO_CHECK_FLAG, filter_args};
pub use fixture::{BufferSet, Fixture, RunReport, bench_id, bytes_processed};
pub use launchbench_common::{BenchConfig, BenchError, Result};
pub use runner::{CriterionRunner, FixedIterations, IdFilter, Runner, RunnerArgs, TimedRun};
