//! Engine arguments left over after `--no-check` is removed.

use super::{CriterionRunner, FixedIterations, IdFilter, Runner};
use clap::Parser;
use criterion::Criterion;
use launchbench_common::{BenchError, Result};
use std::time::Duration;

/// Criterion's own command line, parsed here because criterion rejects any
/// flag it does not know about.
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "vector_add")]
#[command(about = "Compare kernel launch strategies on an elementwise add")]
#[command(after_help = "Pass --no-check to skip result verification.\n\n\
    Criterion's own report scales its time units to the measurement. The summary \
    table printed after every run finishes gives milliseconds per iteration.")]
pub struct RunnerArgs {
    /// Skip benchmarks whose id does not match this regular expression
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    /// Treat FILTER as an exact benchmark id
    #[arg(long)]
    pub exact: bool,

    /// Samples collected per benchmark (at least 10)
    #[arg(long, value_name = "N")]
    pub sample_size: Option<usize>,

    /// Measurement time per benchmark in seconds
    #[arg(long, value_name = "SECS")]
    pub measurement_time: Option<f64>,

    /// Warm-up time per benchmark in seconds
    #[arg(long, value_name = "SECS")]
    pub warm_up_time: Option<f64>,

    /// Relative change below which differences are ignored
    #[arg(long, value_name = "FRACTION")]
    pub noise_threshold: Option<f64>,

    /// Significance level for regression detection
    #[arg(long, value_name = "ALPHA")]
    pub significance_level: Option<f64>,

    /// Confidence level of reported intervals
    #[arg(long, value_name = "LEVEL")]
    pub confidence_level: Option<f64>,

    /// Bootstrap resamples
    #[arg(long, value_name = "N")]
    pub nresamples: Option<usize>,

    /// Save results under this baseline name
    #[arg(long, value_name = "NAME", conflicts_with = "baseline")]
    pub save_baseline: Option<String>,

    /// Compare against a saved baseline, failing if it is missing
    #[arg(long, value_name = "NAME", conflicts_with = "baseline_lenient")]
    pub baseline: Option<String>,

    /// Compare against a saved baseline if it exists
    #[arg(long, value_name = "NAME")]
    pub baseline_lenient: Option<String>,

    /// Disable plot generation
    #[arg(long)]
    pub noplot: bool,

    /// List benchmark ids and exit
    #[arg(long)]
    pub list: bool,

    /// Run each benchmark once without measuring
    #[arg(long)]
    pub test: bool,

    /// Passed by `cargo bench`
    #[arg(long)]
    pub bench: bool,
}

impl RunnerArgs {
    /// Smoke mode, as `cargo test --benches` runs a bench without `--bench`.
    pub fn test_mode(&self) -> bool {
        self.test || !self.bench
    }

    pub fn id_filter(&self) -> Result<IdFilter> {
        IdFilter::new(self.filter.as_deref(), self.exact)
    }

    /// Reject values criterion would panic on.
    pub fn validate(&self) -> Result<()> {
        if self.sample_size.is_some_and(|n| n < 10) {
            return Err(invalid("--sample-size", "must be at least 10"));
        }
        for (flag, secs) in
            [("--measurement-time", self.measurement_time), ("--warm-up-time", self.warm_up_time)]
        {
            if secs.is_some_and(|s| !is_positive_duration(s)) {
                return Err(invalid(flag, "must be a positive number of seconds"));
            }
        }
        if self.noise_threshold.is_some_and(|t| t.is_nan() || t < 0.0) {
            return Err(invalid("--noise-threshold", "must not be negative"));
        }
        for (flag, p) in [
            ("--significance-level", self.significance_level),
            ("--confidence-level", self.confidence_level),
        ] {
            if p.is_some_and(|p| p.is_nan() || p <= 0.0 || p >= 1.0) {
                return Err(invalid(flag, "must lie strictly between 0 and 1"));
            }
        }
        if self.nresamples == Some(0) {
            return Err(invalid("--nresamples", "must be positive"));
        }
        Ok(())
    }

    /// Apply the parsed options to `criterion` through its builder.
    pub fn configure(&self, mut criterion: Criterion) -> Criterion {
        if let Some(n) = self.sample_size {
            criterion = criterion.sample_size(n);
        }
        if let Some(s) = self.measurement_time {
            criterion = criterion.measurement_time(Duration::from_secs_f64(s));
        }
        if let Some(s) = self.warm_up_time {
            criterion = criterion.warm_up_time(Duration::from_secs_f64(s));
        }
        if let Some(t) = self.noise_threshold {
            criterion = criterion.noise_threshold(t);
        }
        if let Some(p) = self.significance_level {
            criterion = criterion.significance_level(p);
        }
        if let Some(p) = self.confidence_level {
            criterion = criterion.confidence_level(p);
        }
        if let Some(n) = self.nresamples {
            criterion = criterion.nresamples(n);
        }
        if let Some(name) = &self.save_baseline {
            criterion = criterion.save_baseline(name.clone());
        }
        if let Some(name) = &self.baseline {
            criterion = criterion.retain_baseline(name.clone(), true);
        }
        if let Some(name) = &self.baseline_lenient {
            criterion = criterion.retain_baseline(name.clone(), false);
        }
        if self.noplot {
            criterion = criterion.without_plots();
        }
        criterion
    }

    /// The runner these arguments select.
    pub fn runner(&self) -> Result<Box<dyn Runner>> {
        self.validate()?;
        let filter = self.id_filter()?;
        if self.test_mode() {
            return Ok(Box::new(FixedIterations::new(1).with_filter(filter)));
        }
        let criterion = self.configure(Criterion::default());
        Ok(Box::new(CriterionRunner::new(criterion, filter)))
    }
}

fn is_positive_duration(secs: f64) -> bool {
    Duration::try_from_secs_f64(secs).is_ok_and(|d| !d.is_zero())
}

fn invalid(flag: &str, reason: &str) -> BenchError {
    BenchError::Config(format!("{flag} {reason}"))
}
