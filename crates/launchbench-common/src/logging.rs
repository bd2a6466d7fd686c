//! Logging setup for the benchmark binary
//!
//! Events go to stderr so they never interleave with the statistics the
//! benchmarking engine prints on stdout.

use std::env;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl LogFormat {
    /// Read `LAUNCHBENCH_LOG_FORMAT`, falling back to compact output.
    pub fn from_env() -> Self {
        env::var("LAUNCHBENCH_LOG_FORMAT").ok().and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Returns `false` when a
/// subscriber was already installed, which is harmless.
pub fn init_logging(default_level: &str, format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let installed = match format {
        LogFormat::Compact => subscriber.compact().try_init(),
        LogFormat::Pretty => subscriber.pretty().try_init(),
        LogFormat::Json => subscriber.json().try_init(),
    };
    installed.is_ok()
}
