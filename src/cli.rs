//! Pre-parse of the benchmark command line.
//!
//! `--no-check` belongs to the harness and must be gone before the engine's
//! parser sees the arguments.

use std::ffi::OsString;

/// Literal switch disabling result verification.
pub const NO_CHECK_FLAG: &str = "--no-check";

/// Command line with the harness switch removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredArgs {
    args: Vec<OsString>,
    no_check: bool,
}

impl FilteredArgs {
    /// Program name followed by the pass-through arguments.
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Arguments after the program name, in their original order.
    pub fn passthrough(&self) -> &[OsString] {
        self.args.get(1..).unwrap_or_default()
    }

    /// Whether `--no-check` appeared at least once.
    pub fn no_check(&self) -> bool {
        self.no_check
    }

    /// Whether runs should verify their result buffer.
    pub fn check(&self) -> bool {
        !self.no_check
    }
}

/// Remove every `--no-check` after the program name.
///
/// Only exact matches count; everything else keeps its relative order.
pub fn filter_args<I, T>(args: I) -> FilteredArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut iter = args.into_iter().map(Into::into);
    let mut kept: Vec<OsString> = iter.next().into_iter().collect();
    let mut no_check = false;
    for arg in iter {
        if arg == NO_CHECK_FLAG {
            no_check = true;
        } else {
            kept.push(arg);
        }
    }
    FilteredArgs { args: kept, no_check }
}
