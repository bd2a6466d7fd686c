//! Common types shared by the launchbench crates
//!
//! This crate holds the error taxonomy, the run configuration and the
//! logging setup used by both the kernel crate and the harness.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    BenchConfig, DEFAULT_BLOCK_SIZE, DEFAULT_LHS, DEFAULT_RHS, DEFAULT_SIZE, ELEMENT_WIDTH,
};
pub use error::{BenchError, Result, ValidationError};
pub use logging::{LogFormat, init_logging};
