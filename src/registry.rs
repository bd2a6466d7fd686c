//! The registered measurement runs.

use crate::fixture::{Fixture, RunReport, bench_id};
use crate::runner::Runner;
use launchbench_common::{BenchConfig, Result};
use launchbench_kernels::{Basic, CooperativeAsync, CooperativeBasic, Kernel, SharedBuffer};
use tracing::{debug, info};

type Build = fn(u32) -> Result<Box<dyn Kernel<SharedBuffer>>>;

/// A kernel variant known to the harness.
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    pub name: &'static str,
    build: Build,
}

impl Variant {
    pub fn id(&self) -> String {
        bench_id(self.name)
    }

    /// Construct the kernel with `block` threads per block.
    pub fn build(&self, block: u32) -> Result<Box<dyn Kernel<SharedBuffer>>> {
        (self.build)(block)
    }
}

/// Variants in registration order.
pub const VARIANTS: [Variant; 3] = [
    Variant { name: "Basic", build: |block| Ok(Box::new(Basic::new(block))) },
    Variant {
        name: "Cooperative_basic",
        build: |block| Ok(Box::new(CooperativeBasic::new(block))),
    },
    Variant {
        name: "Cooperative_async",
        build: |block| Ok(Box::new(CooperativeAsync::new(block)?)),
    },
];

/// Benchmark ids in registration order.
pub fn ids() -> Vec<String> {
    VARIANTS.iter().map(Variant::id).collect()
}

/// Run every variant `runner` accepts, one at a time.
///
/// Kernels are constructed only for enabled ids, and each run allocates its
/// own buffers. The first error stops the sequence.
pub fn run_all<R>(config: &BenchConfig, runner: &mut R) -> Result<Vec<RunReport>>
where
    R: Runner + ?Sized,
{
    let fixture = Fixture::new(config.clone());
    let mut reports = Vec::with_capacity(VARIANTS.len());
    info!(size = config.size, check = config.check, "starting measurement runs");

    for variant in &VARIANTS {
        let id = variant.id();
        if !runner.is_enabled(&id) {
            debug!(id = %id, "filtered out");
            continue;
        }
        let kernel = variant.build(config.block_size)?;
        reports.push(fixture.bench::<SharedBuffer, _, _>(&mut *runner, &kernel)?);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        assert_eq!(
            ids(),
            ["Fixture/Basic", "Fixture/Cooperative_basic", "Fixture/Cooperative_async"]
        );
    }

    #[test]
    fn built_kernels_carry_registered_names() {
        for variant in &VARIANTS {
            assert_eq!(variant.build(64).unwrap().name(), variant.name);
        }
    }
}
