//! Shared helpers for chakra benchmark suites.

use chakra_harness::output::{AcceptedCycle, CycleSink, OutputError};
use chakra_kernel::grid::label::LabelScheme;
use chakra_kernel::grid::matrix::GridMatrix;
use chakra_kernel::grid::topology::Topology;

/// `side x side` grid holding `1..=side²` in a scattered order.
///
/// # Panics
///
/// Panics if `side` is zero. Benchmark setup failures are fatal.
#[must_use]
pub fn scattered_grid(side: u32) -> Topology {
    let n = side * side;
    let values: Vec<u32> = (0..n).map(|i| (i * 37) % n + 1).collect();
    let matrix = GridMatrix::from_flat_square(values).expect("square grid");
    Topology::build(&matrix, &LabelScheme::default()).expect("topology")
}

/// Sink that keeps nothing.
#[derive(Debug, Default)]
pub struct DiscardSink {
    pub accepted: u64,
}

impl CycleSink for DiscardSink {
    fn accept(
        &mut self,
        _topology: &Topology,
        _accepted: &AcceptedCycle,
    ) -> Result<Option<std::path::PathBuf>, OutputError> {
        self.accepted += 1;
        Ok(None)
    }
}
