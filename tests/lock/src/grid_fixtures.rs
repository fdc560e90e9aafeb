//! Grid and topology fixtures.
//!
//! # Panics
//!
//! Every helper panics on malformed fixture data. These are test-only
//! invariants.

use chakra_kernel::cycle::Cycle;
use chakra_kernel::grid::label::LabelScheme;
use chakra_kernel::grid::matrix::GridMatrix;
use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;

/// 4x4 grid for `LabelScheme::new(4, 8)`.
///
/// Values 1..=4 (vowels) sit at (0,0), (0,2), (2,0), (2,2), pairwise
/// non-adjacent on the torus. Values 5..=8 (consonants) sit at (1,0),
/// (1,2), (3,0), (3,2). Everything else is special. No Hamiltonian cycle
/// can contain two consecutive vowels or more than four consecutive
/// consonants, so every cycle the searcher finds verifies under the
/// default maxima.
pub const FRIENDLY_4X4: [u32; 16] = [1, 9, 2, 10, 5, 11, 6, 12, 3, 13, 4, 14, 7, 15, 8, 16];

#[must_use]
pub fn friendly_scheme() -> LabelScheme {
    LabelScheme::new(4, 8)
}

#[must_use]
pub fn friendly_4x4() -> Topology {
    let matrix = GridMatrix::from_flat_square(FRIENDLY_4X4.to_vec()).unwrap();
    Topology::build(&matrix, &friendly_scheme()).unwrap()
}

/// `side x side` grid with values `1..=side²` in row-major order.
#[must_use]
pub fn sequential(side: u32, scheme: &LabelScheme) -> Topology {
    let matrix = GridMatrix::from_flat_square((1..=side * side).collect()).unwrap();
    Topology::build(&matrix, scheme).unwrap()
}

/// Grid built from explicit row-major values under the default scheme.
#[must_use]
pub fn from_values(values: &[u32]) -> Topology {
    let matrix = GridMatrix::from_flat_square(values.to_vec()).unwrap();
    Topology::build(&matrix, &LabelScheme::default()).unwrap()
}

/// The row-major visiting order, closed. Adjacent on every king torus.
#[must_use]
pub fn row_major_cycle(topology: &Topology) -> Cycle {
    Cycle::close(topology, topology.ids().collect()).unwrap()
}

/// Close an open path given as `(row, col)` pairs.
#[must_use]
pub fn cycle_through(topology: &Topology, coords: &[(u32, u32)]) -> Cycle {
    let ids: Vec<VertexId> = coords
        .iter()
        .map(|&(r, c)| topology.id_at(r, c).unwrap())
        .collect();
    Cycle::close(topology, ids).unwrap()
}
