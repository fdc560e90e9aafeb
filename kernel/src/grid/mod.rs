//! Grid model: typed cells, phonetic labels, and the toroidal topology.
//!
//! `label` ← `vertex` ← `matrix` ← `topology`

pub mod label;
pub mod matrix;
pub mod topology;
pub mod vertex;

/// Error building a grid from raw input.
///
/// Every variant is fatal and reported before any search begins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The input contained no cells.
    #[error("grid input is empty")]
    Empty,
    /// A row's length differs from the first row's.
    #[error("grid row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A flat value list whose length is not a perfect square.
    #[error("{count} values cannot form a square grid")]
    NotSquare { count: usize },
    /// A token in the textual input is not a non-negative integer.
    #[error("token {index} ({token:?}) is not a valid cell value")]
    BadToken { index: usize, token: String },
    /// Cell values are 1-based symbol indices; zero is never valid.
    #[error("cell ({row},{col}) has value 0; values are 1-based")]
    ZeroValue { row: usize, col: usize },
    /// The cell count does not fit the `u32` vertex id space.
    #[error("grid of {rows}x{cols} cells exceeds the vertex id space")]
    TooLarge { rows: usize, cols: usize },
}
