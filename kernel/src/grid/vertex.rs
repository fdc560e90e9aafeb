//! Grid cells and their arena identifiers.

use super::label::Label;

/// Arena index of a vertex inside a [`super::topology::Topology`].
///
/// Ids are row-major: `row * cols + col`. They are only meaningful
/// relative to the topology that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

impl VertexId {
    /// The id as a slice index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable grid cell.
///
/// Equality and hashing use `(row, col)` only; `value` and `label` are
/// payload derived from the input matrix.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    row: u32,
    col: u32,
    value: u32,
    label: Label,
}

impl Vertex {
    #[must_use]
    pub const fn new(row: u32, col: u32, value: u32, label: Label) -> Self {
        Self {
            row,
            col,
            value,
            label,
        }
    }

    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    #[must_use]
    pub const fn col(&self) -> u32 {
        self.col
    }

    /// 1-based symbol index.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub const fn label(&self) -> Label {
        self.label
    }

    #[must_use]
    pub const fn coords(&self) -> (u32, u32) {
        (self.row, self.col)
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.coords() == other.coords()
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.coords().hash(state);
    }
}

impl std::fmt::Display for Vertex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}):{}", self.row, self.col, self.value)
    }
}
