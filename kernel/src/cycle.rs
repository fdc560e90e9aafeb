//! Closed vertex sequences covering a topology.
//!
//! A [`Cycle`] of a topology with `n` vertices has exactly `n + 1` entries:
//! every vertex once, then the first vertex again. Construction checks
//! closure and coverage only. Step adjacency is deliberately not checked
//! here so that complete but non-adjacent sequences can still reach the
//! verifier and be reported position by position.

use crate::grid::topology::Topology;
use crate::grid::vertex::VertexId;

/// Why a vertex sequence is not a cycle of its topology.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    #[error("cycle has {found} entries, expected {expected}")]
    WrongLength { expected: usize, found: usize },
    #[error("cycle starts at {first} but ends at {last}")]
    NotClosed { first: VertexId, last: VertexId },
    #[error("entry {position} ({vertex}) is not a vertex of this grid")]
    UnknownVertex { position: usize, vertex: VertexId },
    #[error("entry {position} revisits {vertex}")]
    Repeated { position: usize, vertex: VertexId },
}

/// A closed sequence visiting every vertex exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cycle {
    vertices: Vec<VertexId>,
}

impl Cycle {
    /// Validate a closed sequence against `topology`.
    ///
    /// # Errors
    ///
    /// Returns the first [`CycleError`] found, checked in the order:
    /// length, membership, closure, repeats.
    pub fn from_closed(topology: &Topology, vertices: Vec<VertexId>) -> Result<Self, CycleError> {
        let expected = topology.len() + 1;
        if vertices.len() != expected || topology.is_empty() {
            return Err(CycleError::WrongLength {
                expected,
                found: vertices.len(),
            });
        }
        if let Some((position, &vertex)) = vertices
            .iter()
            .enumerate()
            .find(|(_, v)| !topology.contains(**v))
        {
            return Err(CycleError::UnknownVertex { position, vertex });
        }
        let first = vertices[0];
        let last = vertices[vertices.len() - 1];
        if first != last {
            return Err(CycleError::NotClosed { first, last });
        }
        let mut seen = vec![false; topology.len()];
        for (position, &vertex) in vertices[..vertices.len() - 1].iter().enumerate() {
            if std::mem::replace(&mut seen[vertex.index()], true) {
                return Err(CycleError::Repeated { position, vertex });
            }
        }
        Ok(Self { vertices })
    }

    /// Close an open Hamiltonian path by appending its first vertex.
    ///
    /// # Errors
    ///
    /// Same as [`Cycle::from_closed`].
    pub fn close(topology: &Topology, mut path: Vec<VertexId>) -> Result<Self, CycleError> {
        if let Some(&first) = path.first() {
            path.push(first);
        }
        Self::from_closed(topology, path)
    }

    /// The full closed sequence (`n + 1` entries).
    #[must_use]
    pub fn as_slice(&self) -> &[VertexId] {
        &self.vertices
    }

    /// The sequence without the closing repeat (`n` entries).
    #[must_use]
    pub fn open_path(&self) -> &[VertexId] {
        &self.vertices[..self.vertices.len() - 1]
    }

    /// Number of entries including the closing repeat.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always false: a valid cycle has at least two entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn start(&self) -> VertexId {
        self.vertices[0]
    }

    /// Cell values along the closed sequence.
    #[must_use]
    pub fn values(&self, topology: &Topology) -> Vec<u32> {
        self.vertices
            .iter()
            .map(|&id| topology.vertex(id).value())
            .collect()
    }

    /// `(row, col)` pairs along the closed sequence.
    #[must_use]
    pub fn coords(&self, topology: &Topology) -> Vec<(u32, u32)> {
        self.vertices
            .iter()
            .map(|&id| topology.vertex(id).coords())
            .collect()
    }
}
