//! 8-connected toroidal topology over a value matrix.
//!
//! Vertices live in a row-major arena; adjacency is a fixed array of eight
//! neighbour ids per vertex, computed once with wraparound on both axes and
//! never mutated afterwards.
//!
//! # Neighbour order
//!
//! For each vertex the neighbours are listed for `dr` in `-1, 0, 1` (outer)
//! and `dc` in `-1, 0, 1` (inner), skipping `(0, 0)`. Grids with a side of
//! 2 or less produce repeated or self entries; those are kept as-is so the
//! structure stays symmetric.

use super::label::LabelScheme;
use super::matrix::GridMatrix;
use super::vertex::{Vertex, VertexId};
use super::GridError;
use crate::proof::hash::{canonical_hash, ContentHash};
use crate::proof::hash_domain::HashDomain;

/// Number of neighbour entries per vertex.
pub const NEIGHBOR_COUNT: usize = 8;

const DELTAS: [(i64, i64); NEIGHBOR_COUNT] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// The immutable vertex arena plus adjacency.
#[derive(Debug, Clone)]
pub struct Topology {
    rows: u32,
    cols: u32,
    vertices: Vec<Vertex>,
    neighbors: Vec<[VertexId; NEIGHBOR_COUNT]>,
}

impl Topology {
    /// Build the toroidal topology for `matrix`, labelling values with `scheme`.
    ///
    /// # Errors
    ///
    /// [`GridError::TooLarge`] if the cell count does not fit in a `u32` id.
    pub fn build(matrix: &GridMatrix, scheme: &LabelScheme) -> Result<Self, GridError> {
        let too_large = || GridError::TooLarge {
            rows: matrix.rows(),
            cols: matrix.cols(),
        };
        let rows = u32::try_from(matrix.rows()).map_err(|_| too_large())?;
        let cols = u32::try_from(matrix.cols()).map_err(|_| too_large())?;
        rows.checked_mul(cols).ok_or_else(too_large)?;

        let vertices: Vec<Vertex> = matrix
            .values()
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                #[allow(clippy::cast_possible_truncation)]
                let (row, col) = ((i / matrix.cols()) as u32, (i % matrix.cols()) as u32);
                Vertex::new(row, col, value, scheme.classify(value))
            })
            .collect();

        let mut topology = Self {
            rows,
            cols,
            vertices,
            neighbors: Vec::new(),
        };
        topology.neighbors = topology
            .vertices
            .iter()
            .map(|v| topology.compute_neighbors(v))
            .collect();
        Ok(topology)
    }

    fn compute_neighbors(&self, vertex: &Vertex) -> [VertexId; NEIGHBOR_COUNT] {
        let rows = i64::from(self.rows);
        let cols = i64::from(self.cols);
        DELTAS.map(|(dr, dc)| {
            let nr = (i64::from(vertex.row()) + dr + rows).rem_euclid(rows);
            let nc = (i64::from(vertex.col()) + dc + cols).rem_euclid(cols);
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (nr, nc) = (nr as u32, nc as u32);
            self.id_unchecked(nr, nc)
        })
    }

    fn id_unchecked(&self, row: u32, col: u32) -> VertexId {
        VertexId(row * self.cols + col)
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex behind `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this topology.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// All vertices in id order.
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All vertex ids in ascending (row-major) order.
    pub fn ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        #[allow(clippy::cast_possible_truncation)]
        (0..self.vertices.len()).map(|i| VertexId(i as u32))
    }

    /// Id of the vertex at `(row, col)`, or `None` if out of range.
    #[must_use]
    pub fn id_at(&self, row: u32, col: u32) -> Option<VertexId> {
        (row < self.rows && col < self.cols).then(|| self.id_unchecked(row, col))
    }

    /// Whether `id` belongs to this topology.
    #[must_use]
    pub fn contains(&self, id: VertexId) -> bool {
        id.index() < self.vertices.len()
    }

    /// The eight neighbour entries of `id`, in the documented delta order.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this topology.
    #[must_use]
    pub fn neighbors(&self, id: VertexId) -> &[VertexId; NEIGHBOR_COUNT] {
        &self.neighbors[id.index()]
    }

    /// Toroidal 8-neighbour predicate.
    ///
    /// True when the minimum wrapped row distance and the minimum wrapped
    /// column distance are both at most 1 and the two ids are different cells.
    ///
    /// # Panics
    ///
    /// Panics if either id was not issued by this topology.
    #[must_use]
    pub fn is_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        let (r1, c1) = self.vertex(a).coords();
        let (r2, c2) = self.vertex(b).coords();
        let d_row = wrapped_distance(r1, r2, self.rows);
        let d_col = wrapped_distance(c1, c2, self.cols);
        d_row <= 1 && d_col <= 1 && !(d_row == 0 && d_col == 0)
    }

    /// Minimum wrapped `(row, col)` distance between two vertices.
    #[must_use]
    pub fn wrapped_offset(&self, a: VertexId, b: VertexId) -> (u32, u32) {
        let (r1, c1) = self.vertex(a).coords();
        let (r2, c2) = self.vertex(b).coords();
        (
            wrapped_distance(r1, r2, self.rows),
            wrapped_distance(c1, c2, self.cols),
        )
    }

    /// Content hash of the grid dimensions and row-major values.
    ///
    /// Labels are not part of the identity; the same values under a different
    /// label scheme hash identically.
    #[must_use]
    pub fn identity_hash(&self) -> ContentHash {
        let mut data = Vec::with_capacity(8 + self.vertices.len() * 4);
        data.extend_from_slice(&self.rows.to_le_bytes());
        data.extend_from_slice(&self.cols.to_le_bytes());
        for v in &self.vertices {
            data.extend_from_slice(&v.value().to_le_bytes());
        }
        canonical_hash(HashDomain::GridIdentity, &data)
    }
}

fn wrapped_distance(a: u32, b: u32, size: u32) -> u32 {
    let direct = a.abs_diff(b);
    direct.min(size - direct)
}
