//! Decision frames for the explicit backtracking stack.

use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;

use crate::tie_break::TieBreaker;

/// Ordering key for a candidate next vertex:
/// `(reserved, onward_degree, tie_key, vertex)`.
///
/// Lower is better. Neighbours of the start vertex are reserved for closing
/// the cycle and rank after every other candidate. Within a tier, fewest
/// onward options first, then the tie-break key, then ascending vertex id
/// so that the order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CandidateKey {
    pub reserved: bool,
    pub onward_degree: u32,
    pub tie_key: u64,
    pub vertex: VertexId,
}

/// One placed vertex and the alternatives not yet tried after it.
///
/// The candidate list is computed once when the frame is created. When the
/// search returns to this frame after backtracking, every placement made
/// above it has been undone, so the visited set (and therefore every onward
/// degree) is the same as at creation time and the stored order stays valid.
#[derive(Debug, Clone)]
pub struct DecisionFrame {
    vertex: VertexId,
    /// Untried candidates, worst first, so `pop` yields the best.
    remaining: Vec<VertexId>,
}

impl DecisionFrame {
    /// Expand `vertex`: rank its distinct unvisited neighbours for a cycle
    /// that must close at `start`.
    pub fn expand(
        topology: &Topology,
        vertex: VertexId,
        start: VertexId,
        visited: &[bool],
        tie_breaker: &mut dyn TieBreaker,
    ) -> Self {
        let mut keys: Vec<CandidateKey> = Vec::with_capacity(8);
        for &candidate in topology.neighbors(vertex) {
            if visited[candidate.index()] || keys.iter().any(|k| k.vertex == candidate) {
                continue;
            }
            keys.push(CandidateKey {
                reserved: topology.is_adjacent(candidate, start),
                onward_degree: onward_degree(topology, candidate, visited),
                tie_key: tie_breaker.tie_key(candidate),
                vertex: candidate,
            });
        }
        keys.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            vertex,
            remaining: keys.into_iter().map(|k| k.vertex).collect(),
        }
    }

    /// A frame with nothing left to try, for a placement that cannot lead
    /// to a cycle.
    #[must_use]
    pub fn dead_end(vertex: VertexId) -> Self {
        Self {
            vertex,
            remaining: Vec::new(),
        }
    }

    /// The vertex this frame placed.
    #[must_use]
    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    /// Take the best untried candidate.
    pub fn next_candidate(&mut self) -> Option<VertexId> {
        self.remaining.pop()
    }

    /// Untried candidates, best first.
    pub fn remaining(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.remaining.iter().rev().copied()
    }
}

/// Number of distinct unvisited neighbours of `vertex`, excluding itself.
#[must_use]
pub fn onward_degree(topology: &Topology, vertex: VertexId, visited: &[bool]) -> u32 {
    let neighbors = topology.neighbors(vertex);
    let mut count = 0;
    for (i, &n) in neighbors.iter().enumerate() {
        if n != vertex && !visited[n.index()] && !neighbors[..i].contains(&n) {
            count += 1;
        }
    }
    count
}
