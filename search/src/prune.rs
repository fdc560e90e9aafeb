//! Feasibility checks run after each placement.
//!
//! A partial path can only become a cycle if the unvisited vertices admit a
//! Hamiltonian path that begins next to the head and ends next to the
//! start. [`Pruner::viable`] tests necessary conditions for that:
//!
//! 1. The start keeps at least one unvisited neighbour.
//! 2. An unvisited vertex with a single unvisited neighbour must be an
//!    endpoint of the remaining path. There are at most two such vertices,
//!    at most one reachable only from the head and at most one reachable
//!    only from the start.
//! 3. The unvisited vertices are connected and the head touches them.
//! 4. Removing any single unvisited vertex leaves at most two pieces. With
//!    two pieces, the head must touch one and the start the other.
//!
//! Condition 4 uses an iterative lowlink DFS (articulation points) over the
//! unvisited subgraph, so each call is linear in the grid size.

use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;

const UNSEEN: u32 = u32::MAX;

/// Head and start adjacency counts of one piece of the unvisited subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Links {
    head: u32,
    start: u32,
}

impl Links {
    /// Whether a path can enter one piece from the head and leave the other
    /// towards the start.
    fn can_bridge(self, other: Self) -> bool {
        (self.head > 0 && other.start > 0) || (other.head > 0 && self.start > 0)
    }
}

/// DFS stack entry: vertex, its tree parent, next neighbour slot to scan.
type Visit = (VertexId, Option<VertexId>, usize);

/// Scratch space for the feasibility checks, reused across placements.
#[derive(Debug, Clone)]
pub struct Pruner {
    order: Vec<u32>,
    low: Vec<u32>,
    links: Vec<Links>,
    split: Vec<bool>,
    stack: Vec<Visit>,
    root_pieces: Vec<Links>,
}

impl Pruner {
    /// Scratch space for a topology of `n` vertices.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            order: vec![UNSEEN; n],
            low: vec![UNSEEN; n],
            links: vec![Links { head: 0, start: 0 }; n],
            split: vec![false; n],
            stack: Vec::with_capacity(n),
            root_pieces: Vec::new(),
        }
    }

    /// Whether the path ending at `head` may still close into a cycle at
    /// `start`.
    ///
    /// `visited` must mark every placed vertex, `head` and `start` included,
    /// and at least one vertex must still be unvisited. A `false` answer is
    /// definitive; `true` only means none of the checks ruled it out.
    pub fn viable(
        &mut self,
        topology: &Topology,
        visited: &[bool],
        head: VertexId,
        start: VertexId,
    ) -> bool {
        if !distinct_neighbors(topology, start).any(|w| !visited[w.index()]) {
            return false;
        }
        endpoints_ok(topology, visited, head, start) && self.pieces_ok(topology, visited, head, start)
    }

    fn pieces_ok(
        &mut self,
        topology: &Topology,
        visited: &[bool],
        head: VertexId,
        start: VertexId,
    ) -> bool {
        let mut total = 0usize;
        let mut totals = Links { head: 0, start: 0 };
        let mut root = None;
        for v in topology.ids().filter(|v| !visited[v.index()]) {
            let i = v.index();
            self.order[i] = UNSEEN;
            self.split[i] = false;
            self.links[i] = own_links(topology, v, head, start);
            totals.head += self.links[i].head;
            totals.start += self.links[i].start;
            total += 1;
            root.get_or_insert(v);
        }
        let Some(root) = root else {
            return true;
        };
        if totals.head == 0 {
            return false;
        }
        let check_cuts = total >= 3;

        let mut timer = 0u32;
        let mut reached = 0usize;
        self.discover(root, &mut timer, &mut reached);
        self.stack.clear();
        self.root_pieces.clear();
        self.stack.push((root, None, 0));

        while let Some(top) = self.stack.last_mut() {
            let (v, parent, slot) = *top;
            let neighbors = topology.neighbors(v);
            if slot < neighbors.len() {
                top.2 += 1;
                let w = neighbors[slot];
                if w == v || visited[w.index()] {
                    continue;
                }
                if self.order[w.index()] == UNSEEN {
                    self.discover(w, &mut timer, &mut reached);
                    self.stack.push((w, Some(v), 0));
                } else if Some(w) != parent {
                    self.low[v.index()] = self.low[v.index()].min(self.order[w.index()]);
                }
                continue;
            }

            self.stack.pop();
            let Some(p) = parent else {
                continue;
            };
            let (vi, pi) = (v.index(), p.index());
            self.low[pi] = self.low[pi].min(self.low[vi]);
            let piece = self.links[vi];
            self.links[pi].head += piece.head;
            self.links[pi].start += piece.start;

            if !check_cuts || self.low[vi] < self.order[pi] {
                continue;
            }
            // The subtree under `v` falls away when `p` is removed.
            if p == root {
                self.root_pieces.push(piece);
                if self.root_pieces.len() > 2 {
                    return false;
                }
            } else {
                // Two pieces below `p` plus the part above it make three.
                if self.split[pi] {
                    return false;
                }
                self.split[pi] = true;
                let own = own_links(topology, p, head, start);
                let rest = Links {
                    head: totals.head - piece.head - own.head,
                    start: totals.start - piece.start - own.start,
                };
                if !piece.can_bridge(rest) {
                    return false;
                }
            }
        }

        if reached != total {
            return false;
        }
        match self.root_pieces.as_slice() {
            [a, b] => a.can_bridge(*b),
            _ => true,
        }
    }

    fn discover(&mut self, v: VertexId, timer: &mut u32, reached: &mut usize) {
        self.order[v.index()] = *timer;
        self.low[v.index()] = *timer;
        *timer += 1;
        *reached += 1;
    }
}

fn own_links(topology: &Topology, v: VertexId, head: VertexId, start: VertexId) -> Links {
    Links {
        head: u32::from(topology.is_adjacent(v, head)),
        start: u32::from(topology.is_adjacent(v, start)),
    }
}

/// Condition 2: forced endpoints.
fn endpoints_ok(topology: &Topology, visited: &[bool], head: VertexId, start: VertexId) -> bool {
    let remaining = visited.iter().filter(|&&v| !v).count();
    let (mut ends, mut head_only, mut start_only) = (0u32, 0u32, 0u32);
    for v in topology.ids().filter(|v| !visited[v.index()]) {
        let by_head = topology.is_adjacent(v, head);
        let by_start = topology.is_adjacent(v, start);
        if remaining == 1 {
            return by_head && by_start;
        }
        match distinct_neighbors(topology, v)
            .filter(|w| !visited[w.index()])
            .count()
        {
            0 => return false,
            1 => {
                if !by_head && !by_start {
                    return false;
                }
                ends += 1;
                if !by_start {
                    head_only += 1;
                }
                if !by_head {
                    start_only += 1;
                }
            }
            _ => {}
        }
    }
    ends <= 2 && head_only <= 1 && start_only <= 1
}

/// Neighbours of `v` without repeats and without `v` itself (small tori).
fn distinct_neighbors(topology: &Topology, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
    let neighbors = topology.neighbors(v);
    neighbors
        .iter()
        .enumerate()
        .filter(move |&(i, &w)| w != v && !neighbors[..i].contains(&w))
        .map(|(_, &w)| w)
}
