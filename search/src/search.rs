//! Search entry point and backtracking loop.
//!
//! # Algorithm
//!
//! Warnsdorff-style greedy walk over the toroidal topology:
//!
//! 1. Place the start vertex and expand its decision frame.
//! 2. Repeatedly take the best untried candidate of the top frame, place it
//!    and expand a new frame. Neighbours of the start are kept for the end
//!    of the walk; among the rest, fewest onward options go first.
//! 3. After each placement, [`Pruner::viable`] checks that the unvisited
//!    vertices can still be threaded from the head back to the start. If
//!    not, the placement gets an empty frame and is undone at once.
//! 4. When the top frame has no candidates left, pop it, unplace its vertex
//!    and fall back to the next alternative of the frame below.
//! 5. Once every vertex is placed, succeed if the last one is adjacent to
//!    the start; otherwise treat it as a dead end and backtrack.
//!
//! The backtracking stack is an owned `Vec<DecisionFrame>`, so recursion
//! depth never grows with the grid.

use chakra_kernel::cycle::Cycle;
use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;

use crate::error::SearchError;
use crate::frame::DecisionFrame;
use crate::policy::SearchPolicyV1;
use crate::prune::Pruner;
use crate::tie_break::TieBreaker;

/// Work counters for one attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Vertices placed after the start (including re-placements).
    pub steps: u64,
    /// Vertices unplaced while backtracking.
    pub backtracks: u64,
}

/// A successful attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The closed cycle (`n + 1` entries).
    pub cycle: Cycle,
    pub stats: SearchStats,
}

/// Run one search attempt from `start`.
///
/// Each call owns its own state; nothing is shared with earlier calls.
///
/// # Errors
///
/// - [`SearchError::Exhausted`] / [`SearchError::BacktrackBudgetExceeded`]
///   when no cycle is found from this configuration (recoverable).
/// - [`SearchError::InvalidPolicy`], [`SearchError::EmptyTopology`],
///   [`SearchError::StartOutOfRange`] for pre-flight failures.
/// - [`SearchError::InvariantViolation`] if the finished path fails cycle
///   validation (indicates a searcher bug).
pub fn find_cycle(
    topology: &Topology,
    start: VertexId,
    policy: &SearchPolicyV1,
    tie_breaker: &mut dyn TieBreaker,
) -> Result<SearchOutcome, SearchError> {
    policy.validate()?;
    if topology.is_empty() {
        return Err(SearchError::EmptyTopology);
    }
    if !topology.contains(start) {
        return Err(SearchError::StartOutOfRange { start });
    }

    let n = topology.len();
    let (row, col) = topology.vertex(start).coords();
    let mut visited = vec![false; n];
    let mut path: Vec<VertexId> = Vec::with_capacity(n + 1);
    let mut frames: Vec<DecisionFrame> = Vec::with_capacity(n);
    let mut pruner = Pruner::new(n);
    let mut stats = SearchStats::default();

    visited[start.index()] = true;
    path.push(start);
    frames.push(DecisionFrame::expand(
        topology,
        start,
        start,
        &visited,
        tie_breaker,
    ));

    loop {
        if path.len() == n && topology.is_adjacent(path[n - 1], start) {
            log::debug!(
                "cycle closed from ({row},{col}): {} steps, {} backtracks",
                stats.steps,
                stats.backtracks
            );
            return match Cycle::close(topology, path) {
                Ok(cycle) => Ok(SearchOutcome { cycle, stats }),
                Err(e) => Err(SearchError::InvariantViolation {
                    detail: e.to_string(),
                }),
            };
        }

        let Some(top) = frames.last_mut() else {
            return Err(SearchError::Exhausted { row, col, stats });
        };

        if let Some(next) = top.next_candidate() {
            visited[next.index()] = true;
            path.push(next);
            stats.steps += 1;
            let frame = if path.len() < n && !pruner.viable(topology, &visited, next, start) {
                DecisionFrame::dead_end(next)
            } else {
                DecisionFrame::expand(topology, next, start, &visited, tie_breaker)
            };
            frames.push(frame);
            continue;
        }

        // Dead end: unplace the top vertex.
        frames.pop();
        let Some(undone) = path.pop() else {
            return Err(SearchError::InvariantViolation {
                detail: "path shorter than frame stack".into(),
            });
        };
        if frames.is_empty() {
            return Err(SearchError::Exhausted { row, col, stats });
        }
        visited[undone.index()] = false;
        stats.backtracks += 1;
        if stats.backtracks > policy.max_backtracks {
            return Err(SearchError::BacktrackBudgetExceeded {
                row,
                col,
                budget: policy.max_backtracks,
                stats,
            });
        }
    }
}
