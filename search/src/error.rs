//! Typed search errors.
//!
//! `Exhausted` and `BacktrackBudgetExceeded` are ordinary outcomes of a
//! single attempt: the caller retries with a different start or seed. The
//! remaining variants are pre-flight or internal failures.

use chakra_kernel::grid::vertex::VertexId;

use crate::search::SearchStats;

/// Failure of one search attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Backtracking unwound past the start vertex with nothing left to try.
    #[error(
        "no cycle from ({row},{col}) after {} steps and {} backtracks",
        .stats.steps,
        .stats.backtracks
    )]
    Exhausted { row: u32, col: u32, stats: SearchStats },
    /// The attempt used up its backtrack allowance.
    #[error("backtrack budget of {budget} exhausted from ({row},{col})")]
    BacktrackBudgetExceeded {
        row: u32,
        col: u32,
        budget: u64,
        stats: SearchStats,
    },
    /// The topology has no vertices.
    #[error("topology is empty")]
    EmptyTopology,
    /// The requested start vertex does not belong to the topology.
    #[error("start vertex {start} is outside the topology")]
    StartOutOfRange { start: VertexId },
    /// The policy failed pre-flight validation.
    #[error("invalid search policy: {detail}")]
    InvalidPolicy { detail: String },
    /// The searcher produced a path that is not a cycle (searcher bug).
    #[error("search invariant violated: {detail}")]
    InvariantViolation { detail: String },
}

impl SearchError {
    /// Whether the run loop should simply retry with a new start or seed.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Exhausted { .. } | Self::BacktrackBudgetExceeded { .. }
        )
    }

    /// Work done before the attempt failed, when the attempt got started.
    #[must_use]
    pub fn stats(&self) -> Option<SearchStats> {
        match self {
            Self::Exhausted { stats, .. } | Self::BacktrackBudgetExceeded { stats, .. } => {
                Some(*stats)
            }
            _ => None,
        }
    }
}
