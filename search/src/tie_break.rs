//! Tie-break keys for equal-degree candidates.

use chakra_kernel::grid::vertex::VertexId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::policy::TieBreakV1;

/// Trait for candidate tie-breaking.
///
/// Called once per candidate when a decision frame is expanded. Lower keys
/// are tried first among candidates with the same onward degree.
pub trait TieBreaker {
    /// Key for `candidate`. May advance internal state.
    fn tie_key(&mut self, candidate: VertexId) -> u64;
}

/// Row-major order: the key is the vertex id itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowMajorTieBreaker;

impl TieBreaker for RowMajorTieBreaker {
    fn tie_key(&mut self, candidate: VertexId) -> u64 {
        u64::from(candidate.0)
    }
}

/// Pseudo-random keys from a seeded `StdRng`.
///
/// The same seed replays the same key stream, so an attempt is
/// reproducible from `(start, seed)`.
#[derive(Debug, Clone)]
pub struct SeededTieBreaker {
    rng: StdRng,
}

impl SeededTieBreaker {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl TieBreaker for SeededTieBreaker {
    fn tie_key(&mut self, _candidate: VertexId) -> u64 {
        self.rng.random()
    }
}

/// Instantiate the tie-breaker named by a policy.
#[must_use]
pub fn tie_breaker_for(strategy: TieBreakV1) -> Box<dyn TieBreaker> {
    match strategy {
        TieBreakV1::RowMajor => Box::new(RowMajorTieBreaker),
        TieBreakV1::Seeded { seed } => Box::new(SeededTieBreaker::new(seed)),
    }
}
