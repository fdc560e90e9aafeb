//! Search policy types.

use crate::error::SearchError;

/// Default backtrack allowance per attempt.
pub const DEFAULT_MAX_BACKTRACKS: u64 = 200_000;

/// Per-attempt search configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicyV1 {
    /// Hard cap on backtracks within one attempt. Exceeding it ends the
    /// attempt with [`SearchError::BacktrackBudgetExceeded`].
    pub max_backtracks: u64,
    /// How equal-onward-degree candidates are ordered.
    pub tie_break: TieBreakV1,
    /// How discovered cycles are fingerprinted for deduplication.
    pub dedup_key: DedupKeyV1,
}

impl SearchPolicyV1 {
    /// Pre-flight validation.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if `max_backtracks` is zero.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_backtracks == 0 {
            return Err(SearchError::InvalidPolicy {
                detail: "max_backtracks must be at least 1".into(),
            });
        }
        Ok(())
    }
}

impl Default for SearchPolicyV1 {
    fn default() -> Self {
        Self {
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
            tie_break: TieBreakV1::Seeded { seed: 0 },
            dedup_key: DedupKeyV1::LiteralSequence,
        }
    }
}

/// Tie-break strategy among candidates with the same onward degree.
///
/// After the tie-break key, candidates are always ordered by ascending
/// vertex id, so the overall order is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreakV1 {
    /// Row-major coordinate order. Fully reproducible for a given start,
    /// but every attempt from the same start yields the same cycle.
    RowMajor,
    /// Pseudo-random keys drawn from a seeded generator.
    Seeded { seed: u64 },
}

impl TieBreakV1 {
    /// The strategy to use for attempt number `attempt`.
    ///
    /// Seeded strategies advance the seed by the attempt index so that
    /// consecutive attempts explore different cycles while the whole run
    /// stays reproducible from its base seed.
    #[must_use]
    pub fn for_attempt(self, attempt: u64) -> Self {
        match self {
            Self::RowMajor => Self::RowMajor,
            Self::Seeded { seed } => Self::Seeded {
                seed: seed.wrapping_add(attempt),
            },
        }
    }
}

/// Dedup key policy: how cycle fingerprints are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupKeyV1 {
    /// Hash of the literal closed coordinate sequence. Rotations and
    /// reversals of the same cycle count as distinct. Default.
    LiteralSequence,
    /// Hash of the rotation/reflection canonical form. Every traversal of
    /// the same geometric cycle shares one fingerprint.
    CyclicCanonical,
}
