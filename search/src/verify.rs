//! Run-length and adjacency verification of discovered cycles.

use chakra_kernel::cycle::Cycle;
use chakra_kernel::grid::label::Label;
use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;

pub const DEFAULT_MAX_VOWEL_RUN: u32 = 3;
pub const DEFAULT_MAX_CONSONANT_RUN: u32 = 4;

/// One broken rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViolationV1 {
    #[error("{max_observed} consecutive vowels (limit {limit})")]
    VowelRun { max_observed: u32, limit: u32 },
    #[error("{max_observed} consecutive consonants (limit {limit})")]
    ConsonantRun { max_observed: u32, limit: u32 },
    #[error("step {position} from {from} to {to} is not adjacent")]
    NonAdjacent {
        position: usize,
        from: VertexId,
        to: VertexId,
    },
}

/// Verdict plus every violation found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReportV1 {
    pub violations: Vec<ViolationV1>,
    /// Longest vowel run seen over the closed sequence.
    pub max_vowel_run: u32,
    /// Longest consonant run seen over the closed sequence.
    pub max_consonant_run: u32,
}

impl VerificationReportV1 {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Checks phonetic run lengths and step adjacency of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintVerifier {
    pub max_vowel_run: u32,
    pub max_consonant_run: u32,
}

impl Default for ConstraintVerifier {
    fn default() -> Self {
        Self {
            max_vowel_run: DEFAULT_MAX_VOWEL_RUN,
            max_consonant_run: DEFAULT_MAX_CONSONANT_RUN,
        }
    }
}

impl ConstraintVerifier {
    #[must_use]
    pub fn new(max_vowel_run: u32, max_consonant_run: u32) -> Self {
        Self {
            max_vowel_run,
            max_consonant_run,
        }
    }

    /// Verify `cycle` against `topology`.
    ///
    /// Scans the whole closed sequence, closing vertex included, and keeps
    /// going after the first violation.
    #[must_use]
    pub fn verify(&self, topology: &Topology, cycle: &Cycle) -> VerificationReportV1 {
        let (max_vowel_run, max_consonant_run) = longest_runs(topology, cycle.as_slice());

        let mut violations = Vec::new();
        if max_vowel_run > self.max_vowel_run {
            violations.push(ViolationV1::VowelRun {
                max_observed: max_vowel_run,
                limit: self.max_vowel_run,
            });
        }
        if max_consonant_run > self.max_consonant_run {
            violations.push(ViolationV1::ConsonantRun {
                max_observed: max_consonant_run,
                limit: self.max_consonant_run,
            });
        }
        for (position, pair) in cycle.as_slice().windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            if !topology.is_adjacent(from, to) {
                violations.push(ViolationV1::NonAdjacent { position, from, to });
            }
        }

        VerificationReportV1 {
            violations,
            max_vowel_run,
            max_consonant_run,
        }
    }
}

/// Longest `(vowel, consonant)` runs. A special resets both counters.
fn longest_runs(topology: &Topology, ids: &[VertexId]) -> (u32, u32) {
    let (mut vowels, mut consonants) = (0u32, 0u32);
    let (mut max_vowels, mut max_consonants) = (0u32, 0u32);
    for &id in ids {
        match topology.vertex(id).label() {
            Label::Vowel => {
                vowels += 1;
                consonants = 0;
                max_vowels = max_vowels.max(vowels);
            }
            Label::Consonant => {
                consonants += 1;
                vowels = 0;
                max_consonants = max_consonants.max(consonants);
            }
            Label::Special => {
                vowels = 0;
                consonants = 0;
            }
        }
    }
    (max_vowels, max_consonants)
}
