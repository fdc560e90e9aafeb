//! Cycle fingerprints and the run-wide seen set.
//!
//! Uses a `BTreeSet` of hex digests (not `HashSet`) so that iteration order
//! is deterministic when the set is reported or serialized.

use std::collections::BTreeSet;

use chakra_kernel::cycle::Cycle;
use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;
use chakra_kernel::proof::hash::{canonical_hash, ContentHash};
use chakra_kernel::proof::hash_domain::HashDomain;

use crate::policy::DedupKeyV1;

/// Fingerprint of a cycle under the given key policy.
///
/// `LiteralSequence` hashes the closed `(row, col)` sequence as-is.
/// `CyclicCanonical` first rotates the open path so its smallest vertex id
/// leads, then takes the lexicographically smaller of that rotation and its
/// reversal; every traversal of the same cycle maps to one fingerprint.
#[must_use]
pub fn cycle_fingerprint(topology: &Topology, cycle: &Cycle, key: DedupKeyV1) -> ContentHash {
    match key {
        DedupKeyV1::LiteralSequence => {
            canonical_hash(HashDomain::CycleFingerprint, &encode(topology, cycle.as_slice()))
        }
        DedupKeyV1::CyclicCanonical => {
            let canonical = canonical_rotation(cycle.open_path());
            canonical_hash(HashDomain::CycleCanonical, &encode(topology, &canonical))
        }
    }
}

/// Rotation/reflection canonical form of an open cyclic sequence.
#[must_use]
pub fn canonical_rotation(open: &[VertexId]) -> Vec<VertexId> {
    let Some(min_pos) = open
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| **v)
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };
    let n = open.len();
    let forward: Vec<VertexId> = (0..n).map(|k| open[(min_pos + k) % n]).collect();
    let backward: Vec<VertexId> = (0..n).map(|k| open[(min_pos + n - k) % n]).collect();
    forward.min(backward)
}

fn encode(topology: &Topology, ids: &[VertexId]) -> Vec<u8> {
    let mut data = Vec::with_capacity(ids.len() * 8);
    for &id in ids {
        let (row, col) = topology.vertex(id).coords();
        data.extend_from_slice(&row.to_le_bytes());
        data.extend_from_slice(&col.to_le_bytes());
    }
    data
}

/// Fingerprints of every cycle seen during a run.
///
/// Grows monotonically; entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    seen: BTreeSet<String>,
}

impl SeenSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `fingerprint`. Returns `true` if it was not seen before.
    pub fn register(&mut self, fingerprint: &ContentHash) -> bool {
        if self.seen.contains(fingerprint.hex_digest()) {
            return false;
        }
        self.seen.insert(fingerprint.hex_digest().to_string())
    }

    #[must_use]
    pub fn contains(&self, fingerprint: &ContentHash) -> bool {
        self.seen.contains(fingerprint.hex_digest())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
