//! Deduplication and verification lock tests.

use chakra_kernel::grid::label::LabelScheme;
use chakra_kernel::grid::vertex::VertexId;
use chakra_search::dedup::{cycle_fingerprint, SeenSet};
use chakra_search::policy::{DedupKeyV1, SearchPolicyV1};
use chakra_search::search::find_cycle;
use chakra_search::tie_break::SeededTieBreaker;
use chakra_search::verify::{ConstraintVerifier, ViolationV1};
use lock_tests::grid_fixtures::{cycle_through, from_values, row_major_cycle, sequential};

// ---------------------------------------------------------------------------
// Dedup idempotence
// ---------------------------------------------------------------------------

#[test]
fn register_is_novel_then_duplicate() {
    let t = sequential(5, &LabelScheme::default());
    let outcome = find_cycle(
        &t,
        VertexId(0),
        &SearchPolicyV1::default(),
        &mut SeededTieBreaker::new(5),
    )
    .unwrap();
    for key in [DedupKeyV1::LiteralSequence, DedupKeyV1::CyclicCanonical] {
        let mut seen = SeenSet::new();
        let fp = cycle_fingerprint(&t, &outcome.cycle, key);
        assert!(seen.register(&fp), "first registration is novel");
        assert!(!seen.register(&fp), "second registration is a duplicate");
        assert!(!seen.register(&cycle_fingerprint(&t, &outcome.cycle, key)));
        assert_eq!(seen.len(), 1);
    }
}

#[test]
fn cyclic_key_identifies_rotated_and_reversed_traversals() {
    let t = sequential(4, &LabelScheme::default());
    let forward = row_major_cycle(&t);
    let open: Vec<(u32, u32)> = forward.coords(&t)[..16].to_vec();

    let mut rotated = open.clone();
    rotated.rotate_left(5);
    let mut reversed = open.clone();
    reversed.reverse();

    let mut seen = SeenSet::new();
    assert!(seen.register(&cycle_fingerprint(&t, &forward, DedupKeyV1::CyclicCanonical)));
    for variant in [rotated, reversed] {
        let c = cycle_through(&t, &variant);
        assert!(!seen.register(&cycle_fingerprint(&t, &c, DedupKeyV1::CyclicCanonical)));
        assert_ne!(
            cycle_fingerprint(&t, &c, DedupKeyV1::LiteralSequence),
            cycle_fingerprint(&t, &forward, DedupKeyV1::LiteralSequence)
        );
    }
}

// ---------------------------------------------------------------------------
// Verifier boundaries
// ---------------------------------------------------------------------------

#[test]
fn exactly_three_vowels_pass() {
    let t = from_values(&[1, 2, 3, 30, 31, 32, 61, 62, 63]);
    let report = ConstraintVerifier::default().verify(&t, &row_major_cycle(&t));
    assert!(report.is_valid(), "{:?}", report.violations);
}

#[test]
fn four_vowels_fail_reporting_four() {
    let t = from_values(&[1, 2, 3, 4, 31, 32, 61, 62, 63]);
    let report = ConstraintVerifier::default().verify(&t, &row_major_cycle(&t));
    assert!(!report.is_valid());
    assert!(report.violations.contains(&ViolationV1::VowelRun {
        max_observed: 4,
        limit: 3
    }));
}

#[test]
fn wrapped_distance_two_fails_at_its_position() {
    let t = sequential(5, &LabelScheme::new(0, 100));
    // Column-major, except rows 1 and 2 of column 0 are swapped.
    let mut coords = Vec::new();
    for col in 0..5 {
        for row in 0..5 {
            coords.push((row, col));
        }
    }
    coords.swap(1, 2);
    let cycle = cycle_through(&t, &coords);
    let report = ConstraintVerifier::new(100, 100).verify(&t, &cycle);
    let positions: Vec<usize> = report
        .violations
        .iter()
        .filter_map(|v| match v {
            ViolationV1::NonAdjacent { position, from, to } => {
                assert_eq!(t.wrapped_offset(*from, *to), (2, 0));
                Some(*position)
            }
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![0, 2]);
}

#[test]
fn verifier_is_deterministic() {
    let t = from_values(&[1, 2, 3, 4, 31, 32, 61, 62, 63]);
    let cycle = row_major_cycle(&t);
    let verifier = ConstraintVerifier::default();
    let first = verifier.verify(&t, &cycle);
    for _ in 0..10 {
        assert_eq!(verifier.verify(&t, &cycle), first);
    }
}
