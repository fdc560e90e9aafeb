//! Grid topology lock tests: input parsing, coverage, neighbour symmetry and
//! the toroidal adjacency predicate.

use chakra_kernel::grid::label::{Label, LabelScheme};
use chakra_kernel::grid::matrix::GridMatrix;
use chakra_kernel::grid::topology::{Topology, NEIGHBOR_COUNT};
use chakra_kernel::grid::GridError;
use lock_tests::grid_fixtures::{friendly_4x4, sequential};

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

#[test]
fn mixed_delimiters_parse_to_square() {
    let m = GridMatrix::parse_square("1, 2,3\n4\t5 6\r\n7,8,\t9\n").unwrap();
    assert_eq!((m.rows(), m.cols()), (3, 3));
    assert_eq!(m.values(), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
}

#[test]
fn malformed_input_is_rejected() {
    assert_eq!(GridMatrix::parse_square(" \n,\t"), Err(GridError::Empty));
    assert!(matches!(
        GridMatrix::parse_square("1 2 3"),
        Err(GridError::NotSquare { count: 3 })
    ));
    assert!(matches!(
        GridMatrix::parse_square("1 2 x 4"),
        Err(GridError::BadToken { index: 2, .. })
    ));
    assert!(matches!(
        GridMatrix::parse_square("1 2 0 4"),
        Err(GridError::ZeroValue { row: 1, col: 0 })
    ));
    assert!(matches!(
        GridMatrix::from_rows(&[vec![1, 2], vec![3]]),
        Err(GridError::Ragged { row: 1, .. })
    ));
}

// ---------------------------------------------------------------------------
// Coverage and symmetry
// ---------------------------------------------------------------------------

#[test]
fn every_cell_appears_once_with_eight_neighbours() {
    for side in 3..=9 {
        let t = sequential(side, &LabelScheme::default());
        assert_eq!(t.len(), (side * side) as usize);
        let mut coords: Vec<(u32, u32)> = t.vertices().iter().map(|v| v.coords()).collect();
        coords.sort_unstable();
        coords.dedup();
        assert_eq!(coords.len(), t.len(), "duplicate coordinates at side {side}");

        for id in t.ids() {
            let mut ns = t.neighbors(id).to_vec();
            ns.sort_unstable();
            ns.dedup();
            assert_eq!(ns.len(), NEIGHBOR_COUNT, "side {side}, vertex {id}");
            assert!(!ns.contains(&id));
        }
    }
}

#[test]
fn adjacency_is_symmetric() {
    for side in 1..=7 {
        let t = sequential(side, &LabelScheme::default());
        for a in t.ids() {
            for &b in t.neighbors(a) {
                assert!(
                    t.neighbors(b).contains(&a),
                    "side {side}: {b} lists no edge back to {a}"
                );
            }
        }
    }
}

#[test]
fn predicate_matches_neighbour_lists_for_distinct_cells() {
    let t = sequential(6, &LabelScheme::default());
    for a in t.ids() {
        for b in t.ids() {
            let listed = a != b && t.neighbors(a).contains(&b);
            assert_eq!(t.is_adjacent(a, b), listed, "{a} / {b}");
        }
    }
}

#[test]
fn wraparound_on_both_axes() {
    let t = sequential(5, &LabelScheme::default());
    let corner = t.id_at(0, 0).unwrap();
    for (r, c) in [(4, 4), (4, 0), (0, 4), (1, 4), (4, 1)] {
        assert!(t.is_adjacent(corner, t.id_at(r, c).unwrap()), "({r},{c})");
    }
    assert!(!t.is_adjacent(corner, t.id_at(2, 0).unwrap()));
    assert!(!t.is_adjacent(corner, t.id_at(3, 3).unwrap()));
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[test]
fn labels_derive_from_values_once() {
    let t = friendly_4x4();
    let labels: Vec<Label> = t.vertices().iter().map(|v| v.label()).collect();
    let vowels = labels.iter().filter(|&&l| l == Label::Vowel).count();
    let consonants = labels.iter().filter(|&&l| l == Label::Consonant).count();
    assert_eq!((vowels, consonants, labels.len() - vowels - consonants), (4, 4, 8));
    assert_eq!(t.vertex(t.id_at(0, 2).unwrap()).label(), Label::Vowel);
    assert_eq!(t.vertex(t.id_at(3, 2).unwrap()).label(), Label::Consonant);
}
