//! Run loop lock tests: state transitions, seen-set ownership, cooperative
//! stop, and isolation of per-attempt failures.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use chakra_harness::config::{RunConfig, StartSelectionV1};
use chakra_harness::output::{AcceptedCycle, CycleSink, OutputError};
use chakra_harness::runner::{AttemptOutcome, Orchestrator, RunPhase, StopSignal};
use chakra_kernel::grid::label::LabelScheme;
use chakra_kernel::grid::topology::Topology;
use chakra_search::policy::{DedupKeyV1, TieBreakV1};
use lock_tests::grid_fixtures::{friendly_4x4, sequential};

/// Records accepted cycles and raises `stop` after `stop_after` of them.
struct StoppingSink {
    accepted: Rc<RefCell<Vec<AcceptedCycle>>>,
    stop: StopSignal,
    stop_after: usize,
}

impl CycleSink for StoppingSink {
    fn accept(
        &mut self,
        _topology: &Topology,
        accepted: &AcceptedCycle,
    ) -> Result<Option<PathBuf>, OutputError> {
        let mut log = self.accepted.borrow_mut();
        log.push(accepted.clone());
        if log.len() >= self.stop_after {
            self.stop.stop();
        }
        Ok(None)
    }
}

fn stopping(stop_after: usize) -> (StoppingSink, Rc<RefCell<Vec<AcceptedCycle>>>, StopSignal) {
    let accepted = Rc::new(RefCell::new(Vec::new()));
    let stop = StopSignal::new();
    let sink = StoppingSink {
        accepted: Rc::clone(&accepted),
        stop: stop.clone(),
        stop_after,
    };
    (sink, accepted, stop)
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[test]
fn phases_follow_the_state_machine() {
    let allowed = |from: RunPhase, to: RunPhase| {
        matches!(
            (from, to),
            (RunPhase::Searching, RunPhase::Deduplicating | RunPhase::Retrying)
                | (RunPhase::Deduplicating, RunPhase::Verifying | RunPhase::Retrying)
                | (RunPhase::Verifying, RunPhase::Accepted | RunPhase::Retrying)
                | (RunPhase::Accepted, RunPhase::Retrying)
        )
    };

    let config = RunConfig {
        tie_break: TieBreakV1::RowMajor,
        start: StartSelectionV1::Fixed { row: 1, col: 1 },
        ..RunConfig::default()
    };
    let (sink, _, stop) = stopping(usize::MAX);
    let mut o = Orchestrator::new(friendly_4x4(), &config, Box::new(sink), stop).unwrap();
    for _ in 0..3 {
        o.run_once();
        let trail = o.last_transitions();
        assert_eq!(trail[0], RunPhase::Searching);
        for pair in trail.windows(2) {
            assert!(allowed(pair[0], pair[1]), "illegal {:?} -> {:?}", pair[0], pair[1]);
        }
    }
}

#[test]
fn accepted_is_not_terminal() {
    let (sink, accepted, stop) = stopping(usize::MAX);
    let mut o = Orchestrator::new(friendly_4x4(), &RunConfig::default(), Box::new(sink), stop)
        .unwrap();
    let stats = o.run_until(|s| s.accepted >= 5);
    assert_eq!(stats.accepted, 5);
    assert_eq!(accepted.borrow().len(), 5);
    let attempts: Vec<u64> = accepted.borrow().iter().map(|a| a.attempt).collect();
    assert!(attempts.windows(2).all(|w| w[0] < w[1]));
}

// ---------------------------------------------------------------------------
// Seen-set
// ---------------------------------------------------------------------------

#[test]
fn seen_set_spans_attempts_and_rejects_repeats() {
    let config = RunConfig {
        tie_break: TieBreakV1::RowMajor,
        dedup_key: DedupKeyV1::CyclicCanonical,
        ..RunConfig::default()
    };
    let (sink, accepted, stop) = stopping(usize::MAX);
    let mut o = Orchestrator::new(friendly_4x4(), &config, Box::new(sink), stop).unwrap();
    let stats = o.run_until(|s| s.attempts >= 32);
    assert_eq!(stats.accepted + stats.duplicates, 32);
    assert_eq!(o.seen().len() as u64, stats.accepted);

    let fingerprints: std::collections::BTreeSet<String> = accepted
        .borrow()
        .iter()
        .map(|a| a.fingerprint.as_str().to_string())
        .collect();
    assert_eq!(fingerprints.len(), accepted.borrow().len());
}

// ---------------------------------------------------------------------------
// Stop signal
// ---------------------------------------------------------------------------

#[test]
fn stop_raised_mid_run_ends_loop_after_current_attempt() {
    let (sink, accepted, stop) = stopping(2);
    let mut o = Orchestrator::new(friendly_4x4(), &RunConfig::default(), Box::new(sink), stop)
        .unwrap();
    let stats = o.run();
    assert_eq!(stats.accepted, 2);
    assert_eq!(accepted.borrow().len(), 2);
    assert!(o.stop_signal().is_stopped());
}

// ---------------------------------------------------------------------------
// Failure isolation
// ---------------------------------------------------------------------------

#[test]
fn rejected_and_exhausted_attempts_keep_the_loop_alive() {
    let all_vowels = sequential(3, &LabelScheme::default());
    let (sink, _, stop) = stopping(usize::MAX);
    let mut o = Orchestrator::new(all_vowels, &RunConfig::default(), Box::new(sink), stop).unwrap();
    let stats = o.run_until(|s| s.attempts >= 4);
    assert_eq!(stats.rejected, 4);

    let single = sequential(1, &LabelScheme::default());
    let (sink, _, stop) = stopping(usize::MAX);
    let mut o = Orchestrator::new(single, &RunConfig::default(), Box::new(sink), stop).unwrap();
    let outcomes: Vec<AttemptOutcome> = (0..3).map(|_| o.run_once()).collect();
    assert!(outcomes
        .iter()
        .all(|out| matches!(out, AttemptOutcome::Exhausted { .. })));
    assert_eq!(o.stats().exhausted, 3);
}
