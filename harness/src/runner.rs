//! Run loop: search, deduplicate, verify, hand off.
//!
//! # Attempt pipeline
//!
//! ```text
//! Searching ──found──▶ Deduplicating ──novel──▶ Verifying ──valid──▶ Accepted
//!     │                     │                       │
//!     └─exhausted──▶ Retrying ◀──duplicate──┘       └──invalid──▶ Retrying
//! ```
//!
//! Accepted and Retrying both lead back to Searching on the next attempt.
//! The orchestrator owns the seen-set and the stop signal; nothing is
//! process-global. Each attempt runs under `catch_unwind`, so a panic in the
//! searcher, verifier or sink is logged and counted as
//! [`AttemptOutcome::Failed`] instead of ending the run.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chakra_kernel::grid::topology::Topology;
use chakra_kernel::grid::vertex::VertexId;
use chakra_kernel::proof::hash::ContentHash;
use chakra_search::dedup::{cycle_fingerprint, SeenSet};
use chakra_search::error::SearchError;
use chakra_search::policy::SearchPolicyV1;
use chakra_search::search::find_cycle;
use chakra_search::tie_break::tie_breaker_for;
use chakra_search::verify::{ConstraintVerifier, ViolationV1};

use crate::config::{ConfigError, RunConfig, StartSelectionV1};
use crate::output::{AcceptedCycle, CycleSink};

/// Fingerprint hex digits shown in log lines.
const LOG_HEX_LEN: usize = 12;

/// Orchestrator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Searching,
    Deduplicating,
    Verifying,
    Accepted,
    Retrying,
}

/// Result of one [`Orchestrator::run_once`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Novel, valid, handed to the sink.
    Accepted {
        attempt: u64,
        fingerprint: ContentHash,
        location: Option<PathBuf>,
    },
    /// No cycle from this start and seed.
    Exhausted { attempt: u64, error: SearchError },
    /// Cycle already seen this run.
    Duplicate {
        attempt: u64,
        fingerprint: ContentHash,
    },
    /// Cycle failed verification.
    Rejected {
        attempt: u64,
        fingerprint: ContentHash,
        violations: Vec<ViolationV1>,
    },
    /// Unexpected error or panic inside the attempt.
    Failed { attempt: u64, detail: String },
}

impl AttemptOutcome {
    #[must_use]
    pub fn attempt(&self) -> u64 {
        match self {
            Self::Accepted { attempt, .. }
            | Self::Exhausted { attempt, .. }
            | Self::Duplicate { attempt, .. }
            | Self::Rejected { attempt, .. }
            | Self::Failed { attempt, .. } => *attempt,
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Outcome counters for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub attempts: u64,
    pub accepted: u64,
    pub exhausted: u64,
    pub duplicates: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl RunStats {
    fn record(&mut self, outcome: &AttemptOutcome) {
        self.attempts += 1;
        let counter = match outcome {
            AttemptOutcome::Accepted { .. } => &mut self.accepted,
            AttemptOutcome::Exhausted { .. } => &mut self.exhausted,
            AttemptOutcome::Duplicate { .. } => &mut self.duplicates,
            AttemptOutcome::Rejected { .. } => &mut self.rejected,
            AttemptOutcome::Failed { .. } => &mut self.failed,
        };
        *counter += 1;
    }
}

impl std::fmt::Display for RunStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempts: {} accepted, {} exhausted, {} duplicate, {} rejected, {} failed",
            self.attempts, self.accepted, self.exhausted, self.duplicates, self.rejected, self.failed
        )
    }
}

/// Cooperative cancellation flag, checked between attempts.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Failure constructing an [`Orchestrator`].
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Owns the run state and drives attempts.
pub struct Orchestrator {
    topology: Topology,
    policy: SearchPolicyV1,
    verifier: ConstraintVerifier,
    start: StartSelectionV1,
    max_accepted: Option<u64>,
    max_attempts: Option<u64>,
    seen: SeenSet,
    stop: StopSignal,
    sink: Box<dyn CycleSink>,
    phase: RunPhase,
    trail: Vec<RunPhase>,
    next_attempt: u64,
    stats: RunStats,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("policy", &self.policy)
            .field("verifier", &self.verifier)
            .field("start", &self.start)
            .field("phase", &self.phase)
            .field("seen", &self.seen.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Build an orchestrator for `topology`.
    ///
    /// # Errors
    ///
    /// [`RunError::Config`] if the configuration is invalid for this grid,
    /// [`RunError::Search`] if the topology is empty or the derived search
    /// policy is invalid.
    pub fn new(
        topology: Topology,
        config: &RunConfig,
        sink: Box<dyn CycleSink>,
        stop: StopSignal,
    ) -> Result<Self, RunError> {
        if topology.is_empty() {
            return Err(SearchError::EmptyTopology.into());
        }
        config.validate_for_grid(topology.rows(), topology.cols())?;
        let policy = config.search_policy();
        policy.validate()?;
        Ok(Self {
            topology,
            policy,
            verifier: config.verifier(),
            start: config.start,
            max_accepted: config.max_accepted,
            max_attempts: config.max_attempts,
            seen: SeenSet::new(),
            stop,
            sink,
            phase: RunPhase::Searching,
            trail: Vec::new(),
            next_attempt: 0,
            stats: RunStats::default(),
        })
    }

    #[must_use]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[must_use]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Phases entered during the most recent attempt, in order.
    #[must_use]
    pub fn last_transitions(&self) -> &[RunPhase] {
        &self.trail
    }

    #[must_use]
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    #[must_use]
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Perform one full attempt.
    pub fn run_once(&mut self) -> AttemptOutcome {
        let attempt = self.next_attempt;
        self.next_attempt += 1;
        self.trail.clear();
        self.enter(RunPhase::Searching);

        let outcome = match catch_unwind(AssertUnwindSafe(|| self.attempt(attempt))) {
            Ok(outcome) => outcome,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                log::error!("attempt {attempt} panicked: {detail}");
                AttemptOutcome::Failed { attempt, detail }
            }
        };
        if let AttemptOutcome::Failed { .. } = outcome {
            if self.phase != RunPhase::Retrying {
                self.enter(RunPhase::Retrying);
            }
        }
        self.stats.record(&outcome);
        outcome
    }

    /// Loop [`Orchestrator::run_once`] until the stop signal is raised, a
    /// configured limit is reached, or `predicate` returns true.
    ///
    /// The signal and predicate are checked between attempts only.
    pub fn run_until(&mut self, mut predicate: impl FnMut(&RunStats) -> bool) -> RunStats {
        loop {
            if self.stop.is_stopped() {
                log::info!("stop requested after {} attempts", self.stats.attempts);
                break;
            }
            if self.limit_reached() || predicate(&self.stats) {
                break;
            }
            self.run_once();
        }
        self.stats
    }

    /// Run until stopped or a configured limit is reached.
    pub fn run(&mut self) -> RunStats {
        self.run_until(|_| false)
    }

    fn limit_reached(&self) -> bool {
        self.max_accepted.is_some_and(|max| self.stats.accepted >= max)
            || self.max_attempts.is_some_and(|max| self.stats.attempts >= max)
    }

    fn enter(&mut self, phase: RunPhase) {
        log::debug!("{:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.trail.push(phase);
    }

    fn start_vertex(&self, attempt: u64) -> VertexId {
        match self.start {
            StartSelectionV1::RoundRobin => {
                let n = u64::try_from(self.topology.len()).unwrap_or(u64::MAX).max(1);
                u32::try_from(attempt % n).map_or(VertexId(0), VertexId)
            }
            StartSelectionV1::Fixed { row, col } => {
                self.topology.id_at(row, col).unwrap_or(VertexId(0))
            }
        }
    }

    fn attempt(&mut self, attempt: u64) -> AttemptOutcome {
        let start = self.start_vertex(attempt);
        let tie_break = self.policy.tie_break.for_attempt(attempt);
        let mut tie_breaker = tie_breaker_for(tie_break);

        let found = match find_cycle(&self.topology, start, &self.policy, tie_breaker.as_mut()) {
            Ok(found) => found,
            Err(error) if error.is_recoverable() => {
                log::debug!("attempt {attempt}: {error}");
                self.enter(RunPhase::Retrying);
                return AttemptOutcome::Exhausted { attempt, error };
            }
            Err(error) => {
                log::error!("attempt {attempt}: {error}");
                self.enter(RunPhase::Retrying);
                return AttemptOutcome::Failed {
                    attempt,
                    detail: error.to_string(),
                };
            }
        };

        self.enter(RunPhase::Deduplicating);
        let fingerprint = cycle_fingerprint(&self.topology, &found.cycle, self.policy.dedup_key);
        if !self.seen.register(&fingerprint) {
            log::warn!(
                "attempt {attempt}: duplicate cycle {}",
                fingerprint.short_hex(LOG_HEX_LEN)
            );
            self.enter(RunPhase::Retrying);
            return AttemptOutcome::Duplicate {
                attempt,
                fingerprint,
            };
        }

        self.enter(RunPhase::Verifying);
        let report = self.verifier.verify(&self.topology, &found.cycle);
        if !report.is_valid() {
            for violation in &report.violations {
                log::warn!(
                    "attempt {attempt}: cycle {} rejected: {violation}",
                    fingerprint.short_hex(LOG_HEX_LEN)
                );
            }
            self.enter(RunPhase::Retrying);
            return AttemptOutcome::Rejected {
                attempt,
                fingerprint,
                violations: report.violations,
            };
        }

        self.enter(RunPhase::Accepted);
        log::info!(
            "attempt {attempt}: accepted cycle {} ({} steps, {} backtracks)",
            fingerprint.short_hex(LOG_HEX_LEN),
            found.stats.steps,
            found.stats.backtracks
        );
        let accepted = AcceptedCycle {
            attempt,
            cycle: found.cycle,
            fingerprint,
            tie_break,
            stats: found.stats,
            report,
        };
        match self.sink.accept(&self.topology, &accepted) {
            Ok(location) => AttemptOutcome::Accepted {
                attempt,
                fingerprint: accepted.fingerprint,
                location,
            },
            Err(e) => {
                log::error!("attempt {attempt}: could not persist accepted cycle: {e}");
                AttemptOutcome::Failed {
                    attempt,
                    detail: e.to_string(),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
