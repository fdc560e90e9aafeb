//! Run configuration.
//!
//! [`RunConfig`] gathers every knob of a discovery run. The CLI fills it
//! from flags; tests build it directly. [`RunConfig::validate`] runs before
//! the orchestrator is constructed.

use std::path::PathBuf;

use chakra_kernel::grid::label::LabelScheme;
use chakra_search::policy::{DedupKeyV1, SearchPolicyV1, TieBreakV1, DEFAULT_MAX_BACKTRACKS};
use chakra_search::verify::{ConstraintVerifier, DEFAULT_MAX_CONSONANT_RUN, DEFAULT_MAX_VOWEL_RUN};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Default solution file prefix.
pub const DEFAULT_PREFIX: &str = "sample";

/// How the start vertex of each attempt is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartSelectionV1 {
    /// Attempt `k` starts at vertex `k mod n`.
    RoundRobin,
    /// Every attempt starts at the same cell.
    Fixed { row: u32, col: u32 },
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("file prefix must not be empty")]
    EmptyPrefix,
    #[error("file prefix {prefix:?} must not contain path separators")]
    PrefixHasSeparator { prefix: String },
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
    #[error("vowel bound {vowel_max} exceeds consonant bound {consonant_max}")]
    LabelBounds { vowel_max: u32, consonant_max: u32 },
    #[error("start ({row},{col}) is outside a {rows}x{cols} grid")]
    StartOutsideGrid {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },
}

/// Full configuration of a discovery run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub max_vowel_run: u32,
    pub max_consonant_run: u32,
    pub labels: LabelScheme,
    pub tie_break: TieBreakV1,
    pub start: StartSelectionV1,
    pub dedup_key: DedupKeyV1,
    pub max_backtracks: u64,
    /// Stop after this many accepted cycles. `None` runs until stopped.
    pub max_accepted: Option<u64>,
    /// Stop after this many attempts. `None` runs until stopped.
    pub max_attempts: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            max_vowel_run: DEFAULT_MAX_VOWEL_RUN,
            max_consonant_run: DEFAULT_MAX_CONSONANT_RUN,
            labels: LabelScheme::default(),
            tie_break: TieBreakV1::Seeded { seed: 0 },
            start: StartSelectionV1::RoundRobin,
            dedup_key: DedupKeyV1::LiteralSequence,
            max_backtracks: DEFAULT_MAX_BACKTRACKS,
            max_accepted: None,
            max_attempts: None,
        }
    }
}

impl RunConfig {
    /// Check internal consistency. Grid-dependent checks live in
    /// [`RunConfig::validate_for_grid`].
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(ConfigError::PrefixHasSeparator {
                prefix: self.prefix.clone(),
            });
        }
        if self.max_backtracks == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_backtracks",
            });
        }
        if self.max_accepted == Some(0) {
            return Err(ConfigError::ZeroLimit {
                field: "max_accepted",
            });
        }
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroLimit {
                field: "max_attempts",
            });
        }
        if self.labels.vowel_max > self.labels.consonant_max {
            return Err(ConfigError::LabelBounds {
                vowel_max: self.labels.vowel_max,
                consonant_max: self.labels.consonant_max,
            });
        }
        Ok(())
    }

    /// [`RunConfig::validate`] plus checks against the grid dimensions.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate_for_grid(&self, rows: u32, cols: u32) -> Result<(), ConfigError> {
        self.validate()?;
        if let StartSelectionV1::Fixed { row, col } = self.start {
            if row >= rows || col >= cols {
                return Err(ConfigError::StartOutsideGrid {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
        }
        Ok(())
    }

    /// Search policy for the base attempt (attempt 0).
    #[must_use]
    pub fn search_policy(&self) -> SearchPolicyV1 {
        SearchPolicyV1 {
            max_backtracks: self.max_backtracks,
            tie_break: self.tie_break,
            dedup_key: self.dedup_key,
        }
    }

    #[must_use]
    pub fn verifier(&self) -> ConstraintVerifier {
        ConstraintVerifier::new(self.max_vowel_run, self.max_consonant_run)
    }
}
