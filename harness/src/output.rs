//! Persisting accepted cycles.
//!
//! # File layout
//!
//! Each accepted cycle produces two files in the output directory, both
//! named after the first 12 hex digits of the cycle fingerprint:
//!
//! ```text
//! <prefix>-<fp12>.txt     symbol renderings, annotations, coordinate trace
//! <prefix>-<fp12>.json    machine-readable sidecar
//! ```
//!
//! The text file reads:
//!
//! ```text
//! "अ","क",...,            script A rendering
//!
//! Kannada:                script B heading
//! "ಅ","ಕ",...,            script B rendering
//!
//! <text>                  zero or more annotation blocks
//! <meaning>
//! <word: start - end, ...>
//!
//! Path: (0,0):1 -> (0,1):28 -> ...
//! ```
//!
//! Both files are written atomically (temp file + rename).

use std::path::{Path, PathBuf};

use chakra_kernel::cycle::Cycle;
use chakra_kernel::grid::topology::Topology;
use chakra_kernel::proof::hash::ContentHash;
use chakra_search::policy::TieBreakV1;
use chakra_search::search::SearchStats;
use chakra_search::verify::VerificationReportV1;

use crate::annotate::{Annotation, Annotator, NoopAnnotator, WordSpan};
use crate::symbols::{SymbolError, SymbolTable};

/// Hex digits of the fingerprint used in file names.
pub const FILE_STEM_HEX_LEN: usize = 12;

/// Error writing or reading a solution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OutputError {
    #[error("I/O error: {detail}")]
    Io { detail: String },
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error("sidecar serialization failed: {detail}")]
    Json { detail: String },
    #[error("malformed solution file at line {line}: {detail}")]
    Malformed { line: usize, detail: String },
}

/// Everything known about a cycle that passed dedup and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedCycle {
    /// Zero-based attempt index that found the cycle.
    pub attempt: u64,
    pub cycle: Cycle,
    pub fingerprint: ContentHash,
    /// Tie-break strategy actually used by the attempt (seed included).
    pub tie_break: TieBreakV1,
    pub stats: SearchStats,
    pub report: VerificationReportV1,
}

/// Receiver of accepted cycles.
pub trait CycleSink {
    /// Persist or otherwise consume `accepted`.
    ///
    /// Returns where the solution was stored, if anywhere.
    ///
    /// # Errors
    ///
    /// Any [`OutputError`]. The run loop logs it and continues.
    fn accept(
        &mut self,
        topology: &Topology,
        accepted: &AcceptedCycle,
    ) -> Result<Option<PathBuf>, OutputError>;
}

/// Paths of one written solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionPaths {
    pub text: PathBuf,
    pub sidecar: PathBuf,
}

/// Writes solution text files and JSON sidecars.
pub struct SolutionWriter {
    dir: PathBuf,
    prefix: String,
    script_a: SymbolTable,
    script_b: SymbolTable,
    annotator: Box<dyn Annotator>,
}

impl std::fmt::Debug for SolutionWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolutionWriter")
            .field("dir", &self.dir)
            .field("prefix", &self.prefix)
            .field("script_a", &self.script_a.script())
            .field("script_b", &self.script_b.script())
            .finish_non_exhaustive()
    }
}

impl SolutionWriter {
    #[must_use]
    pub fn new(
        dir: impl Into<PathBuf>,
        prefix: impl Into<String>,
        script_a: SymbolTable,
        script_b: SymbolTable,
    ) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            script_a,
            script_b,
            annotator: Box::new(NoopAnnotator),
        }
    }

    #[must_use]
    pub fn with_annotator(mut self, annotator: Box<dyn Annotator>) -> Self {
        self.annotator = annotator;
        self
    }

    /// Render and write one solution.
    ///
    /// Annotator failures are logged and leave the annotation block out, as
    /// does any annotation [`read_solution`] could not read back.
    ///
    /// # Errors
    ///
    /// [`OutputError::Symbol`] if a value has no glyph, [`OutputError::Io`]
    /// on filesystem failures, [`OutputError::Json`] if the sidecar cannot be
    /// serialized.
    pub fn write(
        &mut self,
        topology: &Topology,
        accepted: &AcceptedCycle,
    ) -> Result<SolutionPaths, OutputError> {
        let values = accepted.cycle.values(topology);
        let line_a = self.script_a.render(&values)?;
        let line_b = self.script_b.render(&values)?;

        let glyphs: Vec<&str> = values
            .iter()
            .map(|&v| self.script_a.symbol(v))
            .collect::<Result<_, _>>()?;
        let mut annotations = match self.annotator.annotate(&glyphs) {
            Ok(annotations) => annotations,
            Err(e) => {
                log::warn!("annotation skipped for attempt {}: {e}", accepted.attempt);
                Vec::new()
            }
        };
        annotations.retain(|annotation| {
            let keep = fits_block(annotation);
            if !keep {
                log::warn!(
                    "annotation {:?} dropped for attempt {}: does not fit the block layout",
                    annotation.text,
                    accepted.attempt
                );
            }
            keep
        });

        let mut text = String::new();
        text.push_str(&line_a);
        text.push_str("\n\n");
        text.push_str(self.script_b.script());
        text.push_str(":\n");
        text.push_str(&line_b);
        text.push_str("\n\n");
        for annotation in &annotations {
            text.push_str(&annotation.text);
            text.push('\n');
            text.push_str(&annotation.meaning);
            text.push('\n');
            text.push_str(&annotation.spans_line());
            text.push_str("\n\n");
        }
        text.push_str("Path: ");
        text.push_str(&trace_line(topology, &accepted.cycle));
        text.push('\n');

        std::fs::create_dir_all(&self.dir).map_err(|e| OutputError::Io {
            detail: format!("create {}: {e}", self.dir.display()),
        })?;
        let stem = format!(
            "{}-{}",
            self.prefix,
            accepted.fingerprint.short_hex(FILE_STEM_HEX_LEN)
        );
        let paths = SolutionPaths {
            text: self.dir.join(format!("{stem}.txt")),
            sidecar: self.dir.join(format!("{stem}.json")),
        };

        let sidecar = self.sidecar(topology, accepted, &values);
        let sidecar_bytes = serde_json::to_vec_pretty(&sidecar).map_err(|e| OutputError::Json {
            detail: e.to_string(),
        })?;

        write_atomic(&paths.text, text.as_bytes())?;
        write_atomic(&paths.sidecar, &sidecar_bytes)?;
        Ok(paths)
    }

    fn sidecar(
        &self,
        topology: &Topology,
        accepted: &AcceptedCycle,
        values: &[u32],
    ) -> serde_json::Value {
        let (row, col) = topology.vertex(accepted.cycle.start()).coords();
        let tie_break = match accepted.tie_break {
            TieBreakV1::RowMajor => serde_json::json!({ "kind": "row_major" }),
            TieBreakV1::Seeded { seed } => serde_json::json!({ "kind": "seeded", "seed": seed }),
        };
        let coords: Vec<[u32; 2]> = accepted
            .cycle
            .coords(topology)
            .into_iter()
            .map(|(r, c)| [r, c])
            .collect();
        serde_json::json!({
            "attempt": accepted.attempt,
            "coords": coords,
            "fingerprint": accepted.fingerprint.as_str(),
            "grid_identity": topology.identity_hash().as_str(),
            "max_consonant_run": accepted.report.max_consonant_run,
            "max_vowel_run": accepted.report.max_vowel_run,
            "scripts": {
                "a": { "name": self.script_a.script(), "digest": self.script_a.digest().as_str() },
                "b": { "name": self.script_b.script(), "digest": self.script_b.digest().as_str() },
            },
            "start": { "row": row, "col": col },
            "stats": {
                "backtracks": accepted.stats.backtracks,
                "steps": accepted.stats.steps,
            },
            "tie_break": tie_break,
            "values": values,
        })
    }
}

impl CycleSink for SolutionWriter {
    fn accept(
        &mut self,
        topology: &Topology,
        accepted: &AcceptedCycle,
    ) -> Result<Option<PathBuf>, OutputError> {
        let paths = self.write(topology, accepted)?;
        log::info!("wrote {}", paths.text.display());
        Ok(Some(paths.text))
    }
}

/// Whether `annotation` survives the three-line block layout unchanged.
///
/// Text must be non-empty and must not look like the trace line. No field
/// may break a line, and span words may not contain the `, ` separator.
fn fits_block(annotation: &Annotation) -> bool {
    let single_line = |s: &str| !s.contains(['\n', '\r']);
    !annotation.text.is_empty()
        && !annotation.text.starts_with("Path: ")
        && single_line(&annotation.text)
        && single_line(&annotation.meaning)
        && annotation
            .spans
            .iter()
            .all(|span| single_line(&span.word) && !span.word.contains(", "))
}

/// `(r,c):v -> (r,c):v -> ...` over the closed sequence.
#[must_use]
pub fn trace_line(topology: &Topology, cycle: &Cycle) -> String {
    cycle
        .as_slice()
        .iter()
        .map(|&id| topology.vertex(id).to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// A solution text file parsed back into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionRecord {
    /// Script A rendering, as written.
    pub script_a_line: String,
    pub script_b_name: String,
    pub script_b_line: String,
    pub annotations: Vec<Annotation>,
    /// `(row, col, value)` along the trace.
    pub path: Vec<(u32, u32, u32)>,
}

/// Parse the text of a solution file.
///
/// # Errors
///
/// [`OutputError::Malformed`] naming the first line that does not fit the
/// layout.
pub fn read_solution(text: &str) -> Result<SolutionRecord, OutputError> {
    let lines: Vec<&str> = text.lines().collect();
    let line = |i: usize| line_at(&lines, i);

    let script_a_line = line(0)?.to_string();
    expect_blank(line(1)?, 1)?;
    let script_b_name = line(2)?
        .strip_suffix(':')
        .ok_or_else(|| OutputError::Malformed {
            line: 3,
            detail: "expected script heading".into(),
        })?
        .to_string();
    let script_b_line = line(3)?.to_string();
    expect_blank(line(4)?, 4)?;

    // Each annotation block is exactly text, meaning, spans, blank.
    let mut annotations = Vec::new();
    let mut i = 5;
    loop {
        let current = line(i)?;
        if let Some(trace) = current.strip_prefix("Path: ") {
            let path = parse_trace(trace, i)?;
            return Ok(SolutionRecord {
                script_a_line,
                script_b_name,
                script_b_line,
                annotations,
                path,
            });
        }
        if current.is_empty() {
            return Err(OutputError::Malformed {
                line: i + 1,
                detail: "empty annotation text".into(),
            });
        }
        annotations.push(Annotation {
            text: current.to_string(),
            meaning: line(i + 1)?.to_string(),
            spans: parse_spans(line(i + 2)?, i + 2)?,
        });
        expect_blank(line(i + 3)?, i + 3)?;
        i += 4;
    }
}

/// Read and parse a solution file from disk.
///
/// # Errors
///
/// [`OutputError::Io`] if unreadable, otherwise as [`read_solution`].
pub fn read_solution_file(path: impl AsRef<Path>) -> Result<SolutionRecord, OutputError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| OutputError::Io {
        detail: format!("read {}: {e}", path.display()),
    })?;
    read_solution(&text)
}

fn line_at<'a>(lines: &[&'a str], i: usize) -> Result<&'a str, OutputError> {
    lines.get(i).copied().ok_or_else(|| OutputError::Malformed {
        line: i + 1,
        detail: "unexpected end of file".into(),
    })
}

fn expect_blank(text: &str, index: usize) -> Result<(), OutputError> {
    if text.is_empty() {
        Ok(())
    } else {
        Err(OutputError::Malformed {
            line: index + 1,
            detail: "expected blank line".into(),
        })
    }
}

fn parse_spans(text: &str, index: usize) -> Result<Vec<WordSpan>, OutputError> {
    let malformed = |detail: &str| OutputError::Malformed {
        line: index + 1,
        detail: detail.to_string(),
    };
    text.split(", ")
        .filter(|s| !s.is_empty())
        .map(|span| {
            let (word, range) = span.rsplit_once(": ").ok_or_else(|| malformed("span without ':'"))?;
            let (start, end) = range
                .split_once(" - ")
                .ok_or_else(|| malformed("span without range"))?;
            Ok(WordSpan {
                word: word.to_string(),
                start: start.parse().map_err(|_| malformed("bad span start"))?,
                end: end.parse().map_err(|_| malformed("bad span end"))?,
            })
        })
        .collect()
}

fn parse_trace(text: &str, index: usize) -> Result<Vec<(u32, u32, u32)>, OutputError> {
    let malformed = |step: &str| OutputError::Malformed {
        line: index + 1,
        detail: format!("bad trace step {step:?}"),
    };
    text.split(" -> ")
        .map(|step| {
            let (coords, value) = step
                .strip_prefix('(')
                .and_then(|s| s.split_once("):"))
                .ok_or_else(|| malformed(step))?;
            let (row, col) = coords.split_once(',').ok_or_else(|| malformed(step))?;
            Ok((
                row.parse().map_err(|_| malformed(step))?,
                col.parse().map_err(|_| malformed(step))?,
                value.parse().map_err(|_| malformed(step))?,
            ))
        })
        .collect()
}

/// Write a file atomically (write to temp, then rename).
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), OutputError> {
    let dir = path.parent().ok_or_else(|| OutputError::Io {
        detail: "no parent directory".into(),
    })?;

    let temp_name = format!(
        ".tmp_{}",
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    let temp_path = dir.join(temp_name);

    std::fs::write(&temp_path, content).map_err(|e| OutputError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;

    std::fs::rename(&temp_path, path).map_err(|e| OutputError::Io {
        detail: format!("rename {} -> {}: {e}", temp_path.display(), path.display()),
    })?;

    Ok(())
}
