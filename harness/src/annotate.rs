//! Optional annotation of accepted cycles.
//!
//! An [`Annotator`] turns the rendered symbol sequence of an accepted cycle
//! into sentences with word spans. Annotation runs after verification and
//! never influences acceptance: a failing annotator is logged and the
//! solution file is written without an annotation block.

/// A word located in the symbol sequence, by symbol index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSpan {
    pub word: String,
    pub start: usize,
    pub end: usize,
}

/// One annotated sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub text: String,
    pub meaning: String,
    pub spans: Vec<WordSpan>,
}

impl Annotation {
    /// The span list as written to solution files: `word: start - end, ...`.
    #[must_use]
    pub fn spans_line(&self) -> String {
        self.spans
            .iter()
            .map(|s| format!("{}: {} - {}", s.word, s.start, s.end))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnnotationError {
    #[error("annotator unavailable: {detail}")]
    Unavailable { detail: String },
    #[error("annotator returned an unusable response: {detail}")]
    BadResponse { detail: String },
}

/// Collaborator that annotates a symbol sequence.
pub trait Annotator {
    /// Annotate `symbols` (one glyph per cycle position, closing vertex included).
    ///
    /// # Errors
    ///
    /// Any [`AnnotationError`]; the caller discards it.
    fn annotate(&mut self, symbols: &[&str]) -> Result<Vec<Annotation>, AnnotationError>;
}

/// Annotator that never produces anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnnotator;

impl Annotator for NoopAnnotator {
    fn annotate(&mut self, _symbols: &[&str]) -> Result<Vec<Annotation>, AnnotationError> {
        Ok(Vec::new())
    }
}
