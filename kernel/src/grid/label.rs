//! Phonetic labels derived from cell values.

/// Phonetic category of a cell.
///
/// Exactly one label applies to each value; it is derived once at vertex
/// construction and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Label {
    Vowel,
    Consonant,
    /// Anusvara, visarga and similar marks. Resets run-length counters.
    Special,
}

impl Label {
    /// Stable lowercase name used in logs and sidecar files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vowel => "vowel",
            Self::Consonant => "consonant",
            Self::Special => "special",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest vowel value in the 64-symbol alphabet (9 vowels × 3 lengths).
pub const DEFAULT_VOWEL_MAX: u32 = 27;

/// Highest consonant value in the 64-symbol alphabet (33 consonants).
pub const DEFAULT_CONSONANT_MAX: u32 = 60;

/// Maps a 1-based value to its [`Label`] by contiguous ranges.
///
/// - `1..=vowel_max` → [`Label::Vowel`]
/// - `vowel_max + 1..=consonant_max` → [`Label::Consonant`]
/// - anything above `consonant_max` → [`Label::Special`]
///
/// A `consonant_max` below `vowel_max` yields no consonants at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelScheme {
    pub vowel_max: u32,
    pub consonant_max: u32,
}

impl LabelScheme {
    #[must_use]
    pub const fn new(vowel_max: u32, consonant_max: u32) -> Self {
        Self {
            vowel_max,
            consonant_max,
        }
    }

    /// Classify a value.
    #[must_use]
    pub fn classify(&self, value: u32) -> Label {
        if value <= self.vowel_max {
            Label::Vowel
        } else if value <= self.consonant_max {
            Label::Consonant
        } else {
            Label::Special
        }
    }
}

impl Default for LabelScheme {
    fn default() -> Self {
        Self::new(DEFAULT_VOWEL_MAX, DEFAULT_CONSONANT_MAX)
    }
}
