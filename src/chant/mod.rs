// Core chanting transform: units -> syllables -> tones -> segments -> hints
// Every stage is a synchronous pass over data owned by one invocation

use anyhow::Result;
use tracing::{info, warn};

pub mod hints;
pub mod normalization;
pub mod segments;
pub mod syllables;
pub mod tables;
pub mod tokenizer;
pub mod tones;

pub use hints::{place_hints, BeatPrefix, BeatStats, HintSummary};
pub use segments::split_segments;
pub use syllables::build_syllables;
pub use tokenizer::{tokenize, tokenize_with_stats, TokenStats};
pub use tones::classify_tones;

/// Phonological class of a unit, fixed when the tokenizer creates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitClass {
    LongVowel,
    ShortVowel,
    Consonant,
    ElisionMark,
    Punctuation,
    Whitespace,
    Other,
}

impl UnitClass {
    pub fn is_vowel(self) -> bool {
        matches!(self, UnitClass::LongVowel | UnitClass::ShortVowel)
    }

    /// Linguistically meaningful: vowels, consonants and the elision mark
    pub fn is_relevant(self) -> bool {
        !matches!(self, UnitClass::Punctuation | UnitClass::Whitespace | UnitClass::Other)
    }

    /// Anything that is not a vowel or a consonant ends a word for lookahead purposes
    pub fn is_word_boundary(self) -> bool {
        !matches!(self, UnitClass::LongVowel | UnitClass::ShortVowel | UnitClass::Consonant)
    }
}

/// Smallest classified fragment of the input text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub text: String,
    pub class: UnitClass,
    /// Syllable-final per the phonotactic lookahead rules
    pub closing: bool,
}

impl Unit {
    pub fn new(text: impl Into<String>, class: UnitClass) -> Self {
        Self {
            text: text.into(),
            class,
            closing: false,
        }
    }

    pub fn is_relevant(&self) -> bool {
        self.class.is_relevant()
    }
}

/// A non-empty run of units with its derived length and tone flags
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Syllable {
    pub units: Vec<Unit>,
    pub is_long: bool,
    pub not_stopped: bool,
    pub has_high_tone_onset: bool,
    pub true_high: bool,
    pub optional_high: bool,
    pub irrelevant: bool,
    pub hint: bool,
}

impl Syllable {
    pub fn new(units: Vec<Unit>) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.units.iter().map(|u| u.text.as_str()).collect()
    }

    /// Beat weight used by hint placement: 2 long, 1 short, 0 irrelevant
    pub fn beats(&self) -> u32 {
        if self.irrelevant {
            0
        } else if self.is_long {
            2
        } else {
            1
        }
    }

    pub fn contains_space(&self) -> bool {
        self.units.iter().any(|u| u.text.contains(' '))
    }

    pub fn contains_newline(&self) -> bool {
        self.units.iter().any(|u| u.text.contains('\n'))
    }

    pub fn first_unit(&self) -> Option<&Unit> {
        self.units.first()
    }

    pub fn last_unit(&self) -> Option<&Unit> {
        self.units.last()
    }
}

/// Sentence-like span of syllables closed by a newline, breaking punctuation or end of input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Segment {
    pub syllables: Vec<Syllable>,
}

impl Segment {
    pub fn new(syllables: Vec<Syllable>) -> Self {
        Self { syllables }
    }

    pub fn text(&self) -> String {
        self.syllables.iter().map(|s| s.text()).collect()
    }

    /// Text with `⸱` between adjacent relevant syllables, e.g. `sam⸱mā`
    pub fn syllable_string(&self) -> String {
        let mut out = String::new();
        for (i, syllable) in self.syllables.iter().enumerate() {
            out.push_str(&syllable.text());
            if let Some(next) = self.syllables.get(i + 1) {
                if joins_relevant(syllable, next) {
                    out.push('⸱');
                }
            }
        }
        out
    }

    pub fn hint_count(&self) -> usize {
        self.syllables.iter().filter(|s| s.hint).count()
    }
}

/// True when a syllable separator belongs between `left` and `right`
pub fn joins_relevant(left: &Syllable, right: &Syllable) -> bool {
    let left_end = left.last_unit().is_some_and(Unit::is_relevant);
    let right_start = right.first_unit().is_some_and(Unit::is_relevant);
    left_end && right_start
}

/// Configuration threaded through every stage entry point
#[derive(Debug, Clone, PartialEq)]
pub struct ChantConfig {
    /// Beats-per-space ratio under which a long segment counts as a list; 0 disables hints
    pub hint_sensitivity: f64,
    /// Mark tones by upper-casing instead of styled spans
    pub plain_text: bool,
    /// Upper-case optional high tones too (plain text only)
    pub emphasize_optional_high: bool,
}

impl Default for ChantConfig {
    fn default() -> Self {
        Self {
            hint_sensitivity: 4.5,
            plain_text: false,
            emphasize_optional_high: false,
        }
    }
}

impl ChantConfig {
    /// Rejects a negative or non-finite sensitivity; 0 is the only value that disables hints
    pub fn validate(&self) -> Result<()> {
        if !self.hint_sensitivity.is_finite() || self.hint_sensitivity < 0.0 {
            anyhow::bail!(
                "Hint sensitivity must be a finite non-negative number, got {}",
                self.hint_sensitivity
            );
        }
        if self.emphasize_optional_high && !self.plain_text {
            warn!("Optional-high emphasis only applies to plain text output and will be ignored");
        }
        Ok(())
    }

    pub fn hints_enabled(&self) -> bool {
        self.hint_sensitivity != 0.0
    }
}

/// Result of one transform: segments plus counters for the stats report
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    pub segments: Vec<Segment>,
    pub token_stats: TokenStats,
    pub hint_summary: HintSummary,
}

impl Transcript {
    pub fn syllables(&self) -> impl Iterator<Item = &Syllable> {
        self.segments.iter().flat_map(|s| s.syllables.iter())
    }

    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.syllables().flat_map(|s| s.units.iter())
    }

    pub fn text(&self) -> String {
        self.units().map(|u| u.text.as_str()).collect()
    }

    pub fn syllable_count(&self) -> usize {
        self.syllables().filter(|s| !s.irrelevant).count()
    }

    pub fn true_high_count(&self) -> usize {
        self.syllables().filter(|s| s.true_high).count()
    }

    pub fn optional_high_count(&self) -> usize {
        self.syllables().filter(|s| s.optional_high).count()
    }
}

/// Runs the five stages in order with one configuration
#[derive(Debug, Clone, Default)]
pub struct Transcriber {
    config: ChantConfig,
}

impl Transcriber {
    pub fn new(config: ChantConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Tokenize, syllabify, classify, split and hint one normalized document
    pub fn transcribe(&self, text: &str) -> Transcript {
        let (units, token_stats) = tokenize_with_stats(text);
        let syllables = build_syllables(units);
        let syllables = classify_tones(syllables, &self.config);
        let mut segments = split_segments(syllables);
        let hint_summary = place_hints(&mut segments, self.config.hint_sensitivity);

        info!(
            units = token_stats.total(),
            segments = segments.len(),
            hinted_segments = hint_summary.hinted_segments,
            hints = hint_summary.hints,
            "Transcribed document"
        );

        Transcript {
            segments,
            token_stats,
            hint_summary,
        }
    }
}
