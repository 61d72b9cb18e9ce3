// Greedy tokenizer: literal grapheme tables first, then pattern classes, then one codepoint
// Uses regex-automata meta regexes for the punctuation and whitespace runs

use regex_automata::{meta::Regex, Anchored, Input};
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::normalization::COMMENT_PLACEHOLDER;
use super::tables::{self, LITERAL_TABLES};
use super::{Unit, UnitClass};

/// Compiled pattern classes shared by every invocation
pub(crate) struct PatternClasses {
    pub punctuation_run: Regex,
    pub whitespace_run: Regex,
}

static PATTERN_CLASSES: OnceLock<PatternClasses> = OnceLock::new();

pub(crate) fn pattern_classes() -> &'static PatternClasses {
    PATTERN_CLASSES.get_or_init(|| PatternClasses {
        // Constant patterns: compilation cannot fail
        punctuation_run: Regex::new(r"\pP+").expect("punctuation pattern compiles"),
        whitespace_run: Regex::new(r"\s+").expect("whitespace pattern compiles"),
    })
}

/// Byte length of an anchored match of `regex` at the head of `text`
pub(crate) fn anchored_match_len(regex: &Regex, text: &str) -> Option<usize> {
    let input = Input::new(text).anchored(Anchored::Yes);
    regex.find(input).map(|m| m.end()).filter(|&end| end > 0)
}

/// How each unit was recognized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenStats {
    pub literal_matches: usize,
    pub pattern_matches: usize,
    pub fallback_matches: usize,
}

impl TokenStats {
    pub fn total(&self) -> usize {
        self.literal_matches + self.pattern_matches + self.fallback_matches
    }

    /// Share of units resolved from the literal tables, 0.0 for empty input
    pub fn literal_ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.literal_matches as f64 / total as f64,
        }
    }
}

/// Table match at the head of `rest`; the flag is false when only a case-folded comparison matched
fn match_literal(rest: &str) -> Option<(usize, UnitClass, bool)> {
    LITERAL_TABLES.iter().find_map(|(class, table)| {
        table.iter().find_map(|literal| {
            tables::match_prefix(rest, literal).map(|len| (len, *class, rest.starts_with(literal)))
        })
    })
}

fn match_pattern(rest: &str) -> Option<(usize, UnitClass)> {
    let classes = pattern_classes();
    if let Some(len) = anchored_match_len(&classes.punctuation_run, rest) {
        return Some((len, UnitClass::Punctuation));
    }
    anchored_match_len(&classes.whitespace_run, rest).map(|len| (len, UnitClass::Whitespace))
}

/// Split normalized text into classified units
pub fn tokenize(text: &str) -> Vec<Unit> {
    tokenize_with_stats(text).0
}

/// Split normalized text into classified units, reporting how each was matched
///
/// Never fails: anything unmatched is consumed one codepoint at a time as
/// [`UnitClass::Other`], so concatenating the unit texts gives back `text`.
pub fn tokenize_with_stats(text: &str) -> (Vec<Unit>, TokenStats) {
    let mut units = Vec::with_capacity(text.len());
    let mut stats = TokenStats::default();
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        let (len, class) = if let Some((len, class, exact)) = match_literal(rest) {
            if exact {
                stats.literal_matches += 1;
            } else {
                stats.pattern_matches += 1;
            }
            (len, class)
        } else if let Some(found) = match_pattern(rest) {
            stats.pattern_matches += 1;
            found
        } else {
            stats.fallback_matches += 1;
            if !rest.starts_with(COMMENT_PLACEHOLDER) {
                trace!("Non-Pali character {:?} (U+{:04X})", ch, ch as u32);
            }
            (ch.len_utf8(), UnitClass::Other)
        };

        let (head, tail) = rest.split_at(len);
        units.push(Unit::new(head, class));
        rest = tail;
    }

    debug!(
        units = units.len(),
        literal_ratio = stats.literal_ratio(),
        "Tokenized {} bytes",
        text.len()
    );
    (units, stats)
}
