// Segment splitting at newlines and breaking punctuation

use tracing::debug;

use super::tables;
use super::tokenizer::{anchored_match_len, pattern_classes};
use super::{Segment, Syllable, Unit};

/// A unit starting with punctuation outside the exempt set (quotes, brackets, joiners)
pub fn is_breaking_punctuation(unit: &Unit) -> bool {
    let Some(first) = unit.text.chars().next() else {
        return false;
    };
    anchored_match_len(&pattern_classes().punctuation_run, &unit.text).is_some()
        && !tables::is_exempt_punctuation(first)
}

/// A syllable after which the current segment ends
pub fn ends_segment(syllable: &Syllable) -> bool {
    syllable.contains_newline() || syllable.units.iter().any(is_breaking_punctuation)
}

/// Group syllables into segments; the last segment is closed at end of input
pub fn split_segments(syllables: Vec<Syllable>) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for syllable in syllables {
        let stop = ends_segment(&syllable);
        current.push(syllable);
        if stop {
            segments.push(Segment::new(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        segments.push(Segment::new(current));
    }

    debug!("Split into {} segments", segments.len());
    segments
}
