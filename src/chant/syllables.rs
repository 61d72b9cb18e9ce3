// Syllable segmentation under Pali phonotactic rules
// Each unit's closing status is decided from its predecessor and up to three lookahead units

use tracing::debug;

use super::tables::{self, NEVER_SYLLABLE_FINAL};
use super::{Syllable, Unit, UnitClass};

/// A unit with its neighbours; missing neighbours lie past either end of the input
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    pub prev: Option<&'a Unit>,
    pub current: &'a Unit,
    pub next: [Option<&'a Unit>; 3],
}

impl<'a> Window<'a> {
    pub fn at(units: &'a [Unit], index: usize) -> Self {
        Self {
            prev: index.checked_sub(1).and_then(|i| units.get(i)),
            current: &units[index],
            next: [units.get(index + 1), units.get(index + 2), units.get(index + 3)],
        }
    }

    fn class_at(&self, ahead: usize) -> Option<UnitClass> {
        self.next[ahead - 1].map(|u| u.class)
    }
}

fn is_class(class: Option<UnitClass>, expected: UnitClass) -> bool {
    class == Some(expected)
}

fn is_vowel(class: Option<UnitClass>) -> bool {
    class.is_some_and(UnitClass::is_vowel)
}

/// Rule a: nothing follows
pub fn is_last(window: &Window) -> bool {
    window.next[0].is_none()
}

/// The next two units are both consonants
pub fn before_two_consonants(window: &Window) -> bool {
    is_class(window.class_at(1), UnitClass::Consonant) && is_class(window.class_at(2), UnitClass::Consonant)
}

pub fn before_nasal_mark(window: &Window) -> bool {
    window.next[0].is_some_and(|u| tables::is_nasal_mark(&u.text))
}

/// The next consonant cannot end a syllable because no vowel follows it
pub fn before_unreleased_onset(window: &Window) -> bool {
    let never_final = window.next[0].is_some_and(|u| tables::is_one_of(&u.text, NEVER_SYLLABLE_FINAL));
    never_final && !is_vowel(window.class_at(2))
}

/// Rule b: `su-pa-ṭi-pan-no`
pub fn closes_short_vowel(window: &Window) -> bool {
    window.current.class == UnitClass::ShortVowel
        && !before_two_consonants(window)
        && !before_nasal_mark(window)
        && !before_unreleased_onset(window)
}

/// Rule c: `ho-mi`
pub fn closes_long_vowel(window: &Window) -> bool {
    window.current.class == UnitClass::LongVowel && !before_two_consonants(window) && !before_nasal_mark(window)
}

/// Rule d: `sag-gaṁ`, and the first of two consonants in a row
pub fn closes_coda_consonant(window: &Window) -> bool {
    window.current.class == UnitClass::Consonant
        && window.prev.is_some_and(|u| u.class.is_vowel())
        && !is_vowel(window.class_at(1))
}

pub fn is_closing(window: &Window) -> bool {
    is_last(window) || closes_short_vowel(window) || closes_long_vowel(window) || closes_coda_consonant(window)
}

/// A word-final dangling consonant stays in the current syllable, and an
/// elision mark joins the consonant before it to the next word
pub fn must_reject(window: &Window) -> bool {
    if is_vowel(window.class_at(3)) {
        return false;
    }
    let dangling = is_class(window.class_at(1), UnitClass::Consonant)
        && window.class_at(2).map_or(true, UnitClass::is_word_boundary);
    let sandhi = window.current.class == UnitClass::Consonant && is_class(window.class_at(1), UnitClass::ElisionMark);
    dangling || sandhi
}

/// Where a unit sits relative to syllable boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub closing: bool,
    pub rejected: bool,
    pub opens: bool,
    pub ends_relevant_run: bool,
}

impl Boundary {
    pub fn decide(window: &Window) -> Self {
        let relevant = window.current.is_relevant();
        Self {
            closing: is_closing(window),
            rejected: must_reject(window),
            opens: relevant && window.prev.is_some_and(|u| !u.is_relevant()),
            ends_relevant_run: relevant && window.next[0].is_some_and(|u| !u.is_relevant()),
        }
    }

    pub fn closes_syllable(&self) -> bool {
        (self.closing && !self.rejected) || self.ends_relevant_run
    }
}

/// Group units into syllables; every unit lands in exactly one syllable
pub fn build_syllables(units: Vec<Unit>) -> Vec<Syllable> {
    let boundaries: Vec<Boundary> = (0..units.len())
        .map(|i| Boundary::decide(&Window::at(&units, i)))
        .collect();

    let mut syllables = Vec::new();
    let mut current = Vec::new();

    for (mut unit, boundary) in units.into_iter().zip(boundaries) {
        if boundary.opens && !current.is_empty() {
            syllables.push(Syllable::new(std::mem::take(&mut current)));
        }
        unit.closing = boundary.closing;
        current.push(unit);
        if boundary.closes_syllable() {
            syllables.push(Syllable::new(std::mem::take(&mut current)));
        }
    }
    if !current.is_empty() {
        syllables.push(Syllable::new(current));
    }

    debug!("Built {} syllables", syllables.len());
    syllables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chant::tokenize;

    fn split(text: &str) -> Vec<String> {
        build_syllables(tokenize(text)).iter().map(|s| s.text()).collect()
    }

    fn window_for(text: &str, index: usize, check: impl Fn(&Window) -> bool) -> bool {
        let units = tokenize(text);
        check(&Window::at(&units, index))
    }

    #[test]
    fn test_reference_words() {
        let cases = [
            ("arahaṁ", vec!["a", "ra", "haṁ"]),
            ("abhivādemi", vec!["a", "bhi", "vā", "de", "mi"]),
            ("supaṭipanno", vec!["su", "pa", "ṭi", "pan", "no"]),
            ("sambuddho", vec!["sam", "bud", "dho"]),
            ("tassa", vec!["tas", "sa"]),
            ("homi", vec!["ho", "mi"]),
            ("sammā", vec!["sam", "mā"]),
            ("khandho", vec!["khan", "dho"]),
            ("Ṭhānissaro", vec!["Ṭhā", "nis", "sa", "ro"]),
            ("yathā", vec!["ya", "thā"]),
            ("seyyo", vec!["sey", "yo"]),
            ("sotthi", vec!["sot", "thi"]),
            ("cīvaraṁ", vec!["cī", "va", "raṁ"]),
            ("Bhagavā", vec!["Bha", "ga", "vā"]),
        ];
        for (word, expected) in cases {
            assert_eq!(split(word), expected, "syllables of {word}");
        }
    }

    #[test]
    fn test_dangling_consonant_joins_previous_syllable() {
        assert_eq!(split("tam bud"), vec!["tam", " ", "bud"]);
        assert_eq!(split("tam"), vec!["tam"]);
    }

    #[test]
    fn test_irrelevant_runs_form_their_own_syllables() {
        assert_eq!(split("mā,  ho"), vec!["mā", ",  ", "ho"]);
        assert_eq!(split("  \n"), vec!["  \n"]);
    }

    #[test]
    fn test_unit_count_is_conserved() {
        let text = "Ahaṁ bhante sambahulā nānāvatthukāya pācittiyāyo āpattiyo āpanno.";
        let units = tokenize(text);
        let count = units.len();
        let syllables = build_syllables(units);
        assert!(syllables.iter().all(|s| !s.units.is_empty()));
        assert_eq!(syllables.iter().map(|s| s.units.len()).sum::<usize>(), count);
        let joined: String = syllables.iter().map(|s| s.text()).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn test_short_vowel_rule() {
        // "pa" in supaṭipanno closes, "a" before "nn" does not
        assert!(window_for("supa", 3, closes_short_vowel));
        assert!(!window_for("panno", 1, closes_short_vowel));
        // nasal mark keeps the vowel open
        assert!(!window_for("haṁ", 1, closes_short_vowel));
        // never-final consonant without a following vowel
        assert!(!window_for("abh ", 0, closes_short_vowel));
        assert!(window_for("abha", 0, closes_short_vowel));
    }

    #[test]
    fn test_long_vowel_rule() {
        assert!(window_for("homi", 1, closes_long_vowel));
        assert!(!window_for("ākkh", 0, closes_long_vowel));
        assert!(!window_for("tāṁ", 1, closes_long_vowel));
    }

    #[test]
    fn test_coda_consonant_rule() {
        assert!(window_for("sammā", 2, closes_coda_consonant));
        assert!(!window_for("sammā", 3, closes_coda_consonant));
        // no vowel before: onset of a cluster
        assert!(!window_for("svā", 0, closes_coda_consonant));
    }

    #[test]
    fn test_last_unit_always_closes() {
        assert!(window_for("mi", 1, is_closing));
        assert!(window_for("mi", 1, is_last));
    }

    #[test]
    fn test_rejection_rule() {
        // vowel before a word-final consonant
        assert!(window_for("tam bud", 1, must_reject));
        // consonant before an elision mark with no vowel in reach
        assert!(window_for("t’ ", 0, must_reject));
        // a vowel three units ahead lifts the rejection
        assert!(!window_for("t’ a", 0, must_reject));
        assert!(!window_for("homi", 1, must_reject));
    }

    #[test]
    fn test_elision_mark_joins_words() {
        let syllables = split("yath’idaṁ");
        assert!(syllables.iter().any(|s| s.contains('’')));
        let joined: String = syllables.concat();
        assert_eq!(joined, "yath’idaṁ");
    }
}
