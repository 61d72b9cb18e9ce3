// Length, stop and tone flags per syllable
// One left-to-right pass per syllable; flags stick once set

use tracing::debug;

use super::tables::{self, HIGH_TONE_ONSETS, OPTIONAL_HIGH_ONSETS};
use super::{ChantConfig, Syllable, Unit, UnitClass};

/// Flags derived from a syllable's units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneFlags {
    pub irrelevant: bool,
    pub is_long: bool,
    pub not_stopped: bool,
    pub has_high_tone_onset: bool,
    pub true_high: bool,
    pub optional_high: bool,
}

/// Long vowel, short vowel before the nasal mark, or short vowel before a closing consonant
pub fn lengthens(unit: &Unit, next: Option<&Unit>) -> bool {
    match unit.class {
        UnitClass::LongVowel => true,
        UnitClass::ShortVowel => next.is_some_and(|n| {
            tables::is_nasal_mark(&n.text) || (n.class == UnitClass::Consonant && n.closing)
        }),
        _ => false,
    }
}

/// A closing continuant or a closing long vowel leaves the syllable unstopped
pub fn releases(unit: &Unit) -> bool {
    unit.closing && (tables::is_continuant(&unit.text) || unit.class == UnitClass::LongVowel)
}

/// Short vowel after an optional-high onset that is closing or not followed by a continuant
pub fn allows_optional_high(unit: &Unit, next: Option<&Unit>) -> bool {
    unit.class == UnitClass::ShortVowel && (unit.closing || !next.is_some_and(|n| tables::is_continuant(&n.text)))
}

/// Derive the flags of one syllable without touching its units
pub fn derive_flags(units: &[Unit]) -> ToneFlags {
    let mut flags = ToneFlags {
        irrelevant: !units.iter().any(Unit::is_relevant),
        ..ToneFlags::default()
    };
    let Some(onset) = units.first() else {
        return flags;
    };
    flags.has_high_tone_onset = tables::is_one_of(&onset.text, HIGH_TONE_ONSETS);
    let optional_onset = tables::is_one_of(&onset.text, OPTIONAL_HIGH_ONSETS);

    for (i, unit) in units.iter().enumerate() {
        let next = units.get(i + 1);
        if lengthens(unit, next) {
            flags.is_long = true;
        }
        if releases(unit) {
            flags.not_stopped = true;
        }
        if flags.has_high_tone_onset && flags.not_stopped && flags.is_long {
            flags.true_high = true;
        }
        if !flags.true_high && optional_onset && allows_optional_high(unit, next) {
            flags.optional_high = true;
        }
    }
    flags
}

fn apply(syllable: &mut Syllable, flags: ToneFlags) {
    syllable.irrelevant = flags.irrelevant;
    syllable.is_long = flags.is_long;
    syllable.not_stopped = flags.not_stopped;
    syllable.has_high_tone_onset = flags.has_high_tone_onset;
    syllable.true_high = flags.true_high;
    syllable.optional_high = flags.optional_high;
}

fn upper_case(syllable: &mut Syllable) {
    for unit in &mut syllable.units {
        unit.text = unit.text.to_uppercase();
    }
}

/// Populate length and tone flags; in plain-text mode high syllables are upper-cased
pub fn classify_tones(mut syllables: Vec<Syllable>, config: &ChantConfig) -> Vec<Syllable> {
    let mut marked = 0usize;
    for syllable in &mut syllables {
        let flags = derive_flags(&syllable.units);
        apply(syllable, flags);

        if config.plain_text && (flags.true_high || (flags.optional_high && config.emphasize_optional_high)) {
            upper_case(syllable);
            marked += 1;
        }
    }
    debug!(syllables = syllables.len(), upper_cased = marked, "Classified tones");
    syllables
}
