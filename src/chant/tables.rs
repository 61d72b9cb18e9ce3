// Grapheme tables for the Romanized Pali orthography
// Entries are lower case; lookups fold the candidate text before comparing

use super::UnitClass;

pub const LONG_VOWELS: &[&str] = &["ā", "e", "ī", "o", "ū"];

pub const SHORT_VOWELS: &[&str] = &["a", "i", "u"];

/// Aspirated digraphs and `sm` come before their single-letter prefixes
pub const CONSONANTS: &[&str] = &[
    "bh", "dh", "ḍh", "gh", "jh", "kh", "ph", "th", "ṭh", "sm",
    "ch", "c", "g", "h", "s", "j", "r", "p", "b", "d", "k", "t", "ṭ",
    "m", "ṁ", "ṃ", "n", "ñ", "ṅ", "ṇ", "y", "l", "ḷ", "ḍ", "v",
];

pub const ELISION_MARKS: &[&str] = &["’"];

pub const FREQUENT_PUNCTUATION: &[&str] = &[".", ",", "\"", "“", "”", "’", ";", "?"];

/// NO-BREAK SPACE is listed explicitly
pub const FREQUENT_WHITESPACE: &[&str] = &[" ", "\n", "\u{a0}"];

pub const DIGITS: &[&str] = &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Niggahīta, in both of its customary spellings
pub const NASAL_MARKS: &[&str] = &["ṁ", "ṃ"];

/// Consonants that never close a syllable unless a vowel follows them
pub const NEVER_SYLLABLE_FINAL: &[&str] = &["bh", "dh", "ḍh", "gh", "jh", "kh", "ph", "th", "ṭh", "v", "r"];

/// Continuants: a syllable closed by one of these is not stopped
pub const CONTINUANTS: &[&str] = &["n", "ñ", "ṅ", "ṇ", "m", "ṁ", "ṃ", "l", "ḷ", "y"];

pub const HIGH_TONE_ONSETS: &[&str] = &["ch", "th", "ṭh", "kh", "ph", "sm", "s", "h"];

pub const OPTIONAL_HIGH_ONSETS: &[&str] = &["v", "bh", "r", "n", "ṇ", "m", "y"];

/// Joiners and quotation marks that do not end a segment
pub const EXEMPT_PUNCTUATION: &[char] = &[
    '-', '“', '’', '„', '"', '(', ')', '[', ']', '«', '\'', '‘', '‚',
];

/// Literal tables in match priority order
pub const LITERAL_TABLES: &[(UnitClass, &[&str])] = &[
    (UnitClass::LongVowel, LONG_VOWELS),
    (UnitClass::ShortVowel, SHORT_VOWELS),
    (UnitClass::Consonant, CONSONANTS),
    (UnitClass::ElisionMark, ELISION_MARKS),
    (UnitClass::Punctuation, FREQUENT_PUNCTUATION),
    (UnitClass::Whitespace, FREQUENT_WHITESPACE),
    (UnitClass::Other, DIGITS),
];

/// Case-insensitive equality against a lower-case table entry
pub fn folds_to(text: &str, lower: &str) -> bool {
    text.chars().flat_map(char::to_lowercase).eq(lower.chars())
}

/// Case-insensitive table membership
pub fn is_one_of(text: &str, table: &[&str]) -> bool {
    table.iter().any(|entry| folds_to(text, entry))
}

pub fn is_nasal_mark(text: &str) -> bool {
    is_one_of(text, NASAL_MARKS)
}

pub fn is_continuant(text: &str) -> bool {
    is_one_of(text, CONTINUANTS)
}

pub fn is_exempt_punctuation(ch: char) -> bool {
    EXEMPT_PUNCTUATION.contains(&ch)
}

/// Byte length of `literal` at the head of `text`, compared case-insensitively
pub fn match_prefix(text: &str, literal: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    let mut end = 0;
    for expected in literal.chars() {
        let (offset, ch) = chars.next()?;
        if !ch.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = offset + ch.len_utf8();
    }
    Some(end)
}
