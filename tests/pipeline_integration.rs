// End-to-end tests of the transform pipeline through the public API

use pali_chant::chant::hints::BeatPrefix;
use pali_chant::{
    build_syllables, classify_tones, prepare, render, split_segments, tokenize, ChantConfig, CommentMarks,
    OutputFormat, PreprocessOptions, RenderOptions, Transcriber, Transcript,
};

const MORNING_CHANT: &str = include_str!("fixtures/morning_chant.txt");

/// Hyphens mark the expected syllable boundaries inside each word
const REFERENCE: &str = "A-haṁ bhan-te sam-ba-hu-lā nā-nā-vat-thu-kā-ya pā-cit-ti-yā-yo ā-pat-ti-yo \
    ā-pan-no tā pa-ṭi-de-se-mi. Pas-sa-si ā-vu-so? Ā-ma bhan-te pas-sā-mi. Ā-ya-tiṁ ā-vu-so \
    saṁ-va-rey-yā-si. Sā-dhu suṭ-ṭhu bhan-te saṁ-va-ris-sā-mi.";

fn prepared_fixture() -> (String, Vec<String>) {
    let options = PreprocessOptions {
        comment_marks: Some(CommentMarks::default()),
        delete_pattern: None,
    };
    let prepared = prepare(MORNING_CHANT, &options).expect("fixture preprocesses");
    (prepared.text, prepared.comments)
}

fn transcribe(text: &str, config: ChantConfig) -> Transcript {
    Transcriber::new(config).expect("valid config").transcribe(text)
}

#[test]
fn test_reference_syllabification() {
    let expected: Vec<String> = REFERENCE
        .split_whitespace()
        .flat_map(|word| word.trim_end_matches(['.', '?']).split('-'))
        .map(str::to_string)
        .collect();
    let input = REFERENCE.replace('-', "");

    let transcript = transcribe(&input, ChantConfig::default());
    let actual: Vec<String> = transcript
        .syllables()
        .filter(|s| !s.irrelevant)
        .map(|s| s.text())
        .collect();

    assert_eq!(actual, expected);
}

#[test]
fn test_round_trip_and_partition() {
    let (text, _) = prepared_fixture();
    let units = tokenize(&text);
    let unit_count = units.len();

    let transcript = transcribe(&text, ChantConfig::default());
    assert_eq!(transcript.text(), text);
    assert_eq!(transcript.units().count(), unit_count);
    assert!(transcript.segments.iter().all(|s| !s.syllables.is_empty()));
    assert!(transcript.syllables().all(|s| !s.units.is_empty()));
}

#[test]
fn test_stages_compose_like_the_transcriber() {
    let (text, _) = prepared_fixture();
    let config = ChantConfig::default();

    let syllables = classify_tones(build_syllables(tokenize(&text)), &config);
    let mut segments = split_segments(syllables);
    let summary = pali_chant::place_hints(&mut segments, config.hint_sensitivity);

    let transcript = transcribe(&text, config);
    assert_eq!(segments, transcript.segments);
    assert_eq!(summary, transcript.hint_summary);
}

#[test]
fn test_segments_end_at_breaks() {
    let (text, _) = prepared_fixture();
    let transcript = transcribe(&text, ChantConfig::default());
    let last = transcript.segments.len() - 1;
    for (i, segment) in transcript.segments.iter().enumerate() {
        let closing = segment.syllables.last().map(|s| s.text()).unwrap_or_default();
        if i < last {
            assert!(
                closing.contains('\n') || closing.contains('.') || closing.contains('?'),
                "segment {i} ends with {closing:?}"
            );
        }
    }
}

#[test]
fn test_tone_invariants() {
    let (text, _) = prepared_fixture();
    let transcript = transcribe(&text, ChantConfig::default());
    for syllable in transcript.syllables() {
        assert!(!(syllable.true_high && syllable.optional_high), "{}", syllable.text());
        if syllable.true_high {
            assert!(syllable.is_long && syllable.not_stopped && syllable.has_high_tone_onset);
        }
        if syllable.irrelevant {
            assert!(!syllable.is_long && !syllable.hint);
        }
    }
    assert!(transcript.true_high_count() > 0);
    assert!(transcript.optional_high_count() > 0);
}

#[test]
fn test_classification_is_idempotent() {
    let (text, _) = prepared_fixture();
    let config = ChantConfig {
        plain_text: true,
        emphasize_optional_high: true,
        ..ChantConfig::default()
    };
    let once = classify_tones(build_syllables(tokenize(&text)), &config);
    let twice = classify_tones(once.clone(), &config);
    assert_eq!(once, twice);
}

#[test]
fn test_hints_only_in_long_segments() {
    let (text, _) = prepared_fixture();
    let transcript = transcribe(&text, ChantConfig::default());
    for segment in &transcript.segments {
        let beats = BeatPrefix::new(&segment.syllables).total().beats();
        if beats <= 26 {
            assert_eq!(segment.hint_count(), 0, "{}", segment.text());
        }
        for syllable in segment.syllables.iter().filter(|s| s.hint) {
            assert!(syllable.is_long);
        }
    }
}

#[test]
fn test_zero_sensitivity_disables_hints() {
    let (text, _) = prepared_fixture();
    let config = ChantConfig {
        hint_sensitivity: 0.0,
        ..ChantConfig::default()
    };
    let transcript = transcribe(&text, config);
    assert_eq!(transcript.hint_summary.hints, 0);
    assert!(transcript.syllables().all(|s| !s.hint));
}

#[test]
fn test_long_compound_is_hinted() {
    let transcript = transcribe(&"kā".repeat(20), ChantConfig::default());
    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.hint_summary.hinted_segments, 1);
    assert_eq!(transcript.hint_summary.hints, 2);
    assert!(transcript.segments[0].syllables[8].hint);
}

#[test]
fn test_word_list_is_hinted_at_word_ends() {
    let text = vec!["kāyo"; 20].join(" ");
    let hinted = |transcript: &Transcript| -> Vec<String> {
        transcript.syllables().filter(|s| s.hint).map(|s| s.text()).collect()
    };

    let transcript = transcribe(&text, ChantConfig::default());
    assert_eq!(transcript.segments.len(), 1);
    let positions: Vec<usize> = transcript.segments[0]
        .syllables
        .iter()
        .enumerate()
        .filter(|(_, s)| s.hint)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(positions, vec![16, 28, 40, 49]);
    assert_eq!(hinted(&transcript), vec!["yo"; 4]);

    // a lower threshold stops treating the text as a list
    let strict = ChantConfig {
        hint_sensitivity: 4.0,
        ..ChantConfig::default()
    };
    assert!(hinted(&transcribe(&text, strict)).is_empty());
}

#[test]
fn test_irrelevant_only_input() {
    let transcript = transcribe("... , ;\n\n 42 —\n", ChantConfig::default());
    assert_eq!(transcript.syllable_count(), 0);
    assert_eq!(transcript.hint_summary.hints, 0);
    assert!(transcript.syllables().all(|s| s.irrelevant));
}

#[test]
fn test_empty_input() {
    let transcript = transcribe("", ChantConfig::default());
    assert!(transcript.segments.is_empty());
    let page = render(&transcript, &[], &RenderOptions::default());
    assert!(page.ends_with("<body></body></html>"));
}

#[test]
fn test_html_render_restores_comments() {
    let (text, comments) = prepared_fixture();
    assert_eq!(comments, vec!["[Homage, three times]", "[Going for refuge]"]);

    let transcript = transcribe(&text, ChantConfig::default());
    let page = render(&transcript, &comments, &RenderOptions::default());
    assert!(page.contains("<span class=comment>[Homage, three times]</span>"));
    assert!(page.contains("<span class=comment>[Going for refuge]</span>"));
    assert!(!page.contains('𓃰'));
    assert!(page.contains("<span class=\"truehigh long\">"));
    assert_eq!(page.matches("<span").count(), page.matches("</span>").count());
}

#[test]
fn test_plain_text_render() {
    let (text, comments) = prepared_fixture();
    let config = ChantConfig {
        plain_text: true,
        ..ChantConfig::default()
    };
    let transcript = transcribe(&text, config);
    let options = RenderOptions {
        format: OutputFormat::Text,
        ..RenderOptions::default()
    };
    let out = render(&transcript, &comments, &options);
    assert!(out.starts_with("[Homage, three times]\nNa⸱mo tas⸱sa "));
    assert!(out.contains("gac⸱CHĀ⸱mi.█"));
    assert_eq!(out.lines().count(), text.lines().count());
}
