// Input preprocessing before tokenization
// Deletion, comment masking, niggahīta spelling and hyphen removal, in that order

use anyhow::{bail, Context, Result};
use regex_automata::meta::Regex;
use tracing::{debug, warn};

/// Stands in for a masked comment until rendering is done
pub const COMMENT_PLACEHOLDER: &str = "𓃰";

/// Opening and closing comment delimiters, given on the command line as `"[:]"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentMarks {
    pub open: char,
    pub close: char,
}

impl Default for CommentMarks {
    fn default() -> Self {
        Self { open: '[', close: ']' }
    }
}

impl CommentMarks {
    /// Parse `<open>:<close>`, one character each
    pub fn parse(marks: &str) -> Result<Self> {
        let chars: Vec<char> = marks.chars().collect();
        match chars.as_slice() {
            [open, ':', close] => Ok(Self {
                open: *open,
                close: *close,
            }),
            _ => bail!("Invalid comment marks {marks:?}: expected two characters separated by a colon, e.g. \"[:]\""),
        }
    }

    /// Shortest run from an opening to a closing mark, across newlines
    fn pattern(&self) -> Result<Regex> {
        let pattern = format!(r"(?s)\x{{{:X}}}.*?\x{{{:X}}}", self.open as u32, self.close as u32);
        Regex::new(&pattern).context("Failed to compile comment pattern")
    }
}

/// Remove every match of `regex` from `text`
pub fn delete_matches(text: &str, regex: &Regex) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in regex.find_iter(text) {
        out.push_str(&text[last..found.start()]);
        last = found.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Replace each comment with [`COMMENT_PLACEHOLDER`]; returns the text and the comments in order
pub fn mask_comments(text: &str, marks: CommentMarks) -> Result<(String, Vec<String>)> {
    let regex = marks.pattern()?;
    let mut out = String::with_capacity(text.len());
    let mut comments = Vec::new();
    let mut last = 0;
    for found in regex.find_iter(text) {
        out.push_str(&text[last..found.start()]);
        out.push_str(COMMENT_PLACEHOLDER);
        comments.push(text[found.range()].to_string());
        last = found.end();
    }
    out.push_str(&text[last..]);
    Ok((out, comments))
}

/// Unify the niggahīta spelling and rejoin hyphenated compounds
pub fn normalize_text(text: &str) -> String {
    text.replace('ṃ', "ṁ").replace('Ṃ', "Ṁ").replace('-', "")
}

/// Occurrences of `...` or `…`, usually an elided repeated formula
pub fn count_ellipses(text: &str) -> usize {
    text.matches("...").count() + text.matches('…').count()
}

/// What to do to the raw input before it is transcribed
#[derive(Debug, Clone, Default)]
pub struct PreprocessOptions {
    pub comment_marks: Option<CommentMarks>,
    /// Pattern whose matches are deleted first
    pub delete_pattern: Option<String>,
}

/// Normalized text ready for the tokenizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prepared {
    pub text: String,
    pub comments: Vec<String>,
    pub ellipses: usize,
}

pub fn prepare(source: &str, options: &PreprocessOptions) -> Result<Prepared> {
    let mut text = match &options.delete_pattern {
        Some(pattern) => {
            let regex = Regex::new(pattern).with_context(|| format!("Invalid deletion pattern {pattern:?}"))?;
            let kept = delete_matches(source, &regex);
            debug!(removed_bytes = source.len() - kept.len(), "Applied deletion pattern");
            kept
        }
        None => source.to_string(),
    };

    let mut comments = Vec::new();
    if let Some(marks) = options.comment_marks {
        let (masked, found) = mask_comments(&text, marks)?;
        debug!(comments = found.len(), "Masked comments");
        text = masked;
        comments = found;
    }

    let text = normalize_text(&text);
    let ellipses = count_ellipses(&text);
    if ellipses > 0 {
        warn!(
            "The input contains {} occurrence(s) of '...' or '…', which usually marks an elided repeated formula; the chanting text may be incomplete",
            ellipses
        );
    }

    Ok(Prepared {
        text,
        comments,
        ellipses,
    })
}
